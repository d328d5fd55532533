//! @ai:module:intent Qualified-name helpers and scope-aware display of type names
//! @ai:module:layer domain
//! @ai:module:public_api simple_name, package_of, top_level_class, NameScope
//! @ai:module:stateless true

use crate::tree::{ClassDecl, CompilationUnit, Import, Member};
use std::collections::HashSet;

/// @ai:intent Last segment of a dotted name
/// @ai:example ("io.swagger.annotations.Api") -> "Api"
/// @ai:effects pure
pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// @ai:intent Package part of a qualified type name
///
/// Package segments are the leading lowercase ones, following Java naming
/// conventions; `com.acme.Outer.Inner` has package `com.acme`.
/// @ai:effects pure
pub fn package_of(qualified: &str) -> &str {
    let mut end = 0;
    for (idx, segment) in segment_offsets(qualified) {
        if segment.chars().next().map_or(false, char::is_uppercase) {
            break;
        }
        end = idx + segment.len();
    }
    if end >= qualified.len() {
        // no class segment at all, e.g. a primitive
        return "";
    }
    &qualified[..end]
}

/// @ai:intent Dotted class path below the package
/// @ai:example ("com.acme.Outer.Inner") -> "Outer.Inner"
/// @ai:effects pure
pub fn class_path(qualified: &str) -> &str {
    let package = package_of(qualified);
    if package.is_empty() {
        qualified
    } else {
        &qualified[package.len() + 1..]
    }
}

/// @ai:intent Qualified name of the top-level class containing a possibly nested type
/// @ai:example ("com.acme.Outer.Inner") -> "com.acme.Outer"
/// @ai:effects pure
pub fn top_level_class(qualified: &str) -> &str {
    let package = package_of(qualified);
    let path = class_path(qualified);
    let first = path.split('.').next().unwrap_or(path);
    if package.is_empty() {
        &qualified[..first.len()]
    } else {
        &qualified[..package.len() + 1 + first.len()]
    }
}

/// @ai:intent Simple names of every member type declared anywhere in the unit
/// @ai:effects pure
pub fn member_type_names(unit: &CompilationUnit) -> HashSet<String> {
    fn collect(class: &ClassDecl, names: &mut HashSet<String>) {
        for nested in class.nested_classes() {
            names.insert(nested.name.clone());
            collect(nested, names);
        }
    }

    let mut names = HashSet::new();
    for class in &unit.types {
        collect(class, &mut names);
    }
    names
}

/// @ai:intent Join a parent name and a child segment
pub fn join(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{}.{}", parent, child)
    }
}

fn segment_offsets(qualified: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    qualified.split('.').map(move |segment| {
        let start = offset;
        offset += segment.len() + 1;
        (start, segment)
    })
}

/// @ai:intent Everything that decides how a qualified name is written at one spot
#[derive(Debug, Clone)]
pub struct NameScope<'a> {
    pub package: &'a str,
    pub imports: &'a [Import],
    /// Qualified names of the enclosing classes, outermost first.
    pub enclosing: Vec<String>,
    /// Simple names of the unit's top-level types.
    pub declared: Vec<&'a str>,
    /// Qualified names of the member types of every enclosing class.
    pub members: Vec<String>,
}

impl<'a> NameScope<'a> {
    /// @ai:intent Scope at the top of a compilation unit
    pub fn for_unit(unit: &'a CompilationUnit) -> Self {
        Self {
            package: unit.package.as_deref().unwrap_or(""),
            imports: &unit.imports,
            enclosing: Vec::new(),
            declared: unit.types.iter().map(|t| t.name.as_str()).collect(),
            members: Vec::new(),
        }
    }

    /// @ai:intent Scope inside the body of `class`, which is declared in the current scope
    pub fn enter(&self, class: &ClassDecl) -> Self {
        let parent = self
            .enclosing
            .last()
            .map(String::as_str)
            .unwrap_or(self.package);
        let qualified = join(parent, &class.name);

        let mut members = self.members.clone();
        members.extend(class.members.iter().filter_map(|m| match m {
            Member::Class(nested) => Some(join(&qualified, &nested.name)),
            _ => None,
        }));
        let mut enclosing = self.enclosing.clone();
        enclosing.push(qualified);

        Self {
            package: self.package,
            imports: self.imports,
            enclosing,
            declared: self.declared.clone(),
            members,
        }
    }

    /// @ai:intent Qualified name of the innermost enclosing class
    pub fn current_class(&self) -> Option<&str> {
        self.enclosing.last().map(String::as_str)
    }

    /// @ai:intent Shortest way to write a qualified name in this scope
    /// @ai:effects pure
    pub fn display(&self, qualified: &str) -> String {
        for outer in self.enclosing.iter().rev() {
            if qualified == outer {
                return simple_name(qualified).to_string();
            }
            if let Some(rest) = qualified.strip_prefix(outer.as_str()) {
                if let Some(rest) = rest.strip_prefix('.') {
                    return rest.to_string();
                }
            }
        }

        if self.is_visible(qualified) {
            class_path(qualified).to_string()
        } else {
            qualified.to_string()
        }
    }

    /// @ai:intent True when the top-level class of a name is reachable by its simple name
    /// @ai:effects pure
    pub fn is_visible(&self, qualified: &str) -> bool {
        let package = package_of(qualified);
        if package.is_empty() {
            return true;
        }
        let top = top_level_class(qualified);
        if self.shadowed_by_member(top) {
            return false;
        }

        if self
            .imports
            .iter()
            .any(|i| !i.is_static && !i.on_demand && i.name == top)
        {
            return true;
        }
        if self.claims_simple_name(top) {
            return false;
        }
        package == self.package
            || package == "java.lang"
            || self
                .imports
                .iter()
                .any(|i| !i.is_static && i.on_demand && i.name == package)
    }

    /// @ai:intent True when some other import or declared type already uses the simple name
    /// @ai:effects pure
    pub fn claims_simple_name(&self, top: &str) -> bool {
        let simple = simple_name(top);
        let imported_elsewhere = self.imports.iter().any(|i| {
            !i.is_static && !i.on_demand && i.name != top && simple_name(&i.name) == simple
        });
        let declared_here = self.declared.iter().any(|d| *d == simple)
            && join(self.package, simple) != top;
        imported_elsewhere || declared_here
    }

    /// @ai:intent True when a member type in scope hides the simple name of `top`
    /// @ai:effects pure
    pub fn shadowed_by_member(&self, top: &str) -> bool {
        let simple = simple_name(top);
        self.members
            .iter()
            .any(|m| m != top && simple_name(m) == simple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_split() {
        assert_eq!(package_of("com.acme.Outer.Inner"), "com.acme");
        assert_eq!(class_path("com.acme.Outer.Inner"), "Outer.Inner");
        assert_eq!(top_level_class("com.acme.Outer.Inner"), "com.acme.Outer");
        assert_eq!(package_of("Foo"), "");
        assert_eq!(top_level_class("Foo"), "Foo");
    }

    #[test]
    fn test_display_imported_name() {
        let imports = vec![Import::single("io.swagger.v3.oas.annotations.Operation")];
        let scope = NameScope {
            package: "com.acme",
            imports: &imports,
            enclosing: Vec::new(),
            declared: Vec::new(),
            members: Vec::new(),
        };

        assert_eq!(scope.display("io.swagger.v3.oas.annotations.Operation"), "Operation");
        assert_eq!(scope.display("java.lang.String"), "String");
        assert_eq!(scope.display("com.acme.User"), "User");
        assert_eq!(scope.display("org.other.User"), "org.other.User");
    }

    #[test]
    fn test_display_nested_in_enclosing_class() {
        let unit = CompilationUnit {
            package: Some("com.acme".to_string()),
            ..Default::default()
        };
        let scope = NameScope::for_unit(&unit).enter(&ClassDecl::new("Resource"));

        assert_eq!(scope.display("com.acme.Resource.UserPage"), "UserPage");
        assert_eq!(scope.current_class(), Some("com.acme.Resource"));
    }

    #[test]
    fn test_conflicting_import_blocks_short_name() {
        let imports = vec![Import::single("io.swagger.annotations.ApiResponse")];
        let scope = NameScope {
            package: "com.acme",
            imports: &imports,
            enclosing: Vec::new(),
            declared: Vec::new(),
            members: Vec::new(),
        };

        assert!(scope.claims_simple_name("io.swagger.v3.oas.annotations.responses.ApiResponse"));
        assert!(!scope.is_visible("io.swagger.v3.oas.annotations.responses.ApiResponse"));
    }

    #[test]
    fn test_member_type_hides_imported_name() {
        let imports = vec![Import::single("io.swagger.v3.oas.annotations.media.Schema")];
        let unit = CompilationUnit {
            package: Some("com.acme".to_string()),
            imports,
            types: vec![ClassDecl::new("UserView")
                .with_member(Member::Class(ClassDecl::new("Schema")))],
        };
        let scope = NameScope::for_unit(&unit).enter(&unit.types[0]);

        assert!(!scope.is_visible("io.swagger.v3.oas.annotations.media.Schema"));
        assert_eq!(
            scope.display("io.swagger.v3.oas.annotations.media.Schema"),
            "io.swagger.v3.oas.annotations.media.Schema"
        );
        assert_eq!(scope.display("com.acme.UserView.Schema"), "Schema");
        assert_eq!(
            member_type_names(&unit),
            ["Schema".to_string()].into_iter().collect::<HashSet<_>>()
        );
    }
}
