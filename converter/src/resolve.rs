//! @ai:module:intent Classify referenced types and synthesize concrete subtypes for erased generics
//! @ai:module:layer domain
//! @ai:module:public_api TypeIndex, TypeShape, TypeResolver, Resolution, collection_element
//! @ai:module:depends_on tree, names, vocabulary
//! @ai:module:stateless true

use crate::names;
use crate::tree::{
    ClassDecl, CompilationUnit, ConstructorInfo, Member, MethodDecl, Modifier, ModifierList,
    ParamInfo, Parameter, TypeInfo, TypeRef, Value, Visibility,
};
use crate::vocabulary::container;
use std::collections::{HashMap, HashSet};

/// @ai:intent Lookup of resolved type declarations by qualified name
#[derive(Debug, Default)]
pub struct TypeIndex {
    types: HashMap<String, TypeInfo>,
}

/// @ai:intent Generic-ness of a type reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape<'a> {
    /// No type parameters involved.
    Concrete,
    /// A raw use of a type that declares parameters, or a bare type variable.
    Generic { params: &'a [String] },
    /// A generic type with bound arguments.
    Parameterized { base: &'a str, args: &'a [TypeRef] },
}

impl TypeIndex {
    /// @ai:intent Index the front end's resolved types plus every class the unit declares
    /// @ai:effects pure
    pub fn build(unit: &CompilationUnit, external: &[TypeInfo]) -> Self {
        let mut types: HashMap<String, TypeInfo> = external
            .iter()
            .map(|t| (t.name.clone(), t.clone()))
            .collect();

        let package = unit.package.as_deref().unwrap_or("");
        for class in &unit.types {
            index_class(class, package, &mut types);
        }

        Self { types }
    }

    pub fn get(&self, name: &str) -> Option<&TypeInfo> {
        self.types.get(name)
    }

    /// @ai:intent Declared type parameters; empty for unknown types
    pub fn type_params(&self, name: &str) -> &[String] {
        self.types
            .get(name)
            .map(|t| t.type_params.as_slice())
            .unwrap_or(&[])
    }

    /// @ai:intent Classify a type reference
    /// @ai:effects pure
    pub fn classify<'a>(&'a self, ty: &'a TypeRef) -> TypeShape<'a> {
        match ty {
            TypeRef::Class { name, args } if !args.is_empty() => TypeShape::Parameterized {
                base: name,
                args,
            },
            TypeRef::Class { name, .. } => {
                let params = self.type_params(name);
                if params.is_empty() {
                    TypeShape::Concrete
                } else {
                    TypeShape::Generic { params }
                }
            }
            TypeRef::Variable(_) | TypeRef::Wildcard => TypeShape::Generic { params: &[] },
            TypeRef::Primitive(_) | TypeRef::Array(_) => TypeShape::Concrete,
        }
    }
}

fn index_class(class: &ClassDecl, parent: &str, types: &mut HashMap<String, TypeInfo>) {
    let qualified = names::join(parent, &class.name);
    let constructors = class
        .members
        .iter()
        .filter_map(|m| match m {
            Member::Method(method) if method.is_constructor() => Some(ConstructorInfo {
                visibility: Visibility::of(&method.modifiers),
                params: method
                    .params
                    .iter()
                    .map(|p| ParamInfo {
                        name: p.name.clone(),
                        ty: p.ty.clone(),
                    })
                    .collect(),
            }),
            _ => None,
        })
        .collect();

    for nested in class.nested_classes() {
        index_class(nested, &qualified, types);
    }

    types.insert(
        qualified.clone(),
        TypeInfo {
            name: qualified,
            type_params: class.type_params.clone(),
            constructors,
        },
    );
}

/// @ai:intent Outcome of turning a type reference into something a `.class` literal can name
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Usable as is.
    Resolved(Value),
    /// Usable once `class` is inserted next to the method.
    Synthesized { literal: Value, class: ClassDecl },
    /// Needs manual review; carries the original value when there was one.
    Inconclusive(Option<Value>),
}

/// @ai:intent Resolves type-reference attribute values against one method's context
pub struct TypeResolver<'a> {
    index: &'a TypeIndex,
    /// Qualified name of the class that will own synthesized subtypes.
    enclosing: &'a str,
    /// Simple names of member types already present in the enclosing class.
    existing: &'a HashSet<String>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(index: &'a TypeIndex, enclosing: &'a str, existing: &'a HashSet<String>) -> Self {
        Self {
            index,
            enclosing,
            existing,
        }
    }

    /// @ai:intent Resolve an explicit type reference, or the method's own return type when absent
    /// @ai:post Synthesized only when the reference names the method's own generic return type
    /// @ai:effects pure
    pub fn concretize(&self, method: &MethodDecl, reference: Option<&Value>) -> Resolution {
        match reference {
            Some(value) => self.concretize_reference(method, value),
            None => match &method.return_type {
                Some(return_type) => self.concretize_type(return_type),
                None => Resolution::Inconclusive(None),
            },
        }
    }

    fn concretize_reference(&self, method: &MethodDecl, value: &Value) -> Resolution {
        let named = match value {
            Value::Class(ty) => ty,
            _ => return Resolution::Resolved(value.clone()),
        };

        let return_type = method.return_type.as_ref();
        let same_type = named.class_name().is_some()
            && named.class_name() == return_type.and_then(TypeRef::class_name);

        // a parameterized return type proves the named class generic even without its declaration
        let bound_by_return = same_type && return_type.map_or(false, |t| !t.args().is_empty());
        let generic = matches!(self.index.classify(named), TypeShape::Generic { .. });
        if !generic && !bound_by_return {
            return Resolution::Resolved(value.clone());
        }

        if same_type {
            if let Some(return_type) = return_type {
                match self.concretize_type(return_type) {
                    Resolution::Inconclusive(_) => {}
                    resolved => return resolved,
                }
            }
        }

        Resolution::Inconclusive(Some(value.clone()))
    }

    /// @ai:intent Resolve a declared type, synthesizing a subtype for bound generics
    /// @ai:effects pure
    pub fn concretize_type(&self, ty: &TypeRef) -> Resolution {
        match self.index.classify(ty) {
            TypeShape::Concrete => Resolution::Resolved(Value::class(ty.erasure())),
            TypeShape::Generic { .. } => Resolution::Inconclusive(None),
            TypeShape::Parameterized { base, args } => self
                .synthesize(ty, base, args)
                .unwrap_or(Resolution::Inconclusive(None)),
        }
    }

    fn synthesize(&self, ty: &TypeRef, base: &str, args: &[TypeRef]) -> Option<Resolution> {
        if !args.iter().all(TypeRef::is_concrete) {
            return None;
        }
        let info = self.index.get(base)?;
        if info.type_params.len() != args.len() {
            return None;
        }

        let name = synthesized_name(base, args);
        let literal = Value::class(TypeRef::named(names::join(self.enclosing, &name)));

        if self.existing.contains(&name) {
            return Some(Resolution::Resolved(literal));
        }

        let bindings: HashMap<&str, &TypeRef> = info
            .type_params
            .iter()
            .map(String::as_str)
            .zip(args.iter())
            .collect();

        let mut class = ClassDecl::new(name.clone());
        class.modifiers = ModifierList::default().with_keyword("static");
        class.extends = Some(ty.clone());
        class.members = info
            .constructors
            .iter()
            .filter(|c| c.visibility != Visibility::Private)
            .map(|c| Member::Method(forwarding_constructor(&name, c, &bindings)))
            .collect();

        Some(Resolution::Synthesized { literal, class })
    }
}

/// @ai:intent Name a synthesized subtype after its bound arguments and base type
/// @ai:example ("x.Page", [x.User]) -> "UserPage"
/// @ai:effects pure
pub fn synthesized_name(base: &str, args: &[TypeRef]) -> String {
    let mut name: String = args
        .iter()
        .filter_map(TypeRef::class_name)
        .map(names::simple_name)
        .collect();
    name.push_str(names::simple_name(base));
    name
}

fn forwarding_constructor(
    class_name: &str,
    constructor: &ConstructorInfo,
    bindings: &HashMap<&str, &TypeRef>,
) -> MethodDecl {
    let mut method = MethodDecl::constructor(class_name);
    if let Some(keyword) = constructor.visibility.keyword() {
        method.modifiers.push(Modifier::Keyword(keyword.to_string()));
    }
    method.params = constructor
        .params
        .iter()
        .map(|p| Parameter::new(p.name.clone(), substitute(&p.ty, bindings)))
        .collect();

    let arguments: Vec<&str> = constructor.params.iter().map(|p| p.name.as_str()).collect();
    method.body = Some(format!("super({});", arguments.join(", ")));
    method
}

/// @ai:intent Replace type variables by their bound arguments
/// @ai:effects pure
pub fn substitute(ty: &TypeRef, bindings: &HashMap<&str, &TypeRef>) -> TypeRef {
    match ty {
        TypeRef::Variable(name) => bindings
            .get(name.as_str())
            .map(|bound| (*bound).clone())
            .unwrap_or_else(|| ty.clone()),
        TypeRef::Class { name, args } => TypeRef::Class {
            name: name.clone(),
            args: args.iter().map(|a| substitute(a, bindings)).collect(),
        },
        TypeRef::Array(inner) => TypeRef::Array(Box::new(substitute(inner, bindings))),
        TypeRef::Primitive(_) | TypeRef::Wildcard => ty.clone(),
    }
}

/// @ai:intent Element type of a single-argument List, Collection or Set, plus whether it is a Set
/// @ai:effects pure
pub fn collection_element(ty: &TypeRef) -> Option<(&TypeRef, bool)> {
    match ty {
        TypeRef::Class { name, args } if args.len() == 1 => match name.as_str() {
            container::JAVA_LIST | container::JAVA_COLLECTION => Some((&args[0], false)),
            container::JAVA_SET => Some((&args[0], true)),
            _ => None,
        },
        _ => None,
    }
}
