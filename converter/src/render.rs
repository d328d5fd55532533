//! @ai:module:intent Print a declaration tree as Java source
//! @ai:module:layer infrastructure
//! @ai:module:public_api render_unit, render_annotation, render_type, SourceBuilder
//! @ai:module:depends_on tree, names
//! @ai:module:stateless true
//!
//! Names are written in the shortest form the unit's imports and the enclosing
//! classes allow; see [`NameScope::display`].

use crate::names::NameScope;
use crate::tree::{
    Annotation, ClassDecl, ClassKind, Comment, CommentStyle, CompilationUnit, FieldDecl, Member,
    MethodDecl, Modifier, ModifierList, Parameter, TypeRef, Value,
};

const INDENT: &str = "    ";

/// Incrementally builds source text with indentation handling.
#[derive(Debug, Default, Clone)]
pub struct SourceBuilder {
    content: String,
    indent_level: usize,
}

impl SourceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: &str) {
        if !line.is_empty() {
            self.push_indent();
            self.content.push_str(line);
        }
        self.content.push('\n');
    }

    pub fn push_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.content.push_str(INDENT);
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub fn build(self) -> String {
        self.content
    }
}

/// @ai:intent Render a whole compilation unit
/// @ai:effects pure
pub fn render_unit(unit: &CompilationUnit) -> String {
    let mut builder = SourceBuilder::new();

    if let Some(package) = &unit.package {
        builder.push_line(&format!("package {};", package));
        builder.push_line("");
    }

    if !unit.imports.is_empty() {
        for import in &unit.imports {
            let keyword = if import.is_static { "import static" } else { "import" };
            let suffix = if import.on_demand { ".*" } else { "" };
            builder.push_line(&format!("{} {}{};", keyword, import.name, suffix));
        }
        builder.push_line("");
    }

    let scope = NameScope::for_unit(unit);
    for (index, class) in unit.types.iter().enumerate() {
        if index > 0 {
            builder.push_line("");
        }
        render_class(&mut builder, class, &scope);
    }

    builder.build()
}

fn render_class(builder: &mut SourceBuilder, class: &ClassDecl, outer: &NameScope<'_>) {
    render_leading(builder, &class.modifiers, outer);

    let kind = match class.kind {
        ClassKind::Class => "class",
        ClassKind::Interface => "interface",
        ClassKind::Enum => "enum",
    };
    let mut header = keywords_prefix(&class.modifiers);
    header.push_str(kind);
    header.push(' ');
    header.push_str(&class.name);
    header.push_str(&type_params(&class.type_params));
    if let Some(extends) = &class.extends {
        header.push_str(" extends ");
        header.push_str(&render_type(extends, outer));
    }
    if !class.implements.is_empty() {
        let keyword = if class.kind == ClassKind::Interface { "extends" } else { "implements" };
        let types: Vec<String> = class.implements.iter().map(|t| render_type(t, outer)).collect();
        header.push_str(&format!(" {} {}", keyword, types.join(", ")));
    }
    header.push_str(" {");
    builder.push_line(&header);

    let scope = outer.enter(class);
    builder.indent();
    let mut previous: Option<&Member> = None;
    for member in &class.members {
        // a comment stays attached to the member it precedes
        if previous.is_some() && !matches!(previous, Some(Member::Comment(_))) {
            builder.push_line("");
        }
        match member {
            Member::Method(method) => render_method(builder, method, &scope),
            Member::Field(field) => render_field(builder, field, &scope),
            Member::Class(nested) => render_class(builder, nested, &scope),
            Member::Comment(comment) => builder.push_line(&render_comment(comment)),
        }
        previous = Some(member);
    }
    builder.dedent();
    builder.push_line("}");
}

fn render_method(builder: &mut SourceBuilder, method: &MethodDecl, scope: &NameScope<'_>) {
    render_leading(builder, &method.modifiers, scope);

    let mut signature = keywords_prefix(&method.modifiers);
    if !method.type_params.is_empty() {
        signature.push_str(&type_params(&method.type_params));
        signature.push(' ');
    }
    if let Some(return_type) = &method.return_type {
        signature.push_str(&render_type(return_type, scope));
        signature.push(' ');
    }
    let params: Vec<String> = method.params.iter().map(|p| render_parameter(p, scope)).collect();
    signature.push_str(&format!("{}({})", method.name, params.join(", ")));

    match &method.body {
        None => builder.push_line(&format!("{};", signature)),
        Some(body) => {
            builder.push_line(&format!("{} {{", signature));
            builder.indent();
            for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
                builder.push_line(line);
            }
            builder.dedent();
            builder.push_line("}");
        }
    }
}

fn render_field(builder: &mut SourceBuilder, field: &FieldDecl, scope: &NameScope<'_>) {
    render_leading(builder, &field.modifiers, scope);
    let mut line = keywords_prefix(&field.modifiers);
    line.push_str(&format!("{} {}", render_type(&field.ty, scope), field.name));
    if let Some(initializer) = &field.initializer {
        line.push_str(&format!(" = {}", initializer));
    }
    line.push(';');
    builder.push_line(&line);
}

fn render_parameter(param: &Parameter, scope: &NameScope<'_>) -> String {
    let mut parts: Vec<String> = param
        .modifiers
        .items
        .iter()
        .map(|m| match m {
            Modifier::Keyword(k) => k.clone(),
            Modifier::Annotation(a) => render_annotation(a, scope),
            Modifier::Comment(c) => render_inline_comment(c),
        })
        .collect();
    parts.push(render_type(&param.ty, scope));
    parts.push(param.name.clone());
    parts.join(" ")
}

/// Annotations and comments, one per line, ahead of a declaration.
fn render_leading(builder: &mut SourceBuilder, modifiers: &ModifierList, scope: &NameScope<'_>) {
    for modifier in &modifiers.items {
        match modifier {
            Modifier::Annotation(annotation) => {
                builder.push_line(&render_annotation(annotation, scope))
            }
            Modifier::Comment(comment) => builder.push_line(&render_comment(comment)),
            Modifier::Keyword(_) => {}
        }
    }
}

fn keywords_prefix(modifiers: &ModifierList) -> String {
    modifiers.keywords().map(|k| format!("{} ", k)).collect()
}

fn type_params(params: &[String]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!("<{}>", params.join(", "))
    }
}

fn render_comment(comment: &Comment) -> String {
    match comment.style {
        CommentStyle::Block => render_inline_comment(comment),
        CommentStyle::Line => format!("// {}", comment.text),
    }
}

fn render_inline_comment(comment: &Comment) -> String {
    format!("/* {} */", comment.text)
}

/// @ai:intent Render an annotation with its attributes
/// @ai:example @Operation(summary = "List users")
/// @ai:effects pure
pub fn render_annotation(annotation: &Annotation, scope: &NameScope<'_>) -> String {
    let name = scope.display(&annotation.name);
    match annotation.attributes.as_slice() {
        [] => format!("@{}", name),
        [single] if single.name.is_none() => {
            format!("@{}({})", name, render_value(&single.value, scope))
        }
        attributes => {
            let rendered: Vec<String> = attributes
                .iter()
                .map(|a| format!("{} = {}", a.effective_name(), render_value(&a.value, scope)))
                .collect();
            format!("@{}({})", name, rendered.join(", "))
        }
    }
}

fn render_value(value: &Value, scope: &NameScope<'_>) -> String {
    match value {
        Value::String(text) => quote(text),
        Value::Number(text) | Value::Expression(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(|v| render_value(v, scope)).collect();
            format!("{{{}}}", rendered.join(", "))
        }
        Value::Class(ty) => format!("{}.class", render_type(ty, scope)),
        Value::Annotation(annotation) => render_annotation(annotation, scope),
    }
}

/// @ai:intent Render a type reference with its arguments
/// @ai:effects pure
pub fn render_type(ty: &TypeRef, scope: &NameScope<'_>) -> String {
    match ty {
        TypeRef::Class { name, args } if args.is_empty() => scope.display(name),
        TypeRef::Class { name, args } => {
            let rendered: Vec<String> = args.iter().map(|a| render_type(a, scope)).collect();
            format!("{}<{}>", scope.display(name), rendered.join(", "))
        }
        TypeRef::Variable(name) | TypeRef::Primitive(name) => name.clone(),
        TypeRef::Array(inner) => format!("{}[]", render_type(inner, scope)),
        TypeRef::Wildcard => "?".to_string(),
    }
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Import;
    use crate::vocabulary::openapi;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_nested_annotation() {
        let imports = vec![
            Import::single(openapi::API_RESPONSE),
            Import::single(openapi::CONTENT),
            Import::single(openapi::SCHEMA),
        ];
        let scope = NameScope {
            package: "com.acme",
            imports: &imports,
            enclosing: Vec::new(),
            declared: Vec::new(),
            members: Vec::new(),
        };
        let annotation = Annotation::new(openapi::API_RESPONSE)
            .with("responseCode", Value::string("200"))
            .with(
                "content",
                Value::annotation(Annotation::new(openapi::CONTENT).with(
                    "schema",
                    Value::annotation(
                        Annotation::new(openapi::SCHEMA)
                            .with("implementation", Value::class(TypeRef::named("com.acme.User"))),
                    ),
                )),
            );

        assert_eq!(
            render_annotation(&annotation, &scope),
            "@ApiResponse(responseCode = \"200\", content = @Content(schema = @Schema(implementation = User.class)))"
        );
    }

    #[test]
    fn test_render_unit() {
        let mut ctor = MethodDecl::constructor("UserPage")
            .with_param(Parameter::new(
                "items",
                TypeRef::class("java.util.List", vec![TypeRef::named("com.acme.User")]),
            ));
        ctor.modifiers.push(Modifier::Keyword("public".to_string()));
        ctor.body = Some("super(items);".to_string());

        let mut page = ClassDecl::new("UserPage").with_method(ctor);
        page.modifiers = ModifierList::default().with_keyword("static");
        page.extends = Some(TypeRef::class("com.acme.Page", vec![TypeRef::named("com.acme.User")]));

        let mut method = MethodDecl::new(
            "list",
            TypeRef::class("com.acme.Page", vec![TypeRef::named("com.acme.User")]),
        )
        .with_annotation(Annotation::new(openapi::OPERATION).with("summary", Value::string("List \"all\"")))
        .with_param(
            Parameter::new("sort", TypeRef::named("java.lang.String")).with_annotation(
                Annotation::new(openapi::PARAMETER)
                    .with("allowableValues", Value::Array(vec![Value::string("asc")])),
            ),
        );
        method.modifiers.push(Modifier::Comment(Comment::block("check generics")));
        method.modifiers.push(Modifier::Keyword("public".to_string()));
        method.body = Some("return null;".to_string());

        let class = ClassDecl::new("UserResource")
            .with_annotation(Annotation::new(openapi::HIDDEN))
            .with_method(method)
            .with_member(Member::Comment(Comment::line("externalize")))
            .with_member(Member::Class(page));

        let unit = CompilationUnit {
            package: Some("com.acme".to_string()),
            imports: vec![
                Import::single(openapi::HIDDEN),
                Import::single(openapi::OPERATION),
                Import::single(openapi::PARAMETER),
                Import::single("java.util.List"),
            ],
            types: vec![class],
        };

        let expected = r#"package com.acme;

import io.swagger.v3.oas.annotations.Hidden;
import io.swagger.v3.oas.annotations.Operation;
import io.swagger.v3.oas.annotations.Parameter;
import java.util.List;

@Hidden
class UserResource {
    @Operation(summary = "List \"all\"")
    /* check generics */
    public Page<User> list(@Parameter(allowableValues = {"asc"}) String sort) {
        return null;
    }

    // externalize
    static class UserPage extends Page<User> {
        public UserPage(List<User> items) {
            super(items);
        }
    }
}
"#;
        assert_eq!(render_unit(&unit), expected);
    }

    #[test]
    fn test_unimported_name_stays_qualified() {
        let unit = CompilationUnit::default();
        let scope = NameScope::for_unit(&unit);
        assert_eq!(
            render_type(&TypeRef::named("io.swagger.v3.oas.annotations.Hidden"), &scope),
            "io.swagger.v3.oas.annotations.Hidden"
        );
        assert_eq!(
            render_type(&TypeRef::Array(Box::new(TypeRef::Primitive("int".to_string()))), &scope),
            "int[]"
        );
    }
}
