//! @ai:module:intent Declaration-tree model consumed and mutated by the converter
//! @ai:module:layer domain
//! @ai:module:public_api SourceFile, CompilationUnit, ClassDecl, MethodDecl, FieldDecl, Parameter, Annotation, Value, TypeRef, TypeInfo, PendingNodes
//! @ai:module:stateless true
//!
//! Every type and annotation name stored here is fully qualified; the front end
//! that produced the tree has already resolved them. How a name is printed is
//! decided by [`crate::render`].

use serde::{Deserialize, Serialize};

/// @ai:intent Transient identity of a node created during conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// @ai:intent One tree file as delivered by the front end
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SourceFile {
    pub unit: CompilationUnit,
    /// Resolved declarations of types the unit references but does not declare.
    #[serde(default)]
    pub types: Vec<TypeInfo>,
}

/// @ai:intent Root of one parsed Java source file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CompilationUnit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default)]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub types: Vec<ClassDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Import {
    pub name: String,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub on_demand: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
}

/// @ai:intent A class, interface or enum declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ClassDecl {
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub modifiers: ModifierList,
    #[serde(default)]
    pub type_params: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<TypeRef>,
    #[serde(default)]
    pub implements: Vec<TypeRef>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(skip)]
    pub id: Option<NodeId>,
}

/// @ai:intent Class body entry, kept in declaration order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum Member {
    Method(MethodDecl),
    Field(FieldDecl),
    Class(ClassDecl),
    Comment(Comment),
}

/// @ai:intent A method or constructor; constructors have no return type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub modifiers: ModifierList,
    #[serde(default)]
    pub type_params: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeRef>,
    #[serde(default)]
    pub params: Vec<Parameter>,
    /// Statements between the braces, opaque to the converter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    #[serde(default)]
    pub modifiers: ModifierList,
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub modifiers: ModifierList,
    pub ty: TypeRef,
}

/// @ai:intent Ordered keywords, annotations and comments preceding a declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct ModifierList {
    pub items: Vec<Modifier>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Keyword(String),
    Annotation(Annotation),
    Comment(Comment),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommentStyle {
    #[default]
    Block,
    Line,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub text: String,
    #[serde(default)]
    pub style: CommentStyle,
    #[serde(skip)]
    pub id: Option<NodeId>,
}

/// @ai:intent An annotation identified by its fully-qualified name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Annotation {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(skip)]
    pub id: Option<NodeId>,
}

/// @ai:intent A `name = value` pair; an absent name is the default `value` attribute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: Value,
}

/// @ai:intent Annotation member values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    String(String),
    /// Numeric literal kept as written.
    Number(String),
    Bool(bool),
    Array(Vec<Value>),
    /// `Type.class`
    Class(TypeRef),
    Annotation(Box<Annotation>),
    /// Any other expression, e.g. a constant reference, kept as written.
    Expression(String),
}

/// @ai:intent A resolved type reference
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Class {
        name: String,
        #[serde(default)]
        args: Vec<TypeRef>,
    },
    Variable(String),
    Primitive(String),
    Array(Box<TypeRef>),
    Wildcard,
}

/// @ai:intent Resolved declaration of a type referenced by the unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TypeInfo {
    pub name: String,
    #[serde(default)]
    pub type_params: Vec<String>,
    #[serde(default)]
    pub constructors: Vec<ConstructorInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ConstructorInfo {
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub params: Vec<ParamInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParamInfo {
    pub name: String,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Protected,
    #[default]
    Package,
    Private,
}

impl Visibility {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Visibility::Public => Some("public"),
            Visibility::Protected => Some("protected"),
            Visibility::Package => None,
            Visibility::Private => Some("private"),
        }
    }

    /// @ai:intent Read the visibility expressed by a modifier list
    pub fn of(modifiers: &ModifierList) -> Self {
        for keyword in modifiers.keywords() {
            match keyword {
                "public" => return Visibility::Public,
                "protected" => return Visibility::Protected,
                "private" => return Visibility::Private,
                _ => {}
            }
        }
        Visibility::Package
    }
}

impl Import {
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            on_demand: false,
        }
    }

    pub fn on_demand(package: impl Into<String>) -> Self {
        Self {
            name: package.into(),
            is_static: false,
            on_demand: true,
        }
    }
}

impl ClassDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.modifiers.push(Modifier::Annotation(annotation));
        self
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_method(self, method: MethodDecl) -> Self {
        self.with_member(Member::Method(method))
    }

    pub fn with_field(self, field: FieldDecl) -> Self {
        self.with_member(Member::Field(field))
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn nested_classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Class(class) => Some(class),
            _ => None,
        })
    }

    /// @ai:intent Visit every type and annotation name referenced by this class
    /// @ai:effects pure
    pub fn visit_names(&self, f: &mut dyn FnMut(&str)) {
        self.modifiers.visit_names(f);
        if let Some(extends) = &self.extends {
            extends.visit_names(f);
        }
        for ty in &self.implements {
            ty.visit_names(f);
        }
        for member in &self.members {
            match member {
                Member::Method(method) => {
                    method.modifiers.visit_names(f);
                    if let Some(ty) = &method.return_type {
                        ty.visit_names(f);
                    }
                    for param in &method.params {
                        param.modifiers.visit_names(f);
                        param.ty.visit_names(f);
                    }
                }
                Member::Field(field) => {
                    field.modifiers.visit_names(f);
                    field.ty.visit_names(f);
                }
                Member::Class(class) => class.visit_names(f),
                Member::Comment(_) => {}
            }
        }
    }

    /// @ai:intent Visit source text the converter cannot see into
    /// @ai:effects pure
    pub fn visit_opaque_text(&self, f: &mut dyn FnMut(&str)) {
        self.modifiers.visit_opaque_text(f);
        for member in &self.members {
            match member {
                Member::Method(method) => {
                    method.modifiers.visit_opaque_text(f);
                    for param in &method.params {
                        param.modifiers.visit_opaque_text(f);
                    }
                    if let Some(body) = &method.body {
                        f(body);
                    }
                }
                Member::Field(field) => {
                    field.modifiers.visit_opaque_text(f);
                    if let Some(init) = &field.initializer {
                        f(init);
                    }
                }
                Member::Class(class) => class.visit_opaque_text(f),
                Member::Comment(_) => {}
            }
        }
    }
}

impl MethodDecl {
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            return_type: Some(return_type),
            ..Default::default()
        }
    }

    pub fn constructor(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.modifiers.push(Modifier::Annotation(annotation));
        self
    }

    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            modifiers: ModifierList::default(),
            ty,
            initializer: None,
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.modifiers.push(Modifier::Annotation(annotation));
        self
    }
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            modifiers: ModifierList::default(),
            ty,
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.modifiers.push(Modifier::Annotation(annotation));
        self
    }
}

impl ModifierList {
    pub fn push(&mut self, modifier: Modifier) {
        self.items.push(modifier);
    }

    pub fn with_keyword(mut self, keyword: &str) -> Self {
        self.items.push(Modifier::Keyword(keyword.to_string()));
        self
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|m| match m {
            Modifier::Keyword(k) => Some(k.as_str()),
            _ => None,
        })
    }

    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.items.iter().filter_map(|m| match m {
            Modifier::Annotation(a) => Some(a),
            _ => None,
        })
    }

    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.items.iter().filter_map(|m| match m {
            Modifier::Comment(c) => Some(c),
            _ => None,
        })
    }

    /// @ai:intent Position of the first annotation with the given qualified name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|m| matches!(m, Modifier::Annotation(a) if a.name == name))
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations().find(|a| a.name == name)
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// @ai:intent Insert a modifier before the item at `index`
    pub fn insert(&mut self, index: usize, modifier: Modifier) {
        self.items.insert(index, modifier);
    }

    pub fn remove(&mut self, index: usize) -> Modifier {
        self.items.remove(index)
    }

    fn visit_names(&self, f: &mut dyn FnMut(&str)) {
        for annotation in self.annotations() {
            annotation.visit_names(f);
        }
    }

    fn visit_opaque_text(&self, f: &mut dyn FnMut(&str)) {
        for annotation in self.annotations() {
            annotation.visit_opaque_text(f);
        }
    }
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            id: None,
        }
    }

    /// @ai:intent Builder form of [`Annotation::set`]
    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.set(name, value);
        self
    }

    /// @ai:intent Builder for the unnamed default attribute
    pub fn with_value(mut self, value: Value) -> Self {
        self.attributes.push(Attribute { name: None, value });
        self
    }

    /// @ai:intent Set a named attribute, replacing any previous value
    pub fn set(&mut self, name: &str, value: Value) {
        match self
            .attributes
            .iter_mut()
            .find(|a| a.name.as_deref() == Some(name))
        {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute {
                name: Some(name.to_string()),
                value,
            }),
        }
    }

    /// @ai:intent Look up an attribute; `value` also matches the unnamed attribute
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|a| a.effective_name() == name)
            .map(|a| &a.value)
    }

    pub fn first_value(&self) -> Option<&Value> {
        self.attributes.first().map(|a| &a.value)
    }

    /// @ai:intent Simple name of the annotation type
    pub fn simple_name(&self) -> &str {
        crate::names::simple_name(&self.name)
    }

    pub fn visit_names(&self, f: &mut dyn FnMut(&str)) {
        f(&self.name);
        for attribute in &self.attributes {
            attribute.value.visit_names(f);
        }
    }

    fn visit_opaque_text(&self, f: &mut dyn FnMut(&str)) {
        for attribute in &self.attributes {
            attribute.value.visit_opaque_text(f);
        }
    }
}

impl Attribute {
    pub fn effective_name(&self) -> &str {
        self.name.as_deref().unwrap_or("value")
    }
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn class(ty: TypeRef) -> Self {
        Value::Class(ty)
    }

    pub fn annotation(annotation: Annotation) -> Self {
        Value::Annotation(Box::new(annotation))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_annotation(&self) -> Option<&Annotation> {
        match self {
            Value::Annotation(a) => Some(a),
            _ => None,
        }
    }

    /// @ai:intent Text of a string or numeric literal
    pub fn literal_text(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Number(s) => Some(s),
            _ => None,
        }
    }

    fn visit_names(&self, f: &mut dyn FnMut(&str)) {
        match self {
            Value::Array(items) => items.iter().for_each(|v| v.visit_names(f)),
            Value::Class(ty) => ty.visit_names(f),
            Value::Annotation(a) => a.visit_names(f),
            _ => {}
        }
    }

    fn visit_opaque_text(&self, f: &mut dyn FnMut(&str)) {
        match self {
            Value::Array(items) => items.iter().for_each(|v| v.visit_opaque_text(f)),
            Value::Annotation(a) => a.visit_opaque_text(f),
            Value::Expression(text) => f(text),
            _ => {}
        }
    }
}

impl TypeRef {
    pub fn class(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Class {
            name: name.into(),
            args,
        }
    }

    /// @ai:intent A class type without type arguments
    pub fn named(name: impl Into<String>) -> Self {
        Self::class(name, Vec::new())
    }

    pub fn void() -> Self {
        TypeRef::Primitive("void".to_string())
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Primitive(p) if p == "void")
    }

    /// @ai:intent Qualified name of a class type
    pub fn class_name(&self) -> Option<&str> {
        match self {
            TypeRef::Class { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Class { args, .. } => args,
            _ => &[],
        }
    }

    /// @ai:intent True when no type variable or wildcard occurs anywhere inside
    pub fn is_concrete(&self) -> bool {
        match self {
            TypeRef::Class { args, .. } => args.iter().all(TypeRef::is_concrete),
            TypeRef::Primitive(_) => true,
            TypeRef::Array(inner) => inner.is_concrete(),
            TypeRef::Variable(_) | TypeRef::Wildcard => false,
        }
    }

    /// @ai:intent The same type with its own arguments dropped
    pub fn erasure(&self) -> TypeRef {
        match self {
            TypeRef::Class { name, .. } => TypeRef::named(name.clone()),
            other => other.clone(),
        }
    }

    pub fn visit_names(&self, f: &mut dyn FnMut(&str)) {
        match self {
            TypeRef::Class { name, args } => {
                f(name);
                args.iter().for_each(|a| a.visit_names(f));
            }
            TypeRef::Array(inner) => inner.visit_names(f),
            _ => {}
        }
    }
}

impl Comment {
    pub fn block(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: CommentStyle::Block,
            id: None,
        }
    }

    pub fn line(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: CommentStyle::Line,
            id: None,
        }
    }
}

/// @ai:intent Ordered record of every node inserted while converting one unit
///
/// Created empty per unit, filled by the rewriters and consumed exactly once by
/// [`crate::postprocess::run`].
#[derive(Debug, Default)]
pub struct PendingNodes {
    ids: Vec<NodeId>,
    next: u32,
}

impl PendingNodes {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        self.ids.push(id);
        id
    }

    /// @ai:intent Create a new annotation and record it as pending
    pub fn annotation(&mut self, name: &str) -> Annotation {
        let mut annotation = Annotation::new(name);
        annotation.id = Some(self.allocate());
        annotation
    }

    /// @ai:intent Create a marker comment and record it as pending
    pub fn comment(&mut self, comment: Comment) -> Comment {
        Comment {
            id: Some(self.allocate()),
            ..comment
        }
    }

    /// @ai:intent Record a synthesized class as pending
    pub fn class(&mut self, class: ClassDecl) -> ClassDecl {
        ClassDecl {
            id: Some(self.allocate()),
            ..class
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}
