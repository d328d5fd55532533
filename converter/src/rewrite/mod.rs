//! @ai:module:intent One conversion routine per legacy annotation kind
//! @ai:module:layer application
//! @ai:module:public_api RewriteContext, MethodScope, api, operation, model_property, param, responses
//! @ai:module:depends_on mapping, resolve, tree, walker
//!
//! Every routine follows the same steps: find the legacy annotation on a
//! modifier list, build its replacements, insert them where the legacy
//! annotation stood and remove it. A second run finds nothing and does nothing.

pub mod api;
pub mod model_property;
pub mod operation;
pub mod param;
pub mod responses;

use crate::error::{Error, Result};
use crate::mapping::{self, LegacyKind, Mapped, Target};
use crate::resolve::{Resolution, TypeIndex, TypeResolver};
use crate::tree::{
    Annotation, Attribute, ClassDecl, Comment, Member, MethodDecl, Modifier, ModifierList,
    PendingNodes, TypeRef, Value,
};
use crate::vocabulary::{marker, openapi};
use crate::walker::{ConversionReport, MarkerNote};
use std::collections::HashSet;

/// @ai:intent State shared by all rewriters while converting one compilation unit
pub struct RewriteContext<'a> {
    pub index: &'a TypeIndex,
    pub media_type_annotations: &'a [String],
    pub pending: PendingNodes,
    pub report: ConversionReport,
}

impl<'a> RewriteContext<'a> {
    pub fn new(index: &'a TypeIndex, media_type_annotations: &'a [String]) -> Self {
        Self {
            index,
            media_type_annotations,
            pending: PendingNodes::new(),
            report: ConversionReport::default(),
        }
    }

    /// @ai:intent Hand back the pending nodes and the report once the walk is done
    pub fn finish(self) -> (PendingNodes, ConversionReport) {
        (self.pending, self.report)
    }

    /// @ai:intent Create a marker comment and note it in the report
    pub(crate) fn marker(&mut self, text: &'static str, declaration: &str) -> Modifier {
        tracing::warn!("{}: {}", declaration, text);
        self.report.markers.push(MarkerNote {
            declaration: declaration.to_string(),
            text: text.to_string(),
        });
        Modifier::Comment(self.pending.comment(Comment::block(text)))
    }

    /// @ai:intent Put replacements where the legacy annotation at `index` stands and drop it
    pub(crate) fn replace(
        &mut self,
        modifiers: &mut ModifierList,
        index: usize,
        replacements: Vec<Modifier>,
        declaration: &str,
    ) {
        let count = replacements.len();
        let removed = modifiers.remove(index);
        for (offset, modifier) in replacements.into_iter().enumerate() {
            modifiers.insert(index + offset, modifier);
        }

        if let Modifier::Annotation(old) = removed {
            tracing::debug!(
                "{}: replaced @{} with {} node(s)",
                declaration,
                old.simple_name(),
                count
            );
        }
        self.report.converted += 1;
        self.report.inserted += count;
    }

    /// @ai:intent Translate the plain attributes of a legacy annotation into a new one
    ///
    /// Attributes targeting [`Target::Schema`] land in a nested `@Schema` that is
    /// only created when at least one of them is present.
    pub(crate) fn translate(
        &mut self,
        kind: LegacyKind,
        legacy: &Annotation,
        primary_name: &str,
        declaration: &str,
    ) -> Result<Annotation> {
        let mut primary = self.pending.annotation(primary_name);
        let mut schema: Option<Annotation> = None;

        for attribute in &legacy.attributes {
            match mapping::map(kind, attribute, declaration)? {
                Mapped::Attribute {
                    target: Target::Primary,
                    name,
                    value,
                } => primary.set(name, value),
                Mapped::Attribute {
                    target: Target::Schema,
                    name,
                    value,
                } => schema
                    .get_or_insert_with(|| self.pending.annotation(openapi::SCHEMA))
                    .set(name, value),
                _ => return Err(unexpected(kind, attribute, declaration)),
            }
        }

        if let Some(schema) = schema {
            primary.set("schema", Value::annotation(schema));
        }
        Ok(primary)
    }
}

/// @ai:intent Error for an attribute whose rule does not fit the rewriter handling it
pub(crate) fn unexpected(kind: LegacyKind, attribute: &Attribute, declaration: &str) -> Error {
    Error::UnmappedAttribute {
        annotation: kind.annotation_name().to_string(),
        attribute: attribute.effective_name().to_string(),
        declaration: declaration.to_string(),
    }
}

/// @ai:intent Locate a legacy annotation and take a copy to read from while editing
pub(crate) fn find_legacy(modifiers: &ModifierList, name: &str) -> Option<(usize, Annotation)> {
    let index = modifiers.position(name)?;
    match &modifiers.items[index] {
        Modifier::Annotation(annotation) => Some((index, annotation.clone())),
        _ => None,
    }
}

/// @ai:intent Member types of one class, including those synthesized during this pass
pub struct MethodScope {
    /// Qualified name of the class owning the methods being converted.
    pub enclosing: String,
    existing: HashSet<String>,
    synthesized: Vec<Member>,
}

impl MethodScope {
    pub fn for_class(class: &ClassDecl, qualified: &str) -> Self {
        Self {
            enclosing: qualified.to_string(),
            existing: class.nested_classes().map(|c| c.name.clone()).collect(),
            synthesized: Vec::new(),
        }
    }

    /// @ai:intent Members to insert right after the method just converted
    pub fn take_synthesized(&mut self) -> Vec<Member> {
        std::mem::take(&mut self.synthesized)
    }

    fn adopt(&mut self, ctx: &mut RewriteContext<'_>, class: ClassDecl) {
        tracing::info!("Synthesized {}.{}", self.enclosing, class.name);
        ctx.report
            .synthesized
            .push(format!("{}.{}", self.enclosing, class.name));
        self.existing.insert(class.name.clone());
        self.synthesized.push(Member::Comment(
            ctx.pending.comment(Comment::line(marker::EXTERNALIZE)),
        ));
        self.synthesized.push(Member::Class(ctx.pending.class(class)));
    }

    /// @ai:intent Resolve a type-reference value (or the return type) into an implementation value
    ///
    /// Inconclusive results push a "check generics" marker onto `notes` and keep
    /// the original value.
    pub(crate) fn implementation(
        &mut self,
        ctx: &mut RewriteContext<'_>,
        method: &MethodDecl,
        reference: Option<&Value>,
        notes: &mut Vec<Modifier>,
        declaration: &str,
    ) -> Option<Value> {
        let resolution =
            TypeResolver::new(ctx.index, &self.enclosing, &self.existing).concretize(method, reference);
        self.settle(ctx, resolution, notes, declaration)
    }

    /// @ai:intent Like [`MethodScope::implementation`] for a type taken from a signature
    pub(crate) fn implementation_of_type(
        &mut self,
        ctx: &mut RewriteContext<'_>,
        ty: &TypeRef,
        notes: &mut Vec<Modifier>,
        declaration: &str,
    ) -> Option<Value> {
        let resolution =
            TypeResolver::new(ctx.index, &self.enclosing, &self.existing).concretize_type(ty);
        self.settle(ctx, resolution, notes, declaration)
    }

    fn settle(
        &mut self,
        ctx: &mut RewriteContext<'_>,
        resolution: Resolution,
        notes: &mut Vec<Modifier>,
        declaration: &str,
    ) -> Option<Value> {
        match resolution {
            Resolution::Resolved(value) => Some(value),
            Resolution::Synthesized { literal, class } => {
                self.adopt(ctx, class);
                Some(literal)
            }
            Resolution::Inconclusive(original) => {
                notes.push(ctx.marker(marker::CHECK_GENERICS, declaration));
                original
            }
        }
    }
}
