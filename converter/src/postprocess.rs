//! @ai:module:intent Normalize nodes inserted during conversion and tidy the unit's imports
//! @ai:module:layer application
//! @ai:module:public_api CodeStyle, DefaultCodeStyle, ImportUsage, ImportChanges, run
//! @ai:module:depends_on tree, names, config
//!
//! Steps run in a fixed order: pending nodes are normalized, imports the
//! conversion made stale are removed, then imports are added for names the new
//! nodes reference. Removing first lets a new `ApiResponse` import replace the
//! legacy one.

use crate::config::PostProcessConfig;
use crate::names::{self, NameScope};
use crate::tree::{
    Annotation, ClassDecl, Comment, CompilationUnit, Import, Member, Modifier, ModifierList,
    NodeId, PendingNodes, Value,
};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

/// @ai:intent Formatting and import services applied to a converted unit
///
/// The default method bodies leave nodes as they are, so a host only overrides
/// what it supports.
pub trait CodeStyle {
    /// Annotations carry no layout in the tree; line breaks and spacing are
    /// decided when [`crate::render`] prints them.
    fn reformat_annotation(&self, _annotation: &mut Annotation) {}

    fn reformat_comment(&self, _comment: &mut Comment) {}

    /// @ai:intent Import the given qualified names where that lets them be written short
    fn shorten_references(&self, _unit: &mut CompilationUnit, _references: &[String]) -> Vec<String> {
        Vec::new()
    }

    /// @ai:intent Drop imports the conversion made unnecessary
    fn remove_unused_imports(&self, _unit: &mut CompilationUnit, _baseline: &ImportUsage) -> Vec<String> {
        Vec::new()
    }
}

/// @ai:intent Built-in style, each step switchable through configuration
#[derive(Debug, Clone, Default)]
pub struct DefaultCodeStyle {
    pub settings: PostProcessConfig,
}

impl DefaultCodeStyle {
    pub fn new(settings: PostProcessConfig) -> Self {
        Self { settings }
    }
}

impl CodeStyle for DefaultCodeStyle {
    /// Collapses whitespace runs so a marker always prints on one line.
    fn reformat_comment(&self, comment: &mut Comment) {
        if self.settings.reformat {
            comment.text = comment.text.split_whitespace().collect::<Vec<_>>().join(" ");
        }
    }

    fn shorten_references(&self, unit: &mut CompilationUnit, references: &[String]) -> Vec<String> {
        if !self.settings.shorten_references {
            return Vec::new();
        }

        let members = names::member_type_names(unit);
        let mut added = Vec::new();
        for reference in references {
            if names::package_of(reference).is_empty() {
                continue;
            }
            let top = names::top_level_class(reference);
            if members.contains(names::simple_name(top)) {
                // a member type of the same name would capture the short form
                continue;
            }
            let scope = NameScope::for_unit(unit);
            if scope.is_visible(reference) || scope.claims_simple_name(top) {
                continue;
            }
            let top = top.to_string();
            tracing::debug!("Importing {}", top);
            unit.imports.push(Import::single(top.clone()));
            added.push(top);
        }
        added
    }

    fn remove_unused_imports(&self, unit: &mut CompilationUnit, baseline: &ImportUsage) -> Vec<String> {
        if !self.settings.remove_unused_imports {
            return Vec::new();
        }

        let usage = ImportUsage::capture(unit);
        let mut removed = Vec::new();
        unit.imports.retain(|import| {
            let stale = !import.is_static && baseline.is_used(import) && !usage.is_used(import);
            if stale {
                tracing::debug!("Removing unused import {}", import.name);
                removed.push(import.name.clone());
            }
            !stale
        });
        removed
    }
}

/// @ai:intent Imports of a unit that something in the unit refers to
#[derive(Debug, Clone, Default)]
pub struct ImportUsage {
    used: HashSet<Import>,
}

impl ImportUsage {
    /// @ai:intent Record which of the unit's imports are referenced right now
    /// @ai:effects pure
    pub fn capture(unit: &CompilationUnit) -> Self {
        let mut referenced = HashSet::new();
        let mut text = Vec::new();
        for class in &unit.types {
            class.visit_names(&mut |name| {
                referenced.insert(name.to_string());
            });
            class.visit_opaque_text(&mut |t| text.push(t.to_string()));
        }

        let used = unit
            .imports
            .iter()
            .filter(|import| is_referenced(import, &referenced, &text))
            .cloned()
            .collect();
        Self { used }
    }

    pub fn is_used(&self, import: &Import) -> bool {
        self.used.contains(import)
    }
}

fn is_referenced(import: &Import, referenced: &HashSet<String>, text: &[String]) -> bool {
    if import.on_demand {
        return referenced
            .iter()
            .any(|n| n.rsplit_once('.').map(|(parent, _)| parent) == Some(import.name.as_str()));
    }

    let prefix = format!("{}.", import.name);
    if referenced
        .iter()
        .any(|n| *n == import.name || n.starts_with(&prefix))
    {
        return true;
    }

    let word = Regex::new(&format!(r"\b{}\b", regex::escape(names::simple_name(&import.name))))
        .expect("Invalid regex");
    text.iter().any(|t| word.is_match(t))
}

/// @ai:intent Imports touched by the pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// @ai:intent Consume the pending set: normalize new nodes, then fix up imports
/// @ai:pre baseline was captured before the unit was converted
/// @ai:post every node id is cleared; nothing changes when `pending` is empty
pub fn run(
    unit: &mut CompilationUnit,
    pending: PendingNodes,
    style: &dyn CodeStyle,
    baseline: &ImportUsage,
) -> ImportChanges {
    if pending.is_empty() {
        return ImportChanges::default();
    }

    let mut normalizer = Normalizer {
        pending: &pending,
        style,
        references: Vec::new(),
    };
    for class in &mut unit.types {
        normalizer.class(class);
    }
    let references = normalizer.references;
    tracing::debug!(
        "Normalized {} pending node(s), {} reference(s)",
        pending.len(),
        references.len()
    );

    let removed = style.remove_unused_imports(unit, baseline);
    let added = style.shorten_references(unit, &references);
    ImportChanges { added, removed }
}

struct Normalizer<'p> {
    pending: &'p PendingNodes,
    style: &'p dyn CodeStyle,
    /// Names referenced by pending nodes, in first-seen order.
    references: Vec<String>,
}

impl Normalizer<'_> {
    fn take(&self, id: &mut Option<NodeId>) -> bool {
        match id.take() {
            Some(id) => self.pending.contains(id),
            None => false,
        }
    }

    fn reference(&mut self, name: &str) {
        if !self.references.iter().any(|r| r == name) {
            self.references.push(name.to_string());
        }
    }

    fn class(&mut self, class: &mut ClassDecl) {
        if self.take(&mut class.id) {
            let mut seen = Vec::new();
            class.visit_names(&mut |name| seen.push(name.to_string()));
            seen.iter().for_each(|name| self.reference(name));
        }

        self.modifiers(&mut class.modifiers);
        for member in &mut class.members {
            match member {
                Member::Method(method) => {
                    self.modifiers(&mut method.modifiers);
                    for param in &mut method.params {
                        self.modifiers(&mut param.modifiers);
                    }
                }
                Member::Field(field) => self.modifiers(&mut field.modifiers),
                Member::Class(nested) => self.class(nested),
                Member::Comment(comment) => self.comment(comment),
            }
        }
    }

    fn modifiers(&mut self, modifiers: &mut ModifierList) {
        for modifier in &mut modifiers.items {
            match modifier {
                Modifier::Annotation(annotation) => self.annotation(annotation),
                Modifier::Comment(comment) => self.comment(comment),
                Modifier::Keyword(_) => {}
            }
        }
    }

    fn comment(&mut self, comment: &mut Comment) {
        if self.take(&mut comment.id) {
            self.style.reformat_comment(comment);
        }
    }

    fn annotation(&mut self, annotation: &mut Annotation) {
        let inserted = self.take(&mut annotation.id);
        if inserted {
            self.reference(&annotation.name);
        }
        for attribute in &mut annotation.attributes {
            self.value(&mut attribute.value, inserted);
        }
        if inserted {
            self.style.reformat_annotation(annotation);
        }
    }

    fn value(&mut self, value: &mut Value, inserted: bool) {
        match value {
            Value::Annotation(nested) => self.annotation(nested),
            Value::Array(items) => items.iter_mut().for_each(|v| self.value(v, inserted)),
            Value::Class(ty) if inserted => {
                let mut seen = Vec::new();
                ty.visit_names(&mut |name| seen.push(name.to_string()));
                seen.iter().for_each(|name| self.reference(name));
            }
            _ => {}
        }
    }
}
