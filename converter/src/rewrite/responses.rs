//! @ai:module:intent Convert @ApiResponses into one @ApiResponse per entry, synthesizing content
//! @ai:module:layer application
//! @ai:module:public_api convert
//! @ai:module:depends_on mapping, resolve, rewrite
//!
//! Each legacy entry becomes a new `@ApiResponse` placed where `@ApiResponses`
//! stood. Marker comments raised while building an entry go right before it.
//! When no `200` entry carries content, a default one is derived from the
//! method's return type.

use super::{find_legacy, unexpected, MethodScope, RewriteContext};
use crate::error::{Error, Result};
use crate::mapping::{self, LegacyKind, Mapped, Target};
use crate::resolve::collection_element;
use crate::tree::{Annotation, MethodDecl, Modifier, TypeRef, Value};
use crate::vocabulary::{container, legacy, marker, openapi, OK_STATUS};

/// A converted entry together with the markers that belong in front of it.
struct Converted {
    notes: Vec<Modifier>,
    response: Annotation,
}

impl Converted {
    fn is_ok(&self) -> bool {
        self.response.get("responseCode").and_then(Value::as_str) == Some(OK_STATUS)
    }

    fn has_content(&self) -> bool {
        self.response.get("content").is_some()
    }
}

/// @ai:intent Replace @ApiResponses on a method with the equivalent @ApiResponse annotations
/// @ai:pre scope belongs to the class declaring `method`
/// @ai:post returns Ok(false) and leaves the method untouched when it has no @ApiResponses
pub fn convert(
    ctx: &mut RewriteContext<'_>,
    scope: &mut MethodScope,
    method: &mut MethodDecl,
    declaration: &str,
) -> Result<bool> {
    let Some((index, responses)) = find_legacy(&method.modifiers, legacy::API_RESPONSES) else {
        return Ok(false);
    };

    let replacements = build(ctx, scope, method, &responses, declaration)?;
    ctx.replace(&mut method.modifiers, index, replacements, declaration);
    Ok(true)
}

fn build(
    ctx: &mut RewriteContext<'_>,
    scope: &mut MethodScope,
    method: &MethodDecl,
    responses: &Annotation,
    declaration: &str,
) -> Result<Vec<Modifier>> {
    let mut converted = Vec::new();
    for entry in entries(responses, declaration)? {
        converted.push(convert_entry(ctx, scope, method, entry, declaration)?);
    }

    if let Some(return_type) = method.return_type.as_ref().filter(|t| !t.is_void()) {
        let ok = converted.iter().position(Converted::is_ok);
        let needs_default = ok.map_or(true, |i| !converted[i].has_content());

        if needs_default {
            let mut notes = Vec::new();
            let content = default_content(ctx, scope, method, return_type, &mut notes, declaration);
            match ok {
                Some(i) => {
                    converted[i].notes.extend(notes);
                    converted[i].response.set("content", Value::annotation(content));
                }
                None => {
                    let mut response = ctx.pending.annotation(openapi::API_RESPONSE);
                    response.set("responseCode", Value::string(OK_STATUS));
                    response.set("content", Value::annotation(content));
                    tracing::debug!("{}: added default {} response", declaration, OK_STATUS);
                    converted.push(Converted { notes, response });
                }
            }
        }
    }

    Ok(converted
        .into_iter()
        .flat_map(|c| {
            c.notes
                .into_iter()
                .chain(std::iter::once(Modifier::Annotation(c.response)))
        })
        .collect())
}

/// @ai:intent Entries of @ApiResponses; a single nested annotation counts as one entry
fn entries<'r>(responses: &'r Annotation, declaration: &str) -> Result<Vec<&'r Annotation>> {
    match responses.first_value() {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.iter().filter_map(Value::as_annotation).collect()),
        Some(Value::Annotation(entry)) => Ok(vec![entry.as_ref()]),
        Some(_) => Err(Error::UnsupportedValue {
            annotation: legacy::API_RESPONSES.to_string(),
            attribute: "value".to_string(),
            expected: "an array of @ApiResponse",
            declaration: declaration.to_string(),
        }),
    }
}

fn convert_entry(
    ctx: &mut RewriteContext<'_>,
    scope: &mut MethodScope,
    method: &MethodDecl,
    entry: &Annotation,
    declaration: &str,
) -> Result<Converted> {
    let wrapping = entry.get("responseContainer").and_then(Value::as_str);
    let mut response = ctx.pending.annotation(openapi::API_RESPONSE);
    let mut notes = Vec::new();

    for attribute in &entry.attributes {
        match mapping::map(LegacyKind::ApiResponse, attribute, declaration)? {
            Mapped::Attribute {
                target: Target::Primary,
                name,
                value,
            } => response.set(name, value),
            Mapped::ResponseContent(value) => {
                let content =
                    response_content(ctx, scope, method, &value, wrapping, &mut notes, declaration)?;
                response.set("content", Value::annotation(content));
            }
            Mapped::Consumed => {}
            _ => return Err(unexpected(LegacyKind::ApiResponse, attribute, declaration)),
        }
    }

    Ok(Converted { notes, response })
}

fn response_content(
    ctx: &mut RewriteContext<'_>,
    scope: &mut MethodScope,
    method: &MethodDecl,
    reference: &Value,
    wrapping: Option<&str>,
    notes: &mut Vec<Modifier>,
    declaration: &str,
) -> Result<Annotation> {
    let known = [container::LIST, container::SET, container::MAP];
    if let Some(other) = wrapping.filter(|w| !known.contains(w)) {
        return Err(Error::UnsupportedContainer {
            container: other.to_string(),
            declaration: declaration.to_string(),
        });
    }

    let implementation = scope.implementation(ctx, method, Some(reference), notes, declaration);
    let schema = new_schema(ctx, implementation);
    let mut content = new_content(ctx, method);

    match wrapping {
        Some(container::LIST) => content.set("array", array_schema(ctx, schema, false)),
        Some(container::SET) => content.set("array", array_schema(ctx, schema, true)),
        Some(_) => {
            notes.push(ctx.marker(marker::TRANSFORM_TO_MAP, declaration));
            content.set("schema", Value::annotation(schema));
        }
        None => content.set("schema", Value::annotation(schema)),
    }
    Ok(content)
}

/// @ai:intent Content describing what the method itself returns
fn default_content(
    ctx: &mut RewriteContext<'_>,
    scope: &mut MethodScope,
    method: &MethodDecl,
    return_type: &TypeRef,
    notes: &mut Vec<Modifier>,
    declaration: &str,
) -> Annotation {
    let mut content = new_content(ctx, method);
    match collection_element(return_type) {
        Some((element, unique)) => {
            let implementation = scope.implementation_of_type(ctx, element, notes, declaration);
            let schema = new_schema(ctx, implementation);
            content.set("array", array_schema(ctx, schema, unique));
        }
        None => {
            let implementation = scope.implementation(ctx, method, None, notes, declaration);
            let schema = new_schema(ctx, implementation);
            content.set("schema", Value::annotation(schema));
        }
    }
    content
}

/// @ai:intent New @Content carrying the method's media type, if it declares one
fn new_content(ctx: &mut RewriteContext<'_>, method: &MethodDecl) -> Annotation {
    let mut content = ctx.pending.annotation(openapi::CONTENT);
    if let Some(media_type) = media_type(ctx.media_type_annotations, method) {
        content.set("mediaType", media_type);
    }
    content
}

/// @ai:intent First value of the first configured media-type annotation on the method
/// @ai:example @Produces({"application/json", "text/plain"}) -> "application/json"
/// @ai:effects pure
fn media_type(annotations: &[String], method: &MethodDecl) -> Option<Value> {
    let value = annotations
        .iter()
        .find_map(|name| method.modifiers.annotation(name))?
        .first_value()?;
    match value {
        Value::Array(items) => items.first().cloned(),
        other => Some(other.clone()),
    }
}

fn new_schema(ctx: &mut RewriteContext<'_>, implementation: Option<Value>) -> Annotation {
    let mut schema = ctx.pending.annotation(openapi::SCHEMA);
    if let Some(implementation) = implementation {
        schema.set("implementation", implementation);
    }
    schema
}

fn array_schema(ctx: &mut RewriteContext<'_>, items: Annotation, unique: bool) -> Value {
    let mut array = ctx.pending.annotation(openapi::ARRAY_SCHEMA);
    array.set("schema", Value::annotation(items));
    if unique {
        array.set("uniqueItems", Value::Bool(true));
    }
    Value::annotation(array)
}
