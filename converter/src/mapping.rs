//! @ai:module:intent Table-driven translation of legacy attribute names and values
//! @ai:module:layer domain
//! @ai:module:public_api LegacyKind, Target, Shape, Rule, Mapped, lookup, map, split_to_array
//! @ai:module:depends_on tree, error, vocabulary
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::tree::{Attribute, Value};
use crate::vocabulary::legacy;
use regex::Regex;
use LegacyKind as K;
use Shape as S;
use Target as T;

/// @ai:intent Legacy annotation kinds that carry attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyKind {
    Api,
    ApiOperation,
    ApiModelProperty,
    ApiParam,
    ApiResponse,
}

impl LegacyKind {
    pub fn annotation_name(self) -> &'static str {
        match self {
            LegacyKind::Api => legacy::API,
            LegacyKind::ApiOperation => legacy::API_OPERATION,
            LegacyKind::ApiModelProperty => legacy::API_MODEL_PROPERTY,
            LegacyKind::ApiParam => legacy::API_PARAM,
            LegacyKind::ApiResponse => legacy::API_RESPONSE,
        }
    }
}

/// @ai:intent Which new annotation receives a mapped attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The annotation replacing the legacy one.
    Primary,
    /// A nested `@Schema` attached through the primary's `schema` attribute.
    Schema,
}

/// @ai:intent How an attribute value changes shape on the way over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Copy,
    /// Numeric or text literal re-emitted as a string literal.
    Requote,
    /// `"a, b,c"` becomes `{"a", "b", "c"}`.
    SplitToArray,
    /// Each string becomes its own `@Tag(name = ...)`.
    TagPerEntry,
    /// `true` becomes a bare `@Hidden`.
    HiddenMarker,
    /// A `Type.class` literal that drives content synthesis.
    ResponseContent,
    /// Read by a sibling rule and never copied.
    Consume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub kind: LegacyKind,
    pub attribute: &'static str,
    pub target_name: &'static str,
    pub target: Target,
    pub shape: Shape,
}

const fn rule(
    kind: LegacyKind,
    attribute: &'static str,
    target_name: &'static str,
    target: Target,
    shape: Shape,
) -> Rule {
    Rule {
        kind,
        attribute,
        target_name,
        target,
        shape,
    }
}

const RULES: &[Rule] = &[
    rule(K::Api, "tags", "name", T::Primary, S::TagPerEntry),
    rule(K::Api, "hidden", "", T::Primary, S::HiddenMarker),
    rule(K::ApiOperation, "value", "summary", T::Primary, S::Copy),
    rule(K::ApiOperation, "notes", "description", T::Primary, S::Copy),
    rule(K::ApiOperation, "nickname", "operationId", T::Primary, S::Copy),
    rule(K::ApiOperation, "tags", "tags", T::Primary, S::Copy),
    rule(K::ApiModelProperty, "name", "name", T::Primary, S::Copy),
    rule(K::ApiModelProperty, "value", "description", T::Primary, S::Copy),
    rule(K::ApiModelProperty, "required", "required", T::Primary, S::Copy),
    rule(K::ApiModelProperty, "dataType", "type", T::Primary, S::Copy),
    rule(K::ApiModelProperty, "allowableValues", "allowableValues", T::Primary, S::SplitToArray),
    rule(K::ApiModelProperty, "example", "example", T::Primary, S::Copy),
    rule(K::ApiParam, "name", "name", T::Primary, S::Copy),
    rule(K::ApiParam, "required", "required", T::Primary, S::Copy),
    rule(K::ApiParam, "value", "description", T::Primary, S::Copy),
    rule(K::ApiParam, "hidden", "hidden", T::Primary, S::Copy),
    rule(K::ApiParam, "example", "example", T::Primary, S::Copy),
    rule(K::ApiParam, "defaultValue", "defaultValue", T::Schema, S::Copy),
    rule(K::ApiParam, "allowableValues", "allowableValues", T::Schema, S::SplitToArray),
    rule(K::ApiResponse, "code", "responseCode", T::Primary, S::Requote),
    rule(K::ApiResponse, "message", "description", T::Primary, S::Copy),
    rule(K::ApiResponse, "response", "content", T::Primary, S::ResponseContent),
    rule(K::ApiResponse, "responseContainer", "", T::Primary, S::Consume),
];

/// @ai:intent Find the rule for an attribute; `None` means the default `value` attribute
/// @ai:effects pure
pub fn lookup(kind: LegacyKind, attribute: Option<&str>) -> Option<&'static Rule> {
    let attribute = attribute.unwrap_or("value");
    RULES
        .iter()
        .find(|r| r.kind == kind && r.attribute == attribute)
}

/// @ai:intent Result of mapping one legacy attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Mapped {
    Attribute {
        target: Target,
        name: &'static str,
        value: Value,
    },
    Tags(Vec<Value>),
    Hidden(bool),
    ResponseContent(Value),
    Consumed,
}

/// @ai:intent Translate one legacy attribute into its new name, value and target
/// @ai:pre declaration names the construct carrying the annotation, for error messages
/// @ai:post unmapped attribute names fail with Error::UnmappedAttribute
/// @ai:effects pure
pub fn map(kind: LegacyKind, attribute: &Attribute, declaration: &str) -> Result<Mapped> {
    let rule = lookup(kind, attribute.name.as_deref()).ok_or_else(|| Error::UnmappedAttribute {
        annotation: kind.annotation_name().to_string(),
        attribute: attribute.effective_name().to_string(),
        declaration: declaration.to_string(),
    })?;

    let unsupported = |expected: &'static str| Error::UnsupportedValue {
        annotation: kind.annotation_name().to_string(),
        attribute: rule.attribute.to_string(),
        expected,
        declaration: declaration.to_string(),
    };

    let value = &attribute.value;
    let mapped = match rule.shape {
        Shape::Copy => Mapped::Attribute {
            target: rule.target,
            name: rule.target_name,
            value: value.clone(),
        },
        Shape::Requote => Mapped::Attribute {
            target: rule.target,
            name: rule.target_name,
            value: requote(value).ok_or_else(|| unsupported("a numeric or string literal"))?,
        },
        Shape::SplitToArray => Mapped::Attribute {
            target: rule.target,
            name: rule.target_name,
            value: value
                .as_str()
                .map(split_to_array)
                .ok_or_else(|| unsupported("a string literal"))?,
        },
        Shape::TagPerEntry => match value {
            Value::Array(items) => Mapped::Tags(items.clone()),
            Value::String(_) => Mapped::Tags(vec![value.clone()]),
            _ => return Err(unsupported("a string or an array of strings")),
        },
        Shape::HiddenMarker => {
            Mapped::Hidden(value.as_bool().ok_or_else(|| unsupported("a boolean literal"))?)
        }
        Shape::ResponseContent => Mapped::ResponseContent(value.clone()),
        Shape::Consume => Mapped::Consumed,
    };

    Ok(mapped)
}

/// @ai:intent Re-emit a numeric or text literal as a string literal
/// @ai:example (Number("404")) -> Some(String("404"))
/// @ai:effects pure
pub fn requote(value: &Value) -> Option<Value> {
    value.literal_text().map(Value::string)
}

/// @ai:intent Split a comma-separated list into a string array literal
/// @ai:example ("a, b,c") -> {"a", "b", "c"}
/// @ai:effects pure
pub fn split_to_array(text: &str) -> Value {
    let separator = Regex::new(r"\s*,\s*").expect("Invalid regex");
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Array(Vec::new());
    }
    Value::Array(separator.split(trimmed).map(Value::string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(name: Option<&str>, value: Value) -> Attribute {
        Attribute {
            name: name.map(str::to_string),
            value,
        }
    }

    #[test]
    fn test_split_trims_whitespace_and_keeps_order() {
        assert_eq!(
            split_to_array("a, b,c"),
            Value::Array(vec![Value::string("a"), Value::string("b"), Value::string("c")])
        );
    }

    #[test]
    fn test_unnamed_attribute_maps_like_value() {
        let mapped = map(
            LegacyKind::ApiOperation,
            &attr(None, Value::string("List users")),
            "UserResource.list",
        )
        .unwrap();

        assert_eq!(
            mapped,
            Mapped::Attribute {
                target: Target::Primary,
                name: "summary",
                value: Value::string("List users"),
            }
        );
    }

    #[test]
    fn test_code_is_requoted() {
        let mapped = map(
            LegacyKind::ApiResponse,
            &attr(Some("code"), Value::Number("404".to_string())),
            "r",
        )
        .unwrap();

        assert_eq!(
            mapped,
            Mapped::Attribute {
                target: Target::Primary,
                name: "responseCode",
                value: Value::string("404"),
            }
        );
    }

    #[test]
    fn test_code_constant_is_rejected() {
        let result = map(
            LegacyKind::ApiResponse,
            &attr(Some("code"), Value::Expression("HttpStatus.OK".to_string())),
            "r",
        );
        assert!(matches!(result, Err(Error::UnsupportedValue { .. })));
    }

    #[test]
    fn test_param_schema_attributes_target_schema() {
        let mapped = map(
            LegacyKind::ApiParam,
            &attr(Some("allowableValues"), Value::string("asc,desc")),
            "p",
        )
        .unwrap();

        assert_eq!(
            mapped,
            Mapped::Attribute {
                target: Target::Schema,
                name: "allowableValues",
                value: Value::Array(vec![Value::string("asc"), Value::string("desc")]),
            }
        );
    }

    #[test]
    fn test_unmapped_attribute_fails() {
        let result = map(
            LegacyKind::ApiOperation,
            &attr(Some("httpMethod"), Value::string("GET")),
            "UserResource.list",
        );

        match result {
            Err(Error::UnmappedAttribute { attribute, declaration, .. }) => {
                assert_eq!(attribute, "httpMethod");
                assert_eq!(declaration, "UserResource.list");
            }
            other => panic!("expected unmapped attribute, got {:?}", other),
        }
    }

    #[test]
    fn test_single_tag_becomes_list() {
        let mapped = map(LegacyKind::Api, &attr(Some("tags"), Value::string("users")), "c").unwrap();
        assert_eq!(mapped, Mapped::Tags(vec![Value::string("users")]));
    }
}
