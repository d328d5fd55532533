//! @ai:module:intent Convert @ApiParam into @Parameter with an optional nested @Schema
//! @ai:module:layer application
//! @ai:module:public_api convert
//! @ai:module:depends_on mapping, rewrite

use super::{find_legacy, RewriteContext};
use crate::error::Result;
use crate::mapping::LegacyKind;
use crate::tree::{Modifier, ModifierList};
use crate::vocabulary::{legacy, openapi};

/// @ai:intent Replace @ApiParam with @Parameter
///
/// `defaultValue` and `allowableValues` move into `@Parameter(schema = @Schema(...))`;
/// the nested schema only exists when one of them was given.
/// @ai:effects mutates modifiers, ctx
pub fn convert(
    ctx: &mut RewriteContext<'_>,
    modifiers: &mut ModifierList,
    declaration: &str,
) -> Result<bool> {
    let Some((index, param)) = find_legacy(modifiers, legacy::API_PARAM) else {
        return Ok(false);
    };

    let parameter = ctx.translate(LegacyKind::ApiParam, &param, openapi::PARAMETER, declaration)?;
    ctx.replace(
        modifiers,
        index,
        vec![Modifier::Annotation(parameter)],
        declaration,
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::TypeIndex;
    use crate::tree::{Annotation, Value};

    fn convert_one(param: Annotation) -> (ModifierList, usize) {
        let index = TypeIndex::default();
        let mut ctx = RewriteContext::new(&index, &[]);
        let mut modifiers = ModifierList::default();
        modifiers.push(Modifier::Annotation(param));
        convert(&mut ctx, &mut modifiers, "UserResource.list(sort)").unwrap();
        (modifiers, ctx.pending.len())
    }

    #[test]
    fn test_schema_attributes_are_nested() {
        let (modifiers, pending) = convert_one(
            Annotation::new(legacy::API_PARAM)
                .with_value(Value::string("Sort order"))
                .with("required", Value::Bool(false))
                .with("defaultValue", Value::string("asc"))
                .with("allowableValues", Value::string("asc, desc")),
        );

        let parameter = modifiers.annotation(openapi::PARAMETER).unwrap();
        assert_eq!(parameter.get("description"), Some(&Value::string("Sort order")));
        assert_eq!(parameter.get("required"), Some(&Value::Bool(false)));
        assert_eq!(parameter.get("defaultValue"), None);

        let schema = parameter.get("schema").and_then(Value::as_annotation).unwrap();
        assert_eq!(schema.name, openapi::SCHEMA);
        assert_eq!(schema.get("defaultValue"), Some(&Value::string("asc")));
        assert_eq!(
            schema.get("allowableValues"),
            Some(&Value::Array(vec![Value::string("asc"), Value::string("desc")]))
        );
        assert_eq!(pending, 2);
    }

    #[test]
    fn test_no_schema_without_schema_attributes() {
        let (modifiers, pending) = convert_one(
            Annotation::new(legacy::API_PARAM)
                .with("name", Value::string("id"))
                .with("hidden", Value::Bool(true))
                .with("example", Value::string("42")),
        );

        let parameter = modifiers.annotation(openapi::PARAMETER).unwrap();
        assert_eq!(parameter.get("schema"), None);
        assert_eq!(parameter.get("name"), Some(&Value::string("id")));
        assert_eq!(parameter.get("hidden"), Some(&Value::Bool(true)));
        assert_eq!(pending, 1);
    }
}
