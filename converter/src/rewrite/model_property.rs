//! @ai:module:intent Convert @ApiModelProperty into @Schema
//! @ai:module:layer application
//! @ai:module:public_api convert
//! @ai:module:depends_on mapping, rewrite

use super::{find_legacy, RewriteContext};
use crate::error::Result;
use crate::mapping::LegacyKind;
use crate::tree::{Modifier, ModifierList};
use crate::vocabulary::{legacy, openapi};

/// @ai:intent Replace @ApiModelProperty on a field or accessor with @Schema
/// @ai:effects mutates modifiers, ctx
pub fn convert(
    ctx: &mut RewriteContext<'_>,
    modifiers: &mut ModifierList,
    declaration: &str,
) -> Result<bool> {
    let Some((index, property)) = find_legacy(modifiers, legacy::API_MODEL_PROPERTY) else {
        return Ok(false);
    };

    let schema = ctx.translate(
        LegacyKind::ApiModelProperty,
        &property,
        openapi::SCHEMA,
        declaration,
    )?;
    ctx.replace(modifiers, index, vec![Modifier::Annotation(schema)], declaration);
    Ok(true)
}
