//! @ai:module:intent Convert method-level @ApiOperation into @Operation
//! @ai:module:layer application
//! @ai:module:public_api convert
//! @ai:module:depends_on mapping, rewrite

use super::{find_legacy, RewriteContext};
use crate::error::Result;
use crate::mapping::LegacyKind;
use crate::tree::{Modifier, ModifierList};
use crate::vocabulary::{legacy, openapi};

/// @ai:intent Replace @ApiOperation with @Operation (value -> summary, notes -> description, nickname -> operationId)
/// @ai:effects mutates modifiers, ctx
pub fn convert(
    ctx: &mut RewriteContext<'_>,
    modifiers: &mut ModifierList,
    declaration: &str,
) -> Result<bool> {
    let Some((index, operation)) = find_legacy(modifiers, legacy::API_OPERATION) else {
        return Ok(false);
    };

    let replacement = ctx.translate(
        LegacyKind::ApiOperation,
        &operation,
        openapi::OPERATION,
        declaration,
    )?;
    ctx.replace(
        modifiers,
        index,
        vec![Modifier::Annotation(replacement)],
        declaration,
    );
    Ok(true)
}
