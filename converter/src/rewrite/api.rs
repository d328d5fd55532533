//! @ai:module:intent Convert the class-level @Api marker into @Tag and @Hidden
//! @ai:module:layer application
//! @ai:module:public_api convert
//! @ai:module:depends_on mapping, rewrite

use super::{find_legacy, unexpected, RewriteContext};
use crate::error::Result;
use crate::mapping::{self, LegacyKind, Mapped};
use crate::tree::{Modifier, ModifierList};
use crate::vocabulary::{legacy, openapi};

/// @ai:intent Replace @Api with one @Tag per tag and a bare @Hidden when hidden = true
/// @ai:post returns true when an @Api annotation was found and removed
/// @ai:effects mutates modifiers, ctx
pub fn convert(
    ctx: &mut RewriteContext<'_>,
    modifiers: &mut ModifierList,
    declaration: &str,
) -> Result<bool> {
    let Some((index, api)) = find_legacy(modifiers, legacy::API) else {
        return Ok(false);
    };

    let mut replacements = Vec::new();
    for attribute in &api.attributes {
        match mapping::map(LegacyKind::Api, attribute, declaration)? {
            Mapped::Tags(names) => {
                for name in names {
                    let tag = ctx.pending.annotation(openapi::TAG).with("name", name);
                    replacements.push(Modifier::Annotation(tag));
                }
            }
            Mapped::Hidden(true) => {
                replacements.push(Modifier::Annotation(ctx.pending.annotation(openapi::HIDDEN)));
            }
            Mapped::Hidden(false) => {}
            _ => return Err(unexpected(LegacyKind::Api, attribute, declaration)),
        }
    }

    ctx.replace(modifiers, index, replacements, declaration);
    Ok(true)
}
