//! Effect application: strict single-step processing plus the fail-open
//! replay used for previews and recipe restores.

use crate::buffer::RasterBuffer;
use crate::effect::AppliedEffect;
use crate::error::{CoreError, Result};
use crate::params::resolve_params;
use crate::registry::EffectRegistry;

/// Apply one effect to a buffer. Strict: unknown effect ids and processing
/// failures are errors. Identity parameter sets return the input untouched.
pub fn apply_one(
    registry: &EffectRegistry,
    input: RasterBuffer,
    applied: &AppliedEffect,
) -> Result<RasterBuffer> {
    let effect = registry
        .get(&applied.effect_id)
        .ok_or_else(|| CoreError::UnknownEffect(applied.effect_id.clone()))?;
    let params = resolve_params(&effect.parameters(), &applied.params);
    if effect.is_identity(&params) {
        return Ok(input);
    }
    effect.apply(input, &params)
}

/// Replay a chain of effects over a base buffer, fail-open.
///
/// Unknown effect ids are skipped with a warning; a processing failure
/// leaves the buffer as it was before that step and continues. A corrupt
/// entry can therefore never take the whole image down, it just drops out
/// of the result.
pub fn apply_all(
    registry: &EffectRegistry,
    base: &RasterBuffer,
    effects: &[AppliedEffect],
) -> RasterBuffer {
    let mut current = base.clone();
    for applied in effects {
        let Some(effect) = registry.get(&applied.effect_id) else {
            tracing::warn!(effect_id = %applied.effect_id, "skipping unknown effect");
            continue;
        };
        let params = resolve_params(&effect.parameters(), &applied.params);
        if effect.is_identity(&params) {
            continue;
        }
        match effect.apply(current.clone(), &params) {
            Ok(next) => current = next,
            Err(err) => {
                tracing::warn!(effect_id = %applied.effect_id, error = %err, "effect failed, keeping previous state");
            }
        }
    }
    current
}

/// Non-destructive preview: run one candidate effect over a copy of the
/// base buffer. Strict like `apply_one`; the base is never modified.
pub fn preview(
    registry: &EffectRegistry,
    base: &RasterBuffer,
    candidate: &AppliedEffect,
) -> Result<RasterBuffer> {
    apply_one(registry, base.clone(), candidate)
}
