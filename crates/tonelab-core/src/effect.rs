use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::buffer::RasterBuffer;
use crate::error::Result;
use crate::params::{default_params, ParamValue, ParameterSpec, ResolvedParams};

/// Catalog grouping for the effect picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EffectCategory {
    Basic,
    Artistic,
    Creative,
    Technical,
}

impl EffectCategory {
    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Artistic => "Artistic",
            Self::Creative => "Creative",
            Self::Technical => "Technical",
        }
    }

    pub fn all() -> [EffectCategory; 4] {
        [Self::Basic, Self::Artistic, Self::Creative, Self::Technical]
    }
}

/// Trait for pixel-processing effects. The apply method receives an RGBA
/// buffer and resolved parameters, and returns a processed buffer of the
/// same dimensions.
pub trait PixelEffect: Send + Sync {
    /// Stable string id, used in recipes and registry lookups.
    fn id(&self) -> &str;

    /// Human-readable display name.
    fn display_name(&self) -> &str;

    fn category(&self) -> EffectCategory;

    /// Parameter definitions for this effect. Every parameter the effect
    /// reads must appear here; values are clamped to the declared bounds
    /// before apply is called.
    fn parameters(&self) -> Vec<ParameterSpec>;

    /// Process a buffer, returning the modified buffer. Takes ownership of
    /// the input so in-place effects can avoid allocating.
    fn apply(&self, input: RasterBuffer, params: &ResolvedParams) -> Result<RasterBuffer>;

    /// Returns true if the given parameters produce an identity transform
    /// (output == input). Used to skip processing for performance.
    fn is_identity(&self, params: &ResolvedParams) -> bool {
        let _ = params;
        false
    }
}

/// An instance of an effect applied to the image, with its parameter values.
/// These are what the history and saved recipes record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedEffect {
    pub id: Uuid,
    pub effect_id: String,
    pub params: Vec<(String, ParamValue)>,
}

impl AppliedEffect {
    /// Create an applied-effect record with the effect's default parameters.
    pub fn with_defaults(effect: &dyn PixelEffect) -> Self {
        Self {
            id: Uuid::new_v4(),
            effect_id: effect.id().to_string(),
            params: default_params(&effect.parameters()),
        }
    }

    /// Create an applied-effect record with explicit parameter values.
    pub fn new(effect_id: &str, params: Vec<(String, ParamValue)>) -> Self {
        Self {
            id: Uuid::new_v4(),
            effect_id: effect_id.to_string(),
            params,
        }
    }

    /// Set a parameter value by id, appending it if not already present.
    pub fn set_param(&mut self, id: &str, value: ParamValue) {
        for (n, v) in &mut self.params {
            if n == id {
                *v = value;
                return;
            }
        }
        self.params.push((id.to_string(), value));
    }

    /// Get a parameter value by id.
    pub fn param(&self, id: &str) -> Option<&ParamValue> {
        self.params.iter().find(|(n, _)| n == id).map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::resolve_params;

    struct Invert;

    impl PixelEffect for Invert {
        fn id(&self) -> &str {
            "invert"
        }

        fn display_name(&self) -> &str {
            "Invert"
        }

        fn category(&self) -> EffectCategory {
            EffectCategory::Basic
        }

        fn parameters(&self) -> Vec<ParameterSpec> {
            vec![ParameterSpec::slider("mix", "Mix", 0.0, 100.0, 1.0, 100.0)]
        }

        fn apply(&self, mut input: RasterBuffer, params: &ResolvedParams) -> Result<RasterBuffer> {
            let mix = params.number("mix") / 100.0;
            for pixel in input.data.chunks_exact_mut(4) {
                for c in 0..3 {
                    let inverted = 255.0 - pixel[c] as f64;
                    pixel[c] =
                        (pixel[c] as f64 + (inverted - pixel[c] as f64) * mix).round() as u8;
                }
            }
            Ok(input)
        }

        fn is_identity(&self, params: &ResolvedParams) -> bool {
            params.number("mix") == 0.0
        }
    }

    #[test]
    fn test_applied_effect_with_defaults() {
        let applied = AppliedEffect::with_defaults(&Invert);
        assert_eq!(applied.effect_id, "invert");
        assert_eq!(applied.param("mix"), Some(&ParamValue::Number(100.0)));
    }

    #[test]
    fn test_set_param_overwrites() {
        let mut applied = AppliedEffect::with_defaults(&Invert);
        applied.set_param("mix", ParamValue::Number(25.0));
        assert_eq!(applied.param("mix"), Some(&ParamValue::Number(25.0)));
        assert_eq!(applied.params.len(), 1);
    }

    #[test]
    fn test_identity_via_resolved_params() {
        let effect = Invert;
        let resolved = resolve_params(
            &effect.parameters(),
            &[("mix".to_string(), ParamValue::Number(0.0))],
        );
        assert!(effect.is_identity(&resolved));

        let resolved = resolve_params(&effect.parameters(), &[]);
        assert!(!effect.is_identity(&resolved));
    }

    #[test]
    fn test_apply_full_mix_inverts() {
        let effect = Invert;
        let resolved = resolve_params(&effect.parameters(), &[]);
        let buf = RasterBuffer::from_rgba_vec(1, 1, vec![255, 0, 100, 200]);
        let out = effect.apply(buf, &resolved).unwrap();
        assert_eq!(out.pixel(0, 0), &[0, 255, 155, 200]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut applied = AppliedEffect::with_defaults(&Invert);
        applied.set_param("mix", ParamValue::Number(33.0));
        let json = serde_json::to_string(&applied).unwrap();
        let back: AppliedEffect = serde_json::from_str(&json).unwrap();
        assert_eq!(applied, back);
    }
}
