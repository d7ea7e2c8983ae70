use std::collections::HashMap;

use crate::effect::{EffectCategory, PixelEffect};
use crate::effects;
use crate::error::{CoreError, Result};
use crate::params::{default_params, ParamValue};

/// Summary of a registered effect, for building pickers and panels without
/// touching the implementation.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectDescriptor {
    pub id: String,
    pub display_name: String,
    pub category: EffectCategory,
}

/// Maps effect id strings to their PixelEffect implementations. Built-in
/// effects are registered at startup. Future plugin systems register here too.
pub struct EffectRegistry {
    effects: HashMap<String, Box<dyn PixelEffect>>,
}

impl EffectRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            effects: HashMap::new(),
        }
    }

    /// Create a registry with all built-in effects registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(effects::tone::BrightnessContrast));
        registry.register(Box::new(effects::tone::SaturationVibrance));
        registry.register(Box::new(effects::overlay::Vignette));
        registry.register(Box::new(effects::duotone::Duotone));
        registry.register(Box::new(effects::halftone::Halftone));
        registry.register(Box::new(effects::grain::FilmGrain));
        registry.register(Box::new(effects::kaleidoscope::Kaleidoscope));
        registry.register(Box::new(effects::overlay::LightLeak));
        registry.register(Box::new(effects::grain::Glitch));
        registry.register(Box::new(effects::overlay::FrameBorder));
        registry.register(Box::new(effects::convolve::Sharpen));
        registry.register(Box::new(effects::convolve::NoiseReduction));
        registry.register(Box::new(effects::dehaze::Dehaze));
        tracing::info!(count = registry.effects.len(), "effect registry ready");
        registry
    }

    /// Register an effect, replacing any previous implementation with the
    /// same id (for plugins that shadow built-ins).
    pub fn register(&mut self, effect: Box<dyn PixelEffect>) {
        self.effects.insert(effect.id().to_string(), effect);
    }

    /// Register an effect, failing if the id is already taken.
    pub fn try_register(&mut self, effect: Box<dyn PixelEffect>) -> Result<()> {
        let id = effect.id().to_string();
        if self.effects.contains_key(&id) {
            return Err(CoreError::EffectAlreadyRegistered(id));
        }
        self.effects.insert(id, effect);
        Ok(())
    }

    /// Look up the effect implementation for a given id.
    pub fn get(&self, effect_id: &str) -> Option<&dyn PixelEffect> {
        self.effects.get(effect_id).map(|e| e.as_ref())
    }

    /// Descriptors for every registered effect, sorted by id for stable
    /// iteration order.
    pub fn list(&self) -> Vec<EffectDescriptor> {
        let mut out: Vec<EffectDescriptor> = self
            .effects
            .values()
            .map(|e| EffectDescriptor {
                id: e.id().to_string(),
                display_name: e.display_name().to_string(),
                category: e.category(),
            })
            .collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    /// Descriptors for one category, sorted by id.
    pub fn list_by_category(&self, category: EffectCategory) -> Vec<EffectDescriptor> {
        self.list()
            .into_iter()
            .filter(|d| d.category == category)
            .collect()
    }

    /// Default parameter values for an effect id.
    pub fn default_params(&self, effect_id: &str) -> Result<Vec<(String, ParamValue)>> {
        let effect = self
            .get(effect_id)
            .ok_or_else(|| CoreError::UnknownEffect(effect_id.to_string()))?;
        Ok(default_params(&effect.parameters()))
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_present() {
        let registry = EffectRegistry::with_builtins();
        for id in [
            "brightness_contrast",
            "saturation_vibrance",
            "vignette",
            "duotone",
            "halftone",
            "film_grain",
            "kaleidoscope",
            "light_leak",
            "glitch",
            "frame",
            "sharpen",
            "noise_reduction",
            "dehaze",
        ] {
            assert!(registry.get(id).is_some(), "missing builtin {id}");
        }
        assert_eq!(registry.list().len(), 13);
    }

    #[test]
    fn test_list_sorted_by_id() {
        let registry = EffectRegistry::with_builtins();
        let list = registry.list();
        let mut sorted = list.clone();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(list, sorted);
    }

    #[test]
    fn test_list_by_category() {
        let registry = EffectRegistry::with_builtins();
        let basic = registry.list_by_category(EffectCategory::Basic);
        assert!(basic.iter().any(|d| d.id == "brightness_contrast"));
        assert!(basic.iter().all(|d| d.category == EffectCategory::Basic));

        let technical = registry.list_by_category(EffectCategory::Technical);
        assert_eq!(technical.len(), 3);
    }

    #[test]
    fn test_try_register_duplicate_fails() {
        let mut registry = EffectRegistry::with_builtins();
        let err = registry
            .try_register(Box::new(effects::dehaze::Dehaze))
            .unwrap_err();
        assert!(matches!(err, CoreError::EffectAlreadyRegistered(id) if id == "dehaze"));
    }

    #[test]
    fn test_unknown_effect_lookup() {
        let registry = EffectRegistry::with_builtins();
        assert!(registry.get("sepia").is_none());
        assert!(registry.default_params("sepia").is_err());
    }

    #[test]
    fn test_default_params_match_declarations() {
        let registry = EffectRegistry::with_builtins();
        let params = registry.default_params("brightness_contrast").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].0, "brightness");
    }
}
