use std::fs;
use std::path::Path;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::buffer::RasterBuffer;
use crate::effect::AppliedEffect;
use crate::engine;
use crate::error::{CoreError, Result};
use crate::history::{EditHistory, HistoryEntry};
use crate::params::{resolve_params, ParamValue};
use crate::registry::EffectRegistry;

/// Recipe file format version. Loading bumps across major versions fail.
pub const CURRENT_RECIPE_VERSION: &str = "1.0.0";

/// A saved effect stack: the chain, not the pixels. Restoring replays it
/// against a freshly loaded original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecipe {
    pub version: Version,
    pub name: String,
    pub applied_effects: Vec<AppliedEffect>,
}

impl SessionRecipe {
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let recipe: Self = serde_json::from_str(&json)?;
        let supported = Version::parse(CURRENT_RECIPE_VERSION).expect("valid crate version");
        if recipe.version.major != supported.major {
            return Err(CoreError::RecipeVersionMismatch {
                found: recipe.version.to_string(),
                supported: supported.to_string(),
            });
        }
        Ok(recipe)
    }
}

/// An editing session over one loaded image: the pristine original plus a
/// linear history of committed effects.
#[derive(Debug, Clone)]
pub struct EditSession {
    pub name: String,
    original: RasterBuffer,
    pub history: EditHistory,
}

impl EditSession {
    pub fn new(name: impl Into<String>, original: RasterBuffer) -> Self {
        Self {
            name: name.into(),
            original,
            history: EditHistory::new(),
        }
    }

    /// The untouched load-time buffer.
    pub fn original(&self) -> &RasterBuffer {
        &self.original
    }

    /// The buffer the user is looking at: the cursor snapshot, or the
    /// original when the history is pristine.
    pub fn current_buffer(&self) -> &RasterBuffer {
        match self.history.current() {
            Some(entry) => &entry.snapshot,
            None => &self.original,
        }
    }

    /// The effect chain that produced the current buffer.
    pub fn current_chain(&self) -> &[AppliedEffect] {
        match self.history.current() {
            Some(entry) => &entry.applied_effects,
            None => &[],
        }
    }

    /// Apply one effect on top of the current buffer and commit the result.
    ///
    /// Strict: an unknown effect id or a processing failure returns the
    /// error with history untouched.
    pub fn apply_effect(
        &mut self,
        registry: &EffectRegistry,
        effect_id: &str,
        params: Vec<(String, ParamValue)>,
    ) -> Result<&HistoryEntry> {
        let effect = registry
            .get(effect_id)
            .ok_or_else(|| CoreError::UnknownEffect(effect_id.to_string()))?;
        let applied = AppliedEffect::new(effect_id, params);
        let resolved = resolve_params(&effect.parameters(), &applied.params);

        let input = self.current_buffer().clone();
        let snapshot = if effect.is_identity(&resolved) {
            input
        } else {
            effect.apply(input, &resolved)?
        };

        let mut chain = self.current_chain().to_vec();
        chain.push(applied);
        Ok(self.history.commit(snapshot, chain))
    }

    /// Step back one edit and return the buffer now shown. Undoing past
    /// the first entry lands on the original and stays there.
    pub fn undo(&mut self) -> &RasterBuffer {
        self.history.undo();
        self.current_buffer()
    }

    pub fn redo(&mut self) -> &RasterBuffer {
        self.history.redo();
        self.current_buffer()
    }

    /// Drop every edit and return to the original.
    pub fn reset(&mut self) {
        self.history.reset();
    }

    /// Canonical recompute: replay the current chain from the original.
    /// With a healthy registry this is byte-identical to `current_buffer`.
    pub fn replay(&self, registry: &EffectRegistry) -> RasterBuffer {
        engine::apply_all(registry, &self.original, self.current_chain())
    }

    /// Snapshot the current chain as a saveable recipe.
    pub fn to_recipe(&self) -> SessionRecipe {
        SessionRecipe {
            version: Version::parse(CURRENT_RECIPE_VERSION).expect("valid crate version"),
            name: self.name.clone(),
            applied_effects: self.current_chain().to_vec(),
        }
    }

    /// Rebuild a session from a recipe and a freshly loaded original.
    /// The replay is fail-open: effects the registry no longer knows are
    /// skipped rather than failing the restore.
    pub fn from_recipe(
        registry: &EffectRegistry,
        original: RasterBuffer,
        recipe: SessionRecipe,
    ) -> Self {
        let mut session = Self::new(recipe.name, original);
        if !recipe.applied_effects.is_empty() {
            let snapshot = engine::apply_all(registry, &session.original, &recipe.applied_effects);
            session.history.commit(snapshot, recipe.applied_effects);
        }
        session
    }
}
