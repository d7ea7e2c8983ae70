use tonelab_core::params::ParamValue;
use tonelab_core::{AppliedEffect, EditSession, RasterBuffer};

use crate::fixtures;

/// Builder for applied-effect records with incrementally set parameters.
pub struct AppliedEffectBuilder {
    effect_id: String,
    params: Vec<(String, ParamValue)>,
}

impl AppliedEffectBuilder {
    pub fn new(effect_id: &str) -> Self {
        Self {
            effect_id: effect_id.into(),
            params: Vec::new(),
        }
    }

    pub fn number(mut self, id: &str, value: f64) -> Self {
        self.params.push((id.to_string(), ParamValue::Number(value)));
        self
    }

    pub fn color(mut self, id: &str, rgb: [u8; 3]) -> Self {
        self.params.push((id.to_string(), ParamValue::Color(rgb)));
        self
    }

    pub fn choice(mut self, id: &str, value: &str) -> Self {
        self.params
            .push((id.to_string(), ParamValue::Choice(value.to_string())));
        self
    }

    pub fn flag(mut self, id: &str, value: bool) -> Self {
        self.params.push((id.to_string(), ParamValue::Bool(value)));
        self
    }

    pub fn build(self) -> AppliedEffect {
        AppliedEffect::new(&self.effect_id, self.params)
    }
}

/// Builder for sessions with a fixture original.
pub struct SessionBuilder {
    name: String,
    original: RasterBuffer,
}

impl SessionBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            original: fixtures::gradient(32, 32),
        }
    }

    pub fn original(mut self, buffer: RasterBuffer) -> Self {
        self.original = buffer;
        self
    }

    pub fn midgray(mut self, width: u32, height: u32) -> Self {
        self.original = fixtures::midgray(width, height);
        self
    }

    pub fn build(self) -> EditSession {
        EditSession::new(self.name, self.original)
    }
}
