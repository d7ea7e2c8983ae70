//! Adapter seam for GPU-backed effects. Shader compilation itself lives
//! behind `ShaderRenderer`; the core only sees buffers in and buffers out.

use std::sync::Arc;

use crate::buffer::RasterBuffer;
use crate::effect::{EffectCategory, PixelEffect};
use crate::error::{CoreError, Result};
use crate::params::{ParameterSpec, ResolvedParams};

/// A backend capable of running a fragment shader over a buffer.
pub trait ShaderRenderer: Send + Sync {
    fn render(
        &self,
        input: &RasterBuffer,
        fragment_source: &str,
        uniforms: &[(String, f64)],
    ) -> Result<RasterBuffer>;
}

/// CPU fallback that ignores the shader and returns the input unchanged.
/// Used in tests and wherever no GPU backend is wired up.
pub struct PassthroughRenderer;

impl ShaderRenderer for PassthroughRenderer {
    fn render(
        &self,
        input: &RasterBuffer,
        _fragment_source: &str,
        _uniforms: &[(String, f64)],
    ) -> Result<RasterBuffer> {
        Ok(input.clone())
    }
}

/// Wraps a renderer, a fragment source, and a parameter schema into a
/// `PixelEffect`, so GPU effects register like any built-in. Numeric
/// parameters are forwarded as uniforms under their parameter ids.
pub struct ShaderEffect {
    id: String,
    display_name: String,
    category: EffectCategory,
    parameters: Vec<ParameterSpec>,
    fragment_source: String,
    renderer: Arc<dyn ShaderRenderer>,
}

impl ShaderEffect {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        category: EffectCategory,
        parameters: Vec<ParameterSpec>,
        fragment_source: impl Into<String>,
        renderer: Arc<dyn ShaderRenderer>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            category,
            parameters,
            fragment_source: fragment_source.into(),
            renderer,
        }
    }
}

impl PixelEffect for ShaderEffect {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn category(&self) -> EffectCategory {
        self.category
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        self.parameters.clone()
    }

    fn apply(&self, input: RasterBuffer, params: &ResolvedParams) -> Result<RasterBuffer> {
        let uniforms: Vec<(String, f64)> = self
            .parameters
            .iter()
            .filter(|spec| matches!(spec.default, crate::params::ParamValue::Number(_)))
            .map(|spec| (spec.id.clone(), params.number(&spec.id)))
            .collect();
        self.renderer
            .render(&input, &self.fragment_source, &uniforms)
            .map_err(|err| CoreError::ProcessingFailure {
                effect: self.id.clone(),
                reason: err.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::EffectRegistry;

    fn shader_effect(renderer: Arc<dyn ShaderRenderer>) -> ShaderEffect {
        ShaderEffect::new(
            "gpu_bloom",
            "Bloom",
            EffectCategory::Creative,
            vec![ParameterSpec::slider(
                "threshold",
                "Threshold",
                0.0,
                1.0,
                0.01,
                0.8,
            )],
            "void main() {}",
            renderer,
        )
    }

    #[test]
    fn test_passthrough_returns_input() {
        let effect = shader_effect(Arc::new(PassthroughRenderer));
        let buf = RasterBuffer::filled(2, 2, [10, 20, 30]);
        let params = crate::params::resolve_params(&effect.parameters(), &[]);
        let out = effect.apply(buf.clone(), &params).unwrap();
        assert_eq!(out, buf);
    }

    #[test]
    fn test_shader_effect_registers() {
        let mut registry = EffectRegistry::with_builtins();
        registry
            .try_register(Box::new(shader_effect(Arc::new(PassthroughRenderer))))
            .unwrap();
        assert!(registry.get("gpu_bloom").is_some());
    }

    struct FailingRenderer;

    impl ShaderRenderer for FailingRenderer {
        fn render(
            &self,
            _input: &RasterBuffer,
            _fragment_source: &str,
            _uniforms: &[(String, f64)],
        ) -> Result<RasterBuffer> {
            Err(CoreError::ProcessingFailure {
                effect: "backend".to_string(),
                reason: "context lost".to_string(),
            })
        }
    }

    #[test]
    fn test_renderer_failure_maps_to_processing_failure() {
        let effect = shader_effect(Arc::new(FailingRenderer));
        let buf = RasterBuffer::filled(2, 2, [0, 0, 0]);
        let params = crate::params::resolve_params(&effect.parameters(), &[]);
        let err = effect.apply(buf, &params).unwrap_err();
        assert!(matches!(err, CoreError::ProcessingFailure { effect, .. } if effect == "gpu_bloom"));
    }
}
