use serde::{Deserialize, Serialize};

/// The UI control backing a parameter, with any numeric bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControlKind {
    Slider { min: f64, max: f64, step: f64 },
    Color,
    Select { options: Vec<(String, String)> },
    Checkbox,
    Range { min: f64, max: f64, step: f64 },
}

/// Declarative description of one effect parameter. Defined once per
/// effect; the complete list is the engine/caller contract. No effect
/// reads parameters outside its declared set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub id: String,
    pub label: String,
    pub kind: ControlKind,
    pub default: ParamValue,
}

impl ParameterSpec {
    pub fn slider(id: &str, label: &str, min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: ControlKind::Slider { min, max, step },
            default: ParamValue::Number(default),
        }
    }

    pub fn color(id: &str, label: &str, default: [u8; 3]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: ControlKind::Color,
            default: ParamValue::Color(default),
        }
    }

    pub fn select(id: &str, label: &str, options: &[(&str, &str)], default: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: ControlKind::Select {
                options: options
                    .iter()
                    .map(|(v, l)| (v.to_string(), l.to_string()))
                    .collect(),
            },
            default: ParamValue::Choice(default.to_string()),
        }
    }

    pub fn checkbox(id: &str, label: &str, default: bool) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: ControlKind::Checkbox,
            default: ParamValue::Bool(default),
        }
    }

    pub fn range(id: &str, label: &str, min: f64, max: f64, step: f64, default: [f64; 2]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: ControlKind::Range { min, max, step },
            default: ParamValue::Span(default),
        }
    }
}

/// A concrete parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Number(f64),
    Color([u8; 3]),
    Choice(String),
    Bool(bool),
    /// Two-handle range, low then high.
    Span([f64; 2]),
}

// Manual Eq impl: f64 doesn't impl Eq, but AppliedEffect derives Eq.
// Parameter values are always finite after resolution.
impl Eq for ParamValue {}

/// Effect parameters after resolution against a spec list: every declared
/// parameter is present, numbers are clamped to their bounds, choices are
/// guaranteed to be one of the declared options.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParams {
    values: Vec<(String, ParamValue)>,
}

impl ResolvedParams {
    pub fn number(&self, id: &str) -> f64 {
        match self.get(id) {
            Some(ParamValue::Number(n)) => *n,
            _ => 0.0,
        }
    }

    pub fn color(&self, id: &str) -> [u8; 3] {
        match self.get(id) {
            Some(ParamValue::Color(c)) => *c,
            _ => [0, 0, 0],
        }
    }

    pub fn choice(&self, id: &str) -> &str {
        match self.get(id) {
            Some(ParamValue::Choice(c)) => c,
            _ => "",
        }
    }

    pub fn flag(&self, id: &str) -> bool {
        matches!(self.get(id), Some(ParamValue::Bool(true)))
    }

    pub fn span(&self, id: &str) -> [f64; 2] {
        match self.get(id) {
            Some(ParamValue::Span(s)) => *s,
            _ => [0.0, 0.0],
        }
    }

    fn get(&self, id: &str) -> Option<&ParamValue> {
        self.values
            .iter()
            .find(|(n, _)| n == id)
            .map(|(_, v)| v)
    }
}

/// Resolve supplied values against the declared parameter specs.
///
/// For each spec: an explicit value of the matching kind wins, otherwise
/// the default applies. Numbers are clamped to `[min, max]` and never
/// passed through unclamped, since effects use them as loop bounds and
/// sample offsets. Choices outside the option list fall back to the default.
/// Supplied ids with no matching spec are ignored.
pub fn resolve_params(specs: &[ParameterSpec], supplied: &[(String, ParamValue)]) -> ResolvedParams {
    let values = specs
        .iter()
        .map(|spec| {
            let supplied_value = supplied
                .iter()
                .find(|(id, _)| *id == spec.id)
                .map(|(_, v)| v);
            (spec.id.clone(), resolve_one(spec, supplied_value))
        })
        .collect();
    ResolvedParams { values }
}

fn resolve_one(spec: &ParameterSpec, supplied: Option<&ParamValue>) -> ParamValue {
    match (&spec.kind, supplied) {
        (ControlKind::Slider { min, max, .. }, Some(ParamValue::Number(n))) => {
            let n = if n.is_finite() { *n } else { default_number(spec) };
            ParamValue::Number(n.clamp(*min, *max))
        }
        (ControlKind::Color, Some(ParamValue::Color(c))) => ParamValue::Color(*c),
        (ControlKind::Select { options }, Some(ParamValue::Choice(c)))
            if options.iter().any(|(v, _)| v == c) =>
        {
            ParamValue::Choice(c.clone())
        }
        (ControlKind::Checkbox, Some(ParamValue::Bool(b))) => ParamValue::Bool(*b),
        (ControlKind::Range { min, max, .. }, Some(ParamValue::Span([lo, hi]))) => {
            let lo = lo.clamp(*min, *max);
            let hi = hi.clamp(*min, *max);
            ParamValue::Span([lo.min(hi), lo.max(hi)])
        }
        // Wrong type or nothing supplied: fall back to the declared default.
        _ => spec.default.clone(),
    }
}

fn default_number(spec: &ParameterSpec) -> f64 {
    match spec.default {
        ParamValue::Number(n) => n,
        _ => 0.0,
    }
}

/// The default value of every declared parameter, in declaration order.
pub fn default_params(specs: &[ParameterSpec]) -> Vec<(String, ParamValue)> {
    specs
        .iter()
        .map(|spec| (spec.id.clone(), spec.default.clone()))
        .collect()
}
