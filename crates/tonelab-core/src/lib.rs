pub mod buffer;
pub mod colorspace;
pub mod effect;
pub mod effects;
pub mod engine;
pub mod error;
pub mod history;
pub mod params;
pub mod preview;
pub mod registry;
pub mod renderer;
pub mod session;

pub use buffer::RasterBuffer;
pub use effect::{AppliedEffect, EffectCategory, PixelEffect};
pub use error::{CoreError, Result};
pub use history::{EditHistory, HistoryEntry};
pub use params::{ControlKind, ParamValue, ParameterSpec, ResolvedParams};
pub use registry::EffectRegistry;
pub use session::{EditSession, SessionRecipe, CURRENT_RECIPE_VERSION};
