//! The built-in effect catalog. Each module holds the `PixelEffect`
//! implementations for one family of algorithms.

pub mod convolve;
pub mod dehaze;
pub mod duotone;
pub mod grain;
pub mod halftone;
pub mod kaleidoscope;
pub mod overlay;
pub mod tone;

pub(crate) mod noise;
