pub mod animation;
pub mod error;
pub mod still;
pub mod video;

pub use animation::{encode_gif, GifConfig};
pub use error::{ExportError, Result};
pub use still::{decode_image, encode_still};
pub use video::{build_export_request, MovMuxer, VideoExportRequest, VideoExportResponse};
