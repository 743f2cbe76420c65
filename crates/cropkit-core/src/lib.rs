//! Cropkit Core - Interactive image cropping engine
//!
//! This crate provides the platform independent part of an image crop
//! screen: crop shapes, the pan/zoom transform with boundary clamping,
//! snap-back animation, rasterizing the committed crop, and decoding and
//! encoding the bitmaps at either end.
//!
//! A [`CropSession`] ties it together. Feed it gesture events, draw the
//! [`PreviewFrame`]s it returns, and commit to get the output [`Bitmap`].

pub mod config;
pub mod decode;
pub mod encode;
pub mod geometry;
pub mod render;
pub mod session;
pub mod shape;
pub mod transform;

pub use config::CropConfig;
pub use decode::{decode_image, Bitmap, DecodeError};
pub use geometry::{fill_size, Offset, Placement, Size};
pub use render::{render, InterpolationFilter, RenderError, RenderOptions};
pub use session::{
    CropError, CropSession, PreviewFrame, RenderJob, RenderOutcome, SessionState, SessionUpdate,
};
pub use shape::{default_options, ClipMask, CropShape, ShapeSizes};
pub use transform::{GestureEvent, SnapEvent, TransformState};
