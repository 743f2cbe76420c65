//! Encoding crop output for export.
//!
//! - PNG keeps the alpha channel, so circle crops stay round
//! - JPEG flattens alpha over a caller chosen background
//!
//! # Examples
//!
//! ```ignore
//! use cropkit_core::encode::{encode_jpeg, encode_png};
//!
//! let png = encode_png(&output).unwrap();
//! let jpeg = encode_jpeg(&output, 90, [255, 255, 255]).unwrap();
//! ```

mod error;
mod jpeg;
mod png;

pub use error::EncodeError;
pub use jpeg::encode_jpeg;
pub use png::encode_png;
