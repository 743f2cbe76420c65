//! Turning picked image data into a [`Bitmap`].
//!
//! The crop engine itself only consumes decoded bitmaps. This module is the
//! default bridge from raw file bytes (JPEG, PNG) to that form, with EXIF
//! orientation applied so the image is shown upright.
//!
//! # Examples
//!
//! ```ignore
//! use cropkit_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let bitmap = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", bitmap.width, bitmap.height);
//! ```

mod reader;
mod types;

pub use reader::{decode_image, get_orientation};
pub use types::{Bitmap, DecodeError, Orientation, CHANNELS};

pub(crate) use types::buffer_len;
