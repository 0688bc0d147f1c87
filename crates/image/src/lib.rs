//! Pixel handling for the mask-detect pipeline.
//!
//! Camera frames arrive as YUV 4:2:0 planes (`RawFrame`). `FrameConverter`
//! turns them into packed RGBA with BT.601 and applies the crop and rotation
//! that make them upright (`OrientedImage`). `Image` is the owned form used
//! for previews and snapshots.

pub mod buffer;
pub mod converter;
pub mod error;
pub mod frame;
pub mod image;
pub mod orientation;
pub mod pixelformat;
pub mod yuv;

pub use buffer::*;
pub use converter::*;
pub use error::ImageError;
pub use frame::*;
pub use image::Image;
pub use orientation::*;
pub use pixelformat::*;
pub use yuv::*;
