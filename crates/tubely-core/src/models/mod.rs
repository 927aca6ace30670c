pub mod orientation;
pub mod video;

pub use orientation::{Dimensions, Orientation};
pub use video::{Video, VideoResponse};
