pub mod io;
pub mod rgba;
pub mod traits;

pub use self::rgba::{sample_index, validate_shape, RgbaImage, RgbaView, ALPHA, CHANNELS};
pub use self::traits::{ImageView, ImageViewMut, Rows};
