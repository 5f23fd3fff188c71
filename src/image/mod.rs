pub mod i32;
pub mod io;
pub mod traits;

pub use self::i32::ImageI32;
pub use self::traits::{ImageView, ImageViewMut, Rows};
