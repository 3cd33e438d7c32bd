pub mod conversation;
pub mod enums;
pub mod image;
pub mod visualization;

pub use conversation::*;
pub use enums::*;
pub use image::*;
pub use visualization::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid {field} value: {value:?}")]
    InvalidEnum { field: String, value: String },
}
