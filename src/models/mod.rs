pub mod analysis;
pub mod image;
pub mod option;
pub mod request;
pub mod result;

pub use analysis::*;
pub use image::*;
pub use option::*;
pub use request::*;
pub use result::*;
