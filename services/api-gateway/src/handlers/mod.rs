pub mod bom;
pub mod health;
pub mod upload;

pub use bom::*;
pub use health::*;
pub use upload::*;
