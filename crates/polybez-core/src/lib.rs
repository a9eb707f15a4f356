pub mod error;
pub mod tolerance;
pub mod traits;

pub use error::{Error, Result};
pub use tolerance::Tolerance;
pub use traits::Curve;
