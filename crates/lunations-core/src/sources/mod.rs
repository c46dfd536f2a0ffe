//! Search sources for fetching articles from online databases

pub mod ads;
pub mod traits;

pub use ads::*;
pub use traits::*;
