//! Domain models

mod article;

pub use article::*;
