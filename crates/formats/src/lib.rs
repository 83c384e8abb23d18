pub mod convert;
pub mod manifest;
pub mod package;

pub use convert::*;
pub use manifest::*;
pub use package::*;
