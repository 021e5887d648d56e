//! Concrete handler implementations

pub mod file;
pub mod null;
pub mod stream;

pub use file::FileHandler;
pub use null::NullHandler;
pub use stream::StreamHandler;

pub use crate::core::handler::Handler;
