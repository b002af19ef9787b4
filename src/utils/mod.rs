pub mod logger;
pub mod text;

pub use logger::*;
pub use text::*;
