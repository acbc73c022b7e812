//! Strategy implementations

pub mod console;
pub mod email;
pub mod file;

pub use console::{ConsoleStrategy, ConsoleTarget};
pub use email::EmailStrategy;
pub use file::FileStrategy;

pub use crate::core::Strategy;
