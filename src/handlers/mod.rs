//! HTTP request handlers

pub mod health;
pub mod operation;
pub mod token;
pub mod types;

pub use health::*;
pub use operation::*;
pub use token::*;
pub use types::*;
