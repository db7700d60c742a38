//! Request handlers for answer operations.

mod count;
mod download;
mod upload;

pub use count::*;
pub use download::*;
pub use upload::*;
