//! Shared types.

mod response;

pub use response::{Created, MessageResponse, NoContent};
