//! Server module.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod dto;
pub mod errors;
mod handlers;
mod health;
pub mod metrics;
pub mod server;
#[cfg(test)]
mod tests;

pub use errors::{Result, ServerError};
