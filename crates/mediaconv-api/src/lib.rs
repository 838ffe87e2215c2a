//! Mediaconv API Library
//!
//! HTTP handlers, middleware and application setup for the conversion service.

mod api_doc;
pub mod constants;
mod handlers;
mod telemetry;
mod utils;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use error::ErrorResponse;
