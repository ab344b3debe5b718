// Application layer: configuration and the journal book service.
// The domain stays pure; everything that keeps state between calls or
// logs lives here.

pub mod config;
pub mod error;
pub mod service;

pub use config::*;
pub use error::*;
pub use service::*;
