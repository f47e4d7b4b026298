//! Mathgen Service
//!
//! Runs the question generation pipeline behind an HTTP API, with
//! configuration loaded from `mathgen.json`.

pub mod api;
pub mod config;
pub mod error;
pub mod pipeline;

pub use api::{create_router, AppState, ErrorResponse, RootResponse, SERVICE_BANNER};
pub use config::Config;
pub use error::{MathGenError, Result};
pub use pipeline::Pipeline;
