//! Shared types for the pro-shop API
//!
//! Domain models, the unified error system, response payload helpers and
//! pricing logic used by the server and its tests.

pub mod error;
pub mod models;
pub mod pricing;
pub mod response;
pub mod util;

pub use http;
