//! API middleware: CORS, request logging, cache suppression, validation.

pub mod cors;
pub mod logging;
pub mod no_store;
pub mod validation;

pub use cors::cors_layer;
pub use logging::logging_layer;
pub use no_store::no_store_layer;
pub use validation::validate_not_empty;
