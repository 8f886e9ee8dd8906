//! Domain layer: the report model and the pure rules applied to it.

pub mod models;
pub mod validation;
pub mod calendar;
pub mod errors;

pub use models::*;
pub use validation::*;
pub use calendar::*;
pub use errors::*;
