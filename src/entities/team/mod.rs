//! Team entity module

pub mod handlers;
pub mod model;

pub use handlers::*;
pub use model::Team;
