//! Core module containing the error taxonomy, auth gate, extractors,
//! validation helpers and the store trait

pub mod auth;
pub mod error;
pub mod extractors;
pub mod service;
pub mod validation;

pub use auth::{Authenticated, Claims, JwtVerifier};
pub use error::{ApiError, Dependent, FieldValidationError, StorageError, ValidationError};
pub use extractors::ApiJson;
pub use service::AgencyStore;
