//! Pure helpers used by the engine and the HTTP layer.
//!
//! - [`validator`] - Short code and long URL shape checks
//! - [`code_generator`] - Random short code generation

pub mod code_generator;
pub mod validator;
