//! Application layer services implementing the short-code lifecycle.
//!
//! Services consume the repository trait and the code generator and expose a
//! small API to the HTTP dispatcher and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation, resolution and maintenance

pub mod services;
