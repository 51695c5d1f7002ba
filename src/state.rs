//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::domain::repositories::LinkRepository;
use crate::utils::code_generator::CodeGenerator;

/// Link service over type-erased store and generator, as held by [`AppState`].
pub type DynLinkService = LinkService<dyn LinkRepository, dyn CodeGenerator>;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<DynLinkService>,
}

impl AppState {
    pub fn new(link_service: Arc<DynLinkService>) -> Self {
        Self { link_service }
    }
}
