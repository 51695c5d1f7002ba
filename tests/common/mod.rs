#![allow(dead_code)]

use axum_test::TestServer;
use std::sync::Arc;
use short_url::application::services::LinkServiceSettings;
use short_url::domain::repositories::LinkRepository;
use short_url::infrastructure::persistence::InMemoryLinkRepository;
use short_url::routes::app_router;
use short_url::server::build_state;
use short_url::state::AppState;

pub fn create_test_state() -> AppState {
    create_test_state_with(Arc::new(InMemoryLinkRepository::new()))
}

pub fn create_test_state_with(link_repository: Arc<dyn LinkRepository>) -> AppState {
    build_state(link_repository, LinkServiceSettings::default())
}

pub fn create_test_server() -> TestServer {
    create_test_server_with(create_test_state())
}

pub fn create_test_server_with(state: AppState) -> TestServer {
    TestServer::new(app_router(state)).unwrap()
}

/// Shortens `url` through the HTTP surface and returns the decoded code.
pub async fn shorten(server: &TestServer, url: &str) -> String {
    let response = server.get(&format!("/shorten?url={}", url)).await;
    response.assert_status_ok();
    serde_json::from_str::<String>(&response.text()).unwrap()
}
