//! In-memory implementation of link repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::{NewLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Link store backed by a process-local map.
///
/// Uniqueness is enforced under the write lock, so two concurrent inserts of
/// the same code behave like a primary-key violation: one wins, the other
/// gets [`AppError::Conflict`]. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: RwLock<HashMap<String, ShortLink>>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        debug!("Using in-memory link store");
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.links.read().await.get(code).cloned())
    }

    async fn insert(&self, new_link: NewLink) -> Result<ShortLink, AppError> {
        let mut links = self.links.write().await;

        match links.entry(new_link.code) {
            Entry::Occupied(entry) => Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_pkey", "code": entry.key() }),
            )),
            Entry::Vacant(entry) => {
                let link = ShortLink::new(entry.key().clone(), new_link.long_url, Utc::now());
                entry.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn update(&self, code: &str, long_url: &str) -> Result<ShortLink, AppError> {
        let mut links = self.links.write().await;

        let link = links
            .get_mut(code)
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))?;
        link.long_url = long_url.to_string();

        Ok(link.clone())
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.write().await.remove(code).is_some())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.links.read().await.len() as i64)
    }
}
