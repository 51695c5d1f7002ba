//! Short link creation and resolution.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{NewLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::validator::{validate_and_normalize_long_url, validate_code};

/// Default number of candidate codes tried before giving up.
pub const DEFAULT_MAX_CODE_ATTEMPTS: usize = 10;

/// Default per-call store timeout.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for [`LinkService`].
#[derive(Debug, Clone, Copy)]
pub struct LinkServiceSettings {
    /// Candidate codes tried per create before failing with
    /// [`AppError::GenerationExhausted`].
    pub max_code_attempts: usize,
    /// Upper bound for each individual store round-trip.
    pub store_timeout: Duration,
}

impl Default for LinkServiceSettings {
    fn default() -> Self {
        Self {
            max_code_attempts: DEFAULT_MAX_CODE_ATTEMPTS,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

/// Orchestrates validation, code generation and the store.
///
/// Holds no per-request state; every call takes and returns explicit values,
/// so one instance is shared by all requests.
pub struct LinkService<L: LinkRepository + ?Sized, G: CodeGenerator + ?Sized> {
    link_repository: Arc<L>,
    code_generator: Arc<G>,
    settings: LinkServiceSettings,
}

impl<L: LinkRepository + ?Sized, G: CodeGenerator + ?Sized> LinkService<L, G> {
    /// Creates a new link service with default settings.
    pub fn new(link_repository: Arc<L>, code_generator: Arc<G>) -> Self {
        Self {
            link_repository,
            code_generator,
            settings: LinkServiceSettings::default(),
        }
    }

    /// Replaces the service settings.
    pub fn with_settings(mut self, settings: LinkServiceSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &LinkServiceSettings {
        &self.settings
    }

    /// Creates a short link for `long_url`.
    ///
    /// # Flow
    ///
    /// 1. Validate and normalize the URL (`http://` is prepended when it has no scheme)
    /// 2. Draw a candidate code and skip it if it is malformed or already stored
    /// 3. Insert; a uniqueness violation counts as a collision and the loop continues
    /// 4. Read the record back to confirm it is resolvable
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL is empty or too long
    /// - [`AppError::GenerationExhausted`] if every attempt collided
    /// - [`AppError::Consistency`] if the inserted record cannot be read back
    /// - [`AppError::Unavailable`], [`AppError::Timeout`] or [`AppError::Internal`] from the store
    pub async fn create_short_link(&self, long_url: &str) -> Result<ShortLink, AppError> {
        let normalized = validate_and_normalize_long_url(long_url).map_err(|e| {
            debug!("Rejected long URL: {}", e);
            AppError::bad_request("Invalid long URL", json!({ "reason": e.to_string() }))
        })?;

        let attempts = self.settings.max_code_attempts;

        for attempt in 1..=attempts {
            let code = self.code_generator.generate();

            if !validate_code(&code) {
                warn!(attempt, code = %code, "Generator produced a malformed code");
                continue;
            }

            if self
                .timed("find_by_code", self.link_repository.find_by_code(&code))
                .await?
                .is_some()
            {
                warn!(attempt, code = %code, "Code collision on lookup, retrying");
                continue;
            }

            let new_link = NewLink::new(code.clone(), normalized.as_str());
            match self
                .timed("insert", self.link_repository.insert(new_link))
                .await
            {
                Ok(_) => {}
                Err(AppError::Conflict { .. }) => {
                    warn!(attempt, code = %code, "Code collision on insert, retrying");
                    continue;
                }
                Err(e) => return Err(e),
            }

            let stored = self
                .timed("read_back", self.link_repository.find_by_code(&code))
                .await?;

            return match stored {
                Some(link) if !link.long_url.is_empty() => {
                    info!(code = %link.code, "Short link created");
                    Ok(link)
                }
                _ => {
                    error!(code = %code, "Inserted short link could not be read back");
                    Err(AppError::consistency(
                        "Short link was not readable after insert",
                        json!({ "code": code }),
                    ))
                }
            };
        }

        error!(
            attempts,
            "Exhausted code generation attempts; code space saturated or generator degenerate"
        );
        Err(AppError::GenerationExhausted { attempts })
    }

    /// Resolves a code to its stored link. The long URL is returned as stored.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if `code` is not a well-formed code
    /// - [`AppError::NotFound`] if no link has this code
    /// - [`AppError::Unavailable`], [`AppError::Timeout`] or [`AppError::Internal`] from the store
    pub async fn resolve_short_link(&self, code: &str) -> Result<ShortLink, AppError> {
        if !validate_code(code) {
            debug!(code = %code, "Rejected malformed code");
            return Err(AppError::bad_request(
                "Invalid short code",
                json!({ "code": code }),
            ));
        }

        self.timed("find_by_code", self.link_repository.find_by_code(code))
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    /// Points an existing code at a new long URL.
    ///
    /// Not reachable over HTTP; used by the admin CLI.
    pub async fn update_short_link(
        &self,
        code: &str,
        long_url: &str,
    ) -> Result<ShortLink, AppError> {
        if !validate_code(code) {
            return Err(AppError::bad_request(
                "Invalid short code",
                json!({ "code": code }),
            ));
        }

        let normalized = validate_and_normalize_long_url(long_url).map_err(|e| {
            AppError::bad_request("Invalid long URL", json!({ "reason": e.to_string() }))
        })?;

        let link = self
            .timed(
                "update",
                self.link_repository.update(code, normalized.as_str()),
            )
            .await?;
        info!(code = %code, "Short link updated");

        Ok(link)
    }

    /// Deletes a code. Returns `false` if it did not exist.
    ///
    /// Not reachable over HTTP; used by the admin CLI.
    pub async fn delete_short_link(&self, code: &str) -> Result<bool, AppError> {
        if !validate_code(code) {
            return Err(AppError::bad_request(
                "Invalid short code",
                json!({ "code": code }),
            ));
        }

        let deleted = self
            .timed("delete_by_code", self.link_repository.delete_by_code(code))
            .await?;
        if deleted {
            info!(code = %code, "Short link deleted");
        }

        Ok(deleted)
    }

    /// Counts stored links. Doubles as the store health probe.
    pub async fn count_links(&self) -> Result<i64, AppError> {
        self.timed("count", self.link_repository.count()).await
    }

    /// Runs a store call under the configured timeout.
    async fn timed<T, F>(&self, operation: &'static str, call: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        let timeout = self.settings.store_timeout;

        match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                error!(operation, timeout_ms = timeout.as_millis() as u64, "Store call timed out");
                Err(AppError::Timeout {
                    operation,
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::persistence::InMemoryLinkRepository;
    use crate::utils::code_generator::{MockCodeGenerator, RandomCodeGenerator};
    use crate::utils::validator::MAX_URL_LENGTH;
    use async_trait::async_trait;
    use chrono::Utc;

    fn stored(code: &str, url: &str) -> ShortLink {
        ShortLink::new(code.to_string(), url.to_string(), Utc::now())
    }

    fn fixed_generator(codes: &'static [&'static str]) -> MockCodeGenerator {
        let mut generator = MockCodeGenerator::new();
        let mut next: usize = 0;
        generator.expect_generate().returning(move || {
            let code = codes[next.min(codes.len() - 1)];
            next += 1;
            code.to_string()
        });
        generator
    }

    fn settings(max_code_attempts: usize) -> LinkServiceSettings {
        LinkServiceSettings {
            max_code_attempts,
            store_timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn test_create_short_link_success() {
        let mut mock_repo = MockLinkRepository::new();

        let mut lookups = 0;
        mock_repo
            .expect_find_by_code()
            .times(2)
            .returning(move |code| {
                lookups += 1;
                if lookups == 1 {
                    Ok(None)
                } else {
                    Ok(Some(stored(code, "http://example.com")))
                }
            });

        mock_repo
            .expect_insert()
            .withf(|new_link| {
                new_link.code == "abcd1234" && new_link.long_url == "http://example.com"
            })
            .times(1)
            .returning(|new_link| Ok(stored(&new_link.code, &new_link.long_url)));

        let service = LinkService::new(
            Arc::new(mock_repo),
            Arc::new(fixed_generator(&["abcd1234"])),
        );

        let link = service.create_short_link("example.com").await.unwrap();

        assert_eq!(link.code, "abcd1234");
        assert_eq!(link.long_url, "http://example.com");
    }

    #[tokio::test]
    async fn test_create_short_link_invalid_url_never_touches_store() {
        let service = LinkService::new(
            Arc::new(MockLinkRepository::new()),
            Arc::new(MockCodeGenerator::new()),
        );

        let result = service.create_short_link("").await;
        assert!(matches!(result, Err(AppError::Validation { .. })));

        let too_long = "a".repeat(MAX_URL_LENGTH + 1);
        let result = service.create_short_link(&too_long).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_short_link_retries_on_lookup_collision() {
        let repo = Arc::new(InMemoryLinkRepository::new());
        repo.insert(NewLink::new("taken123", "https://first.com"))
            .await
            .unwrap();

        let service = LinkService::new(
            repo.clone(),
            Arc::new(fixed_generator(&["taken123", "fresh123"])),
        );

        let link = service.create_short_link("https://second.com").await.unwrap();

        assert_eq!(link.code, "fresh123");
        let first = repo.find_by_code("taken123").await.unwrap().unwrap();
        assert_eq!(first.long_url, "https://first.com");
    }

    #[tokio::test]
    async fn test_create_short_link_retries_on_insert_conflict() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo.expect_find_by_code().returning(|code| {
            if code == "fresh123" {
                // Only the read-back of the winning code finds a record.
                Ok(Some(stored(code, "https://race.com")))
            } else {
                Ok(None)
            }
        });

        let mut inserts = 0;
        mock_repo
            .expect_insert()
            .times(2)
            .returning(move |new_link| {
                inserts += 1;
                if inserts == 1 {
                    Err(AppError::conflict("Unique constraint violation", json!({})))
                } else {
                    Ok(stored(&new_link.code, &new_link.long_url))
                }
            });

        let service = LinkService::new(
            Arc::new(mock_repo),
            Arc::new(fixed_generator(&["raced123", "fresh123"])),
        );

        let link = service.create_short_link("https://race.com").await.unwrap();
        assert_eq!(link.code, "fresh123");
    }

    #[tokio::test]
    async fn test_create_short_link_exhausts_attempts() {
        let repo = Arc::new(InMemoryLinkRepository::new());
        repo.insert(NewLink::new("taken123", "https://first.com"))
            .await
            .unwrap();

        let service = LinkService::new(repo.clone(), Arc::new(fixed_generator(&["taken123"])))
            .with_settings(settings(3));

        let result = service.create_short_link("https://second.com").await;

        assert!(matches!(
            result,
            Err(AppError::GenerationExhausted { attempts: 3 })
        ));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_malformed_generated_code_is_skipped() {
        let service = LinkService::new(
            Arc::new(InMemoryLinkRepository::new()),
            Arc::new(fixed_generator(&["bad", "good1234"])),
        );

        let link = service.create_short_link("https://example.com").await.unwrap();
        assert_eq!(link.code, "good1234");
    }

    #[tokio::test]
    async fn test_create_short_link_read_back_missing_is_consistency_failure() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_find_by_code().returning(|_| Ok(None));
        mock_repo
            .expect_insert()
            .times(1)
            .returning(|new_link| Ok(stored(&new_link.code, &new_link.long_url)));

        let service = LinkService::new(
            Arc::new(mock_repo),
            Arc::new(fixed_generator(&["abcd1234"])),
        );

        let result = service.create_short_link("https://example.com").await;
        assert!(matches!(result, Err(AppError::Consistency { .. })));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_code()
            .returning(|_| Err(AppError::unavailable("Database unavailable", json!({}))));
        mock_repo.expect_insert().times(0);

        let service = LinkService::new(
            Arc::new(mock_repo),
            Arc::new(fixed_generator(&["abcd1234"])),
        );

        let result = service.create_short_link("https://example.com").await;
        assert!(matches!(result, Err(AppError::Unavailable { .. })));

        let result = service.resolve_short_link("abcd1234").await;
        assert!(matches!(result, Err(AppError::Unavailable { .. })));
    }

    struct SlowRepository;

    #[async_trait]
    impl LinkRepository for SlowRepository {
        async fn find_by_code(&self, _code: &str) -> Result<Option<ShortLink>, AppError> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(None)
        }

        async fn insert(&self, new_link: NewLink) -> Result<ShortLink, AppError> {
            Ok(stored(&new_link.code, &new_link.long_url))
        }

        async fn update(&self, code: &str, long_url: &str) -> Result<ShortLink, AppError> {
            Ok(stored(code, long_url))
        }

        async fn delete_by_code(&self, _code: &str) -> Result<bool, AppError> {
            Ok(false)
        }

        async fn count(&self) -> Result<i64, AppError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_slow_store_times_out() {
        let service = LinkService::new(Arc::new(SlowRepository), Arc::new(RandomCodeGenerator))
            .with_settings(LinkServiceSettings {
                max_code_attempts: 10,
                store_timeout: Duration::from_millis(20),
            });

        let result = service.resolve_short_link("abcd1234").await;

        assert!(matches!(
            result,
            Err(AppError::Timeout {
                operation: "find_by_code",
                timeout_ms: 20
            })
        ));
    }

    #[tokio::test]
    async fn test_resolve_short_link() {
        let repo = Arc::new(InMemoryLinkRepository::new());
        repo.insert(NewLink::new("abcd1234", "https://example.com/x"))
            .await
            .unwrap();
        let service = LinkService::new(repo, Arc::new(RandomCodeGenerator));

        let link = service.resolve_short_link("abcd1234").await.unwrap();
        assert_eq!(link.long_url, "https://example.com/x");
    }

    #[tokio::test]
    async fn test_resolve_unknown_code_is_not_found() {
        let service = LinkService::new(
            Arc::new(InMemoryLinkRepository::new()),
            Arc::new(RandomCodeGenerator),
        );

        let result = service.resolve_short_link("ZZZZZZZZ").await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_resolve_malformed_code_is_rejected() {
        let service = LinkService::new(
            Arc::new(MockLinkRepository::new()),
            Arc::new(RandomCodeGenerator),
        );

        let result = service.resolve_short_link("abc").await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_round_trip_normalizes_scheme() {
        let service = LinkService::new(
            Arc::new(InMemoryLinkRepository::new()),
            Arc::new(RandomCodeGenerator),
        );

        let created = service.create_short_link("www.rust-lang.org").await.unwrap();
        assert_eq!(created.code.len(), 8);

        let resolved = service.resolve_short_link(&created.code).await.unwrap();
        assert_eq!(resolved.long_url, "http://www.rust-lang.org");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = Arc::new(InMemoryLinkRepository::new());
        repo.insert(NewLink::new("abcd1234", "https://old.com"))
            .await
            .unwrap();
        let service = LinkService::new(repo, Arc::new(RandomCodeGenerator));

        let updated = service
            .update_short_link("abcd1234", "new.com")
            .await
            .unwrap();
        assert_eq!(updated.long_url, "http://new.com");

        let result = service.update_short_link("abcd1234", "").await;
        assert!(matches!(result, Err(AppError::Validation { .. })));

        assert!(service.delete_short_link("abcd1234").await.unwrap());
        assert!(!service.delete_short_link("abcd1234").await.unwrap());
        assert_eq!(service.count_links().await.unwrap(), 0);
    }
}
