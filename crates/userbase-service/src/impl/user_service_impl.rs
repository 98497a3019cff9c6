//! Read-through / write-through user service.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::CreateUserRequest;
use crate::metrics;
use crate::user_service::UserService;
use async_trait::async_trait;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};
use userbase_config::CacheWritePolicy;
use userbase_core::{
    NewUser, RequestContext, User, UserId, UserbaseError, UserbaseResult, ValidateExt,
};
use userbase_repository::UserRepository;

/// User service coordinating the cache and the durable store.
///
/// Holds no mutable state; concurrent requests share one instance.
#[derive(Component)]
#[shaku(interface = UserService)]
pub struct UserServiceImpl {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    /// Namespace of every cache key.
    #[shaku(default = cache_keys::DEFAULT_PREFIX.to_string())]
    key_prefix: String,
    /// Handling of a failed cache write after an insert.
    #[shaku(default)]
    create_write_policy: CacheWritePolicy,
}

impl UserServiceImpl {
    /// Creates a new user service with the default key prefix and the
    /// strict create policy.
    pub fn new(user_repository: Arc<dyn UserRepository>, cache: Arc<dyn CacheInterface>) -> Self {
        Self {
            user_repository,
            cache,
            key_prefix: cache_keys::DEFAULT_PREFIX.to_string(),
            create_write_policy: CacheWritePolicy::default(),
        }
    }

    /// Sets the namespace of every cache key.
    #[must_use]
    pub fn with_key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    /// Sets the handling of a failed cache write after an insert.
    #[must_use]
    pub fn with_create_write_policy(mut self, policy: CacheWritePolicy) -> Self {
        self.create_write_policy = policy;
        self
    }

    fn cache_key(&self, id: &UserId) -> String {
        cache_keys::user_by_id(&self.key_prefix, id)
    }

    /// Cache lookup. `Ok(None)` covers both a miss and a failed lookup.
    async fn lookup_cached(&self, ctx: &RequestContext, key: &str) -> UserbaseResult<Option<User>> {
        match ctx.run("cache.get", self.cache.get::<User>(key)).await {
            Ok(Some(user)) => {
                metrics::record_cache_hit();
                Ok(Some(user))
            }
            Ok(None) => {
                metrics::record_cache_miss();
                Ok(None)
            }
            Err(UserbaseError::Cancelled) => Err(UserbaseError::Cancelled),
            Err(e) => {
                warn!("Cache lookup for '{}' failed, falling back to the store: {}", key, e);
                metrics::record_cache_lookup_failure();
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn get_user(&self, ctx: &RequestContext, id: &UserId) -> UserbaseResult<User> {
        debug!("Getting user: {}", id);

        if id.is_blank() {
            return Err(UserbaseError::validation("id: User id is required"));
        }

        let cache_key = self.cache_key(id);

        if let Some(cached) = self.lookup_cached(ctx, &cache_key).await? {
            debug!("Cache hit for user: {}", id);
            return Ok(cached);
        }

        metrics::record_store_read();
        let user = ctx
            .run("store.find_by_id", self.user_repository.find_by_id(id))
            .await?
            .ok_or_else(|| UserbaseError::not_found("User", id))?;

        match ctx
            .run("cache.set", self.cache.set(&cache_key, &user, None))
            .await
        {
            Ok(()) => {}
            Err(UserbaseError::Cancelled) => {
                debug!("Request cancelled before user {} was cached", id);
            }
            Err(e) => {
                warn!("Failed to cache user {}: {}", id, e);
                metrics::record_cache_write_failure("fetch");
            }
        }

        Ok(user)
    }

    async fn create_user(&self, ctx: &RequestContext, request: CreateUserRequest) -> UserbaseResult<User> {
        debug!("Creating user: {}", request.email);

        request.validate_request()?;

        let new_user = NewUser::from(request);
        let user = ctx
            .run("store.create", self.user_repository.create(&new_user))
            .await?;

        info!("User created: {}", user.id);
        metrics::record_user_created();

        let cache_key = self.cache_key(&user.id);
        let cached = ctx
            .run("cache.set", self.cache.set(&cache_key, &user, None))
            .await;

        match (cached, self.create_write_policy) {
            (Ok(()), _) => Ok(user),
            (Err(e), CacheWritePolicy::BestEffort) => {
                warn!("User {} created but not cached: {}", user.id, e);
                metrics::record_cache_write_failure("create");
                Ok(user)
            }
            (Err(UserbaseError::Cancelled), CacheWritePolicy::Strict) => {
                metrics::record_cache_write_failure("create");
                Err(UserbaseError::Cancelled)
            }
            (Err(e), CacheWritePolicy::Strict) => {
                warn!("User {} created but not cached: {}", user.id, e);
                metrics::record_cache_write_failure("create");
                Err(UserbaseError::internal(format!(
                    "User {} was stored but could not be cached: {}",
                    user.id, e
                )))
            }
        }
    }
}

impl std::fmt::Debug for UserServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceImpl")
            .field("key_prefix", &self.key_prefix)
            .field("create_write_policy", &self.create_write_policy)
            .finish_non_exhaustive()
    }
}
