//! Dependency injection module using Shaku.
//!
//! `UserbaseModule` holds one instance of every component. Requests share
//! them through `Arc`.

use deadpool_redis::Pool;
use shaku::{module, HasComponent, ModuleBuilder};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use userbase_config::RedisConfig;
use userbase_repository::{
    DatabasePool, DatabasePoolInterface, DatabasePoolParameters, PostgresUserRepository,
    UserRepository,
};
use userbase_service::{
    CacheInterface, RedisCacheService, RedisCacheServiceParameters, UserService,
    UserServiceImpl, UserServiceImplParameters,
};

// Single-process deployment: PostgreSQL store, Redis cache, coordinator.
module! {
    pub UserbaseModule {
        components = [
            DatabasePool,
            PostgresUserRepository,
            RedisCacheService,
            UserServiceImpl,
        ],
        providers = [],
    }
}

/// Returns a module builder with every component parameter set.
///
/// A `redis_pool` of `None` wires a disabled cache. Components can still be
/// overridden on the returned builder.
#[must_use]
pub fn module_builder(
    pool: PgPool,
    redis_pool: Option<Arc<Pool>>,
    redis_config: &RedisConfig,
) -> ModuleBuilder<UserbaseModule> {
    UserbaseModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters { pool })
        .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters {
            pool: redis_pool,
            default_ttl: redis_config.ttl(),
        })
        .with_component_parameters::<UserServiceImpl>(UserServiceImplParameters {
            key_prefix: redis_config.key_prefix.clone(),
            create_write_policy: redis_config.create_write_policy,
        })
}

/// Builds the application module.
#[must_use]
pub fn build_module(
    pool: PgPool,
    redis_pool: Option<Arc<Pool>>,
    redis_config: &RedisConfig,
) -> Arc<UserbaseModule> {
    let module = module_builder(pool, redis_pool, redis_config).build();

    info!(
        cache_enabled = module.cache().is_enabled(),
        create_write_policy = ?redis_config.create_write_policy,
        "Application module built"
    );

    Arc::new(module)
}

/// Trait for resolving the user service.
pub trait ServiceResolver {
    fn user_service(&self) -> Arc<dyn UserService>;
}

impl ServiceResolver for UserbaseModule {
    fn user_service(&self) -> Arc<dyn UserService> {
        self.resolve()
    }
}

/// Trait for resolving the database pool.
pub trait DatabaseResolver {
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface>;
}

impl DatabaseResolver for UserbaseModule {
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }
}

/// Trait for resolving the user repository.
pub trait RepositoryResolver {
    fn user_repository(&self) -> Arc<dyn UserRepository>;
}

impl RepositoryResolver for UserbaseModule {
    fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.resolve()
    }
}

/// Trait for resolving the cache.
pub trait CacheResolver {
    fn cache(&self) -> Arc<dyn CacheInterface>;
}

impl CacheResolver for UserbaseModule {
    fn cache(&self) -> Arc<dyn CacheInterface> {
        self.resolve()
    }
}
