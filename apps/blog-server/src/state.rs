//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::application::{AccountService, PostService};
use blog_core::ports::{
    Clock, PageRenderer, PasswordService, PostRepository, SystemClock, TokenService,
    UserRepository,
};
use blog_infra::database::DatabaseConfig;
use blog_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtConfig,
    JwtTokenService,
};

#[cfg(feature = "postgres")]
use blog_infra::{DatabaseConnections, PostgresPostRepository, PostgresUserRepository};

use crate::views::AskamaRenderer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub accounts: AccountService,
    pub users: Arc<dyn UserRepository>,
    pub renderer: Arc<dyn PageRenderer>,
    /// Which storage backend ended up serving requests.
    pub storage: &'static str,
}

type Repositories = (Arc<dyn UserRepository>, Arc<dyn PostRepository>, &'static str);

fn in_memory() -> Repositories {
    (
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryPostRepository::new()),
        "memory",
    )
}

impl AppState {
    /// Build the application state, falling back to in-memory storage when
    /// no database is configured or reachable.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        let (users, posts, storage) = match db_config {
            Some(config) => match DatabaseConnections::init(config).await {
                Ok(connections) => {
                    let users: Arc<dyn UserRepository> =
                        Arc::new(PostgresUserRepository::new(connections.main.clone()));
                    let posts: Arc<dyn PostRepository> =
                        Arc::new(PostgresPostRepository::new(connections.main));
                    (users, posts, "postgres")
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (users, posts, storage) = {
            if db_config.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            in_memory()
        };

        let state = Self::from_repositories(users, posts, storage);
        tracing::info!(storage = state.storage, "Application state initialized");
        state
    }

    pub fn from_repositories(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        storage: &'static str,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        Self {
            posts: PostService::new(posts.clone(), users.clone(), clock),
            accounts: AccountService::new(users.clone(), posts),
            users,
            renderer: Arc::new(AskamaRenderer),
            storage,
        }
    }

    /// Fresh in-memory state, as used by tests.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        let (users, posts, storage) = in_memory();
        Self::from_repositories(users, posts, storage)
    }
}

/// Token and password services, registered as separate app data so the
/// identity extractors can reach them without the full state.
#[derive(Clone)]
pub struct AuthServices {
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl AuthServices {
    pub fn new(jwt: JwtConfig) -> Self {
        Self {
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }
}
