use std::sync::Arc;

use vigil_lifecycle::credential::{CredentialSessionSink, PgCredentialSessions};
use vigil_lifecycle::principal::{PgPrincipalDirectory, PrincipalDirectory};
use vigil_lifecycle::revocation::RevocationService;
use vigil_lifecycle::sweeper::Sweeper;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vigil_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Two-store revocation service.
    pub revocation: Arc<RevocationService>,
    /// Cleanup jobs, invoked through the diagnostics endpoint.
    pub sweeper: Arc<Sweeper>,
}

impl AppState {
    /// Wire the lifecycle services over the Postgres-backed collaborator
    /// adapters.
    pub fn new(pool: vigil_db::DbPool, config: ServerConfig) -> Self {
        let directory: Arc<dyn PrincipalDirectory> =
            Arc::new(PgPrincipalDirectory::new(pool.clone()));
        let credentials: Arc<dyn CredentialSessionSink> =
            Arc::new(PgCredentialSessions::new(pool.clone()));

        let revocation = Arc::new(RevocationService::new(pool.clone(), Arc::clone(&credentials)));
        let sweeper = Arc::new(Sweeper::new(
            pool.clone(),
            directory,
            credentials,
            config.policy.clone(),
        ));

        Self {
            pool,
            config: Arc::new(config),
            revocation,
            sweeper,
        }
    }
}
