//! Bearer-token gate. Token validation itself is an external
//! collaborator; this module only defines the seam and the production
//! lookup against `usuarios`.

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use sqlx::PgPool;
use tracing::warn;

/// Role string couriers carry in `usuarios.rol`.
pub const ROLE_COURIER: &str = "delivery";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthUser {
    pub id_usuario: i32,
    pub rol: String,
}

impl AuthUser {
    pub fn is_courier(&self) -> bool {
        self.rol == ROLE_COURIER
    }
}

/// External token-validation collaborator: `validate(token) -> user?`.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Option<AuthUser>;
}

/// Production validator: resolves the session token against `usuarios`.
#[derive(Clone, Debug)]
pub struct PgTokenValidator {
    pool: PgPool,
}

impl PgTokenValidator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenValidator for PgTokenValidator {
    async fn validate(&self, token: &str) -> Option<AuthUser> {
        let result = sqlx::query_as::<_, AuthUser>(
            "SELECT id_usuario, rol FROM usuarios WHERE token_sesion = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(user) => user,
            Err(e) => {
                warn!("token lookup failed: {e}");
                None
            }
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
