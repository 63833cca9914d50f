//! Server-side sessions for the cookie flow, persisted in the
//! `sessions` table so they survive restarts.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use sqlx::{FromRow, PgPool};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

/// 32 bytes = 256 bits of entropy; the id must not be guessable.
const SESSION_ID_BYTES: usize = 32;

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: Uuid,
    pub username: String,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

/// OS-provided entropy, base64 URL-safe without padding.
pub fn generate_session_id() -> String {
    let mut buf = [0u8; SESSION_ID_BYTES];
    OsRng.fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

impl Session {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        username: &str,
        ttl: Duration,
    ) -> anyhow::Result<Session> {
        let id = generate_session_id();
        let expires_at = OffsetDateTime::now_utc() + ttl;
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, user_id, username, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, username, created_at, expires_at
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(username)
        .bind(expires_at)
        .fetch_one(db)
        .await?;
        debug!(user_id = %user_id, "session created");
        Ok(session)
    }

    /// `None` for unknown or expired ids. Callers treat `None` as
    /// "not authenticated", never as an error to surface.
    pub async fn resolve(db: &PgPool, id: &str) -> anyhow::Result<Option<(Uuid, String)>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, username, created_at, expires_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(session
            .filter(|s| !s.is_expired())
            .map(|s| (s.user_id, s.username)))
    }

    /// Idempotent: destroying an already-gone session is not an error.
    pub async fn destroy(db: &PgPool, id: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() >= self.expires_at
    }
}
