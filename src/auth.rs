use std::env;

use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{
    dev::ServiceRequest, error::ErrorUnauthorized, web, Error, HttpMessage, HttpRequest,
};
use actix_web_httpauth::extractors::basic::BasicAuth;
use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rand_core::OsRng;
use sqlx::SqlitePool;

use crate::{
    models::{UserRow, ROLE_ADMIN},
    state::AppState,
};

/// Session-marker cookie issued by the external OAuth collaborator. The
/// backend only ever clears it.
pub const SESSION_COOKIE: &str = "tm_session";

#[derive(Clone, Debug)]
pub struct AuthUser {
    pub open_id: String,
    pub name: String,
    pub role: String,
}

pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

pub async fn authenticate_credentials(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Option<AuthUser> {
    let user = sqlx::query_as::<_, UserRow>(
        "SELECT * FROM users WHERE open_id = ? AND password_hash IS NOT NULL LIMIT 1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
    .ok()??;

    let stored_hash = user.password_hash.as_deref()?;
    if !verify_password(password, stored_hash) {
        return None;
    }

    Some(AuthUser {
        open_id: user.open_id,
        name: user.name.unwrap_or_default(),
        role: user.role,
    })
}

pub async fn admin_validator(
    req: ServiceRequest,
    credentials: BasicAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        return Err((ErrorUnauthorized("Unauthorized"), req));
    };
    let username = credentials.user_id().to_string();
    let password = credentials.password().unwrap_or_default().to_string();

    match authenticate_credentials(&state.db, &username, &password).await {
        Some(user) if user.role == ROLE_ADMIN => {
            req.extensions_mut().insert(user);
            Ok(req)
        }
        Some(_) => Err((ErrorUnauthorized("Admin access required"), req)),
        None => Err((ErrorUnauthorized("Unauthorized"), req)),
    }
}

/// Creates the back-office credential. Used by the startup seed and by the
/// integration tests, which need a known password.
pub async fn create_admin_user(
    pool: &SqlitePool,
    open_id: &str,
    display_name: &str,
    password: &str,
) -> Result<(), sqlx::Error> {
    let password_hash = hash_password(password)
        .map_err(|_| sqlx::Error::Protocol("password hash failed".into()))?;
    let stamp = Utc::now().to_rfc3339();

    sqlx::query(
        r#"INSERT INTO users (open_id, name, password_hash, role, last_signed_in, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(open_id)
    .bind(display_name)
    .bind(password_hash)
    .bind(ROLE_ADMIN)
    .bind(&stamp)
    .bind(&stamp)
    .bind(&stamp)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn seed_admin(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let existing = sqlx::query_as::<_, (i64,)>(
        "SELECT id FROM users WHERE role = ? AND password_hash IS NOT NULL LIMIT 1",
    )
    .bind(ROLE_ADMIN)
    .fetch_optional(pool)
    .await?;

    if existing.is_some() {
        return Ok(());
    }

    let username = env::var("ADMIN_USER").unwrap_or_else(|_| "admin".to_string());
    let password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());
    let display_name = env::var("ADMIN_DISPLAY_NAME").unwrap_or_else(|_| "Reina".to_string());

    if password == "admin" {
        log::warn!("ADMIN_PASSWORD not set. Using default password 'admin'. Set ADMIN_PASSWORD in production.");
    }

    create_admin_user(pool, &username, &display_name, &password).await
}

pub fn clear_session_cookie(req: &HttpRequest) -> Cookie<'static> {
    let mut builder = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(0));
    if req.connection_info().scheme() == "https" {
        builder = builder.secure(true);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::run_migrations;
    use sqlx::sqlite::SqlitePoolOptions;

    #[test]
    fn password_round_trip() {
        let hash = hash_password("s3creta").unwrap();
        assert!(verify_password("s3creta", &hash));
        assert!(!verify_password("otra", &hash));
    }

    #[actix_web::test]
    async fn authenticate_requires_password_hash() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();

        create_admin_user(&pool, "reina", "Reina", "luna-llena").await.unwrap();

        let user = authenticate_credentials(&pool, "reina", "luna-llena").await;
        assert_eq!(user.map(|u| u.role), Some(ROLE_ADMIN.to_string()));

        assert!(authenticate_credentials(&pool, "reina", "mal").await.is_none());
        assert!(authenticate_credentials(&pool, "nadie", "luna-llena").await.is_none());
    }
}
