use crate::models::{NewUser, User};
use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::PgPool;
use std::sync::Mutex;
use tracing::instrument;

use super::lock;

const USER_COLUMNS: &str = "id, email, google_sub, full_name, given_name, family_name, picture_url, email_verified, admin";

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<User>, AppError>;
    /// Return the user with `new_user.email`, creating it first if absent.
    /// Profile fields of an existing user are refreshed from the token.
    async fn find_or_create(&self, new_user: NewUser) -> Result<User, AppError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    async fn find_or_create(&self, new_user: NewUser) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, google_sub, full_name, given_name, family_name, picture_url, email_verified)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (email) DO UPDATE SET
                google_sub = EXCLUDED.google_sub,
                full_name = EXCLUDED.full_name,
                given_name = EXCLUDED.given_name,
                family_name = EXCLUDED.family_name,
                picture_url = EXCLUDED.picture_url,
                email_verified = EXCLUDED.email_verified
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.email)
        .bind(&new_user.google_sub)
        .bind(&new_user.full_name)
        .bind(&new_user.given_name)
        .bind(&new_user.family_name)
        .bind(&new_user.picture_url)
        .bind(new_user.email_verified)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}

/// In-memory user table.
#[derive(Default)]
pub struct MockUserRepository {
    users: Mutex<Vec<User>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user, e.g. to pre-set the admin flag.
    pub fn with_user(self, user: User) -> Self {
        if let Ok(mut users) = self.users.lock() {
            users.push(user);
        }
        self
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        Ok(lock(&self.users, "users")?.clone())
    }

    async fn find_or_create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = lock(&self.users, "users")?;

        if let Some(existing) = users.iter().find(|user| user.email == new_user.email) {
            return Ok(existing.clone());
        }

        let user = User {
            id: users.iter().map(|user| user.id).max().unwrap_or(0) + 1,
            email: new_user.email,
            google_sub: new_user.google_sub,
            full_name: new_user.full_name,
            given_name: new_user.given_name,
            family_name: new_user.family_name,
            picture_url: new_user.picture_url,
            email_verified: new_user.email_verified,
            admin: false,
        };
        users.push(user.clone());
        Ok(user)
    }
}
