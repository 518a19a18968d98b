//! Account profile repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use chrono::Utc;
use crate::database::store::ProfileStore;
use crate::models::user::{NewProfile, Profile, ProfileChanges};
use crate::utils::errors::{CampusError, Result};

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for UserRepository {
    async fn create(&self, profile: NewProfile) -> Result<Profile> {
        let email = profile.email.clone();
        let now = Utc::now();
        let created = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO users (email, password_hash, name, phone, designation, school, photo_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ON CONFLICT (email) DO NOTHING
            RETURNING email, password_hash, name, phone, designation, school, photo_url, created_at, updated_at
            "#
        )
        .bind(profile.email)
        .bind(profile.password_hash)
        .bind(profile.name)
        .bind(profile.phone)
        .bind(profile.designation)
        .bind(profile.school)
        .bind(profile.photo_url)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        created.ok_or_else(|| CampusError::Conflict(format!("Account already exists: {}", email)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT email, password_hash, name, phone, designation, school, photo_url, created_at, updated_at FROM users WHERE email = $1"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn update(&self, email: &str, changes: ProfileChanges) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                designation = COALESCE($4, designation),
                school = COALESCE($5, school),
                photo_url = COALESCE($6, photo_url),
                updated_at = $7
            WHERE email = $1
            RETURNING email, password_hash, name, phone, designation, school, photo_url, created_at, updated_at
            "#
        )
        .bind(email)
        .bind(changes.name)
        .bind(changes.phone)
        .bind(changes.designation)
        .bind(changes.school)
        .bind(changes.photo_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn set_password_hash(&self, email: &str, password_hash: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET password_hash = $2, updated_at = $3 WHERE email = $1")
            .bind(email)
            .bind(password_hash)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
