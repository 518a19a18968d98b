//! Group repository implementation

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::database::store::GroupStore;
use crate::models::group::{Group, GroupFilter, GroupId, GroupStatus, Message, NewGroup};
use crate::utils::errors::{CampusError, Result};

const GROUP_COLUMNS: &str = "id, name, subject, created_by_email, created_by_designation, school, status, members, messages, created_at, updated_at";

#[derive(Debug, FromRow)]
struct GroupRow {
    id: Uuid,
    name: String,
    subject: String,
    created_by_email: String,
    created_by_designation: String,
    school: String,
    status: String,
    members: Vec<String>,
    messages: Json<Vec<Message>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<GroupRow> for Group {
    type Error = CampusError;

    fn try_from(row: GroupRow) -> Result<Self> {
        let status = row.status.parse::<GroupStatus>().map_err(|_| {
            CampusError::Database(sqlx::Error::Decode(
                format!("unknown group status {:?}", row.status).into(),
            ))
        })?;

        Ok(Group {
            id: row.id,
            name: row.name,
            subject: row.subject,
            created_by_email: row.created_by_email,
            created_by_designation: row.created_by_designation,
            school: row.school,
            status,
            members: row.members,
            messages: row.messages.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_group(row: Option<GroupRow>) -> Result<Option<Group>> {
    row.map(Group::try_from).transpose()
}

#[derive(Clone, Debug)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupStore for GroupRepository {
    async fn create(&self, group: NewGroup) -> Result<Group> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, GroupRow>(&format!(
            r#"
            INSERT INTO groups (id, name, subject, created_by_email, created_by_designation, school, status, members, messages, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, ARRAY[$4], '[]'::jsonb, $8, $8)
            RETURNING {GROUP_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(group.name)
        .bind(group.subject)
        .bind(group.created_by_email)
        .bind(group.created_by_designation)
        .bind(group.school)
        .bind(group.status.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Group::try_from(row)
    }

    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>> {
        let row = sqlx::query_as::<_, GroupRow>(&format!(
            "SELECT {GROUP_COLUMNS} FROM groups WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        into_group(row)
    }

    async fn list(&self, filter: &GroupFilter) -> Result<Vec<Group>> {
        let rows = sqlx::query_as::<_, GroupRow>(&format!(
            r#"
            SELECT {GROUP_COLUMNS} FROM groups
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR school = $2)
              AND ($3::text IS NULL OR created_by_email = $3)
            ORDER BY created_at DESC
            "#
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.school.as_deref())
        .bind(filter.created_by_email.as_deref())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Group::try_from).collect()
    }

    async fn set_status(&self, id: GroupId, status: GroupStatus) -> Result<Option<Group>> {
        let row = sqlx::query_as::<_, GroupRow>(&format!(
            r#"
            UPDATE groups
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING {GROUP_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        into_group(row)
    }

    async fn delete(&self, id: GroupId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_member(&self, id: GroupId, email: &str) -> Result<Option<Group>> {
        let row = sqlx::query_as::<_, GroupRow>(&format!(
            r#"
            UPDATE groups
            SET members = CASE WHEN $2 = ANY(members) THEN members ELSE array_append(members, $2) END,
                updated_at = $3
            WHERE id = $1
            RETURNING {GROUP_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(email)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        into_group(row)
    }

    async fn remove_member(&self, id: GroupId, email: &str) -> Result<Option<Group>> {
        let row = sqlx::query_as::<_, GroupRow>(&format!(
            r#"
            UPDATE groups
            SET members = array_remove(members, $2), updated_at = $3
            WHERE id = $1
            RETURNING {GROUP_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(email)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        into_group(row)
    }

    async fn push_message(&self, id: GroupId, message: &Message) -> Result<Option<Group>> {
        let row = sqlx::query_as::<_, GroupRow>(&format!(
            r#"
            UPDATE groups
            SET messages = messages || $2::jsonb, updated_at = $3
            WHERE id = $1
            RETURNING {GROUP_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(Json(std::slice::from_ref(message)))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        into_group(row)
    }
}
