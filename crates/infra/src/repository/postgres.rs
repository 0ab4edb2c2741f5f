//! Postgres-backed repositories.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Code | RepositoryError |
//! |------------|-----------------|-----------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | any | `Backend` |
//! | PoolClosed / other | N/A | `Backend` |

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use courselib_auth::{PasswordHash, Role, RoleSet, User, UserRepository};
use courselib_core::{Course, CourseId, Repository, RepositoryError, UserId};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            UUID PRIMARY KEY,
        email         TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        roles         TEXT[] NOT NULL,
        created_at    TIMESTAMPTZ NOT NULL,
        updated_at    TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS courses (
        id          UUID PRIMARY KEY,
        title       TEXT NOT NULL,
        description TEXT NOT NULL,
        author      TEXT NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL,
        updated_at  TIMESTAMPTZ NOT NULL
    )
    "#,
];

/// Create the tables if they do not exist yet. Safe to run on every start.
pub async fn migrate(pool: &PgPool) -> Result<(), RepositoryError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
    }
    tracing::info!("database schema ready");
    Ok(())
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code() {
                Some(code) if code.as_ref() == "23505" => RepositoryError::Conflict(msg),
                _ => RepositoryError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => RepositoryError::Backend(format!("connection pool closed in {}", operation)),
        other => RepositoryError::Backend(format!("sqlx error in {}: {}", operation, other)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

struct UserRow(User);

impl<'r> FromRow<'r, PgRow> for UserRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let roles: Vec<String> = row.try_get("roles")?;
        let roles = roles
            .iter()
            .map(|r| r.parse::<Role>())
            .collect::<Result<RoleSet, _>>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(UserRow(User {
            id: UserId::from_uuid(row.try_get("id")?),
            email: row.try_get("email")?,
            password_hash: PasswordHash::from_encoded(row.try_get::<String, _>("password_hash")?),
            roles,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        }))
    }
}

fn role_names(roles: &RoleSet) -> Vec<String> {
    roles.iter().map(|r| r.as_str().to_string()).collect()
}

#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, email, password_hash, roles, created_at, updated_at";

#[async_trait]
impl Repository<User> for PostgresUserRepository {
    #[instrument(skip(self), fields(user_id = %id))]
    async fn find(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user", e))?;
        Ok(row.map(|r| r.0))
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_users", e))?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn save(&self, user: User) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, roles, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash,
                roles = EXCLUDED.roles,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.email)
        .bind(user.password_hash.as_str())
        .bind(role_names(&user.roles))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_user", e))?;
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_user", e))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user_by_email", e))?;
        Ok(row.map(|r| r.0))
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn insert(&self, user: User) -> Result<(), RepositoryError> {
        // Both the primary key and the email column are unique; either violation is a conflict.
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, roles, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.email)
        .bind(user.password_hash.as_str())
        .bind(role_names(&user.roles))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_user", e))?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Courses
// ─────────────────────────────────────────────────────────────────────────────

struct CourseRow(Course);

impl<'r> FromRow<'r, PgRow> for CourseRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(CourseRow(Course {
            id: CourseId::from_uuid(row.try_get("id")?),
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            author: row.try_get("author")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        }))
    }
}

#[derive(Debug, Clone)]
pub struct PostgresCourseRepository {
    pool: PgPool,
}

impl PostgresCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const COURSE_COLUMNS: &str = "id, title, description, author, created_at, updated_at";

#[async_trait]
impl Repository<Course> for PostgresCourseRepository {
    #[instrument(skip(self), fields(course_id = %id))]
    async fn find(&self, id: &CourseId) -> Result<Option<Course>, RepositoryError> {
        let row = sqlx::query_as::<_, CourseRow>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_course", e))?;
        Ok(row.map(|r| r.0))
    }

    async fn list(&self) -> Result<Vec<Course>, RepositoryError> {
        let rows = sqlx::query_as::<_, CourseRow>(&format!("SELECT {COURSE_COLUMNS} FROM courses ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_courses", e))?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    #[instrument(skip(self, course), fields(course_id = %course.id))]
    async fn save(&self, course: Course) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO courses (id, title, description, author, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                author = EXCLUDED.author,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(course.id.as_uuid())
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.author)
        .bind(course.created_at)
        .bind(course.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_course", e))?;
        Ok(())
    }

    async fn delete(&self, id: &CourseId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_course", e))?;
        Ok(result.rows_affected() > 0)
    }
}
