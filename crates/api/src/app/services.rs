use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use courselib_application::{AccountService, Collaborators, Dispatcher, build_dispatcher};
use courselib_auth::{Hs256Jwt, JwtValidator, Pbkdf2Hasher, User, UserRepository};
use courselib_core::{Course, Repository};
use courselib_infra::{InMemoryRepository, PostgresCourseRepository, PostgresUserRepository, migrate};

use crate::config::ApiConfig;

/// Everything route handlers need, shared behind one `Arc`.
#[derive(Clone)]
pub struct AppServices {
    pub dispatcher: Dispatcher,
    pub accounts: Arc<AccountService>,
    pub jwt: Arc<dyn JwtValidator>,
}

struct Storage {
    users: Arc<dyn UserRepository>,
    courses: Arc<dyn Repository<Course>>,
}

async fn build_storage(config: &ApiConfig) -> anyhow::Result<Storage> {
    match &config.database_url {
        Some(database_url) => {
            let pool = PgPool::connect(database_url)
                .await
                .context("failed to connect to Postgres")?;
            migrate(&pool).await.context("failed to prepare database schema")?;
            tracing::info!("using Postgres storage");
            Ok(Storage {
                users: Arc::new(PostgresUserRepository::new(pool.clone())),
                courses: Arc::new(PostgresCourseRepository::new(pool)),
            })
        }
        None => {
            tracing::info!("DATABASE_URL not set; using in-memory storage");
            Ok(Storage {
                users: Arc::new(InMemoryRepository::<User>::new()),
                courses: Arc::new(InMemoryRepository::<Course>::new()),
            })
        }
    }
}

pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    let storage = build_storage(config).await?;
    let jwt = Arc::new(Hs256Jwt::new(config.jwt_secret.as_bytes(), config.jwt_ttl));

    let (dispatcher, accounts) = build_dispatcher(Collaborators {
        users: storage.users,
        courses: storage.courses,
        hasher: Arc::new(Pbkdf2Hasher::new(config.password_hash_iterations)),
        tokens: jwt.clone(),
    })
    .context("invalid request wiring")?;

    if let Some(admin) = &config.admin {
        if let Some(id) = accounts
            .ensure_admin(&admin.email, &admin.password)
            .await
            .context("failed to seed administrator")?
        {
            tracing::info!(user_id = %id, "administrator account seeded");
        }
    }

    Ok(AppServices {
        dispatcher,
        accounts,
        jwt,
    })
}
