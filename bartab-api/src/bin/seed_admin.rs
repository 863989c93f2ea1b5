//! # Seed Admin
//!
//! Idempotently provisions the `admin` superuser account so a fresh
//! deployment has someone who can create the real operator accounts.
//!
//! If the account already exists its password and role are reset, which
//! doubles as a recovery path for a locked-out installation.
//!
//! ## Usage
//!
//! ```bash
//! ADMIN_PASSWORD=changeme cargo run -p bartab-api --bin seed-admin
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bartab_api::config::Config;
use bartab_shared::{
    auth::password::hash_password,
    db::{migrations, pool},
    models::user::{CreateUser, User, UserRole},
};

const ADMIN_USERNAME: &str = "admin";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed_admin=info,bartab_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());

    migrations::ensure_database_exists(&config.database.url).await?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: 2,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    let password_hash = hash_password(&password)?;

    match User::find_by_username(&db, ADMIN_USERNAME).await? {
        Some(existing) => {
            tracing::info!("Admin already exists, resetting password and role");
            User::update_password(&db, existing.id, &password_hash).await?;
            User::update_role(&db, existing.id, UserRole::Superuser).await?;
            tracing::info!(user_id = %existing.id, "Admin updated");
        }
        None => {
            let user = User::create(
                &db,
                CreateUser {
                    username: ADMIN_USERNAME.to_string(),
                    password_hash,
                    role: UserRole::Superuser,
                },
            )
            .await?;
            tracing::info!(user_id = %user.id, "Admin created");
        }
    }

    pool::close_pool(db).await;

    Ok(())
}
