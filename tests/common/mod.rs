#![allow(dead_code)]

use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use storefront_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::auth::RegisterRequest,
    entity::products::{ActiveModel as ProductActive, Model as ProductModel},
    middleware::auth::AuthUser,
    services::auth_service,
    state::AppState,
};
use uuid::Uuid;

/// Connects to the test database, or returns `None` so the caller can skip.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url, 5).await?;
    run_migrations(&pool).await?;

    let config = AppConfig {
        database_url,
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
        jwt_ttl_hours: 1,
        db_max_connections: 5,
    };
    Ok(Some(AppState::new(pool, config)))
}

// Tests share one database, so every fixture gets a unique name.
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", &Uuid::new_v4().simple().to_string()[..12])
}

pub async fn register(state: &AppState, prefix: &str) -> anyhow::Result<AuthUser> {
    let username = unique(prefix);
    let resp = auth_service::register_user(
        state,
        RegisterRequest {
            username: username.clone(),
            password: "correct-horse".into(),
            password_confirm: "correct-horse".into(),
        },
    )
    .await?;
    let data = resp.data.expect("register data");
    Ok(AuthUser {
        user_id: data.user.id,
        username,
    })
}

pub async fn create_product(state: &AppState, name: &str, price: i64) -> anyhow::Result<ProductModel> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        slug: Set(unique(&name.to_lowercase().replace(' ', "-"))),
        description: Set(Some(format!("{name} for testing"))),
        price: Set(price),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(product)
}
