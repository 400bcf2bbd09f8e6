use argon2::{
    Argon2, PasswordHasher,
    password_hash::{rand_core::OsRng, SaltString},
};
use storefront_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    services::catalog_service::slugify,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, 2).await?;
    // Ensure migrations are applied.
    run_migrations(&pool).await?;

    let alice = ensure_user(&pool, "alice", "alice-password").await?;
    let bob = ensure_user(&pool, "bob", "bob-password").await?;
    seed_products(&pool).await?;

    println!("Seed completed. alice: {alice}, bob: {bob}");
    Ok(())
}

// Users and their carts go in together, the same way registration does it.
async fn ensure_user(pool: &sqlx::PgPool, username: &str, password: &str) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        println!("User {username} already present");
        return Ok(id);
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let mut tx = pool.begin().await?;
    let (user_id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO users (id, username, password_hash) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(password_hash)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO carts (id, user_id) VALUES ($1, $2)")
        .bind(Uuid::new_v4())
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    println!("Created user {username}");
    Ok(user_id)
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let products = vec![
        ("Axum Hoodie", "Warm hoodie for Rustaceans", 550000),
        ("Ferris Mug", "Coffee tastes better with Ferris", 120000),
        ("Rust Sticker Pack", "Decorate your laptop", 50000),
        ("E-book: Async Rust", "Learn async Rust patterns", 250000),
    ];

    for (name, desc, price) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, slug, description, price)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slugify(name))
        .bind(desc)
        .bind(price)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
