use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
    TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        auth::{LoginRequest, LoginResponse, LogoutResponse, ProfileResponse, RegisterRequest, RegisterResponse},
        navigation::Destination,
    },
    entity::{
        carts::ActiveModel as CartActive,
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, issue_token},
    models::User,
    response::{ApiResponse, Meta},
    services::cart_service::{basket_products, cart_for_user},
    state::AppState,
};

const USERNAME_MAX_LEN: usize = 150;
const PASSWORD_MIN_LEN: usize = 8;

/// Field checks for a registration form, before touching the database.
pub fn validate_registration(username: &str, password: &str, password_confirm: &str) -> AppResult<()> {
    if username.is_empty() {
        return Err(AppError::Validation("username is required".into()));
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(AppError::Validation(format!(
            "username must be at most {USERNAME_MAX_LEN} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(AppError::Validation(
            "username may contain only letters, digits and @/./+/-/_".into(),
        ));
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LEN} characters"
        )));
    }
    if password != password_confirm {
        return Err(AppError::Validation("passwords do not match".into()));
    }
    Ok(())
}

/// Creates the account and its empty cart in one transaction.
pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<RegisterResponse>> {
    let RegisterRequest {
        username,
        password,
        password_confirm,
    } = payload;
    let username = username.trim().to_string();
    validate_registration(&username, &password, &password_confirm)?;

    let exist = Users::find()
        .filter(UserCol::Username.eq(username.as_str()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::BadRequest("Username is already taken".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let txn = state.orm.begin().await?;

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(username),
        password_hash: Set(password_hash),
        created_at: NotSet,
    }
    .insert(&txn)
    .await
    .map_err(username_conflict)?;

    let cart = CartActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.id),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(user_id = %user.id, cart_id = %cart.id, "user registered");
    audit::record(
        &state.pool,
        user.id,
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id, "cart_id": cart.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "User created",
        RegisterResponse {
            user: User::from(user),
            cart_id: cart.id,
            redirect: Destination::ProductList.into(),
        },
        None,
    ))
}

// A concurrent registration can win the race past the existence check.
fn username_conflict(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::BadRequest("Username is already taken".to_string())
        }
        _ => AppError::OrmError(err),
    }
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { username, password } = payload;
    let user = Users::find()
        .filter(UserCol::Username.eq(username.trim()))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::BadRequest("Invalid username or password".into())),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Invalid username or password".into()));
    }

    let token = issue_token(
        &state.config.jwt_secret,
        state.config.jwt_ttl_hours,
        user.id,
        &user.username,
    )?;

    audit::record(
        &state.pool,
        user.id,
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token: format!("Bearer {}", token),
            redirect: Destination::ProductList.into(),
        },
        Some(Meta::empty()),
    ))
}

/// Tokens are stateless; logging out only tells the client where to go next.
/// Anonymous callers are accepted, there is simply nothing to audit.
pub async fn logout_user(
    state: &AppState,
    user: Option<&AuthUser>,
) -> AppResult<ApiResponse<LogoutResponse>> {
    if let Some(user) = user {
        audit::record(
            &state.pool,
            user.user_id,
            "user_logout",
            "users",
            serde_json::json!({ "user_id": user.user_id }),
        )
        .await;
    }

    Ok(ApiResponse::success(
        "Logged out",
        LogoutResponse {
            redirect: Destination::ProductList.into(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn profile(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<ProfileResponse>> {
    let account = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let cart = cart_for_user(&state.orm, user.user_id).await?;
    let basket = basket_products(&state.orm, cart.id).await?;
    let total = basket.len() as i64;

    Ok(ApiResponse::success(
        "Profile",
        ProfileResponse {
            user: User::from(account),
            basket,
        },
        Some(Meta::total(total)),
    ))
}
