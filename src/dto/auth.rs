use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::navigation::Redirect,
    models::{Product, User},
};

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub user: User,
    pub cart_id: Uuid,
    pub redirect: Redirect,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub redirect: Redirect,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub redirect: Redirect,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user: User,
    pub basket: Vec<Product>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub exp: usize,
}
