use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, LogoutResponse, ProfileResponse, RegisterRequest, RegisterResponse},
        cart::{AddToCartRequest, CartUpdated, CartView, CheckoutResponse},
        catalog::{CommentView, ProductDetail, ProductList},
        comments::{CommentCreated, CreateCommentRequest},
        history::{BuyHistoryEntry, HistoryList},
        navigation::{Destination, Redirect},
        reactions::ReactionOutcome,
    },
    entity::reactions::{ReactionKind, TargetKind},
    models::{Comment, Product, User},
    reaction::{ReactionCounts, ReactionState},
    response::{ApiResponse, Meta},
    routes::{auth, cart, catalog, comments, health, history, params, reactions},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        auth::register,
        auth::login,
        auth::logout,
        auth::profile,
        catalog::list_products,
        catalog::get_product,
        comments::add_comment,
        reactions::like_product,
        reactions::dislike_product,
        reactions::like_comment,
        reactions::dislike_comment,
        cart::view_cart,
        cart::add_to_cart,
        cart::remove_from_cart,
        cart::checkout,
        history::list_history
    ),
    components(
        schemas(
            User,
            Product,
            Comment,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            LogoutResponse,
            ProfileResponse,
            AddToCartRequest,
            CartView,
            CartUpdated,
            CheckoutResponse,
            BuyHistoryEntry,
            HistoryList,
            ProductList,
            ProductDetail,
            CommentView,
            CreateCommentRequest,
            CommentCreated,
            ReactionOutcome,
            ReactionCounts,
            ReactionState,
            ReactionKind,
            TargetKind,
            Destination,
            Redirect,
            params::Pagination,
            params::ProductQuery,
            Meta,
            ApiResponse<ProductDetail>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<HistoryList>,
            ApiResponse<ReactionOutcome>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Registration, login and profile"),
        (name = "Products", description = "Catalog browsing"),
        (name = "Comments", description = "Product comments"),
        (name = "Reactions", description = "Like/dislike toggles for products and comments"),
        (name = "Cart", description = "Basket and checkout"),
        (name = "History", description = "Purchase history"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_reaction_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/products/{slug}/like",
            "/api/products/{slug}/dislike",
            "/api/comments/{id}/like",
            "/api/comments/{id}/dislike",
            "/api/cart/checkout",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
