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
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, CartLineView, CartSummary, CartView, UpdateQuantityRequest},
        clothes::{CreateClothesRequest, DeleteResponse, UpdateClothesRequest},
        users::UserCount,
    },
    models::{ClothingItem, UserProfile},
    routes::{auth, cart, clothes, health, health::HealthData, users},
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
        auth::register,
        auth::login,
        clothes::list_clothes,
        clothes::get_clothes,
        clothes::create_clothes,
        clothes::update_clothes,
        clothes::delete_clothes,
        cart::get_cart,
        cart::add_to_cart,
        cart::update_quantity,
        cart::remove_from_cart,
        cart::clear_cart,
        users::list_users,
        users::users_count,
    ),
    components(
        schemas(
            HealthData,
            ClothingItem,
            UserProfile,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateClothesRequest,
            UpdateClothesRequest,
            DeleteResponse,
            AddToCartRequest,
            UpdateQuantityRequest,
            CartLineView,
            CartView,
            CartSummary,
            UserCount,
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login"),
        (name = "Clothes", description = "Catalog endpoints"),
        (name = "Cart", description = "Per-user cart endpoints"),
        (name = "Users", description = "Admin user listing"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
