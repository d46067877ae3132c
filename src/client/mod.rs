//! Typed client for the storefront API.
//!
//! Authentication state lives in an explicit [`Session`] value returned by
//! [`StorefrontClient::login`] and passed to the calls that need it; nothing
//! is stashed in ambient global storage. Cart calls keep a local
//! [`ShadowCart`] copy and fall back to it when the server is unreachable.
//! The shadow is an advisory cache, never reconciled back to the server.

pub mod shadow;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, CartSummary, UpdateQuantityRequest},
        clothes::{CreateClothesRequest, DeleteResponse, UpdateClothesRequest},
        users::UserCount,
    },
    models::{ClothingItem, UserProfile},
};
use shadow::{ShadowCart, ShadowSummary};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (connection refused, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The shadow cart could not be read or written.
    #[error("shadow cart I/O failed: {0}")]
    Shadow(#[from] std::io::Error),
}

/// Bearer token plus the profile it was issued for.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// Outcome of a cart call: fresh server state, or the local shadow copy when
/// the server could not be reached.
#[derive(Debug)]
pub enum CartState {
    Synced(CartSummary),
    Local(ShadowSummary),
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

pub struct StorefrontClient {
    http: reqwest::Client,
    base_url: String,
    shadow: ShadowCart,
}

impl StorefrontClient {
    pub fn new(base_url: impl Into<String>, shadow: ShadowCart) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            shadow,
        }
    }

    // --- identity ---

    pub async fn register(&self, payload: &RegisterRequest) -> Result<UserProfile, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/auth/register", self.base_url))
            .json(payload)
            .send()
            .await?;
        parse(response).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let resp: LoginResponse = parse(response).await?;
        Ok(Session {
            token: resp.token,
            user: resp.user,
        })
    }

    // --- catalog ---

    pub async fn list_clothes(&self) -> Result<Vec<ClothingItem>, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/clothes", self.base_url))
            .send()
            .await?;
        parse(response).await
    }

    pub async fn get_clothes(&self, id: Uuid) -> Result<ClothingItem, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/clothes/{id}", self.base_url))
            .send()
            .await?;
        parse(response).await
    }

    pub async fn create_clothes(
        &self,
        session: &Session,
        payload: &CreateClothesRequest,
    ) -> Result<ClothingItem, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/clothes", self.base_url))
            .bearer_auth(&session.token)
            .json(payload)
            .send()
            .await?;
        parse(response).await
    }

    pub async fn update_clothes(
        &self,
        session: &Session,
        id: Uuid,
        patch: &UpdateClothesRequest,
    ) -> Result<ClothingItem, ClientError> {
        let response = self
            .http
            .put(format!("{}/api/clothes/{id}", self.base_url))
            .bearer_auth(&session.token)
            .json(patch)
            .send()
            .await?;
        parse(response).await
    }

    pub async fn delete_clothes(
        &self,
        session: &Session,
        id: Uuid,
    ) -> Result<DeleteResponse, ClientError> {
        let response = self
            .http
            .delete(format!("{}/api/clothes/{id}", self.base_url))
            .bearer_auth(&session.token)
            .send()
            .await?;
        parse(response).await
    }

    // --- admin console ---

    pub async fn list_users(&self, session: &Session) -> Result<Vec<UserProfile>, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/users", self.base_url))
            .bearer_auth(&session.token)
            .send()
            .await?;
        parse(response).await
    }

    pub async fn users_count(&self, session: &Session) -> Result<UserCount, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/users/count", self.base_url))
            .bearer_auth(&session.token)
            .send()
            .await?;
        parse(response).await
    }

    // --- cart, with shadow fallback ---

    pub async fn get_cart(&mut self, user_id: &str) -> Result<CartState, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/cart/{user_id}", self.base_url))
            .send()
            .await;
        match response {
            Ok(response) => {
                let summary: CartSummary = parse(response).await?;
                self.sync_shadow(&summary);
                Ok(CartState::Synced(summary))
            }
            Err(err) if is_unreachable(&err) => Ok(CartState::Local(self.shadow.summary())),
            Err(err) => Err(err.into()),
        }
    }

    /// Add an item to the cart. The full catalog item is taken (not just its
    /// id) so the shadow copy can price the line while offline.
    pub async fn add_to_cart(
        &mut self,
        user_id: &str,
        item: &ClothingItem,
        quantity: i32,
    ) -> Result<CartState, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/cart/{user_id}/add", self.base_url))
            .json(&AddToCartRequest {
                clothes_id: item.id,
                quantity,
            })
            .send()
            .await;
        match response {
            Ok(response) => {
                let summary: CartSummary = parse(response).await?;
                self.sync_shadow(&summary);
                Ok(CartState::Synced(summary))
            }
            Err(err) if is_unreachable(&err) => {
                if quantity >= 1 {
                    self.shadow.merge_add(item, quantity);
                    self.persist_shadow();
                }
                Ok(CartState::Local(self.shadow.summary()))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn update_quantity(
        &mut self,
        user_id: &str,
        clothes_id: Uuid,
        quantity: i32,
    ) -> Result<CartState, ClientError> {
        let response = self
            .http
            .put(format!(
                "{}/api/cart/{user_id}/update/{clothes_id}",
                self.base_url
            ))
            .json(&UpdateQuantityRequest { quantity })
            .send()
            .await;
        match response {
            Ok(response) => {
                let summary: CartSummary = parse(response).await?;
                self.sync_shadow(&summary);
                Ok(CartState::Synced(summary))
            }
            Err(err) if is_unreachable(&err) => {
                if quantity >= 1 {
                    self.shadow.set_quantity(clothes_id, quantity);
                    self.persist_shadow();
                }
                Ok(CartState::Local(self.shadow.summary()))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn remove_from_cart(
        &mut self,
        user_id: &str,
        clothes_id: Uuid,
    ) -> Result<CartState, ClientError> {
        let response = self
            .http
            .delete(format!(
                "{}/api/cart/{user_id}/remove/{clothes_id}",
                self.base_url
            ))
            .send()
            .await;
        match response {
            Ok(response) => {
                let summary: CartSummary = parse(response).await?;
                self.sync_shadow(&summary);
                Ok(CartState::Synced(summary))
            }
            Err(err) if is_unreachable(&err) => {
                self.shadow.remove(clothes_id);
                self.persist_shadow();
                Ok(CartState::Local(self.shadow.summary()))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn clear_cart(&mut self, user_id: &str) -> Result<CartState, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/cart/{user_id}/clear", self.base_url))
            .send()
            .await;
        match response {
            Ok(response) => {
                let summary: CartSummary = parse(response).await?;
                self.sync_shadow(&summary);
                Ok(CartState::Synced(summary))
            }
            Err(err) if is_unreachable(&err) => {
                self.shadow.clear();
                self.persist_shadow();
                Ok(CartState::Local(self.shadow.summary()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn sync_shadow(&mut self, summary: &CartSummary) {
        self.shadow.replace_from(summary);
        self.persist_shadow();
    }

    fn persist_shadow(&self) {
        if let Err(err) = self.shadow.save() {
            tracing::warn!(error = %err, "shadow cart persist failed");
        }
    }
}

fn is_unreachable(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response.json::<T>().await?)
    } else {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
