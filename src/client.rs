//! High-level resource client for the BasaltPass S2S API.

use log::debug;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{HttpClient, decode};
use crate::models::{Id, MessagePage, Product, Role, User, UserWallet};

/// All S2S endpoints live under this prefix.
const API_PREFIX: &str = "/api/v1/s2s";

/// Client for server-to-server calls against a BasaltPass deployment.
///
/// One method per remote resource; every operation is a GET, executed with
/// the configured credential headers, timeout, and transient-failure retry
/// policy. Each call is independent and returns a fresh entity snapshot;
/// the client holds no cache and no per-call state, so it is safe to share
/// across tasks. Dropping the client releases its connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use basaltpass_s2s::{ClientConfig, S2sClient};
///
/// # async fn example() -> Result<(), basaltpass_s2s::ClientError> {
/// let client = S2sClient::new(ClientConfig::new(
///     "https://id.example.com",
///     "svc-billing",
///     "s3cret",
/// ))?;
///
/// let user = client.get_user(42).await?;
/// println!("nickname: {:?}", user.nickname);
///
/// let wallet = client.get_user_wallet(42, "USD", Some(10)).await?;
/// println!("balance: {} minor units", wallet.balance);
/// # Ok(())
/// # }
/// ```
pub struct S2sClient {
    http: HttpClient,
}

/// Wire shape of the roles endpoint payload.
#[derive(Debug, Deserialize)]
struct RoleListPayload {
    #[serde(default)]
    roles: Vec<Role>,
}

/// Wire shape of the permissions endpoint payload. Shares the `roles` key
/// with [`RoleListPayload`] but carries plain code strings; the two must
/// never share a decode path.
#[derive(Debug, Deserialize)]
struct RoleCodesPayload {
    #[serde(default)]
    roles: Vec<String>,
}

/// Wire shape of the products endpoint payload.
#[derive(Debug, Deserialize)]
struct ProductListPayload {
    #[serde(default)]
    products: Vec<Product>,
}

impl S2sClient {
    /// Creates a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is malformed, a credential or extra
    /// header is not a valid HTTP header, or the HTTP client cannot be
    /// initialized.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = HttpClient::new(&config)?;
        Ok(Self { http })
    }

    /// Creates a client with default transport settings.
    pub fn connect(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ClientError> {
        Self::new(ClientConfig::new(base_url, client_id, client_secret))
    }

    /// The configured base URL, with trailing slashes stripped.
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ClientError> {
        let response = self.http.send(Method::GET, path, query).await?;
        decode(response).await
    }

    /// Fetches a user by id.
    pub async fn get_user(&self, user_id: Id) -> Result<User, ClientError> {
        debug!(user_id = user_id; "S2S: Fetching user");
        let payload = self.get_json(&format!("{API_PREFIX}/users/{user_id}"), &[]).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Fetches a user's roles, optionally filtered to one tenant.
    ///
    /// A payload without a `roles` list maps to an empty vector, not an
    /// error.
    pub async fn get_user_roles(&self, user_id: Id, tenant_id: Option<Id>) -> Result<Vec<Role>, ClientError> {
        debug!(user_id = user_id; "S2S: Fetching user roles");
        let mut query = Vec::new();
        if let Some(tenant_id) = tenant_id {
            query.push(("tenant_id", tenant_id.to_string()));
        }
        let payload = self
            .get_json(&format!("{API_PREFIX}/users/{user_id}/roles"), &query)
            .await?;
        let payload: RoleListPayload = serde_json::from_value(payload)?;
        Ok(payload.roles)
    }

    /// Fetches a user's role codes (the permissions endpoint).
    ///
    /// The payload uses the same `roles` key as [`get_user_roles`] but the
    /// elements are plain strings.
    ///
    /// [`get_user_roles`]: S2sClient::get_user_roles
    pub async fn get_user_role_codes(
        &self,
        user_id: Id,
        tenant_id: Option<Id>,
    ) -> Result<Vec<String>, ClientError> {
        debug!(user_id = user_id; "S2S: Fetching user role codes");
        let mut query = Vec::new();
        if let Some(tenant_id) = tenant_id {
            query.push(("tenant_id", tenant_id.to_string()));
        }
        let payload = self
            .get_json(&format!("{API_PREFIX}/users/{user_id}/permissions"), &query)
            .await?;
        let payload: RoleCodesPayload = serde_json::from_value(payload)?;
        Ok(payload.roles)
    }

    /// Fetches a user's wallet for one currency.
    ///
    /// `limit` bounds the returned transaction list; when unset the server
    /// default applies and no `limit` query key is sent.
    pub async fn get_user_wallet(
        &self,
        user_id: Id,
        currency: &str,
        limit: Option<u32>,
    ) -> Result<UserWallet, ClientError> {
        debug!(user_id = user_id, currency = currency; "S2S: Fetching user wallet");
        let mut query = vec![("currency", currency.to_owned())];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        let payload = self
            .get_json(&format!("{API_PREFIX}/users/{user_id}/wallets"), &query)
            .await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Fetches one page of a user's messages.
    ///
    /// All filters are optional and omitted from the query string when
    /// unset. Missing pagination metadata in the response defaults per
    /// [`MessagePage`].
    pub async fn get_user_messages(
        &self,
        user_id: Id,
        status: Option<&str>,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<MessagePage, ClientError> {
        debug!(user_id = user_id; "S2S: Fetching user messages");
        let mut query = Vec::new();
        if let Some(status) = status {
            query.push(("status", status.to_owned()));
        }
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        if let Some(page_size) = page_size {
            query.push(("page_size", page_size.to_string()));
        }
        let payload = self
            .get_json(&format!("{API_PREFIX}/users/{user_id}/messages"), &query)
            .await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Fetches the products a user is entitled to.
    pub async fn get_user_products(&self, user_id: Id) -> Result<Vec<Product>, ClientError> {
        debug!(user_id = user_id; "S2S: Fetching user products");
        let payload = self
            .get_json(&format!("{API_PREFIX}/users/{user_id}/products"), &[])
            .await?;
        let payload: ProductListPayload = serde_json::from_value(payload)?;
        Ok(payload.products)
    }

    /// Checks whether a user owns a product.
    ///
    /// The payload shape is caller-defined, so it is passed through as raw
    /// JSON instead of being mapped to a named entity.
    pub async fn check_user_product_ownership(
        &self,
        user_id: Id,
        product_id: Id,
    ) -> Result<Value, ClientError> {
        debug!(user_id = user_id, product_id = product_id; "S2S: Checking product ownership");
        self.get_json(
            &format!("{API_PREFIX}/users/{user_id}/products/{product_id}/ownership"),
            &[],
        )
        .await
    }
}
