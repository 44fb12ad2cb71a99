//! PayPal REST client used by the payment routes.
//!
//! Only the calls the routes forward are modelled: orders (create, capture),
//! subscriptions (create, get) and client tokens for hosted fields. The access
//! token is cached until shortly before it expires.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use backon::{ExponentialBuilder, Retryable};
use reqwest::{Client, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use ts_rs::TS;
use url::Url;

pub const SANDBOX_API_BASE: &str = "https://api-m.sandbox.paypal.com";
pub const LIVE_API_BASE: &str = "https://api-m.paypal.com";

const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Error)]
pub enum PaypalError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("paypal http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("paypal rejected the client credentials")]
    InvalidCredentials,
    #[error("paypal resource not found: {0}")]
    NotFound(String),
    #[error("json error: {0}")]
    Serde(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl PaypalError {
    /// Returns true if the error is transient and should be retried.
    pub fn should_retry(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Http { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}

pub struct PaypalCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
    pub api_base: Url,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Money {
    pub currency_code: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct PurchaseUnit {
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct CreateOrderBody<'a> {
    intent: &'static str,
    purchase_units: [&'a PurchaseUnit; 1],
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Link {
    pub href: String,
    pub rel: String,
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Order {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Capture result. Purchase units are passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct OrderCapture {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub purchase_units: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSubscription {
    pub plan_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_context: Option<ApplicationContext>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationContext {
    pub return_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Subscription {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ClientToken {
    pub client_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl Order {
    /// URL the payer is sent to for approval.
    pub fn approve_link(&self) -> Option<&str> {
        approve_link(&self.links)
    }
}

impl Subscription {
    pub fn approve_link(&self) -> Option<&str> {
        approve_link(&self.links)
    }
}

fn approve_link(links: &[Link]) -> Option<&str> {
    links
        .iter()
        .find(|link| link.rel == "approve" || link.rel == "payer-action")
        .map(|link| link.href.as_str())
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    value: SecretString,
    expires_at: Instant,
}

struct Inner {
    http: Client,
    credentials: PaypalCredentials,
    token: RwLock<Option<CachedToken>>,
}

#[derive(Clone)]
pub struct PaypalClient {
    inner: Arc<Inner>,
}

impl PaypalClient {
    pub fn new(credentials: PaypalCredentials) -> Result<Self, PaypalError> {
        let http = Client::builder()
            .user_agent(concat!("atelier-payments/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PaypalError::Transport(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                credentials,
                token: RwLock::new(None),
            }),
        })
    }

    pub async fn create_order(&self, unit: &PurchaseUnit) -> Result<Order, PaypalError> {
        let body = CreateOrderBody {
            intent: "CAPTURE",
            purchase_units: [unit],
        };
        let order: Order = self
            .request(Method::POST, &["v2", "checkout", "orders"], Some(&body))
            .await?;
        info!(order_id = %order.id, status = %order.status, "PayPal order created");
        Ok(order)
    }

    pub async fn capture_order(&self, order_id: &str) -> Result<OrderCapture, PaypalError> {
        let capture: OrderCapture = self
            .request(
                Method::POST,
                &["v2", "checkout", "orders", order_id, "capture"],
                Some(&serde_json::json!({})),
            )
            .await?;
        info!(order_id = %capture.id, status = %capture.status, "PayPal order captured");
        Ok(capture)
    }

    pub async fn create_subscription(&self, body: &CreateSubscription) -> Result<Subscription, PaypalError> {
        let subscription: Subscription = self
            .request(Method::POST, &["v1", "billing", "subscriptions"], Some(body))
            .await?;
        info!(
            subscription_id = %subscription.id,
            plan_id = %body.plan_id,
            "PayPal subscription created"
        );
        Ok(subscription)
    }

    pub async fn get_subscription(&self, subscription_id: &str) -> Result<Subscription, PaypalError> {
        self.request::<_, ()>(Method::GET, &["v1", "billing", "subscriptions", subscription_id], None)
            .await
    }

    pub async fn generate_client_token(&self) -> Result<ClientToken, PaypalError> {
        self.request(
            Method::POST,
            &["v1", "identity", "generate-token"],
            Some(&serde_json::json!({})),
        )
        .await
    }

    async fn request<T, B>(&self, method: Method, segments: &[&str], body: Option<&B>) -> Result<T, PaypalError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(segments)?;
        let token = self.access_token().await?;

        debug!(%method, %url, "PayPal request");
        let mut request = self
            .inner
            .http
            .request(method, url)
            .bearer_auth(token.expose_secret());
        if let Some(body) = body {
            request = request.json(body);
        }

        let res = request
            .send()
            .await
            .map_err(|e| PaypalError::Transport(e.to_string()))?;

        match res.status() {
            s if s.is_success() => res
                .json::<T>()
                .await
                .map_err(|e| PaypalError::Serde(e.to_string())),
            StatusCode::UNAUTHORIZED => {
                // Token revoked early; drop it so the next call fetches a fresh one.
                *self.inner.token.write().await = None;
                Err(PaypalError::Http {
                    status: 401,
                    body: res.text().await.unwrap_or_default(),
                })
            }
            StatusCode::NOT_FOUND => Err(PaypalError::NotFound(format!("/{}", segments.join("/")))),
            s => {
                let status = s.as_u16();
                let body = res.text().await.unwrap_or_default();
                warn!(status, %body, "PayPal returned an error status");
                Err(PaypalError::Http { status, body })
            }
        }
    }

    async fn access_token(&self) -> Result<SecretString, PaypalError> {
        if let Some(cached) = self.inner.token.read().await.as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(SecretString::from(cached.value.expose_secret().to_string()));
            }
        }

        let mut slot = self.inner.token.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if let Some(cached) = slot.as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(SecretString::from(cached.value.expose_secret().to_string()));
            }
        }

        let fetched = (|| async { self.fetch_token().await })
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(200))
                    .with_max_delay(Duration::from_secs(5))
                    .with_max_times(3)
                    .with_jitter(),
            )
            .when(|e: &PaypalError| e.should_retry())
            .notify(|e, dur| {
                warn!(
                    "PayPal token request failed, retrying after {:.2}s: {}",
                    dur.as_secs_f64(),
                    e
                )
            })
            .await?;

        let lifetime = Duration::from_secs(fetched.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        let token = fetched.access_token;
        *slot = Some(CachedToken {
            value: SecretString::from(token.clone()),
            expires_at: Instant::now() + lifetime,
        });
        debug!(expires_in = fetched.expires_in, "Fetched PayPal access token");

        Ok(SecretString::from(token))
    }

    async fn fetch_token(&self) -> Result<TokenResponse, PaypalError> {
        let url = self.url(&["v1", "oauth2", "token"])?;
        let credentials = &self.inner.credentials;

        let res = self
            .inner
            .http
            .post(url)
            .basic_auth(&credentials.client_id, Some(credentials.client_secret.expose_secret()))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| PaypalError::Transport(e.to_string()))?;

        match res.status() {
            s if s.is_success() => res
                .json::<TokenResponse>()
                .await
                .map_err(|e| PaypalError::Serde(e.to_string())),
            StatusCode::UNAUTHORIZED => Err(PaypalError::InvalidCredentials),
            s => Err(PaypalError::Http {
                status: s.as_u16(),
                body: res.text().await.unwrap_or_default(),
            }),
        }
    }

    /// Append `segments` to the API base. Each one is percent-encoded as a
    /// single path segment, so provider ids cannot add path components.
    fn url(&self, segments: &[&str]) -> Result<Url, PaypalError> {
        let mut url = self.inner.credentials.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                PaypalError::InvalidUrl(format!("{} cannot be a base", self.inner.credentials.api_base))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
