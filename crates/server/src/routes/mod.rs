use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub mod health;
pub mod orders;
pub mod paypal;
pub mod subscriptions;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(subscriptions::router())
        .merge(paypal::router());

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use secrecy::SecretString;
    use serde_json::Value;
    use services::services::paypal_checkout::{PaypalClient, PaypalCredentials};
    use tower::ServiceExt;
    use url::Url;

    use crate::{AppState, config::CheckoutSettings};

    /// Serve a fake provider and build the app router against it.
    pub(crate) async fn app_with_provider(provider: Router, checkout: CheckoutSettings) -> Router {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, provider).await.unwrap();
        });

        let paypal = PaypalClient::new(PaypalCredentials {
            client_id: "client".into(),
            client_secret: SecretString::from("secret"),
            api_base: Url::parse(&format!("http://{addr}")).unwrap(),
        })
        .unwrap();
        super::router(AppState::new(paypal, checkout))
    }

    pub(crate) async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    pub(crate) fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub(crate) fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    pub(crate) fn token_route() -> Router {
        Router::new().route(
            "/v1/oauth2/token",
            axum::routing::post(|| async {
                axum::Json(serde_json::json!({ "access_token": "A21", "expires_in": 32400 }))
            }),
        )
    }
}
