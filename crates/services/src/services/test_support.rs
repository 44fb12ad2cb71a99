use axum::Router;
use url::Url;

use super::{config::ClientConfig, http_client::ApiClient};

/// Serve `app` on an ephemeral local port and return its base URL.
pub(crate) async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub(crate) fn client_for(base: &str) -> ApiClient {
    ApiClient::new(ClientConfig::new(Url::parse(base).unwrap())).unwrap()
}
