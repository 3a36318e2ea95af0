//! HTTP client for the order backend.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use crate::config::Config;
use crate::domain::aggregates::Order;
use crate::{Result, StorefrontError};

/// Envelope the order backend wraps listings in.
#[derive(Debug, Deserialize)]
struct OrdersEnvelope {
    #[serde(default)]
    data: Vec<Order>,
}

#[derive(Debug, Clone)]
pub struct OrderClient {
    client: Client,
    url: String,
}

impl OrderClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.upstream_timeout).build()?;
        Ok(Self { client, url: config.orders_api_url.clone() })
    }

    pub fn url(&self) -> &str { &self.url }

    /// Fetches every order visible to the bearer of `token`.
    pub async fn fetch_orders(&self, token: &str) -> Result<Vec<Order>> {
        let response = self.client.get(&self.url).bearer_auth(token).send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StorefrontError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorefrontError::Upstream { status: status.as_u16(), body });
        }
        let envelope: OrdersEnvelope = response.json().await?;
        tracing::debug!(url = %self.url, orders = envelope.data.len(), "fetched orders");
        Ok(envelope.data)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::{http::HeaderMap, http::StatusCode as AxumStatus, routing::get, Json, Router};
    use tokio::net::TcpListener;

    pub(crate) const TOKEN: &str = "secret-token";

    /// Serves a fixed order listing at `/api/checkout` for requests carrying
    /// [`TOKEN`]; anything else gets a 401.
    pub(crate) async fn spawn_backend(listing: serde_json::Value) -> String {
        let app = Router::new().route("/api/checkout", get(move |headers: HeaderMap| {
            let listing = listing.clone();
            async move {
                let authorized = headers.get("authorization").and_then(|v| v.to_str().ok()) == Some(&format!("Bearer {}", TOKEN)[..]);
                if authorized { Ok(Json(listing)) } else { Err(AxumStatus::UNAUTHORIZED) }
            }
        })).route("/api/broken", get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "boom") }));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{}", addr)
    }

    fn client_for(url: String) -> OrderClient {
        OrderClient::new(&Config { orders_api_url: url, ..Config::default() }).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_orders() {
        let base = spawn_backend(serde_json::json!({"success": true, "data": [
            {"_id": "o1", "createdAt": "2024-01-01T00:00:00.000Z", "status": "delivered",
             "items": [{"name": "A", "price": 10, "quantity": 2, "sellerEmail": "r@x.com"}]}
        ]})).await;
        let orders = client_for(format!("{}/api/checkout", base)).fetch_orders(TOKEN).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].items[0].quantity(), 2);
    }

    #[tokio::test]
    async fn test_rejected_token() {
        let base = spawn_backend(serde_json::json!({"data": []})).await;
        let err = client_for(format!("{}/api/checkout", base)).fetch_orders("stale").await.unwrap_err();
        assert!(matches!(err, StorefrontError::Unauthorized));
    }

    #[tokio::test]
    async fn test_upstream_failure() {
        let base = spawn_backend(serde_json::json!({"data": []})).await;
        let err = client_for(format!("{}/api/broken", base)).fetch_orders(TOKEN).await.unwrap_err();
        assert!(matches!(err, StorefrontError::Upstream { status: 500, .. }));
        assert!(err.is_fetch_failure());
    }
}
