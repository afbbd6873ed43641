use raksha_protocol::Alert;
use raksha_protocol::AnomalyDraft;
use raksha_protocol::AnomalyType;
use raksha_protocol::EscalationDraft;
use raksha_protocol::ExplanationResponse;
use raksha_protocol::Guidance;
use raksha_protocol::PanicDraft;
use raksha_protocol::RiskLevel;
use reqwest::Response;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use tracing::warn;

use crate::endpoints::Endpoints;
use crate::error::ApiError;
use crate::error::ApiResult;
use crate::live::AlertSubscription;

/// Thin request/response and subscribe wrapper around the alert backend.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl GatewayClient {
    /// Creates a client for the backend at `api_base`.
    pub fn new(api_base: &str) -> ApiResult<Self> {
        let endpoints = Endpoints::new(api_base)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("raksha/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, endpoints })
    }

    /// Creates a client with a custom HTTP client.
    pub fn with_client(http: reqwest::Client, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Submit a panic alert. A blank user id is sent as "Unknown User".
    pub async fn send_panic(&self, draft: &PanicDraft) -> ApiResult<Value> {
        self.post_json(&self.endpoints.panic(), &draft.to_request())
            .await
    }

    pub async fn send_anomaly(&self, draft: &AnomalyDraft) -> ApiResult<Value> {
        self.post_json(&self.endpoints.anomaly(), &draft.to_request())
            .await
    }

    /// Submit an escalation. The free-text contact list is split into
    /// trimmed, non-empty entries before sending.
    pub async fn send_escalation(&self, draft: &EscalationDraft) -> ApiResult<Value> {
        self.post_json(&self.endpoints.escalate(), &draft.to_request())
            .await
    }

    pub async fn get_explanation(&self, anomaly_type: AnomalyType) -> ApiResult<String> {
        let url = self.endpoints.explanation(anomaly_type.as_ref());
        let response: ExplanationResponse = self.get_json(&url).await?;
        Ok(response.explanation)
    }

    pub async fn get_guidance(&self, location: &str, risk: RiskLevel) -> ApiResult<Guidance> {
        let url = self.endpoints.guidance(location, risk);
        self.get_json(&url).await
    }

    /// Open the live alert channel. Each inbound frame is decoded as one
    /// [`Alert`] and handed to `on_alert`. The connection is not re-opened if
    /// it drops.
    pub async fn subscribe_alerts<F>(&self, on_alert: F) -> ApiResult<AlertSubscription>
    where
        F: FnMut(Alert) + Send + 'static,
    {
        AlertSubscription::connect(&self.endpoints.live(), on_alert).await
    }

    async fn post_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> ApiResult<Value> {
        debug!("POST {url}");
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await?;
        decode(ensure_success("POST", url, response).await?, url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self.http.get(url).send().await?;
        decode(ensure_success("GET", url, response).await?, url).await
    }
}

async fn ensure_success(method: &'static str, url: &str, response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let err = ApiError::Status {
        method,
        url: url.to_string(),
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
        body,
    };
    warn!("{err}");
    Err(err)
}

async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> ApiResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}
