//! Blocking HTTP client for the generation service, available with the `http` feature.

use std::sync::Arc;

use crate::foundation::error::{EditorError, EditorResult};
#[cfg(feature = "http")]
use crate::service::api::{
    CheckoutSession, GenerateResponse, JobList, JobRecord, PaymentType, PortalSession, ServiceApi,
    SubscriptionStatus,
};
use crate::service::api::TokenProvider;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Service client over `reqwest`'s blocking API.
pub struct HttpServiceClient {
    base_url: String,
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    tokens: Arc<dyn TokenProvider>,
    #[cfg(feature = "http")]
    client: reqwest::blocking::Client,
}

impl std::fmt::Debug for HttpServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpServiceClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpServiceClient {
    /// Build a client for `base_url` (trailing slashes are ignored).
    #[cfg(feature = "http")]
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> EditorResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            return Err(EditorError::validation("service base url is empty"));
        }
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("avatar-editor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EditorError::service(format!("build http client: {e}")))?;
        Ok(Self {
            base_url,
            tokens,
            client,
        })
    }

    /// Without the `http` feature there is no transport.
    #[cfg(not(feature = "http"))]
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> EditorResult<Self> {
        let _ = (base_url.into(), tokens);
        Err(EditorError::service(
            "http service client requires the 'http' feature",
        ))
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[cfg(feature = "http")]
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[cfg(feature = "http")]
impl HttpServiceClient {
    fn authorized(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> EditorResult<reqwest::blocking::RequestBuilder> {
        Ok(match self.tokens.token()? {
            Some(token) => req.bearer_auth(token),
            None => req,
        })
    }

    fn send<T: serde::de::DeserializeOwned>(
        &self,
        req: reqwest::blocking::RequestBuilder,
        what: &str,
    ) -> EditorResult<T> {
        let resp = self
            .authorized(req)?
            .send()
            .map_err(|e| EditorError::service(format!("{what}: failed to reach service: {e}")))?;
        let resp = check_response(resp, what)?;
        resp.json::<T>()
            .map_err(|e| EditorError::service(format!("{what}: unexpected response body: {e}")))
    }
}

#[cfg(feature = "http")]
fn check_response(
    resp: reqwest::blocking::Response,
    what: &str,
) -> EditorResult<reqwest::blocking::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let detail = resp
        .text()
        .ok()
        .and_then(|body| {
            serde_json::from_str::<serde_json::Value>(&body)
                .ok()?
                .get("detail")?
                .as_str()
                .map(String::from)
        })
        .unwrap_or_default();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        tracing::warn!(what, "service rejected credentials");
        return Err(EditorError::unauthorized(format!(
            "{what}: sign in again ({detail})"
        )));
    }
    Err(EditorError::service(format!("{what} failed ({status}): {detail}")))
}

#[cfg(feature = "http")]
impl ServiceApi for HttpServiceClient {
    fn health(&self) -> EditorResult<serde_json::Value> {
        self.send(self.client.get(self.url("/health")), "health check")
    }

    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    fn submit_job(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        session_id: Option<&str>,
    ) -> EditorResult<GenerateResponse> {
        let mime = match image::guess_format(&bytes) {
            Ok(image::ImageFormat::Png) => "image/png",
            Ok(image::ImageFormat::WebP) => "image/webp",
            _ => "image/jpeg",
        };
        let part = reqwest::blocking::multipart::Part::bytes(bytes)
            .file_name(file_name.to_owned())
            .mime_str(mime)
            .map_err(|e| EditorError::service(format!("build upload: {e}")))?;
        let form = reqwest::blocking::multipart::Form::new().part("file", part);
        let mut req = self.client.post(self.url("/api/generate")).multipart(form);
        if let Some(id) = session_id {
            req = req.query(&[("session_id", id)]);
        }
        self.send(req, "submit job")
    }

    fn job_status(&self, job_id: &str) -> EditorResult<JobRecord> {
        self.send(
            self.client.get(self.url(&format!("/api/jobs/{job_id}"))),
            "job status",
        )
    }

    fn list_jobs(&self, limit: u32) -> EditorResult<JobList> {
        self.send(
            self.client
                .get(self.url("/api/jobs"))
                .query(&[("limit", limit)]),
            "list jobs",
        )
    }

    fn create_checkout_session(&self, payment_type: PaymentType) -> EditorResult<CheckoutSession> {
        self.send(
            self.client
                .post(self.url("/api/payments/create-checkout-session"))
                .json(&serde_json::json!({ "payment_type": payment_type })),
            "create checkout session",
        )
    }

    fn create_portal_session(&self) -> EditorResult<PortalSession> {
        self.send(
            self.client
                .post(self.url("/api/payments/create-portal-session")),
            "create portal session",
        )
    }

    fn subscription_status(&self) -> EditorResult<SubscriptionStatus> {
        self.send(
            self.client
                .get(self.url("/api/payments/subscription-status")),
            "subscription status",
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/service/http.rs"]
mod tests;
