//! Wire types and the client trait for the avatar generation service.
//!
//! Field names follow the service's snake_case JSON. Optional fields tolerate both absence and
//! `null`.

use crate::foundation::error::EditorResult;

/// Lifecycle of a generation job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, waiting for a worker.
    Queued,
    /// A worker is generating the avatar.
    Processing,
    /// Output is available at `output_image_url`.
    Completed,
    /// Generation failed; see `error_message`.
    Failed,
}

impl JobStatus {
    /// Completed and failed jobs never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Extra job details reported by the worker.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JobMetadata {
    /// Seconds spent generating.
    #[serde(default)]
    pub processing_time: Option<f64>,
    /// Model identifier.
    #[serde(default)]
    pub model_used: Option<String>,
}

/// A generation job as reported by the service.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JobRecord {
    /// Job id.
    pub job_id: String,
    /// Owner.
    pub user_id: String,
    /// Current status.
    pub status: JobStatus,
    /// Uploaded photo.
    pub input_image_url: String,
    /// Generated avatar, once completed.
    #[serde(default)]
    pub output_image_url: Option<String>,
    /// Creation timestamp (RFC 3339, passed through verbatim).
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
    /// Failure reason, for failed jobs.
    #[serde(default)]
    pub error_message: Option<String>,
    /// Worker metadata.
    #[serde(default)]
    pub metadata: Option<JobMetadata>,
}

/// Reply to a job submission.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenerateResponse {
    /// New job id.
    pub job_id: String,
    /// Initial status (normally `queued`).
    pub status: JobStatus,
    /// Human-readable note.
    pub message: String,
}

/// A page of the caller's jobs.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JobList {
    /// Jobs, newest first.
    pub jobs: Vec<JobRecord>,
    /// Total number of jobs the caller owns.
    pub total: u64,
}

/// Purchase kind for checkout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Subscription.
    Pro,
    /// Single generation.
    Onetime,
}

/// Hosted checkout session.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CheckoutSession {
    /// Session id; passed back on submission for one-time purchases.
    pub session_id: String,
    /// Redirect URL.
    pub url: String,
}

/// Hosted billing portal session.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PortalSession {
    /// Redirect URL.
    pub url: String,
}

/// Caller's plan and usage.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SubscriptionStatus {
    /// Owner.
    pub user_id: String,
    /// Plan tier, e.g. `free` or `pro`.
    pub subscription_tier: String,
    /// Billing provider status.
    #[serde(default)]
    pub subscription_status: Option<String>,
    /// Generations used in the current period.
    pub usage_count: u32,
    /// Generations allowed in the current period.
    pub usage_limit: u32,
    /// Trial end timestamp.
    #[serde(default)]
    pub trial_end: Option<String>,
    /// Current period end timestamp.
    #[serde(default)]
    pub current_period_end: Option<String>,
    /// Whether a payment method is on file.
    pub has_payment_method: bool,
}

impl SubscriptionStatus {
    /// Generations left in the current period.
    pub fn remaining_usage(&self) -> u32 {
        self.usage_limit.saturating_sub(self.usage_count)
    }
}

/// Supplies the bearer token attached to every request.
pub trait TokenProvider: Send + Sync {
    /// Current token, or `None` when signed out (requests are then sent unauthenticated).
    fn token(&self) -> EditorResult<Option<String>>;
}

/// A fixed token.
#[derive(Clone, Debug)]
pub struct StaticToken(pub Option<String>);

impl TokenProvider for StaticToken {
    fn token(&self) -> EditorResult<Option<String>> {
        Ok(self.0.clone())
    }
}

/// Operations the editor front end needs from the generation service.
pub trait ServiceApi {
    /// Liveness probe; returns the service's raw reply.
    fn health(&self) -> EditorResult<serde_json::Value>;

    /// Upload a photo for generation. `session_id` ties the job to a one-time checkout.
    fn submit_job(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        session_id: Option<&str>,
    ) -> EditorResult<GenerateResponse>;

    /// Fetch one job.
    fn job_status(&self, job_id: &str) -> EditorResult<JobRecord>;

    /// List the caller's most recent jobs.
    fn list_jobs(&self, limit: u32) -> EditorResult<JobList>;

    /// Start a checkout.
    fn create_checkout_session(&self, payment_type: PaymentType) -> EditorResult<CheckoutSession>;

    /// Open the billing portal.
    fn create_portal_session(&self) -> EditorResult<PortalSession>;

    /// Caller's plan and usage.
    fn subscription_status(&self) -> EditorResult<SubscriptionStatus>;
}

#[cfg(test)]
#[path = "../../tests/unit/service/api.rs"]
mod tests;
