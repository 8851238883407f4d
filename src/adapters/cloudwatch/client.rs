//! CloudWatch Logs HTTP client
//!
//! Speaks the JSON 1.1 protocol: every operation is a signed `POST /` with an
//! `X-Amz-Target` header naming the operation.

use super::models::{
    CreateExportTaskRequest, CreateExportTaskResponse, DescribeExportTasksRequest,
    DescribeExportTasksResponse, ServiceErrorBody,
};
use super::signing::{Credentials, RequestSigner};
use super::LogExportService;
use crate::config::AwsConfig;
use crate::domain::{CloudWatchError, ExportTaskId, LogshipError, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

const SERVICE_NAME: &str = "logs";
const TARGET_PREFIX: &str = "Logs_20140328";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// CloudWatch Logs client
///
/// # Example
///
/// ```no_run
/// use logship::adapters::cloudwatch::{CloudWatchLogsClient, LogExportService};
/// use logship::config::load_config;
///
/// # async fn example() -> logship::domain::Result<()> {
/// let config = load_config("logship.toml")?;
/// let client = CloudWatchLogsClient::new(&config.aws)?;
/// println!("Talking to {}", client.endpoint());
/// # Ok(())
/// # }
/// ```
pub struct CloudWatchLogsClient {
    endpoint: Url,
    client: Client,
    signer: RequestSigner,
}

impl CloudWatchLogsClient {
    /// Create a new client from AWS configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if credentials are missing, the endpoint
    /// is not a valid URL, or the HTTP client cannot be built.
    pub fn new(config: &AwsConfig) -> Result<Self> {
        let endpoint_str = config.endpoint_url();
        let endpoint = Url::parse(&endpoint_str).map_err(|e| {
            LogshipError::Configuration(format!("Invalid CloudWatch Logs endpoint {endpoint_str}: {e}"))
        })?;

        let access_key_id = config
            .access_key_id
            .clone()
            .ok_or_else(|| LogshipError::Configuration("aws.access_key_id is required".to_string()))?;
        let secret_access_key = config.secret_access_key.clone().ok_or_else(|| {
            LogshipError::Configuration("aws.secret_access_key is required".to_string())
        })?;

        let credentials = Credentials {
            access_key_id,
            secret_access_key,
            session_token: config.session_token.clone(),
        };

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                LogshipError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        tracing::debug!(endpoint = %endpoint, region = %config.region, "Created CloudWatch Logs client");

        Ok(Self {
            endpoint,
            client,
            signer: RequestSigner::new(credentials, config.region.clone(), SERVICE_NAME),
        })
    }

    /// Sends one signed JSON 1.1 operation and decodes the response
    async fn call<Req, Resp>(&self, operation: &str, body: &Req) -> std::result::Result<Resp, CloudWatchError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)
            .map_err(|e| CloudWatchError::InvalidResponse(format!("Failed to encode request: {e}")))?;
        let target = format!("{TARGET_PREFIX}.{operation}");

        let headers = self.signer.sign_post(
            &self.endpoint,
            &[("content-type", CONTENT_TYPE), ("x-amz-target", &target)],
            &payload,
            Utc::now(),
        )?;

        tracing::debug!(operation = %operation, endpoint = %self.endpoint, "Calling CloudWatch Logs");

        let mut request = self.client.post(self.endpoint.clone());
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let resp = request.body(payload).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            let error_body: ServiceErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
            let message = error_body
                .message
                .clone()
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
            let error_type = error_body.short_type();

            tracing::warn!(
                operation = %operation,
                status = status.as_u16(),
                error_type = %error_type,
                message = %message,
                "CloudWatch Logs rejected request"
            );

            return Err(CloudWatchError::Service {
                status: status.as_u16(),
                error_type,
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            CloudWatchError::InvalidResponse(format!("Failed to decode {operation} response: {e}"))
        })
    }
}

#[async_trait]
impl LogExportService for CloudWatchLogsClient {
    async fn create_export_task(
        &self,
        request: &CreateExportTaskRequest,
    ) -> std::result::Result<CreateExportTaskResponse, CloudWatchError> {
        self.call("CreateExportTask", request).await
    }

    async fn describe_export_task(
        &self,
        task_id: &ExportTaskId,
    ) -> std::result::Result<DescribeExportTasksResponse, CloudWatchError> {
        let request = DescribeExportTasksRequest {
            task_id: task_id.to_string(),
        };
        self.call("DescribeExportTasks", &request).await
    }

    fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}
