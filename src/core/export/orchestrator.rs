//! Export orchestrator
//!
//! Drives one export from start to finish: compute the window, create the
//! export task, then poll its status with backoff until it completes.

use super::request::{ExportOutcome, ExportRequest, PollReport};
use super::status::ExportStatus;
use crate::adapters::cloudwatch::{CreateExportTaskRequest, LogExportService};
use crate::core::backoff::BackoffPolicy;
use crate::core::window::{compute_window, derive_path_segment};
use crate::domain::{CloudWatchError, ExportTaskId, LogshipError, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Export orchestrator
///
/// # Example
///
/// ```no_run
/// use logship::adapters::cloudwatch::CloudWatchLogsClient;
/// use logship::config::load_config;
/// use logship::core::backoff::BackoffPolicy;
/// use logship::core::export::ExportOrchestrator;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config("logship.toml")?;
/// let client = CloudWatchLogsClient::new(&config.aws)?;
/// let orchestrator = ExportOrchestrator::new(Arc::new(client), BackoffPolicy::from(&config.polling));
///
/// let outcome = orchestrator.run(&config.export_request()).await?;
/// println!("{} -> {}", outcome.task_id, outcome.s3_export_path);
/// # Ok(())
/// # }
/// ```
pub struct ExportOrchestrator {
    service: Arc<dyn LogExportService>,
    backoff: BackoffPolicy,
    poll_timeout: Option<Duration>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl ExportOrchestrator {
    /// Create a new orchestrator without timeout or shutdown signal
    pub fn new(service: Arc<dyn LogExportService>, backoff: BackoffPolicy) -> Self {
        Self {
            service,
            backoff,
            poll_timeout: None,
            shutdown: None,
        }
    }

    /// Give up polling after `timeout` (no limit if `None`)
    pub fn with_poll_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Stop waiting once `true` is sent on `shutdown`
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Run an export for the window ending relative to the current time
    pub async fn run(&self, request: &ExportRequest) -> Result<ExportOutcome> {
        self.run_at(Utc::now(), request).await
    }

    /// Run an export with an explicit notion of "now"
    ///
    /// Any failure is returned as is; no partial outcome is produced.
    pub async fn run_at(&self, now: DateTime<Utc>, request: &ExportRequest) -> Result<ExportOutcome> {
        request.validate()?;

        let window = compute_window(now, request.days_back)?;
        let path = derive_path_segment(&request.destination_prefix, &window);

        tracing::info!(
            log_group = %request.log_group_name,
            bucket = %request.destination_bucket,
            window = %window,
            destination = %path,
            "Starting log export"
        );

        if self.is_shutdown() {
            return Err(LogshipError::Cancelled { task_id: None });
        }

        let task_id = self
            .submit_export(
                &request.log_group_name,
                window.start_millis(),
                window.end_millis(),
                &request.destination_bucket,
                path.as_str(),
            )
            .await?;

        let report = self.poll_until_complete(&task_id).await?;

        tracing::info!(
            task_id = %task_id,
            destination = %path,
            status_checks = report.status_checks,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Log export completed"
        );

        Ok(ExportOutcome {
            task_id,
            s3_export_path: path,
            status_checks: report.status_checks,
            elapsed: report.elapsed,
        })
    }

    /// Create the export task and return its id
    ///
    /// Submission is not retried: a second call would start a second task.
    pub async fn submit_export(
        &self,
        log_group: &str,
        window_start_ms: i64,
        window_end_ms: i64,
        bucket: &str,
        prefix: &str,
    ) -> Result<ExportTaskId> {
        if window_start_ms >= window_end_ms {
            return Err(LogshipError::InvalidInput(format!(
                "window start {window_start_ms} must be before end {window_end_ms}"
            )));
        }

        tracing::info!(
            log_group = %log_group,
            from_time = window_start_ms,
            to = window_end_ms,
            endpoint = %self.service.endpoint(),
            "Creating export task"
        );

        let request = CreateExportTaskRequest {
            log_group_name: log_group.to_string(),
            from_time: window_start_ms,
            to: window_end_ms,
            destination: bucket.to_string(),
            destination_prefix: prefix.to_string(),
        };

        let response = self
            .service
            .create_export_task(&request)
            .await
            .map_err(|err| match err {
                CloudWatchError::InvalidResponse(message) => {
                    LogshipError::submission_protocol(message)
                }
                other => LogshipError::SubmissionFailed(other),
            })?;

        let task_id = response
            .task_id
            .ok_or_else(|| LogshipError::submission_protocol("response has no taskId"))
            .and_then(|id| ExportTaskId::new(id).map_err(LogshipError::submission_protocol))?;

        tracing::info!(task_id = %task_id, "Export task created");
        Ok(task_id)
    }

    /// Poll the task until it completes
    ///
    /// The first query is immediate; each RUNNING answer is followed by the
    /// next delay of the backoff policy.
    pub async fn poll_until_complete(&self, task_id: &ExportTaskId) -> Result<PollReport> {
        let started = Instant::now();
        let mut delays = self.backoff.delays();
        let mut status_checks = 0u32;

        loop {
            status_checks += 1;
            let status = self.check_status(task_id, status_checks).await?;

            match status {
                ExportStatus::Completed => {
                    return Ok(PollReport {
                        status_checks,
                        elapsed: started.elapsed(),
                    });
                }
                ExportStatus::Failed(code) => {
                    tracing::error!(task_id = %task_id, code = %code, "Export task failed");
                    return Err(LogshipError::JobFailed {
                        task_id: task_id.clone(),
                        code,
                    });
                }
                ExportStatus::Running => {}
            }

            let mut delay = delays.next().unwrap_or(self.backoff.initial_delay);

            if let Some(limit) = self.poll_timeout {
                let waited = started.elapsed();
                if waited >= limit {
                    tracing::warn!(task_id = %task_id, waited_s = waited.as_secs(), "Giving up on export task");
                    return Err(LogshipError::PollTimeout {
                        task_id: task_id.clone(),
                        waited,
                    });
                }
                delay = delay.min(limit - waited);
            }

            tracing::info!(
                task_id = %task_id,
                attempt = status_checks,
                delay_ms = delay.as_millis() as u64,
                "Export task still running, waiting before next status check"
            );

            if self.sleep_or_shutdown(delay).await {
                tracing::warn!(
                    task_id = %task_id,
                    "Shutdown requested; export task keeps running on the service side"
                );
                return Err(LogshipError::Cancelled {
                    task_id: Some(task_id.clone()),
                });
            }
        }
    }

    async fn check_status(&self, task_id: &ExportTaskId, attempt: u32) -> Result<ExportStatus> {
        tracing::debug!(task_id = %task_id, attempt, "Checking export task status");

        let response = self
            .service
            .describe_export_task(task_id)
            .await
            .map_err(|err| match err {
                CloudWatchError::InvalidResponse(message) => LogshipError::status_protocol(message),
                source => LogshipError::StatusCheckFailed {
                    task_id: task_id.clone(),
                    source,
                },
            })?;

        let status = ExportStatus::from_response(response)?;
        tracing::debug!(task_id = %task_id, status = %status, "Export task status");
        Ok(status)
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Sleeps for `delay`; returns `true` if shutdown was requested meanwhile
    async fn sleep_or_shutdown(&self, delay: Duration) -> bool {
        let Some(mut shutdown) = self.shutdown.clone() else {
            tokio::time::sleep(delay).await;
            return false;
        };

        if *shutdown.borrow() {
            return true;
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => false,
            Ok(_) = shutdown.wait_for(|stop| *stop) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cloudwatch::{
        CreateExportTaskResponse, DescribeExportTasksResponse, ExportTaskDescription,
        ExportTaskStatus,
    };
    use crate::domain::ExportPhase;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    type Scripted<T> = std::result::Result<T, CloudWatchError>;

    /// Service double that replays scripted responses and records calls
    struct ScriptedService {
        create_response: Mutex<Option<Scripted<CreateExportTaskResponse>>>,
        describe_responses: Mutex<VecDeque<Scripted<DescribeExportTasksResponse>>>,
        create_calls: Mutex<Vec<CreateExportTaskRequest>>,
        describe_calls: Mutex<Vec<Instant>>,
    }

    impl ScriptedService {
        fn new(
            create: Scripted<CreateExportTaskResponse>,
            describe: Vec<Scripted<DescribeExportTasksResponse>>,
        ) -> Arc<Self> {
            Arc::new(Self {
                create_response: Mutex::new(Some(create)),
                describe_responses: Mutex::new(describe.into()),
                create_calls: Mutex::new(Vec::new()),
                describe_calls: Mutex::new(Vec::new()),
            })
        }

        fn create_calls(&self) -> Vec<CreateExportTaskRequest> {
            self.create_calls.lock().unwrap().clone()
        }

        fn describe_calls(&self) -> Vec<Instant> {
            self.describe_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LogExportService for ScriptedService {
        async fn create_export_task(
            &self,
            request: &CreateExportTaskRequest,
        ) -> Scripted<CreateExportTaskResponse> {
            self.create_calls.lock().unwrap().push(request.clone());
            self.create_response
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(CloudWatchError::ConnectionFailed("submitted twice".into())))
        }

        async fn describe_export_task(
            &self,
            _task_id: &ExportTaskId,
        ) -> Scripted<DescribeExportTasksResponse> {
            self.describe_calls.lock().unwrap().push(Instant::now());
            self.describe_responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(CloudWatchError::ConnectionFailed("script exhausted".into())))
        }

        fn endpoint(&self) -> &str {
            "mock://logs"
        }
    }

    fn created(task_id: &str) -> Scripted<CreateExportTaskResponse> {
        Ok(CreateExportTaskResponse {
            task_id: Some(task_id.to_string()),
        })
    }

    fn tasks(codes: &[&str]) -> Scripted<DescribeExportTasksResponse> {
        Ok(DescribeExportTasksResponse {
            export_tasks: Some(
                codes
                    .iter()
                    .map(|code| ExportTaskDescription {
                        task_id: Some("abc-123".to_string()),
                        status: Some(ExportTaskStatus {
                            code: Some(code.to_string()),
                            message: None,
                        }),
                        ..Default::default()
                    })
                    .collect(),
            ),
            next_token: None,
        })
    }

    fn status(code: &str) -> Scripted<DescribeExportTasksResponse> {
        tasks(&[code])
    }

    fn request() -> ExportRequest {
        ExportRequest {
            log_group_name: "/aws/lambda/orders".to_string(),
            destination_bucket: "log-archive".to_string(),
            destination_prefix: "orders".to_string(),
            days_back: 1,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 14, 0, 0, 0).unwrap()
    }

    const D0: Duration = Duration::from_millis(100);

    fn orchestrator(service: Arc<ScriptedService>) -> ExportOrchestrator {
        ExportOrchestrator::new(
            service,
            BackoffPolicy {
                initial_delay: D0,
                ..BackoffPolicy::default()
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_polls_with_doubling_delay_until_completed() {
        let service = ScriptedService::new(
            created("abc-123"),
            vec![status("RUNNING"), status("RUNNING"), status("COMPLETED")],
        );

        let outcome = orchestrator(service.clone())
            .run_at(fixed_now(), &request())
            .await
            .unwrap();

        let expected_path = derive_path_segment("orders", &compute_window(fixed_now(), 1).unwrap());
        assert_eq!(outcome.task_id.as_str(), "abc-123");
        assert_eq!(outcome.s3_export_path, expected_path);
        assert_eq!(outcome.status_checks, 3);

        let calls = service.describe_calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1] - calls[0], D0);
        assert_eq!(calls[2] - calls[1], D0 * 2);
    }

    #[tokio::test]
    async fn test_run_submits_window_and_dated_prefix() {
        let service = ScriptedService::new(created("abc-123"), vec![status("COMPLETED")]);

        orchestrator(service.clone())
            .run_at(fixed_now(), &request())
            .await
            .unwrap();

        let window = compute_window(fixed_now(), 1).unwrap();
        let calls = service.create_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            CreateExportTaskRequest {
                log_group_name: "/aws/lambda/orders".to_string(),
                from_time: window.start_millis(),
                to: window.end_millis(),
                destination: "log-archive".to_string(),
                destination_prefix: derive_path_segment("orders", &window).into_inner(),
            }
        );
        assert_eq!(calls[0].to - calls[0].from_time, 86_400_000);
    }

    #[tokio::test]
    async fn test_missing_task_id_is_submission_protocol_error() {
        let service = ScriptedService::new(Ok(CreateExportTaskResponse::default()), vec![]);

        let err = orchestrator(service.clone())
            .run_at(fixed_now(), &request())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LogshipError::Protocol {
                phase: ExportPhase::Submission,
                ..
            }
        ));
        assert!(service.describe_calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_task_id_is_submission_protocol_error() {
        let service = ScriptedService::new(created(""), vec![]);

        let err = orchestrator(service.clone())
            .run_at(fixed_now(), &request())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LogshipError::Protocol {
                phase: ExportPhase::Submission,
                ..
            }
        ));
        assert!(service.describe_calls().is_empty());
    }

    #[tokio::test]
    async fn test_submission_transport_error() {
        let service = ScriptedService::new(
            Err(CloudWatchError::Service {
                status: 400,
                error_type: "LimitExceededException".to_string(),
                message: "Resource limit exceeded.".to_string(),
            }),
            vec![],
        );

        let err = orchestrator(service.clone())
            .run_at(fixed_now(), &request())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LogshipError::SubmissionFailed(CloudWatchError::Service { status: 400, .. })
        ));
        assert_eq!(service.create_calls().len(), 1);
        assert!(service.describe_calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_status_stops_after_one_query() {
        let service = ScriptedService::new(created("abc-123"), vec![status("FAILED")]);

        let err = orchestrator(service.clone())
            .run_at(fixed_now(), &request())
            .await
            .unwrap_err();

        match err {
            LogshipError::JobFailed { task_id, code } => {
                assert_eq!(task_id.as_str(), "abc-123");
                assert_eq!(code, "FAILED");
            }
            other => panic!("Expected JobFailed, got {other:?}"),
        }
        assert_eq!(service.describe_calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_after_running() {
        let service = ScriptedService::new(
            created("abc-123"),
            vec![status("RUNNING"), status("CANCELLED")],
        );

        let err = orchestrator(service.clone())
            .run_at(fixed_now(), &request())
            .await
            .unwrap_err();

        assert!(matches!(err, LogshipError::JobFailed { ref code, .. } if code == "CANCELLED"));
        assert_eq!(service.describe_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_wrong_task_count_is_protocol_error() {
        for response in [tasks(&[]), tasks(&["COMPLETED", "COMPLETED"])] {
            let service = ScriptedService::new(created("abc-123"), vec![response]);

            let err = orchestrator(service.clone())
                .run_at(fixed_now(), &request())
                .await
                .unwrap_err();

            assert!(matches!(
                err,
                LogshipError::Protocol {
                    phase: ExportPhase::StatusCheck,
                    ..
                }
            ));
            assert_eq!(service.describe_calls().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_status_transport_error() {
        let service = ScriptedService::new(
            created("abc-123"),
            vec![Err(CloudWatchError::Timeout("request timed out".to_string()))],
        );

        let err = orchestrator(service.clone())
            .run_at(fixed_now(), &request())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LogshipError::StatusCheckFailed {
                source: CloudWatchError::Timeout(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_undecodable_status_is_protocol_error() {
        let service = ScriptedService::new(
            created("abc-123"),
            vec![Err(CloudWatchError::InvalidResponse(
                "invalid type: map, expected a sequence".to_string(),
            ))],
        );

        let err = orchestrator(service.clone())
            .run_at(fixed_now(), &request())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LogshipError::Protocol {
                phase: ExportPhase::StatusCheck,
                ref message,
            } if message.contains("expected a sequence")
        ));
        assert_eq!(service.describe_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_submission_is_protocol_error() {
        let service = ScriptedService::new(
            Err(CloudWatchError::InvalidResponse(
                "invalid type: integer `7`, expected a string".to_string(),
            )),
            vec![],
        );

        let err = orchestrator(service.clone())
            .run_at(fixed_now(), &request())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LogshipError::Protocol {
                phase: ExportPhase::Submission,
                ..
            }
        ));
        assert!(service.describe_calls().is_empty());
    }

    #[tokio::test]
    async fn test_negative_days_back_makes_no_calls() {
        let service = ScriptedService::new(created("abc-123"), vec![status("COMPLETED")]);
        let mut req = request();
        req.days_back = -1;

        let err = orchestrator(service.clone())
            .run_at(fixed_now(), &req)
            .await
            .unwrap_err();

        assert!(matches!(err, LogshipError::InvalidInput(_)));
        assert!(service.create_calls().is_empty());
        assert!(service.describe_calls().is_empty());
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_window() {
        let service = ScriptedService::new(created("abc-123"), vec![]);

        let err = orchestrator(service.clone())
            .submit_export("/aws/lambda/orders", 1_000, 1_000, "log-archive", "orders")
            .await
            .unwrap_err();

        assert!(matches!(err, LogshipError::InvalidInput(_)));
        assert!(service.create_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_timeout() {
        let service = ScriptedService::new(
            created("abc-123"),
            (0..10).map(|_| status("RUNNING")).collect(),
        );

        let err = ExportOrchestrator::new(service.clone(), BackoffPolicy::constant(Duration::from_secs(1)))
            .with_poll_timeout(Some(Duration::from_millis(2500)))
            .run_at(fixed_now(), &request())
            .await
            .unwrap_err();

        assert!(matches!(err, LogshipError::PollTimeout { .. }));

        // Checks at 0s, 1s, 2s and a last one at the 2.5s deadline
        let calls = service.describe_calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[3] - calls[0], Duration::from_millis(2500));
    }

    #[tokio::test]
    async fn test_shutdown_before_submission() {
        let service = ScriptedService::new(created("abc-123"), vec![status("COMPLETED")]);
        let (_tx, rx) = watch::channel(true);

        let err = orchestrator(service.clone())
            .with_shutdown(rx)
            .run_at(fixed_now(), &request())
            .await
            .unwrap_err();

        assert!(matches!(err, LogshipError::Cancelled { task_id: None }));
        assert!(service.create_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_wait() {
        let service = ScriptedService::new(
            created("abc-123"),
            vec![status("RUNNING"), status("COMPLETED")],
        );
        let (tx, rx) = watch::channel(false);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            let _ = tx.send(true);
        });

        let started = Instant::now();
        let err = ExportOrchestrator::new(service.clone(), BackoffPolicy::constant(Duration::from_secs(60)))
            .with_shutdown(rx)
            .run_at(fixed_now(), &request())
            .await
            .unwrap_err();

        match err {
            LogshipError::Cancelled { task_id } => {
                assert_eq!(task_id.unwrap().as_str(), "abc-123");
            }
            other => panic!("Expected Cancelled, got {other:?}"),
        }
        assert_eq!(service.describe_calls().len(), 1);
        assert!(started.elapsed() < Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_shutdown_sender_does_not_cancel() {
        let service = ScriptedService::new(
            created("abc-123"),
            vec![status("RUNNING"), status("COMPLETED")],
        );
        let (tx, rx) = watch::channel(false);
        drop(tx);

        let outcome = orchestrator(service.clone())
            .with_shutdown(rx)
            .run_at(fixed_now(), &request())
            .await
            .unwrap();

        assert_eq!(outcome.status_checks, 2);
    }
}
