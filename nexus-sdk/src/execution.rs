//! Blocking poll loop for cluster execution objects.
//!
//! `cluster::execute` only starts an execution; the response materializes
//! later on the execution object. [`wait_for_execution`] fetches that
//! object until it reaches a terminal status or the deadline elapses.

use crate::args::ObjectId;
use crate::config::{PollConfig, PollMode};
use crate::error::SdkError;
use crate::rpc::ChainClient;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

/// Response returned by [`wait_for_execution`] in [`PollMode::Stub`] mode.
pub const STUB_RESPONSE: &str = "Did Not Execute";

const STATUS_SUCCESS: &str = "SUCCESS";
const STATUS_FAILED: &str = "FAILED";
const STATUS_IDLE: &str = "IDLE";
const STATUS_RUNNING: &str = "RUNNING";

/// Fetches the response of a cluster execution.
///
/// The execution object is read once per iteration and its `status` field
/// drives the loop:
///
/// * `SUCCESS` — returns the `cluster_response` field;
/// * `FAILED` — returns [`SdkError::Execution`] with the chain-supplied
///   `error_message`;
/// * `IDLE` / `RUNNING` — sleeps for the check interval and retries;
/// * anything else — returns [`SdkError::UnknownStatus`] immediately
///   (terminal, never retried).
///
/// The deadline is never overslept: the sleep is clamped to the remaining
/// budget, and the loop exits with [`SdkError::Timeout`] once it is
/// exhausted. A transport error in any iteration aborts the loop
/// immediately. There is no cancellation mechanism other than the deadline;
/// the caller is blocked for the full wait in the worst case.
pub async fn wait_for_execution<C>(
    chain: &C,
    execution: &ObjectId,
    config: &PollConfig,
) -> Result<String, SdkError>
where
    C: ChainClient + ?Sized,
{
    if config.mode == PollMode::Stub {
        debug!(%execution, "poller is stubbed out, returning placeholder");
        return Ok(STUB_RESPONSE.to_owned());
    }

    let max_wait = config.max_wait();
    let deadline = Instant::now() + max_wait;

    loop {
        if Instant::now() >= deadline {
            return Err(SdkError::Timeout {
                id: execution.clone(),
                max_wait,
            });
        }

        let content = chain.get_object_content(execution).await?;
        let status = content
            .field_str("status")
            .ok_or(SdkError::MissingField("status"))?;

        match status {
            STATUS_SUCCESS => {
                let response = content
                    .field_str("cluster_response")
                    .ok_or(SdkError::MissingField("cluster_response"))?;
                info!(%execution, "execution completed");
                return Ok(response.to_owned());
            }
            STATUS_FAILED => {
                let error = content
                    .field_str("error_message")
                    .unwrap_or("unspecified execution error");
                return Err(SdkError::Execution(error.to_owned()));
            }
            STATUS_IDLE => {
                debug!(%execution, "execution has not started yet");
            }
            STATUS_RUNNING => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                debug!(
                    %execution,
                    remaining_secs = remaining.as_secs(),
                    "execution still running"
                );
            }
            other => {
                return Err(SdkError::UnknownStatus {
                    id: execution.clone(),
                    status: other.to_owned(),
                });
            }
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(SdkError::Timeout {
                id: execution.clone(),
                max_wait,
            });
        }
        sleep(config.check_interval().min(remaining)).await;
    }
}
