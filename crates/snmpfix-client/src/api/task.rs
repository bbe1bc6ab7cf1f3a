//! Task endpoints.

use crate::DnacClient;
use snmpfix_core::{ApiResponse, Result, SnmpFixError, TaskStatus};
use tracing::debug;

/// Asynchronous task endpoints
pub struct TaskApi<'a> {
    client: &'a DnacClient,
}

impl<'a> TaskApi<'a> {
    pub(crate) const fn new(client: &'a DnacClient) -> Self {
        Self { client }
    }

    /// Get the current status of a task
    pub async fn get(&self, task_id: &str) -> Result<TaskStatus> {
        let reply: ApiResponse<TaskStatus> = self
            .client
            .get(&format!("/dna/intent/api/v1/task/{task_id}"))
            .await?;
        Ok(reply.response)
    }

    /// Poll a task until the controller reports an end time.
    ///
    /// A task that ends in error becomes [`SnmpFixError::TaskFailed`]; a task
    /// still running after the poll budget becomes [`SnmpFixError::Timeout`].
    pub async fn wait(&self, task_id: &str) -> Result<TaskStatus> {
        let poll = self.client.poll();

        for attempt in 1..=poll.max_attempts {
            let status = self.get(task_id).await?;
            debug!(task = task_id, attempt, progress = status.progress_text(), "task status");

            if status.is_finished() {
                if status.is_error {
                    return Err(SnmpFixError::TaskFailed {
                        task_id: task_id.to_string(),
                        reason: status
                            .failure_reason
                            .clone()
                            .unwrap_or_else(|| status.progress_text().to_string()),
                    });
                }
                return Ok(status);
            }

            tokio::time::sleep(poll.interval).await;
        }

        Err(SnmpFixError::Timeout(poll.budget().as_secs()))
    }
}
