//! Task execution for the RunTurn use case.
//!
//! The only point of true parallelism in a turn: every task of the plan is
//! dispatched to its document agent at once and all answers are collected
//! before synthesis starts.

use super::RunTurnUseCase;
use super::types::{SwarmError, TaskOutcome};
use crate::use_cases::shared::check_cancelled;
use std::sync::Arc;
use swarm_domain::{Plan, SwarmPromptTemplate, Task};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

impl RunTurnUseCase {
    /// Fan the plan's tasks out to the agent registry.
    ///
    /// A failing task (missing agent, remote error) becomes an error outcome
    /// and never cancels its siblings. Cancellation aborts the whole set.
    /// Outcomes are returned in plan order.
    pub async fn execute_plan(
        &self,
        plan: &Plan,
        token: &CancellationToken,
    ) -> Result<Vec<TaskOutcome>, SwarmError> {
        check_cancelled(token)?;

        let tasks: Vec<Task> = plan.tasks().cloned().collect();
        if tasks.is_empty() {
            info!("Plan has no tasks; synthesizing from history");
            return Ok(Vec::new());
        }

        info!("Dispatching {} task(s)", tasks.len());
        self.progress.on_execution_start(tasks.len());

        let mut join_set = JoinSet::new();
        for (index, task) in tasks.iter().cloned().enumerate() {
            let swarm = Arc::clone(&self.swarm);
            let progress = Arc::clone(&self.progress);
            let token = token.clone();

            join_set.spawn(async move {
                progress.on_task_start(&task);
                let question = SwarmPromptTemplate::agent_question(&task);
                let result = swarm.ask(&task.document, &question, &token).await;
                (index, task, result)
            });
        }

        let mut slots: Vec<Option<TaskOutcome>> = vec![None; tasks.len()];

        loop {
            let joined = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    join_set.abort_all();
                    return Err(SwarmError::Cancelled);
                }
                joined = join_set.join_next() => joined,
            };

            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok((index, task, Ok(answer))) => {
                    self.progress.on_task_complete(&task, true);
                    slots[index] = Some(TaskOutcome::success(task, answer));
                }
                Ok((_, _, Err(SwarmError::Cancelled))) => {
                    join_set.abort_all();
                    return Err(SwarmError::Cancelled);
                }
                Ok((index, task, Err(e))) => {
                    warn!("Task for {} failed: {}", task.document, e);
                    self.progress.on_task_complete(&task, false);
                    let outcome = TaskOutcome::failure(task, e.to_string());
                    self.log_event("task_failed", index, &outcome);
                    slots[index] = Some(outcome);
                }
                Err(join_error) => {
                    warn!("Task join error: {}", join_error);
                }
            }
        }

        check_cancelled(token)?;

        Ok(slots
            .into_iter()
            .zip(tasks)
            .map(|(slot, task)| {
                slot.unwrap_or_else(|| TaskOutcome::failure(task, "task aborted before answering"))
            })
            .collect())
    }
}
