//! Clarification gate for the RunTurn use case.

use super::RunTurnUseCase;
use super::types::SwarmError;
use crate::ports::llm_gateway::GenerationRequest;
use crate::use_cases::shared::check_cancelled;
use swarm_domain::prompt::schema::clarification_schema;
use swarm_domain::{ClarificationRequest, DocumentId, SwarmPromptTemplate, TurnPhase};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

impl RunTurnUseCase {
    /// Decide whether `query` needs disambiguating questions.
    ///
    /// Skipped (no clarification) when no documents are active. Any failure
    /// other than cancellation also means no clarification.
    pub async fn clarify(
        &self,
        query: &str,
        documents: &[DocumentId],
        token: &CancellationToken,
    ) -> Result<ClarificationRequest, SwarmError> {
        if documents.is_empty() {
            return Ok(ClarificationRequest::not_needed());
        }
        check_cancelled(token)?;
        self.progress.on_phase_change(&TurnPhase::Clarify);

        let request = GenerationRequest::new(SwarmPromptTemplate::clarification_prompt(
            query,
            documents,
            &self.config.policies.clarification,
        ))
        .with_system(SwarmPromptTemplate::clarification_system())
        .with_schema(clarification_schema());
        let options = self.json_options(self.config.generation.reviewer_temperature);

        let parsed = self
            .generate_structured("clarify", &self.config.models.clarifier, &request, &options, token)
            .await
            .and_then(|value| {
                serde_json::from_value::<ClarificationRequest>(value)
                    .map_err(|e| SwarmError::UnparsableOutput(e.to_string()))
            });

        let mut clarification = match parsed {
            Ok(clarification) => clarification,
            Err(SwarmError::Cancelled) => return Err(SwarmError::Cancelled),
            Err(e) => {
                warn!("Clarification gate failed, continuing without: {}", e);
                return Ok(ClarificationRequest::not_needed());
            }
        };

        // A question without options cannot be answered
        clarification.questions.retain(|q| !q.options.is_empty());

        if clarification.should_pause() {
            info!(
                "Query needs clarification ({} question(s))",
                clarification.questions.len()
            );
            self.progress.on_clarification_requested(&clarification);
            self.log_event("clarification_requested", 0, &clarification);
        } else {
            debug!("Query is specific enough; no clarification");
        }
        Ok(clarification)
    }
}
