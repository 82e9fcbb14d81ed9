//! Agent registry: one conversational session per briefed document.

use crate::config::RetryPolicy;
use crate::ports::llm_gateway::{GatewayError, GenerationOptions, LlmGateway, LlmSession};
use crate::use_cases::retry::call_with_retry;
use crate::use_cases::run_turn::SwarmError;
use crate::use_cases::shared::check_cancelled;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use swarm_domain::{Document, DocumentId, Model, SwarmPromptTemplate};
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// A session pre-loaded with one document.
///
/// Only created once the session exists, so a registered agent is ready.
/// Sends are serialized so the session's conversational history stays ordered
/// when several tasks address the same document.
pub struct DocumentAgent {
    document_id: DocumentId,
    session: Mutex<Box<dyn LlmSession>>,
}

impl DocumentAgent {
    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    async fn send(&self, question: &str) -> Result<String, GatewayError> {
        let session = self.session.lock().await;
        session.send(question).await
    }
}

/// Mapping from document id to its agent.
///
/// The map is the only mutable shared state of a turn. Mutations replace or
/// remove whole entries; task execution only reads.
pub struct AgentSwarm {
    gateway: Arc<dyn LlmGateway>,
    model: Model,
    options: GenerationOptions,
    retry: RetryPolicy,
    agents: RwLock<HashMap<DocumentId, Arc<DocumentAgent>>>,
}

impl AgentSwarm {
    pub fn new(gateway: Arc<dyn LlmGateway>, model: Model, retry: RetryPolicy) -> Self {
        Self {
            gateway,
            model,
            options: GenerationOptions::default(),
            retry,
            agents: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Create (or replace) the agent for `document`.
    pub async fn brief(
        &self,
        document: &Document,
        token: &CancellationToken,
    ) -> Result<DocumentId, SwarmError> {
        check_cancelled(token)?;
        let system_prompt = SwarmPromptTemplate::agent_system(document);

        let session = call_with_retry("brief", &self.retry, token, || {
            self.gateway
                .create_session_with_system_prompt(&self.model, &system_prompt, &self.options)
        })
        .await?;

        let agent = Arc::new(DocumentAgent {
            document_id: document.id.clone(),
            session: Mutex::new(session),
        });
        let replaced = self
            .agents
            .write()
            .await
            .insert(document.id.clone(), agent)
            .is_some();

        if replaced {
            info!("Re-briefed agent for {}", document.id);
        } else {
            info!("Briefed agent for {}", document.id);
        }
        Ok(document.id.clone())
    }

    /// Brief a batch concurrently. A failing document is logged and skipped;
    /// only cancellation fails the batch. Ids keep input order.
    pub async fn brief_all(
        &self,
        documents: &[Document],
        token: &CancellationToken,
    ) -> Result<Vec<DocumentId>, SwarmError> {
        let results = join_all(documents.iter().map(|d| self.brief(d, token))).await;

        let mut briefed = Vec::with_capacity(documents.len());
        for (document, result) in documents.iter().zip(results) {
            match result {
                Ok(id) => briefed.push(id),
                Err(SwarmError::Cancelled) => return Err(SwarmError::Cancelled),
                Err(e) => warn!("Skipping {}: briefing failed: {}", document.id, e),
            }
        }
        Ok(briefed)
    }

    /// Ask one question through the document's existing session.
    pub async fn ask(
        &self,
        document_id: &DocumentId,
        question: &str,
        token: &CancellationToken,
    ) -> Result<String, SwarmError> {
        check_cancelled(token)?;
        let agent = self
            .agents
            .read()
            .await
            .get(document_id)
            .cloned()
            .ok_or_else(|| SwarmError::AgentUnavailable(document_id.clone()))?;

        let agent = agent.as_ref();
        call_with_retry("ask", &self.retry, token, || agent.send(question)).await
    }

    /// Drop the agent. Returns `false` if none was registered.
    pub async fn remove(&self, document_id: &DocumentId) -> bool {
        let removed = self.agents.write().await.remove(document_id).is_some();
        if removed {
            info!("Removed agent for {}", document_id);
        }
        removed
    }

    /// Active document ids, sorted
    pub async fn list(&self) -> Vec<DocumentId> {
        let mut ids: Vec<DocumentId> = self.agents.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub async fn contains(&self, document_id: &DocumentId) -> bool {
        self.agents.read().await.contains_key(document_id)
    }

    pub async fn is_empty(&self) -> bool {
        self.agents.read().await.is_empty()
    }
}
