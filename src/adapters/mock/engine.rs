//! Scripted execution engine for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::models::ConversationId;
use crate::traits::{ExecuteMode, ExecuteOutcome, ExecutionEngine};

/// One recorded `execute` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteCall {
    pub mode: ExecuteMode,
    pub conversation_id: ConversationId,
    pub caller: String,
}

/// Execution engine returning scripted outcomes.
///
/// Queued outcomes are consumed in call order; once the queue is empty the
/// default outcome (initially `Success`) is returned.
#[derive(Debug, Clone)]
pub struct MockExecutionEngine {
    outcomes: Arc<Mutex<VecDeque<ExecuteOutcome>>>,
    default_outcome: Arc<Mutex<ExecuteOutcome>>,
    calls: Arc<Mutex<Vec<ExecuteCall>>>,
}

impl MockExecutionEngine {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            default_outcome: Arc::new(Mutex::new(ExecuteOutcome::Success)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Engine that always answers `outcome`.
    pub fn with_default(outcome: ExecuteOutcome) -> Self {
        let engine = Self::new();
        engine.set_default_outcome(outcome);
        engine
    }

    pub fn set_default_outcome(&self, outcome: ExecuteOutcome) {
        *self.default_outcome.lock().unwrap() = outcome;
    }

    /// Queue an outcome for the next unanswered call.
    pub fn push_outcome(&self, outcome: ExecuteOutcome) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn calls(&self) -> Vec<ExecuteCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Conversation ids in call order.
    pub fn called_ids(&self) -> Vec<ConversationId> {
        self.calls()
            .into_iter()
            .map(|call| call.conversation_id)
            .collect()
    }
}

impl Default for MockExecutionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionEngine for MockExecutionEngine {
    async fn execute(
        &self,
        mode: ExecuteMode,
        conversation_id: &ConversationId,
        caller: &str,
    ) -> ExecuteOutcome {
        self.calls.lock().unwrap().push(ExecuteCall {
            mode,
            conversation_id: conversation_id.clone(),
            caller: caller.to_string(),
        });
        let queued = self.outcomes.lock().unwrap().pop_front();
        queued.unwrap_or_else(|| *self.default_outcome.lock().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queued_outcomes_then_default() {
        let engine = MockExecutionEngine::with_default(ExecuteOutcome::NoPersona);
        engine.push_outcome(ExecuteOutcome::Success);
        let id = ConversationId::from("c1");

        let first = engine.execute(ExecuteMode::GenerateContent, &id, "test").await;
        let second = engine.execute(ExecuteMode::BeamContent, &id, "test").await;

        assert_eq!(first, ExecuteOutcome::Success);
        assert_eq!(second, ExecuteOutcome::NoPersona);
        assert_eq!(engine.call_count(), 2);
        assert_eq!(engine.calls()[1].mode, ExecuteMode::BeamContent);
    }
}
