//! Per-call conversation state and its store

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::step::CallStep;
use crate::AgentError;

/// State of one in-progress call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallState {
    /// Opaque call identifier from the telephony layer
    pub call_id: String,
    /// Current conversation step
    pub step: CallStep,
    /// Caller name; set once at greeting, overwritten only by the
    /// name_spelling correction
    pub caller_name: Option<String>,
    /// Caller phone; set at most once from the first turn that supplies it
    pub caller_phone: Option<String>,
    /// Problem description, set exactly once at the problem step
    pub problem: Option<String>,
    /// Proposed slot labels, assigned when entering scheduling
    pub proposed_date: Option<String>,
    pub proposed_time: Option<String>,
    /// Set when the caller accepts or declines the proposed slot
    pub confirmed: Option<bool>,
}

impl CallState {
    pub fn new(call_id: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            ..Default::default()
        }
    }
}

/// In-memory store of active call states, keyed by call id
///
/// Owned by the orchestrator and shared by `Arc`; per-key isolation comes
/// from working on snapshots and writing back under the lock. Capacity is
/// bounded so a flood of new calls cannot grow the map without limit.
pub struct CallStateStore {
    states: RwLock<HashMap<String, CallState>>,
    max_calls: usize,
}

impl CallStateStore {
    pub fn new(max_calls: usize) -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
            max_calls,
        }
    }

    /// Snapshot the state for a call, creating it on first contact
    pub fn get_or_create(&self, call_id: &str) -> Result<CallState, AgentError> {
        let mut states = self.states.write();

        if let Some(state) = states.get(call_id) {
            return Ok(state.clone());
        }

        if states.len() >= self.max_calls {
            return Err(AgentError::CapacityExceeded(states.len()));
        }

        let state = CallState::new(call_id);
        states.insert(call_id.to_string(), state.clone());
        tracing::info!(call_id = %call_id, "Call state created");

        Ok(state)
    }

    /// Snapshot the state for a call without creating it
    pub fn get(&self, call_id: &str) -> Option<CallState> {
        self.states.read().get(call_id).cloned()
    }

    /// Store the updated state for a call
    pub fn write_back(&self, state: CallState) {
        self.states.write().insert(state.call_id.clone(), state);
    }

    /// Remove and return the state for a call
    pub fn remove(&self, call_id: &str) -> Option<CallState> {
        let removed = self.states.write().remove(call_id);
        if removed.is_some() {
            tracing::info!(call_id = %call_id, "Call state removed");
        }
        removed
    }

    /// Number of active calls
    pub fn len(&self) -> usize {
        self.states.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create() {
        let store = CallStateStore::new(10);

        let state = store.get_or_create("CA1").unwrap();
        assert_eq!(state.call_id, "CA1");
        assert_eq!(state.step, CallStep::Greeting);
        assert_eq!(store.len(), 1);

        // Second call returns the stored state
        let mut state = store.get_or_create("CA1").unwrap();
        state.caller_name = Some("John".to_string());
        store.write_back(state);

        assert_eq!(
            store.get("CA1").unwrap().caller_name.as_deref(),
            Some("John")
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_capacity_limit() {
        let store = CallStateStore::new(2);
        store.get_or_create("CA1").unwrap();
        store.get_or_create("CA2").unwrap();

        assert!(matches!(
            store.get_or_create("CA3"),
            Err(AgentError::CapacityExceeded(2))
        ));

        // Known calls still resolve at capacity
        assert!(store.get_or_create("CA1").is_ok());
    }

    #[test]
    fn test_remove() {
        let store = CallStateStore::new(10);
        store.get_or_create("CA1").unwrap();

        assert!(store.remove("CA1").is_some());
        assert!(store.remove("CA1").is_none());
        assert!(store.is_empty());
    }
}
