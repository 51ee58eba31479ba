//! Agent registry — name-to-handler mapping consulted during dispatch

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::types::RequestContext;

/// A specialized agent capable of answering requests for one intent
#[async_trait]
pub trait AgentHandler: Send + Sync {
    /// Registry name, e.g. "TourBookingAgent"
    fn name(&self) -> &str;

    /// Produce a textual response for the request
    async fn handle(&self, request: &RequestContext) -> Result<String>;
}

/// Registry of specialized agents, keyed by handler name.
///
/// Populated during startup, read-only once dispatch traffic starts, so
/// concurrent dispatches share it without locking.
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn AgentHandler>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self {
            agents: HashMap::new(),
        }
    }

    /// Register a handler under its own name. Registering a name twice
    /// replaces the previous handler silently (logged, not fatal).
    pub fn register(&mut self, handler: Arc<dyn AgentHandler>) {
        let name = handler.name().to_string();
        if self.agents.insert(name.clone(), handler).is_some() {
            warn!("replaced previously registered agent '{}'", name);
        } else {
            info!("registered agent '{}'", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AgentHandler>> {
        let found = self.agents.get(name).cloned();
        debug!(
            "agent lookup '{}' → {}",
            name,
            if found.is_some() { "hit" } else { "miss" }
        );
        found
    }

    pub fn list(&self) -> Vec<&str> {
        self.agents.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
