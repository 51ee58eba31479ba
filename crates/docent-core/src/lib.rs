//! docent-core - Intent routing and agent dispatch for the museum assistant
//!
//! This crate provides:
//! - Keyword-based intent and sub-intent classification with history
//!   weighting
//! - A static service routing table from (intent, sub-intent) to backend
//!   endpoints
//! - An agent registry and the specialized museum agents (tour booking,
//!   Q&A, collection management)
//! - The dispatcher that composes them and always returns a structured
//!   outcome

pub mod agents;
pub mod config;
pub mod dispatcher;
pub mod intent;
pub mod registry;
pub mod routes;
pub mod types;

// Re-export main types for convenience
pub use agents::{CollectionManagementAgent, QaAgent, TourBookingAgent};
pub use config::{ClassifierConfig, DispatcherConfig, DocentConfig, ServicesConfig};
pub use dispatcher::{Dispatcher, canonical_agent_name, install_default_agents};
pub use intent::{GENERAL_INTENT, IntentClassifier, KeywordTable, SubIntentTable};
pub use registry::{AgentHandler, AgentRegistry};
pub use routes::{ParamShape, RouteEntry, ServiceRouter};
pub use types::{
    DispatchData, DispatchOutcome, HistoryEntry, MessagePayload, RequestContext,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_exports() {
        // Just verify that all main types are exported
        let _ = std::mem::size_of::<AgentRegistry>();
        let _ = std::mem::size_of::<Dispatcher>();
        let _ = std::mem::size_of::<ServiceRouter>();
        let _ = std::mem::size_of::<RequestContext>();
        let _ = std::mem::size_of::<DispatchOutcome>();
    }
}
