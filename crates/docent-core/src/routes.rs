//! Service routing — maps (intent, sub-intent) to backend endpoints
//!
//! Pure table lookup with two fallback stages: exact (intent, sub) pair,
//! then the intent's own default, then the global general route. Total by
//! construction, so no classifier output can route to an undefined path.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::intent::GENERAL_INTENT;

/// How a routed endpoint expects its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamShape {
    /// No parameters
    None,
    /// URL query string
    Query,
    /// JSON request body
    JsonBody,
}

/// One routing table row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
    pub intent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_intent: Option<String>,
    pub target_path: String,
    pub param_shape: ParamShape,
}

impl RouteEntry {
    fn new(
        intent: &str,
        sub_intent: Option<&str>,
        target_path: &str,
        param_shape: ParamShape,
    ) -> Self {
        Self {
            intent: intent.to_string(),
            sub_intent: sub_intent.map(str::to_string),
            target_path: target_path.to_string(),
            param_shape,
        }
    }
}

/// Static routing table over the museum backends
pub struct ServiceRouter {
    entries: Vec<RouteEntry>,
}

impl ServiceRouter {
    /// Build a router; a general default route is appended if the table
    /// lacks one, keeping `route` total
    pub fn new(mut entries: Vec<RouteEntry>) -> Self {
        let has_general = entries
            .iter()
            .any(|e| e.intent == GENERAL_INTENT && e.sub_intent.is_none());
        if !has_general {
            entries.push(RouteEntry::new(
                GENERAL_INTENT,
                None,
                "/api/public/qa",
                ParamShape::JsonBody,
            ));
        }
        Self { entries }
    }

    /// The museum routing table
    pub fn museum_defaults() -> Self {
        use ParamShape::{JsonBody, None as NoParams, Query};
        Self::new(vec![
            RouteEntry::new("tour_booking", None, "/api/public/tour-booking", NoParams),
            RouteEntry::new(
                "tour_booking",
                Some("create"),
                "/api/public/tour-booking/create",
                JsonBody,
            ),
            RouteEntry::new(
                "tour_booking",
                Some("query"),
                "/api/public/tour-booking/bookings",
                Query,
            ),
            RouteEntry::new(
                "tour_booking",
                Some("slots"),
                "/api/public/tour-booking/available-slots",
                Query,
            ),
            RouteEntry::new("qa", None, "/api/public/qa", JsonBody),
            RouteEntry::new(
                "qa",
                Some("collection"),
                "/api/internal/collection/search",
                Query,
            ),
            RouteEntry::new(
                "qa",
                Some("exhibition"),
                "/api/public/qa/exhibitions/search",
                Query,
            ),
            RouteEntry::new("facility", None, "/api/public/facility-services", Query),
            RouteEntry::new("feedback", None, "/api/public/feedback", JsonBody),
            RouteEntry::new("collection", None, "/api/internal/collection", NoParams),
            RouteEntry::new(
                "collection",
                Some("list"),
                "/api/internal/collection/list",
                NoParams,
            ),
            RouteEntry::new(
                "collection",
                Some("detail"),
                "/api/internal/collection/detail",
                Query,
            ),
            RouteEntry::new(
                "collection",
                Some("environment"),
                "/api/internal/collection/environment",
                Query,
            ),
            RouteEntry::new(
                "collection",
                Some("loan"),
                "/api/internal/collection/loan-request",
                JsonBody,
            ),
            RouteEntry::new(
                "collection",
                Some("search"),
                "/api/internal/collection/search",
                Query,
            ),
            RouteEntry::new("security", None, "/api/internal/security", Query),
            RouteEntry::new(
                "facility_management",
                None,
                "/api/internal/facility",
                JsonBody,
            ),
            RouteEntry::new(
                "administration",
                None,
                "/api/internal/administration",
                JsonBody,
            ),
            RouteEntry::new("analytics", None, "/api/internal/analytics", Query),
            RouteEntry::new(GENERAL_INTENT, None, "/api/public/qa", JsonBody),
        ])
    }

    /// Resolve an (intent, sub-intent) pair to a route. Never fails:
    /// unknown inputs resolve to the general default.
    pub fn route(&self, intent: &str, sub_intent: Option<&str>) -> &RouteEntry {
        if let Some(sub) = sub_intent {
            if let Some(entry) = self
                .entries
                .iter()
                .find(|e| e.intent == intent && e.sub_intent.as_deref() == Some(sub))
            {
                debug!("routed ({}, {}) → {}", intent, sub, entry.target_path);
                return entry;
            }
        }
        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.intent == intent && e.sub_intent.is_none())
        {
            debug!("routed ({}, -) → {}", intent, entry.target_path);
            return entry;
        }
        let general = self
            .entries
            .iter()
            .find(|e| e.intent == GENERAL_INTENT && e.sub_intent.is_none())
            .expect("general route guaranteed at construction");
        debug!(
            "unknown intent '{}', routed to general default {}",
            intent, general.target_path
        );
        general
    }
}

impl Default for ServiceRouter {
    fn default() -> Self {
        Self::museum_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{IntentClassifier, KeywordTable};
    use crate::config::ClassifierConfig;

    #[test]
    fn test_exact_pair_match() {
        let router = ServiceRouter::museum_defaults();
        let entry = router.route("tour_booking", Some("create"));
        assert_eq!(entry.target_path, "/api/public/tour-booking/create");
        assert_eq!(entry.param_shape, ParamShape::JsonBody);
    }

    #[test]
    fn test_unknown_sub_falls_back_to_intent_default() {
        let router = ServiceRouter::museum_defaults();
        let entry = router.route("tour_booking", Some("nonexistent"));
        assert_eq!(entry.target_path, "/api/public/tour-booking");
    }

    #[test]
    fn test_no_sub_uses_intent_default() {
        let router = ServiceRouter::museum_defaults();
        let entry = router.route("feedback", None);
        assert_eq!(entry.target_path, "/api/public/feedback");
    }

    #[test]
    fn test_unknown_intent_routes_to_general() {
        let router = ServiceRouter::museum_defaults();
        let entry = router.route("no_such_intent", Some("whatever"));
        assert_eq!(entry.intent, "general");
        assert_eq!(entry.target_path, "/api/public/qa");
    }

    #[test]
    fn test_route_is_deterministic() {
        let router = ServiceRouter::museum_defaults();
        let a = router.route("qa", Some("exhibition")).target_path.clone();
        let b = router.route("qa", Some("exhibition")).target_path.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn test_general_route_appended_when_missing() {
        let router = ServiceRouter::new(vec![RouteEntry::new(
            "qa",
            None,
            "/api/public/qa",
            ParamShape::JsonBody,
        )]);
        let entry = router.route("unknown", None);
        assert_eq!(entry.intent, "general");
    }

    #[test]
    fn test_every_classifier_intent_resolves() {
        // the routing invariant: no classifier label may hit an
        // undefined path
        let router = ServiceRouter::museum_defaults();
        let table = KeywordTable::museum_defaults();
        for (intent, _) in table.iter() {
            let entry = router.route(intent, None);
            assert!(!entry.target_path.is_empty(), "no route for {}", intent);
        }
        let classifier = IntentClassifier::new(ClassifierConfig::default()).unwrap();
        let general = classifier.classify("", &[]);
        assert_eq!(router.route(&general, None).target_path, "/api/public/qa");
    }
}
