//! Request dispatcher — classify, route, invoke, always answer
//!
//! Composes the classifier, router, and registry into the single inbound
//! operation. The dispatcher is the last line of defense: whatever a
//! handler does (fail, panic, hang), the caller receives a structured
//! outcome and the detailed cause stays in the server log.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, error, info, warn};

use docent_services::{Notifier, ServiceApi};

use crate::agents::{CollectionManagementAgent, QaAgent, TourBookingAgent};
use crate::config::{ClassifierConfig, DispatcherConfig};
use crate::intent::IntentClassifier;
use crate::registry::AgentRegistry;
use crate::routes::ServiceRouter;
use crate::types::{DispatchData, DispatchOutcome, RequestContext};

/// Name reported when no specialized agent answered
const DEFAULT_PROCESSING: &str = "default_processing";

/// Generic client-facing messages; details are logged, never returned
const HANDLER_FAULT_MESSAGE: &str = "智能体处理请求失败，请稍后再试。";
const HANDLER_TIMEOUT_MESSAGE: &str = "智能体响应超时，请稍后再试。";

/// Registry name expected to answer each intent
pub fn canonical_agent_name(intent: &str) -> Option<&'static str> {
    match intent {
        "tour_booking" => Some("TourBookingAgent"),
        "qa" => Some("QAAgent"),
        "facility" => Some("FacilityServiceAgent"),
        "feedback" => Some("FeedbackAgent"),
        "collection" => Some("CollectionManagementAgent"),
        "security" => Some("SecurityMonitoringAgent"),
        "facility_management" => Some("FacilityManagementAgent"),
        "administration" => Some("AdministrativeAssistantAgent"),
        "analytics" => Some("DataAnalyticsAgent"),
        _ => None,
    }
}

/// Canned answer used when the intent has no registered agent
fn default_response(intent: &str) -> &'static str {
    match intent {
        "tour_booking" => "您可以通过博物馆官方网站或微信公众号进行参观预约。",
        "qa" => "感谢您的提问。关于这个问题，我们的专家正在为您准备详细的回答。",
        "facility" => "博物馆内设有洗手间、餐厅、停车场等设施，您可以在参观指南中找到详细信息。",
        "feedback" => "感谢您的反馈，我们会认真对待并不断改进我们的服务。",
        "collection" => "博物馆藏有丰富的文物和艺术品，您可以通过官网搜索特定藏品的详细信息。",
        _ => "感谢您的咨询，我们会尽快为您提供帮助。",
    }
}

/// Construct and register the built-in specialized agents.
///
/// An agent that fails to construct is logged and skipped: its intent
/// degrades to default responses instead of taking the system down.
pub fn install_default_agents(
    registry: &mut AgentRegistry,
    services: Arc<dyn ServiceApi>,
    notifier: Arc<dyn Notifier>,
) {
    registry.register(Arc::new(TourBookingAgent::new(services.clone())));
    registry.register(Arc::new(QaAgent::new(services.clone())));
    match CollectionManagementAgent::new(services, notifier) {
        Ok(agent) => registry.register(Arc::new(agent)),
        Err(e) => error!(
            "failed to construct CollectionManagementAgent, continuing without it: {:#}",
            e
        ),
    }
    info!("agent registration complete: {} agents", registry.len());
}

/// Composes classifier, router, and registry into `dispatch`
pub struct Dispatcher {
    classifier: IntentClassifier,
    router: ServiceRouter,
    registry: Arc<AgentRegistry>,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<AgentRegistry>,
        classifier_config: ClassifierConfig,
        config: DispatcherConfig,
    ) -> Result<Self> {
        Ok(Self {
            classifier: IntentClassifier::new(classifier_config)?,
            router: ServiceRouter::museum_defaults(),
            registry,
            config,
        })
    }

    /// Handle one request end to end. Never returns a raw error: every
    /// failure mode becomes a structured outcome.
    pub async fn dispatch(&self, request: RequestContext) -> DispatchOutcome {
        let intent = self.classifier.classify(&request.message, &request.history);
        let sub_intent = self.classifier.classify_sub(&request.message, &intent);
        let route = self.router.route(&intent, sub_intent.as_deref());
        debug!(
            "request {} from {}: intent '{}', sub-intent {:?}, route {}",
            request.request_id, request.user_id, intent, sub_intent, route.target_path
        );

        let handler = canonical_agent_name(&intent).and_then(|name| self.registry.get(name));

        let Some(handler) = handler else {
            info!(
                "no agent registered for intent '{}', using default response",
                intent
            );
            return DispatchOutcome::Success {
                data: DispatchData {
                    intent: intent.clone(),
                    sub_intent,
                    handled_by: DEFAULT_PROCESSING.to_string(),
                    response: default_response(&intent).to_string(),
                },
            };
        };

        let handler_name = handler.name().to_string();
        let request_id = request.request_id.clone();
        // run the handler on its own task so a panic is contained and
        // the timeout can abandon it
        let invocation = tokio::spawn(async move { handler.handle(&request).await });
        let timeout = Duration::from_secs(self.config.handler_timeout_secs);

        match tokio::time::timeout(timeout, invocation).await {
            Ok(Ok(Ok(response))) => {
                debug!("request {} handled by {}", request_id, handler_name);
                DispatchOutcome::Success {
                    data: DispatchData {
                        intent,
                        sub_intent,
                        handled_by: handler_name,
                        response,
                    },
                }
            }
            Ok(Ok(Err(e))) => {
                warn!(
                    "request {}: agent '{}' failed: {:#}",
                    request_id, handler_name, e
                );
                DispatchOutcome::Error {
                    code: 500,
                    message: HANDLER_FAULT_MESSAGE.to_string(),
                }
            }
            Ok(Err(join_error)) => {
                error!(
                    "request {}: agent '{}' panicked: {}",
                    request_id, handler_name, join_error
                );
                DispatchOutcome::Error {
                    code: 500,
                    message: HANDLER_FAULT_MESSAGE.to_string(),
                }
            }
            Err(_) => {
                warn!(
                    "request {}: agent '{}' timed out after {}s",
                    request_id,
                    handler_name,
                    timeout.as_secs()
                );
                DispatchOutcome::Error {
                    code: 504,
                    message: HANDLER_TIMEOUT_MESSAGE.to_string(),
                }
            }
        }
    }
}
