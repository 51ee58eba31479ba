//! Collection management agent — catalogue, environment, loans
//!
//! Internal-facing counterpart of the Q&A agent: staff use it to inspect
//! the catalogue, check hall climate, and file exhibition loan requests.
//! Filed loans notify the curator through the `Notifier` seam.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use docent_services::types::LoanRequest;
use docent_services::{Notifier, ServiceApi, ServiceError};

use crate::agents::strip_stop_words;
use crate::intent::SubIntentTable;
use crate::registry::AgentHandler;
use crate::types::RequestContext;

const CURATOR_EMAIL: &str = "curator@museum.example.com";

const SEARCH_STOP_WORDS: &[&str] = &[
    "搜索", "查找", "藏品", "关于", "的", "有", "什么", "哪些", "吗", "是",
];

/// Exhibition halls recognized in free text
const HALL_NAMES: &[&str] = &[
    "一层", "二层", "三层", "东厅", "西厅", "南厅", "北厅", "中厅",
];

pub struct CollectionManagementAgent {
    services: Arc<dyn ServiceApi>,
    notifier: Arc<dyn Notifier>,
    sub_intents: SubIntentTable,
    id_pattern: Regex,
}

impl CollectionManagementAgent {
    pub const NAME: &'static str = "CollectionManagementAgent";

    pub fn new(services: Arc<dyn ServiceApi>, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let id_pattern =
            Regex::new(r"COL\d+").context("Failed to compile collection id pattern")?;
        Ok(Self {
            services,
            notifier,
            sub_intents: SubIntentTable::museum_defaults(),
            id_pattern,
        })
    }

    fn extract_collection_id<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.id_pattern.find(text).map(|m| m.as_str())
    }

    fn extract_hall(&self, text: &str) -> Option<&'static str> {
        HALL_NAMES.iter().copied().find(|hall| text.contains(hall))
    }

    async fn list_collections(&self) -> String {
        match self.services.list_collections().await {
            Ok(collections) if collections.is_empty() => "暂无藏品记录。".to_string(),
            Ok(collections) => {
                let mut reply = String::from("藏品列表：\n");
                for item in collections.iter().take(10) {
                    reply.push_str(&format!(
                        "- ID: {}, 名称: {}, 年代: {}\n",
                        item.collection_id,
                        item.name,
                        item.era.as_deref().unwrap_or("不详")
                    ));
                }
                reply
            }
            Err(e) => {
                warn!("collection list failed: {}", e);
                "藏品服务暂时不可用，请稍后再试。".to_string()
            }
        }
    }

    async fn collection_detail(&self, message: &str) -> String {
        let Some(id) = self.extract_collection_id(message) else {
            return "请提供藏品的ID（例如 COL001），我可以为您查询详情。".to_string();
        };

        match self.services.collection_detail(id).await {
            Ok(item) => format!(
                "藏品详情：\nID: {}\n名称: {}\n年代: {}\n来源: {}\n尺寸: {}\n材质: {}\n描述: {}\n当前位置: {}\n保存状态: {}",
                item.collection_id,
                item.name,
                item.era.as_deref().unwrap_or("不详"),
                item.source.as_deref().unwrap_or("不详"),
                item.dimensions.as_deref().unwrap_or("不详"),
                item.material.as_deref().unwrap_or("不详"),
                item.description.as_deref().unwrap_or("暂无描述"),
                item.current_location.as_deref().unwrap_or("不详"),
                item.conservation_status.as_deref().unwrap_or("不详")
            ),
            Err(ServiceError::Rejected(message)) => format!("获取失败：{}", message),
            Err(e) => {
                warn!("collection detail failed: {}", e);
                "藏品服务暂时不可用，请稍后再试。".to_string()
            }
        }
    }

    async fn environment_report(&self, message: &str) -> String {
        let hall = self.extract_hall(message).unwrap_or("默认展厅");
        match self.services.environment(hall).await {
            Ok(reading) => format!(
                "{}的环境监测数据：\n温度: {}°C\n湿度: {}%\n光照: {} lux\n空气质量: {}\n监测时间: {}",
                reading.location,
                reading.temperature,
                reading.humidity,
                reading.light_intensity,
                reading.air_quality,
                reading.timestamp.format("%Y-%m-%d %H:%M")
            ),
            Err(e) => {
                warn!("environment lookup failed: {}", e);
                "环境监测服务暂时不可用，请稍后再试。".to_string()
            }
        }
    }

    async fn file_loan_request(&self, request: &RequestContext) -> String {
        let collection_ids = request
            .context
            .get("collection_ids")
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_else(|| vec!["COL001".to_string()]);

        let loan = LoanRequest {
            exhibition_name: request
                .context_str("exhibition_name", "临时特展")
                .to_string(),
            requesting_institution: request
                .context_str("requesting_institution", "合作博物馆")
                .to_string(),
            contact_person: request.context_str("contact_person", "联系人").to_string(),
            contact_phone: request
                .context_str("contact_phone", "13800138000")
                .to_string(),
            start_date: request.context_str("start_date", "2025-10-01").to_string(),
            end_date: request.context_str("end_date", "2025-12-31").to_string(),
            collection_ids,
            purpose: request.context_str("purpose", "文化交流").to_string(),
        };

        match self.services.create_loan_request(&loan).await {
            Ok(receipt) => {
                let body = format!(
                    "新的借展申请已提交：\n申请编号：{}\n展览名称：{}\n申请机构：{}\n请及时处理。",
                    receipt.loan_id, receipt.exhibition_name, receipt.requesting_institution
                );
                if let Err(e) = self
                    .notifier
                    .send(CURATOR_EMAIL, "新的借展申请通知", &body)
                    .await
                {
                    warn!("curator notification failed: {:#}", e);
                }
                format!(
                    "借展申请已提交成功！申请编号是{}，我们会尽快处理您的申请。",
                    receipt.loan_id
                )
            }
            Err(ServiceError::Rejected(message)) => format!("借展申请提交失败：{}", message),
            Err(e) => {
                warn!("loan request failed: {}", e);
                "借展申请服务暂时不可用，请稍后再试。".to_string()
            }
        }
    }

    async fn search_collections(&self, message: &str) -> String {
        let keywords = strip_stop_words(message, SEARCH_STOP_WORDS);
        if keywords.is_empty() {
            return "请提供搜索关键词，我可以帮您查找相关藏品。".to_string();
        }

        match self.services.search_collections(&keywords).await {
            Ok(collections) if collections.is_empty() => {
                format!("未找到与'{}'相关的藏品。", keywords)
            }
            Ok(collections) => {
                let mut reply = format!("找到 {} 件与'{}'相关的藏品：\n", collections.len(), keywords);
                for item in collections.iter().take(5) {
                    reply.push_str(&format!(
                        "- ID: {}, 名称: {}, 年代: {}\n",
                        item.collection_id,
                        item.name,
                        item.era.as_deref().unwrap_or("不详")
                    ));
                }
                reply
            }
            Err(e) => {
                warn!("collection search failed: {}", e);
                "藏品搜索服务暂时不可用，请稍后再试。".to_string()
            }
        }
    }
}

#[async_trait]
impl AgentHandler for CollectionManagementAgent {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn handle(&self, request: &RequestContext) -> Result<String> {
        let reply = match self
            .sub_intents
            .classify(&request.message, "collection")
            .as_deref()
        {
            Some("list") => self.list_collections().await,
            Some("detail") => self.collection_detail(&request.message).await,
            Some("environment") => self.environment_report(&request.message).await,
            Some("loan") => self.file_loan_request(request).await,
            Some("search") => self.search_collections(&request.message).await,
            _ => "请问您需要查询藏品列表、获取藏品详情、查看环境监测数据，还是处理借展申请？"
                .to_string(),
        };
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessagePayload;
    use docent_services::{CannedServices, MemoryNotifier};
    use serde_json::Map;

    fn agent_with_notifier() -> (CollectionManagementAgent, Arc<MemoryNotifier>) {
        let notifier = Arc::new(MemoryNotifier::new());
        let agent =
            CollectionManagementAgent::new(Arc::new(CannedServices::new()), notifier.clone())
                .unwrap();
        (agent, notifier)
    }

    fn request(message: &str) -> RequestContext {
        RequestContext::new("staff", MessagePayload::text(message))
    }

    #[tokio::test]
    async fn test_list_collections() {
        let (agent, _) = agent_with_notifier();
        let reply = agent.handle(&request("给我看藏品列表")).await.unwrap();
        assert!(reply.contains("藏品列表"));
        assert!(reply.contains("COL001"));
        assert!(reply.contains("青铜鼎"));
    }

    #[tokio::test]
    async fn test_detail_by_id() {
        let (agent, _) = agent_with_notifier();
        let reply = agent
            .handle(&request("查看藏品 COL002 的藏品详情"))
            .await
            .unwrap();
        assert!(reply.contains("古埃及木乃伊"));
        assert!(reply.contains("当前位置"));
    }

    #[tokio::test]
    async fn test_detail_without_id_prompts() {
        let (agent, _) = agent_with_notifier();
        let reply = agent.handle(&request("查看藏品详情")).await.unwrap();
        assert!(reply.contains("请提供藏品的ID"));
    }

    #[tokio::test]
    async fn test_detail_unknown_id_reports_backend_message() {
        let (agent, _) = agent_with_notifier();
        let reply = agent
            .handle(&request("藏品详情 COL999"))
            .await
            .unwrap();
        assert!(reply.contains("获取失败"));
    }

    #[tokio::test]
    async fn test_environment_with_hall() {
        let (agent, _) = agent_with_notifier();
        let reply = agent.handle(&request("二层的温湿度怎么样")).await.unwrap();
        assert!(reply.contains("二层的环境监测数据"));
        assert!(reply.contains("湿度"));
    }

    #[tokio::test]
    async fn test_environment_defaults_hall() {
        let (agent, _) = agent_with_notifier();
        let reply = agent.handle(&request("环境监测情况如何")).await.unwrap();
        assert!(reply.contains("默认展厅"));
    }

    #[tokio::test]
    async fn test_loan_request_notifies_curator() {
        let (agent, notifier) = agent_with_notifier();
        let mut context = Map::new();
        context.insert(
            "exhibition_name".into(),
            Value::String("丝路文明展".into()),
        );
        let req = request("我要提交借展申请").with_context(context);
        let reply = agent.handle(&req).await.unwrap();
        assert!(reply.contains("借展申请已提交成功"));
        assert!(reply.contains("LN0001"));

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, CURATOR_EMAIL);
        assert!(sent[0].body.contains("丝路文明展"));
    }

    #[tokio::test]
    async fn test_search_collections() {
        let (agent, _) = agent_with_notifier();
        let reply = agent.handle(&request("搜索藏品 唐三彩")).await.unwrap();
        assert!(reply.contains("找到 1 件"));
        assert!(reply.contains("COL003"));
    }

    #[tokio::test]
    async fn test_search_without_keywords_prompts() {
        let (agent, _) = agent_with_notifier();
        let reply = agent.handle(&request("搜索藏品")).await.unwrap();
        assert!(reply.contains("请提供搜索关键词"));
    }

    #[tokio::test]
    async fn test_unrecognized_request_prompts() {
        let (agent, _) = agent_with_notifier();
        let reply = agent.handle(&request("你好")).await.unwrap();
        assert!(reply.contains("请问您需要"));
    }
}
