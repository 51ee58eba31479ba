//! Q&A agent — visiting information, collections, exhibitions
//!
//! Common questions are answered from a preset table before anything else;
//! collection and exhibition questions go to the catalogue search; the rest
//! fall through to the generic question-answering service.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use docent_services::ServiceApi;

use crate::agents::strip_stop_words;
use crate::intent::SubIntentTable;
use crate::registry::AgentHandler;
use crate::types::RequestContext;

const STOP_WORDS: &[&str] = &[
    "请问", "想了解", "关于", "的", "有", "什么", "哪些", "吗", "是", "了解",
];

// category words carry no search signal, the catalogue is searched by
// the remaining terms
const COLLECTION_NOISE: &[&str] = &["藏品", "文物", "艺术品", "展品", "这件", "哪件"];
const EXHIBITION_NOISE: &[&str] = &["展览", "特展", "主题展"];

pub struct QaAgent {
    services: Arc<dyn ServiceApi>,
    sub_intents: SubIntentTable,
    common_answers: Vec<(String, String)>,
}

impl QaAgent {
    pub const NAME: &'static str = "QAAgent";

    pub fn new(services: Arc<dyn ServiceApi>) -> Self {
        Self {
            services,
            sub_intents: SubIntentTable::museum_defaults(),
            common_answers: preset_answers(),
        }
    }

    async fn answer_collection_query(&self, message: &str) -> String {
        let keywords = strip_stop_words(&strip_stop_words(message, STOP_WORDS), COLLECTION_NOISE);
        if keywords.is_empty() {
            return "请问您想了解哪件藏品的信息？您可以告诉我藏品的名称或关键词，我会为您查询。"
                .to_string();
        }

        match self.services.search_collections(&keywords).await {
            Ok(collections) if collections.is_empty() => {
                format!("未找到与'{}'相关的藏品信息。", keywords)
            }
            Ok(collections) => {
                let item = &collections[0];
                format!(
                    "{}\n年代：{}\n来源：{}\n描述：{}",
                    item.name,
                    item.era.as_deref().unwrap_or("不详"),
                    item.source.as_deref().unwrap_or("不详"),
                    item.description.as_deref().unwrap_or("暂无详细描述")
                )
            }
            Err(e) => {
                warn!("collection search failed: {}", e);
                "藏品查询服务暂时不可用，请稍后再试。".to_string()
            }
        }
    }

    async fn answer_exhibition_query(&self, message: &str) -> String {
        // an empty remainder searches everything, mirroring the backend's
        // list-all behavior
        let keywords = strip_stop_words(&strip_stop_words(message, STOP_WORDS), EXHIBITION_NOISE);
        match self.services.search_exhibitions(&keywords).await {
            Ok(exhibitions) if exhibitions.is_empty() => {
                format!("未找到与'{}'相关的展览信息。", keywords)
            }
            Ok(exhibitions) => {
                let mut reply = String::new();
                for exhibition in exhibitions.iter().take(3) {
                    reply.push_str(&format!(
                        "{}\n时间：{} 至 {}\n地点：{}\n简介：{}\n\n",
                        exhibition.name,
                        exhibition.start_date,
                        exhibition.end_date,
                        exhibition.location,
                        exhibition.description
                    ));
                }
                reply.trim_end().to_string()
            }
            Err(e) => {
                warn!("exhibition search failed: {}", e);
                "展览查询服务暂时不可用，请稍后再试。".to_string()
            }
        }
    }

    async fn answer_general_question(&self, message: &str) -> String {
        match self.services.ask(message).await {
            Ok(reply) => reply.answer,
            Err(e) => {
                warn!("qa service failed: {}", e);
                "抱歉，我暂时无法回答这个问题，请您稍后再试或联系博物馆工作人员。".to_string()
            }
        }
    }
}

#[async_trait]
impl AgentHandler for QaAgent {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn handle(&self, request: &RequestContext) -> Result<String> {
        // preset answers first, scanned in declaration order
        for (key, answer) in &self.common_answers {
            if request.message.contains(key.as_str()) {
                return Ok(answer.clone());
            }
        }

        let reply = match self.sub_intents.classify(&request.message, "qa").as_deref() {
            Some("collection") => self.answer_collection_query(&request.message).await,
            Some("exhibition") => self.answer_exhibition_query(&request.message).await,
            _ => self.answer_general_question(&request.message).await,
        };
        Ok(reply)
    }
}

fn preset_answers() -> Vec<(String, String)> {
    [
        (
            "开放时间",
            "博物馆的开放时间为周二至周日 09:00-17:00（16:30停止入场），周一闭馆（法定节假日除外）。",
        ),
        (
            "票价",
            "成人票：60元/人，学生票：30元/人（凭有效学生证），老人票：30元/人（60岁以上凭有效证件），儿童票：20元/人（6-18岁），6岁以下儿童免费。",
        ),
        (
            "交通",
            "您可以乘坐地铁2号线在博物馆站下车，从B出口步行约5分钟即可到达。也可以乘坐公交101、102、103路在博物馆站下车。",
        ),
        (
            "停车",
            "博物馆地下停车场收费标准：小型车5元/小时，大型车10元/小时，当日单次停车最高收费50元。",
        ),
        (
            "讲解服务",
            "博物馆提供免费的定时讲解服务，时间为10:00、13:00、15:00。您也可以租用语音导览器，租金30元/台，押金200元。",
        ),
        (
            "寄存",
            "博物馆入口处提供免费寄存服务，贵重物品请自行保管。",
        ),
        (
            "餐饮",
            "博物馆内设有咖啡厅和餐厅，提供简餐和饮料。",
        ),
        (
            "摄影",
            "除特展外，博物馆内允许拍照，但禁止使用闪光灯和三脚架。",
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
