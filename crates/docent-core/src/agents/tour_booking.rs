//! Tour booking agent — tickets, visit routes, booking lookups, time slots

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use docent_services::types::NewBooking;
use docent_services::ServiceApi;

use crate::intent::SubIntentTable;
use crate::registry::AgentHandler;
use crate::types::RequestContext;

const FALLBACK_PHONE: &str = "13800138000";

pub struct TourBookingAgent {
    services: Arc<dyn ServiceApi>,
    sub_intents: SubIntentTable,
}

impl TourBookingAgent {
    pub const NAME: &'static str = "TourBookingAgent";

    pub fn new(services: Arc<dyn ServiceApi>) -> Self {
        Self {
            services,
            sub_intents: SubIntentTable::museum_defaults(),
        }
    }

    /// File a booking. Visitor details come from the caller-supplied
    /// context map; missing fields fall back to placeholder values.
    async fn create_booking(&self, request: &RequestContext) -> String {
        let booking = NewBooking {
            visitor_name: request.context_str("visitor_name", "游客").to_string(),
            visitor_phone: request
                .context_str("visitor_phone", FALLBACK_PHONE)
                .to_string(),
            visit_date: request.context_str("visit_date", "2025-08-26").to_string(),
            visit_time: request
                .context_str("visit_time", "09:30-11:30")
                .to_string(),
            ticket_type: request.context_str("ticket_type", "成人票").to_string(),
            ticket_count: request
                .context
                .get("ticket_count")
                .and_then(Value::as_u64)
                .unwrap_or(1) as u32,
        };

        match self.services.create_booking(&booking).await {
            Ok(confirmed) => format!(
                "预约成功！您的预约编号是{}，\n预约日期：{}\n预约时间：{}\n票种：{}\n数量：{}张\n请在参观当天凭预约信息到博物馆入口处核销。",
                confirmed.booking_id,
                confirmed.visit_date,
                confirmed.visit_time,
                confirmed.ticket_type,
                confirmed.ticket_count
            ),
            Err(e) => {
                warn!("booking service unavailable: {}", e);
                "预约服务暂时不可用，请稍后再试，或通过博物馆官方网站预约。".to_string()
            }
        }
    }

    fn suggest_route(&self) -> String {
        "为您推荐的参观路线：\n\
         1. 一层：古埃及文明特展（预计参观时间：45分钟）\n\
         2. 二层：中国古代青铜器展（预计参观时间：60分钟）\n\
         3. 三层：现代艺术展（预计参观时间：45分钟）\n\
         全程预计用时约2小时，您可以根据自己的兴趣和时间调整参观顺序。"
            .to_string()
    }

    async fn query_bookings(&self, request: &RequestContext) -> String {
        let phone = request.context_str("visitor_phone", FALLBACK_PHONE);
        match self.services.bookings(Some(phone)).await {
            Ok(bookings) if bookings.is_empty() => {
                "未找到您的预约记录，请确认手机号是否正确。".to_string()
            }
            Ok(bookings) => {
                let mut reply = String::from("您的预约记录：\n");
                for booking in &bookings {
                    reply.push_str(&format!(
                        "- 预约编号：{}\n  预约日期：{}\n  预约时间：{}\n  状态：{}\n",
                        booking.booking_id, booking.visit_date, booking.visit_time, booking.status
                    ));
                }
                reply
            }
            Err(e) => {
                warn!("booking lookup failed: {}", e);
                "预约查询服务暂时不可用，请稍后再试。".to_string()
            }
        }
    }

    async fn list_available_slots(&self) -> String {
        match self.services.available_slots(None).await {
            Ok(slots) if slots.is_empty() => "暂无可用预约时段。".to_string(),
            Ok(slots) => {
                let mut reply = String::from("近期可用的预约时段：\n");
                for day in slots.iter().take(2) {
                    reply.push_str(&format!("日期：{}\n", day.date));
                    for slot in day.time_slots.iter().take(3) {
                        reply.push_str(&format!(
                            "  - {}（剩余{}个名额）\n",
                            slot.time, slot.available
                        ));
                    }
                }
                reply
            }
            Err(e) => {
                warn!("slot lookup failed: {}", e);
                "时段查询服务暂时不可用，请稍后再试。".to_string()
            }
        }
    }
}

#[async_trait]
impl AgentHandler for TourBookingAgent {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn handle(&self, request: &RequestContext) -> Result<String> {
        let reply = match self
            .sub_intents
            .classify(&request.message, "tour_booking")
            .as_deref()
        {
            Some("create") => self.create_booking(request).await,
            Some("route") => self.suggest_route(),
            Some("query") => self.query_bookings(request).await,
            Some("slots") => self.list_available_slots().await,
            _ => "请问您需要预约门票、查询预约信息、了解可用时段，还是需要我为您生成个性化参观路线？"
                .to_string(),
        };
        Ok(reply)
    }
}
