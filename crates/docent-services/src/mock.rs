//! Canned in-memory implementation of the museum backends
//!
//! Carries the same demonstration data the real backends serve, so the
//! dispatcher and agents can run (and be tested) without any service
//! process. Created bookings are appended in memory; everything else is
//! static.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::client::{ServiceApi, ServiceError, ServiceResult};
use crate::types::{
    Booking, CollectionRecord, DaySlots, EnvironmentReading, Exhibition, Feedback, FeedbackReceipt,
    LoanReceipt, LoanRequest, NewBooking, QaAnswer, TimeSlot,
};

/// In-memory stand-in for every downstream museum service
pub struct CannedServices {
    bookings: Mutex<Vec<Booking>>,
    collections: Vec<CollectionRecord>,
    exhibitions: Vec<Exhibition>,
    slots: Vec<DaySlots>,
    booking_seq: AtomicU64,
    loan_seq: AtomicU64,
    feedback_seq: AtomicU64,
}

impl CannedServices {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(vec![Booking {
                booking_id: "BK0001".to_string(),
                visitor_name: "张先生".to_string(),
                visitor_phone: "13800138000".to_string(),
                visit_date: "2025-08-26".to_string(),
                visit_time: "09:30-11:30".to_string(),
                ticket_type: "成人票".to_string(),
                ticket_count: 2,
                status: "已预约".to_string(),
                created_at: Utc::now(),
            }]),
            collections: canned_collections(),
            exhibitions: canned_exhibitions(),
            slots: canned_slots(),
            booking_seq: AtomicU64::new(2),
            loan_seq: AtomicU64::new(1),
            feedback_seq: AtomicU64::new(1),
        }
    }
}

impl Default for CannedServices {
    fn default() -> Self {
        Self::new()
    }
}

fn canned_collections() -> Vec<CollectionRecord> {
    vec![
        CollectionRecord {
            collection_id: "COL001".to_string(),
            name: "青铜鼎".to_string(),
            era: Some("商代晚期".to_string()),
            source: Some("安阳殷墟出土".to_string()),
            dimensions: Some("高133厘米，重832.84千克".to_string()),
            material: Some("青铜".to_string()),
            description: Some("商代晚期的代表性作品，纹饰精美，铸造工艺精湛，是现已发现的最重的青铜器。".to_string()),
            current_location: Some("二层青铜器展厅".to_string()),
            conservation_status: Some("良好".to_string()),
        },
        CollectionRecord {
            collection_id: "COL002".to_string(),
            name: "古埃及木乃伊".to_string(),
            era: Some("古埃及第18王朝".to_string()),
            source: Some("国际交流借展".to_string()),
            dimensions: None,
            material: None,
            description: Some("古埃及法老遗体，距今已有3000多年历史。".to_string()),
            current_location: Some("一层古埃及文明特展".to_string()),
            conservation_status: Some("恒温恒湿保存".to_string()),
        },
        CollectionRecord {
            collection_id: "COL003".to_string(),
            name: "唐三彩骆驼俑".to_string(),
            era: Some("唐代".to_string()),
            source: Some("西安出土".to_string()),
            dimensions: Some("高58厘米".to_string()),
            material: Some("陶".to_string()),
            description: Some("釉色鲜亮的唐代陶俑，反映了丝绸之路的繁荣。".to_string()),
            current_location: Some("库房".to_string()),
            conservation_status: Some("修复中".to_string()),
        },
    ]
}

fn canned_exhibitions() -> Vec<Exhibition> {
    vec![
        Exhibition {
            name: "古埃及文明特展".to_string(),
            start_date: "2025-06-01".to_string(),
            end_date: "2025-12-31".to_string(),
            location: "一层特展厅".to_string(),
            description: "汇集古埃及文物百余件，包括木乃伊与黄金面具。".to_string(),
        },
        Exhibition {
            name: "中国古代青铜器展".to_string(),
            start_date: "2025-01-01".to_string(),
            end_date: "2025-12-31".to_string(),
            location: "二层常设展厅".to_string(),
            description: "馆藏青铜器精品常设展。".to_string(),
        },
    ]
}

fn canned_slots() -> Vec<DaySlots> {
    vec![
        DaySlots {
            date: "2025-08-26".to_string(),
            time_slots: vec![
                TimeSlot { time: "09:30-11:30".to_string(), available: 20 },
                TimeSlot { time: "13:00-15:00".to_string(), available: 35 },
                TimeSlot { time: "15:00-16:30".to_string(), available: 12 },
            ],
        },
        DaySlots {
            date: "2025-08-27".to_string(),
            time_slots: vec![
                TimeSlot { time: "09:30-11:30".to_string(), available: 40 },
                TimeSlot { time: "13:00-15:00".to_string(), available: 40 },
            ],
        },
    ]
}

#[async_trait]
impl ServiceApi for CannedServices {
    async fn bookings(&self, phone: Option<&str>) -> ServiceResult<Vec<Booking>> {
        let bookings = self.bookings.lock().expect("bookings lock poisoned");
        let matched = bookings
            .iter()
            .filter(|b| phone.is_none_or(|p| b.visitor_phone == p))
            .cloned()
            .collect();
        Ok(matched)
    }

    async fn create_booking(&self, booking: &NewBooking) -> ServiceResult<Booking> {
        let seq = self.booking_seq.fetch_add(1, Ordering::SeqCst);
        let confirmed = Booking {
            booking_id: format!("BK{:04}", seq),
            visitor_name: booking.visitor_name.clone(),
            visitor_phone: booking.visitor_phone.clone(),
            visit_date: booking.visit_date.clone(),
            visit_time: booking.visit_time.clone(),
            ticket_type: booking.ticket_type.clone(),
            ticket_count: booking.ticket_count,
            status: "已预约".to_string(),
            created_at: Utc::now(),
        };
        debug!("canned backend confirmed booking {}", confirmed.booking_id);
        self.bookings
            .lock()
            .expect("bookings lock poisoned")
            .push(confirmed.clone());
        Ok(confirmed)
    }

    async fn available_slots(&self, date: Option<&str>) -> ServiceResult<Vec<DaySlots>> {
        let slots = self
            .slots
            .iter()
            .filter(|s| date.is_none_or(|d| s.date == d))
            .cloned()
            .collect();
        Ok(slots)
    }

    async fn ask(&self, question: &str) -> ServiceResult<QaAnswer> {
        // keyword-matched canned answers, mirrored from the public QA backend
        let answer = if question.contains("青铜鼎") {
            "青铜鼎是商代晚期的代表性作品，纹饰精美，铸造工艺精湛，是我国现已发现的最重的青铜器。"
        } else if question.contains("木乃伊") || question.contains("埃及") {
            "古埃及木乃伊是古埃及第18王朝法老图坦卡蒙的遗体，距今已有3000多年历史。"
        } else if question.contains("开放") || question.contains("时间") {
            "博物馆开放时间为周二至周日9:00-17:00（16:30停止入场），周一闭馆（法定节假日除外）。"
        } else if question.contains("门票") {
            "成人票80元，学生票40元，65岁以上老人、军人、残疾人凭有效证件免费参观。"
        } else {
            "感谢您的提问！我们正在为您查询相关信息，稍后将给您更详细的回复。"
        };
        Ok(QaAnswer {
            question: question.to_string(),
            answer: answer.to_string(),
        })
    }

    async fn submit_feedback(&self, _feedback: &Feedback) -> ServiceResult<FeedbackReceipt> {
        let seq = self.feedback_seq.fetch_add(1, Ordering::SeqCst);
        Ok(FeedbackReceipt {
            feedback_id: format!("FB{:04}", seq),
            status: "已接收".to_string(),
        })
    }

    async fn list_collections(&self) -> ServiceResult<Vec<CollectionRecord>> {
        Ok(self.collections.clone())
    }

    async fn collection_detail(&self, collection_id: &str) -> ServiceResult<CollectionRecord> {
        self.collections
            .iter()
            .find(|c| c.collection_id == collection_id)
            .cloned()
            .ok_or_else(|| ServiceError::Rejected("未找到藏品信息".to_string()))
    }

    async fn search_collections(&self, keywords: &str) -> ServiceResult<Vec<CollectionRecord>> {
        let keywords = keywords.to_lowercase();
        let matched = self
            .collections
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&keywords)
                    || c.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&keywords))
            })
            .cloned()
            .collect();
        Ok(matched)
    }

    async fn search_exhibitions(&self, keywords: &str) -> ServiceResult<Vec<Exhibition>> {
        let keywords = keywords.to_lowercase();
        let matched = self
            .exhibitions
            .iter()
            .filter(|e| {
                e.name.to_lowercase().contains(&keywords)
                    || e.description.to_lowercase().contains(&keywords)
            })
            .cloned()
            .collect();
        Ok(matched)
    }

    async fn environment(&self, location: &str) -> ServiceResult<EnvironmentReading> {
        Ok(EnvironmentReading {
            location: location.to_string(),
            temperature: 20.5,
            humidity: 52.0,
            light_intensity: 150.0,
            air_quality: "优".to_string(),
            timestamp: Utc::now(),
        })
    }

    async fn create_loan_request(&self, loan: &LoanRequest) -> ServiceResult<LoanReceipt> {
        if loan.collection_ids.is_empty() {
            return Err(ServiceError::Rejected("借展申请必须包含藏品".to_string()));
        }
        let seq = self.loan_seq.fetch_add(1, Ordering::SeqCst);
        Ok(LoanReceipt {
            loan_id: format!("LN{:04}", seq),
            exhibition_name: loan.exhibition_name.clone(),
            requesting_institution: loan.requesting_institution.clone(),
            status: "待审批".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bookings_filtered_by_phone() {
        let services = CannedServices::new();
        let all = services.bookings(None).await.unwrap();
        assert_eq!(all.len(), 1);

        let matched = services.bookings(Some("13800138000")).await.unwrap();
        assert_eq!(matched.len(), 1);

        let none = services.bookings(Some("13900000000")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_create_booking_appends_and_assigns_id() {
        let services = CannedServices::new();
        let confirmed = services
            .create_booking(&NewBooking {
                visitor_name: "李女士".to_string(),
                visitor_phone: "13911112222".to_string(),
                visit_date: "2025-08-27".to_string(),
                visit_time: "13:00-15:00".to_string(),
                ticket_type: "学生票".to_string(),
                ticket_count: 1,
            })
            .await
            .unwrap();
        assert_eq!(confirmed.booking_id, "BK0002");
        assert_eq!(confirmed.status, "已预约");

        let mine = services.bookings(Some("13911112222")).await.unwrap();
        assert_eq!(mine.len(), 1);
    }

    #[tokio::test]
    async fn test_ask_canned_answers() {
        let services = CannedServices::new();
        let reply = services.ask("博物馆的开放时间是什么时候？").await.unwrap();
        assert!(reply.answer.contains("周二至周日"));

        let reply = services.ask("青铜鼎有多重？").await.unwrap();
        assert!(reply.answer.contains("青铜器"));
    }

    #[tokio::test]
    async fn test_collection_detail_unknown_id_rejected() {
        let services = CannedServices::new();
        let err = services.collection_detail("COL999").await.unwrap_err();
        assert!(matches!(err, ServiceError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_search_collections_by_name() {
        let services = CannedServices::new();
        let matched = services.search_collections("青铜").await.unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].collection_id, "COL001");
    }

    #[tokio::test]
    async fn test_loan_request_requires_collections() {
        let services = CannedServices::new();
        let loan = LoanRequest {
            exhibition_name: "临时特展".to_string(),
            requesting_institution: "合作博物馆".to_string(),
            contact_person: "联系人".to_string(),
            contact_phone: "13800138000".to_string(),
            start_date: "2025-10-01".to_string(),
            end_date: "2025-12-31".to_string(),
            collection_ids: vec![],
            purpose: "文化交流".to_string(),
        };
        assert!(services.create_loan_request(&loan).await.is_err());

        let loan = LoanRequest {
            collection_ids: vec!["COL001".to_string()],
            ..loan
        };
        let receipt = services.create_loan_request(&loan).await.unwrap();
        assert_eq!(receipt.loan_id, "LN0001");
        assert_eq!(receipt.status, "待审批");
    }
}
