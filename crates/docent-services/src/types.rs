//! Data model shared with the downstream museum services

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope every museum backend speaks: `{status, data?, message?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceReply<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ServiceReply<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// A confirmed visit booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: String,
    pub visitor_name: String,
    pub visitor_phone: String,
    /// YYYY-MM-DD
    pub visit_date: String,
    /// e.g. "09:30-11:30"
    pub visit_time: String,
    pub ticket_type: String,
    pub ticket_count: u32,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub visitor_name: String,
    pub visitor_phone: String,
    pub visit_date: String,
    pub visit_time: String,
    pub ticket_type: String,
    pub ticket_count: u32,
}

/// One bookable time window on a given day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub time: String,
    pub available: u32,
}

/// All bookable windows for one day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySlots {
    pub date: String,
    pub time_slots: Vec<TimeSlot>,
}

/// A museum collection item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionRecord {
    pub collection_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub era: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conservation_status: Option<String>,
}

/// An exhibition, current or upcoming
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exhibition {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub description: String,
}

/// Climate reading for one hall
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentReading {
    pub location: String,
    pub temperature: f32,
    pub humidity: f32,
    pub light_intensity: f32,
    pub air_quality: String,
    pub timestamp: DateTime<Utc>,
}

/// An exhibition loan application to another institution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRequest {
    pub exhibition_name: String,
    pub requesting_institution: String,
    pub contact_person: String,
    pub contact_phone: String,
    pub start_date: String,
    pub end_date: String,
    pub collection_ids: Vec<String>,
    pub purpose: String,
}

/// Receipt returned when a loan request is filed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanReceipt {
    pub loan_id: String,
    pub exhibition_name: String,
    pub requesting_institution: String,
    pub status: String,
}

/// Visitor feedback submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub visitor_id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Receipt returned when feedback is accepted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackReceipt {
    pub feedback_id: String,
    pub status: String,
}

/// Answer from the generic question-answering service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaAnswer {
    pub question: String,
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_success() {
        let reply = ServiceReply::success(vec![1, 2, 3]);
        assert!(reply.is_success());
        assert_eq!(reply.data.unwrap(), vec![1, 2, 3]);
        assert!(reply.message.is_none());
    }

    #[test]
    fn test_reply_error() {
        let reply: ServiceReply<()> = ServiceReply::error("backend down");
        assert!(!reply.is_success());
        assert!(reply.data.is_none());
        assert_eq!(reply.message.as_deref(), Some("backend down"));
    }

    #[test]
    fn test_reply_deserializes_backend_shape() {
        let json = r#"{"status": "success", "data": [{"date": "2025-08-26", "time_slots": [{"time": "09:30-11:30", "available": 20}]}]}"#;
        let reply: ServiceReply<Vec<DaySlots>> = serde_json::from_str(json).unwrap();
        assert!(reply.is_success());
        let slots = reply.data.unwrap();
        assert_eq!(slots[0].time_slots[0].available, 20);
    }

    #[test]
    fn test_collection_record_optional_fields() {
        let json = r#"{"collection_id": "COL001", "name": "青铜鼎"}"#;
        let record: CollectionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.collection_id, "COL001");
        assert!(record.era.is_none());
        assert!(record.description.is_none());
    }

    #[test]
    fn test_booking_round_trip() {
        let booking = Booking {
            booking_id: "BK001".to_string(),
            visitor_name: "游客".to_string(),
            visitor_phone: "13800138000".to_string(),
            visit_date: "2025-08-26".to_string(),
            visit_time: "09:30-11:30".to_string(),
            ticket_type: "成人票".to_string(),
            ticket_count: 2,
            status: "已预约".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&booking).unwrap();
        let back: Booking = serde_json::from_str(&json).unwrap();
        assert_eq!(back.booking_id, "BK001");
        assert_eq!(back.ticket_count, 2);
    }
}
