//! Typed client for the museum service backends
//!
//! Agents never build URLs themselves: they call the operations on
//! `ServiceApi` and the client maps each one to the backend endpoint.
//! Every backend replies with the `{status, data?, message?}` envelope,
//! which the client unwraps into `Result` before the agent sees it.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{
    Booking, CollectionRecord, DaySlots, EnvironmentReading, Exhibition, Feedback, FeedbackReceipt,
    LoanReceipt, LoanRequest, NewBooking, QaAnswer, ServiceReply,
};

/// Failure surface of a downstream service call
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request never produced a well-formed reply (network, timeout,
    /// non-2xx status, malformed body)
    #[error("service transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    /// The backend answered with `status != "success"`
    #[error("service rejected request: {0}")]
    Rejected(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Operations the museum backends expose to agents
#[async_trait]
pub trait ServiceApi: Send + Sync {
    /// Bookings on record, optionally filtered by visitor phone
    async fn bookings(&self, phone: Option<&str>) -> ServiceResult<Vec<Booking>>;

    /// File a new booking and return the confirmed record
    async fn create_booking(&self, booking: &NewBooking) -> ServiceResult<Booking>;

    /// Bookable time windows, optionally restricted to one date
    async fn available_slots(&self, date: Option<&str>) -> ServiceResult<Vec<DaySlots>>;

    /// Ask the generic question-answering service
    async fn ask(&self, question: &str) -> ServiceResult<QaAnswer>;

    /// Submit visitor feedback
    async fn submit_feedback(&self, feedback: &Feedback) -> ServiceResult<FeedbackReceipt>;

    /// Full collection listing
    async fn list_collections(&self) -> ServiceResult<Vec<CollectionRecord>>;

    /// Detail for a single collection item by id
    async fn collection_detail(&self, collection_id: &str) -> ServiceResult<CollectionRecord>;

    /// Keyword search over the collection catalogue
    async fn search_collections(&self, keywords: &str) -> ServiceResult<Vec<CollectionRecord>>;

    /// Keyword search over exhibitions
    async fn search_exhibitions(&self, keywords: &str) -> ServiceResult<Vec<Exhibition>>;

    /// Latest climate reading for a hall
    async fn environment(&self, location: &str) -> ServiceResult<EnvironmentReading>;

    /// File an exhibition loan request
    async fn create_loan_request(&self, loan: &LoanRequest) -> ServiceResult<LoanReceipt>;
}

/// HTTP implementation of `ServiceApi` over the museum REST backend
pub struct HttpServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpServiceClient {
    /// Create a client against a backend base URL, e.g. `http://localhost:8000`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> ServiceResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {}", url);
        let reply: ServiceReply<T> = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Self::unwrap_reply(endpoint, reply)
    }

    async fn post<B, T>(&self, endpoint: &str, body: &B) -> ServiceResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("POST {}", url);
        let reply: ServiceReply<T> = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Self::unwrap_reply(endpoint, reply)
    }

    fn unwrap_reply<T>(endpoint: &str, reply: ServiceReply<T>) -> ServiceResult<T> {
        if reply.is_success() {
            reply.data.ok_or_else(|| {
                warn!("{}: success reply without data", endpoint);
                ServiceError::Rejected("success reply carried no data".to_string())
            })
        } else {
            let message = reply
                .message
                .unwrap_or_else(|| "unknown backend error".to_string());
            warn!("{}: backend rejected request: {}", endpoint, message);
            Err(ServiceError::Rejected(message))
        }
    }
}

#[async_trait]
impl ServiceApi for HttpServiceClient {
    async fn bookings(&self, phone: Option<&str>) -> ServiceResult<Vec<Booking>> {
        let mut query = Vec::new();
        if let Some(phone) = phone {
            query.push(("phone", phone));
        }
        self.get("/api/public/tour-booking/bookings", &query).await
    }

    async fn create_booking(&self, booking: &NewBooking) -> ServiceResult<Booking> {
        self.post("/api/public/tour-booking/create", booking).await
    }

    async fn available_slots(&self, date: Option<&str>) -> ServiceResult<Vec<DaySlots>> {
        let mut query = Vec::new();
        if let Some(date) = date {
            query.push(("date", date));
        }
        self.get("/api/public/tour-booking/available-slots", &query)
            .await
    }

    async fn ask(&self, question: &str) -> ServiceResult<QaAnswer> {
        self.post("/api/public/qa", &serde_json::json!({ "question": question }))
            .await
    }

    async fn submit_feedback(&self, feedback: &Feedback) -> ServiceResult<FeedbackReceipt> {
        self.post("/api/public/feedback", feedback).await
    }

    async fn list_collections(&self) -> ServiceResult<Vec<CollectionRecord>> {
        self.get("/api/internal/collection/list", &[]).await
    }

    async fn collection_detail(&self, collection_id: &str) -> ServiceResult<CollectionRecord> {
        let endpoint = format!("/api/internal/collection/detail/{}", collection_id);
        self.get(&endpoint, &[]).await
    }

    async fn search_collections(&self, keywords: &str) -> ServiceResult<Vec<CollectionRecord>> {
        self.get("/api/internal/collection/search", &[("keywords", keywords)])
            .await
    }

    async fn search_exhibitions(&self, keywords: &str) -> ServiceResult<Vec<Exhibition>> {
        self.get(
            "/api/public/qa/exhibitions/search",
            &[("keywords", keywords)],
        )
        .await
    }

    async fn environment(&self, location: &str) -> ServiceResult<EnvironmentReading> {
        self.get(
            "/api/internal/collection/environment",
            &[("location", location)],
        )
        .await
    }

    async fn create_loan_request(&self, loan: &LoanRequest) -> ServiceResult<LoanReceipt> {
        self.post("/api/internal/collection/loan-request", loan).await
    }
}
