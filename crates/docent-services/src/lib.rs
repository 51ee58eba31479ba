//! docent-services - Downstream museum service layer
//!
//! This crate provides:
//! - The shared data model spoken by the museum backends (bookings,
//!   collections, exhibitions, environment readings, loan requests)
//! - The `ServiceApi` trait that agents call, with an HTTP implementation
//!   over the museum REST backend
//! - A canned in-memory implementation for tests and offline operation
//! - The `Notifier` trait for outbound email-style notifications

pub mod client;
pub mod mock;
pub mod notify;
pub mod types;

// Re-export main types for convenience
pub use client::{HttpServiceClient, ServiceApi, ServiceError, ServiceResult};
pub use mock::CannedServices;
pub use notify::{LogNotifier, MemoryNotifier, Notifier};
pub use types::{
    Booking, CollectionRecord, DaySlots, EnvironmentReading, Exhibition, Feedback, FeedbackReceipt,
    LoanReceipt, LoanRequest, NewBooking, QaAnswer, ServiceReply, TimeSlot,
};
