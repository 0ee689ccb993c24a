//! Intercom Module
//!
//! Rings, contact requests and the inbox endpoints.
//!
//! - `POST /api/mailboxes/{id}/rings`, `POST /api/mailboxes/{id}/requests`
//! - `POST /api/requests/{id}/respond`
//! - `GET /api/requests/received`, `GET /api/requests/sent`
//! - `GET /api/rings`, `PATCH /api/rings/{id}/read`, `DELETE /api/rings/{id}`
//! - `GET /api/dashboard/counts`

pub mod db;
pub mod handlers;

pub use handlers::{
    dashboard_counts, delete_ring, list_received_requests, list_rings, list_sent_requests, mark_ring_read,
    request_contact, respond_to_request, ring_mailbox, RespondRequest,
};
