//! Domain types for the Gorgias REST API
//!
//! These mirror the API's JSON schema. Datetime fields are kept as the
//! wire's ISO-8601 strings rather than parsed eagerly; list responses all
//! share the [`PaginatedResponse`] envelope. Representative rather than
//! exhaustive: unknown fields are ignored on deserialization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Pagination envelope
// ============================================================================

/// Cursor metadata on every list response. Absence of `next_cursor` is the
/// only end-of-list signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub prev_cursor: Option<String>,
    pub next_cursor: Option<String>,
}

/// Standard list envelope: `{ data, object: "list", uri, meta }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub meta: PageMeta,
}

// ============================================================================
// Customers
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: u64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub channels: Vec<CustomerChannel>,
    #[serde(default)]
    pub created_datetime: Option<String>,
    #[serde(default)]
    pub updated_datetime: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerChannel {
    pub r#type: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomerCreate {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub channels: Vec<CustomerChannel>,
}

/// Omitted fields remain unchanged on the server
#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

// ============================================================================
// Tickets
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Closed,
    Snoozed,
    Trashed,
    Spam,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoration: Option<TagDecoration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDecoration {
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    pub status: TicketStatus,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub via: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub spam: bool,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub assignee_user: Option<User>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub messages: Vec<TicketMessage>,
    #[serde(default)]
    pub is_unread: bool,
    #[serde(default)]
    pub created_datetime: Option<String>,
    #[serde(default)]
    pub updated_datetime: Option<String>,
    #[serde(default)]
    pub closed_datetime: Option<String>,
}

/// Customer reference on ticket creation: id, email or both
#[derive(Debug, Clone, Default, Serialize)]
pub struct TicketCustomerRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TicketCreate {
    pub customer: TicketCustomerRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub messages: Vec<MessageCreate>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_user: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TicketUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_user: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketMessage {
    pub id: u64,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub ticket_id: Option<u64>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub via: Option<String>,
    #[serde(default)]
    pub from_agent: bool,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body_text: Option<String>,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,
    #[serde(default)]
    pub created_datetime: Option<String>,
    #[serde(default)]
    pub sent_datetime: Option<String>,
    #[serde(default)]
    pub failed_datetime: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    pub name: String,
    pub content_type: String,
    pub size: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MessageCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_agent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<ParticipantRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<ParticipantRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantRef {
    pub id: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MessageUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub attachments: Vec<Attachment>,
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub created_datetime: Option<String>,
    #[serde(default)]
    pub updated_datetime: Option<String>,
    #[serde(default)]
    pub deactivated_datetime: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserCreate {
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

// ============================================================================
// Integrations
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integration {
    pub id: u64,
    pub name: String,
    pub r#type: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub http: Option<IntegrationHttp>,
    #[serde(default)]
    pub created_datetime: Option<String>,
    #[serde(default)]
    pub updated_datetime: Option<String>,
    #[serde(default)]
    pub deactivated_datetime: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationHttp {
    pub url: String,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
}

// ============================================================================
// Events
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub r#type: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub object_id: Option<u64>,
    #[serde(default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub created_datetime: Option<String>,
}
