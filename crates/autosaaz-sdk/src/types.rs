//! DTOs for the admin resource surface
//!
//! Shapes are intentionally light: the backend owns the full schemas, and
//! the admin screens only need the fields they render. Unknown fields are
//! ignored on deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A marketplace customer account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    /// "active" | "suspended"
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// A registered garage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Garage {
    pub id: String,
    pub name: String,
    pub owner_email: Option<String>,
    /// "active" | "suspended"
    pub status: String,
    pub rating: Option<f64>,
}

/// A service order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub garage_id: String,
    pub customer_id: String,
    pub status: String,
    pub total_aed: f64,
    pub created_at: Option<DateTime<Utc>>,
}

/// An escrowed payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub amount_aed: f64,
    /// "held" | "released" | "refunded"
    pub status: String,
}

/// A dispute raised against an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispute {
    pub id: String,
    pub order_id: String,
    pub reason: String,
    /// "open" | "resolved" | "escalated"
    pub status: String,
    pub opened_at: Option<DateTime<Utc>>,
}

/// A customer support ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: String,
    pub subject: String,
    /// "open" | "pending" | "closed"
    pub status: String,
}

/// A push notification to send
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    pub title: String,
    pub body: String,
    /// "all" | "customers" | "garages"
    pub audience: String,
}

/// A previously sent push notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub body: String,
    pub audience: String,
    pub sent_at: Option<DateTime<Utc>>,
}

/// A promotional banner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Banner {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub active: bool,
}

/// Fields for creating or updating a banner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerInput {
    pub title: String,
    pub image_url: String,
    pub active: bool,
}

/// A CMS content page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsPage {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Marketplace commission settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionSettings {
    pub percent: f64,
    pub updated_at: Option<DateTime<Utc>>,
}
