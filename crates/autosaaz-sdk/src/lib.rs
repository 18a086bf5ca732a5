//! AutoSaaz Admin SDK
//!
//! High-level client for the AutoSaaz admin backend. Wraps the cache,
//! retry and transport infrastructure from `autosaaz-core` behind one
//! [`ApiClient`] with typed operations per resource family.
//!
//! ```no_run
//! use autosaaz_sdk::ApiClient;
//! use autosaaz_core::config::ClientConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("https://api.autosaaz.com/functions/v1", "anon-key");
//! let client = ApiClient::new(config).await?;
//! client.sign_in("session-jwt");
//!
//! let garages = client.list_garages(1).await?;
//! println!("{} garages", garages.len());
//!
//! client.suspend_garage(&garages[0].id, "repeated no-shows").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod resources;
pub mod types;

pub use client::ApiClient;
pub use types::{
    Banner, BannerInput, CmsPage, CommissionSettings, Dispute, Garage, NewNotification,
    Notification, Order, Payment, SupportTicket, User,
};

// Re-export the core surface callers need alongside the client
pub use autosaaz_core::cache::{CacheKey, ResourceKind};
pub use autosaaz_core::config::ClientConfig;
pub use autosaaz_core::error::{AutosaazError, AutosaazResult};
