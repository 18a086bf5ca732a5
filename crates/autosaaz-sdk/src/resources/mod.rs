//! Typed operations per backend resource family
//!
//! Each module extends [`crate::client::ApiClient`] with the operations of
//! one admin screen. The mapping from a write to the cache entries it
//! invalidates lives here, next to the operation that knows it.

pub mod banners;
pub mod cms;
pub mod commission;
pub mod disputes;
pub mod garages;
pub mod notifications;
pub mod orders;
pub mod payments;
pub mod support;
pub mod users;
