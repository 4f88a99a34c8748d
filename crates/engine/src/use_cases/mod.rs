//! Use cases - User story orchestration.
//!
//! Use cases orchestrate the registry and the external ports to fulfill
//! subscriber and producer flows.

pub mod notification;

pub use notification::NotificationUseCases;
