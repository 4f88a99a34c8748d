//! Ordercast Engine library.
//!
//! Real-time order event broadcast server for the storefront.
//!
//! ## Structure
//!
//! - `use_cases/` - Authentication into role groups, event publishing and fan-out
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP and WebSocket entry points, connection registry
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
