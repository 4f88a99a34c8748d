//! Ordercast Protocol - wire types shared by the engine, its socket clients and producers
//!
//! - WebSocket message types (`ClientMessage`, `ServerMessage`)
//! - HTTP DTOs for the publish and stats endpoints
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - serde, serde_json and the domain vocabulary
//! 2. **No business logic** - pure data types and serialization

pub mod dto;
pub mod messages;

pub use dto::{
    ConnectionStatsData, GroupDeliveryData, GroupStatsData, PublishRequest, PublishResponse,
};
pub use messages::{error_codes, ClientMessage, ServerMessage};
