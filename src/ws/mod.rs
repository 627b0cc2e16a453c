//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams portal events to clients that
//! subscribe by sport (or `"*"` for all), and answers standings queries.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
