// Network adapter for client WebSocket connections.

pub mod client;

pub use client::{ws_ai_handler, ws_local_handler, ws_remote_handler};
