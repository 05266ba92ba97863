//! Request handlers for the WebSocket and HTTP surfaces.

pub mod credentials;
pub mod http;
pub mod websocket;
