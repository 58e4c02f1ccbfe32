//! HTTP transport layer for the expense dispatcher
//!
//! Provides the external API routing, including the `/expenses` resource
//! and the `/invoke` event endpoint.

pub mod handlers;
