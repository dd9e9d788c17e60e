//! Turnstile - minimal static file server
//!
//! Core library for admission control and the HTTP/1.0 request handler.

pub mod config;
pub mod http;
pub mod server;
