//! Transport layer for tool invocation.

pub mod http;

pub use http::HttpTransport;
