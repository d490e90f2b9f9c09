//! Market feed adapters.

mod http;

pub use http::HttpFeedSource;
