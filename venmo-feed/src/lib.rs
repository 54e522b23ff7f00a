//! venmo-feed: HTTP page source for the account stories feed.

pub mod client;
pub mod error;

pub use client::{FeedClient, FeedConfig, decode_page};
pub use error::FetchError;
