pub mod auth;
pub mod client;
pub mod limiter;
pub mod media;

pub use auth::TokenProvider;
pub use client::{ApiClient, Fetched};
pub use limiter::RateLimiter;
pub use media::{MediaCache, MediaKey};
