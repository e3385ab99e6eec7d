//! Blocking client core for the Scryfall card-data API.
//!
//! # Overview
//! Turns typed parameters into a request URL, sends it through a pluggable
//! `Transport`, and classifies the JSON envelope that comes back (single
//! object, paginated list, catalog or error). An optional in-memory cache and
//! a shared rate limiter sit in front of the network.
//!
//! # Design
//! - `Client::build_request` and `Client::parse_response` are pure; the
//!   I/O boundary is the `Transport` trait (`UreqTransport` by default).
//! - Caching is opt-in per call (`CallOptions`). Error envelopes are never
//!   cached, and a cache hit never waits on the rate limiter.
//! - The process-wide cache and limiter are created lazily and can be reset
//!   (`reset_shared_cache`, `reset_shared_rate_limiter`) for test isolation.
//! - All calls block. From an async runtime, run them on a blocking pool.

pub mod cache;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod params;
pub mod path;
pub mod query;
pub mod rate_limit;
pub mod resources;
pub mod types;

pub use cache::{cache_key, reset_shared_cache, shared_cache, CacheBackend, MemoryCache};
pub use client::{ApiRequest, CacheOptions, CallOptions, Client, ClientBuilder, Pages};
pub use config::{ClientConfig, RateLimitMode};
pub use envelope::{classify, Catalog, Envelope, ListPage, Payload};
pub use error::{ApiErrorBody, Result, ScryfallError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use params::Params;
pub use path::{resolve_path, Endpoint};
pub use query::{build_query, default_query};
pub use rate_limit::{reset_shared_rate_limiter, shared_rate_limiter, RateLimit, RateLimiter};
pub use resources::{BulkDataLookup, CardIdentifier, CardLookup, CardQuery, CatalogKind, NameMatch, RulingsLookup};
pub use types::{BulkData, Card, CardFace, CardSymbol, CoreFields, GameplayFields, ManaCost, Prices, PrintFields, Ruling, Set};
