//! Request building, dispatch and response parsing.
//!
//! # Design
//! Each call goes through the same steps:
//! build request -> check cache -> (hit: done) | (miss: rate-limit wait ->
//! send -> decode -> classify -> error: fail | ok: store in cache -> done).
//!
//! `build_request` and `parse_response` are pure and public, so the two
//! halves can be exercised without a transport. `dispatch` wires them
//! together with the cache, the rate limiter and the injected `Transport`.
//! Nothing here retries; a failed call is returned to the caller as is.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{cache_key, shared_cache, CacheBackend};
use crate::config::{ClientConfig, RateLimitMode};
use crate::envelope::{classify, ClassifyError, ListPage, Payload};
use crate::error::{Result, ScryfallError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::params::Params;
use crate::path::Endpoint;
use crate::query::{build_query, default_query};
use crate::rate_limit::RateLimit;

/// Reserved cache-key parameter holding the canonical POST body.
const BODY_KEY_PARAM: &str = "__body";

/// One logical API call before it is turned into an `HttpRequest`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub path_params: Params,
    pub query: Params,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            path_params: Params::new(),
            query: Params::new(),
            body: None,
        }
    }

    pub fn path_param(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.path_params.insert(name, value);
        self
    }

    pub fn query_param(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.query.insert(name, value);
        self
    }

    /// Overlay a whole set of query parameters; later values win.
    pub fn query_params(mut self, params: &Params) -> Self {
        self.query = self.query.merged(params);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Per-call cache settings. `ttl: None` means the client default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheOptions {
    pub enabled: bool,
    pub ttl: Option<Duration>,
}

/// Per-call overrides. `rate_limit: None` means the client's own mode.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub cache: CacheOptions,
    pub rate_limit: Option<RateLimit>,
}

impl CallOptions {
    pub fn uncached() -> Self {
        Self::default()
    }

    /// Cache with the client's default TTL.
    pub fn cached() -> Self {
        Self {
            cache: CacheOptions {
                enabled: true,
                ttl: None,
            },
            rate_limit: None,
        }
    }

    pub fn cached_for(ttl: Duration) -> Self {
        Self {
            cache: CacheOptions {
                enabled: true,
                ttl: Some(ttl),
            },
            rate_limit: None,
        }
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }
}

/// Blocking client for the Scryfall API.
///
/// Cheap to clone; clones share the transport, the cache and the limiter.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    user_agent: String,
    transport: Arc<dyn Transport>,
    cache: Arc<dyn CacheBackend>,
    rate_limit: RateLimit,
    default_ttl: Duration,
    cache_by_default: bool,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("rate_limit", &self.rate_limit)
            .field("default_ttl", &self.default_ttl)
            .field("cache_by_default", &self.cache_by_default)
            .finish_non_exhaustive()
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl Client {
    /// Client against the public API with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        ClientBuilder::new(config.clone()).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new(ClientConfig::default())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache(&self) -> &Arc<dyn CacheBackend> {
        &self.cache
    }

    pub fn rate_limit(&self) -> &RateLimit {
        &self.rate_limit
    }

    /// Options used by the façade methods.
    pub fn default_options(&self) -> CallOptions {
        if self.cache_by_default {
            CallOptions::cached()
        } else {
            CallOptions::uncached()
        }
    }

    /// Resolve the path, encode the query, attach headers and the body.
    ///
    /// Each path segment is percent-encoded on its own, so a value holding
    /// `/`, `?` or `#` stays inside its segment.
    pub fn build_request(&self, request: &ApiRequest) -> Result<HttpRequest> {
        let segments = request.endpoint.segments(&request.path_params)?;
        let invalid_base = |message: String| ScryfallError::InvalidUrl {
            url: self.base_url.clone(),
            message,
        };
        let mut url = url::Url::parse(&self.base_url).map_err(|e| invalid_base(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid_base("cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        url.set_query(Some(&build_query(&default_query(), &request.query)));
        let body = request
            .body
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ScryfallError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: request.endpoint.method,
            url: url.into(),
            headers: self.standard_headers(),
            body,
        })
    }

    /// Decode and classify a response. Error envelopes become `Api` errors.
    pub fn parse_response(&self, url: &str, response: HttpResponse) -> Result<Payload> {
        let success = response.is_success();
        let unusable = |message: String, response: HttpResponse| {
            if success {
                ScryfallError::MalformedResponse {
                    url: url.to_string(),
                    message,
                }
            } else {
                ScryfallError::HttpStatus {
                    status: response.status,
                    body: response.body,
                }
            }
        };

        let body: Value = match serde_json::from_str(&response.body) {
            Ok(body) => body,
            Err(e) => return Err(unusable(e.to_string(), response)),
        };
        match classify(body) {
            Ok(envelope) => envelope.into_result(),
            Err(ClassifyError(message)) => Err(unusable(message, response)),
        }
    }

    /// Run one call through cache, rate limiter and transport.
    pub fn dispatch(&self, request: &ApiRequest, options: &CallOptions) -> Result<Payload> {
        let http_request = self.build_request(request)?;
        self.execute(http_request, options)
    }

    /// Fetch the page after `page`, or `None` on the last page.
    pub fn next_page(&self, page: &ListPage, options: &CallOptions) -> Result<Option<ListPage>> {
        match page.next_page_url() {
            Some(url) => self.fetch_list(url, options).map(Some),
            None => Ok(None),
        }
    }

    /// Iterate `first` and every following page.
    pub fn pages(&self, first: ListPage, options: CallOptions) -> Pages<'_> {
        Pages {
            client: self,
            options,
            state: PageState::First(first),
        }
    }

    /// GET an absolute list URL, as handed out in `next_page`.
    fn fetch_list(&self, url: &str, options: &CallOptions) -> Result<ListPage> {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: self.standard_headers(),
            body: None,
        };
        self.execute(request, options)?.into_list()
    }

    fn execute(&self, request: HttpRequest, options: &CallOptions) -> Result<Payload> {
        let key = options.cache.enabled.then(|| request_cache_key(&request));

        if let Some(key) = &key {
            if let Some(payload) = self.cached_payload(key) {
                debug!(url = %request.url, "cache hit");
                return Ok(payload);
            }
            debug!(url = %request.url, "cache miss");
        }

        let slept = options.rate_limit.as_ref().unwrap_or(&self.rate_limit).wait();
        if !slept.is_zero() {
            debug!(?slept, "rate limited");
        }

        let response = self.transport.execute(&request)?;
        let payload = self.parse_response(&request.url, response)?;

        if let Some(key) = &key {
            let ttl = options.cache.ttl.unwrap_or(self.default_ttl);
            if let Err(e) = self.cache.set(key, &payload.to_value(), ttl) {
                warn!(error = %e, "cache store failed; continuing without caching");
            }
        }
        Ok(payload)
    }

    /// A cache failure or an unclassifiable cached value counts as a miss.
    fn cached_payload(&self, key: &str) -> Option<Payload> {
        let value = match self.cache.get(key) {
            Ok(value) => value?,
            Err(e) => {
                warn!(error = %e, "cache lookup failed; treating as miss");
                return None;
            }
        };
        match classify(value).map(|envelope| envelope.into_result()) {
            Ok(Ok(payload)) => Some(payload),
            _ => {
                warn!(key, "ignoring unusable cached payload");
                None
            }
        }
    }

    fn standard_headers(&self) -> Vec<(String, String)> {
        vec![
            ("User-Agent".to_string(), self.user_agent.clone()),
            ("Accept".to_string(), "application/json".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]
    }
}

/// Key for an outbound request: origin + path, the query pairs, and the body.
fn request_cache_key(request: &HttpRequest) -> String {
    let (endpoint, mut params) = match url::Url::parse(&request.url) {
        Ok(url) => {
            let endpoint = format!("{}{}", url.origin().ascii_serialization(), url.path());
            let params: Params = url.query_pairs().into_owned().collect();
            (endpoint, params)
        }
        Err(_) => (request.url.clone(), Params::new()),
    };
    if let Some(body) = &request.body {
        params.insert(BODY_KEY_PARAM, body);
    }
    cache_key(&endpoint, &params)
}

/// Iterator over a paginated list; see `Client::pages`.
///
/// Yields the first page as is, then fetches each following page only when
/// asked. Stops after the last page or after yielding the first error.
pub struct Pages<'a> {
    client: &'a Client,
    options: CallOptions,
    state: PageState,
}

enum PageState {
    First(ListPage),
    Next(String),
    Done,
}

impl PageState {
    fn after(page: &ListPage) -> Self {
        match page.next_page_url() {
            Some(url) => PageState::Next(url.to_string()),
            None => PageState::Done,
        }
    }
}

impl Iterator for Pages<'_> {
    type Item = Result<ListPage>;

    fn next(&mut self) -> Option<Self::Item> {
        match std::mem::replace(&mut self.state, PageState::Done) {
            PageState::First(page) => {
                self.state = PageState::after(&page);
                Some(Ok(page))
            }
            PageState::Next(url) => {
                let fetched = self.client.fetch_list(&url, &self.options);
                if let Ok(page) = &fetched {
                    self.state = PageState::after(page);
                }
                Some(fetched)
            }
            PageState::Done => None,
        }
    }
}

/// Assembles a `Client` from a config plus injected collaborators.
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    cache: Option<Arc<dyn CacheBackend>>,
    rate_limit: Option<RateLimit>,
    default_ttl: Option<Duration>,
}

impl ClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: None,
            cache: None,
            rate_limit: None,
            default_ttl: None,
        }
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.to_string();
        self
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.config.user_agent = user_agent.to_string();
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn cache(mut self, cache: Arc<dyn CacheBackend>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    pub fn cache_by_default(mut self, enabled: bool) -> Self {
        self.config.cache_by_default = enabled;
        self
    }

    /// TTL for cached calls that don't set their own. Kept at full
    /// precision, unlike `cache_ttl_secs`.
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    pub fn build(self) -> Client {
        let config = self.config;
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(UreqTransport::new(config.timeout())));
        let cache = self.cache.unwrap_or_else(|| shared_cache());
        let rate_limit = self.rate_limit.unwrap_or_else(|| match config.rate_limit {
            RateLimitMode::Shared => RateLimit::Shared,
            RateLimitMode::Private => RateLimit::private(config.calls_per_second),
            RateLimitMode::Disabled => RateLimit::Disabled,
        });
        Client {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            transport,
            cache,
            rate_limit,
            default_ttl: self.default_ttl.unwrap_or_else(|| config.cache_ttl()),
            cache_by_default: config.cache_by_default,
        }
    }
}
