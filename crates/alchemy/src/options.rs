// ABOUTME: Configuration for the converter and the fetcher, with fluent builders for each.
// ABOUTME: ConverterBuilder sets input limits and profiles; FetcherBuilder sets endpoints and timeouts.

use std::collections::HashMap;
use std::time::Duration;

use crate::converter::Converter;
use crate::error::ConvertError;
use crate::profile::{PageProfile, ProfileSet};
use crate::resource::{Endpoint, Fetcher, MAX_CONTENT_LENGTH};

/// Configuration options for the converter.
#[derive(Debug, Clone)]
pub struct Options {
    /// Largest accepted input, in bytes.
    pub max_input_bytes: usize,
    pub profiles: ProfileSet,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_input_bytes: MAX_CONTENT_LENGTH,
            profiles: ProfileSet::builtin(),
        }
    }
}

/// Builder for constructing Converter instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ConverterBuilder {
    opts: Options,
}

impl ConverterBuilder {
    /// Create a new ConverterBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the largest accepted input size.
    pub fn max_input_bytes(mut self, max: usize) -> Self {
        self.opts.max_input_bytes = max;
        self
    }

    /// Replace the profile for one page type.
    pub fn profile(mut self, profile: PageProfile) -> Self {
        self.opts.profiles.register(profile);
        self
    }

    /// Replace profiles from a JSON array of profile objects.
    pub fn profiles_from_json(mut self, json: &str) -> Result<Self, ConvertError> {
        self.opts.profiles.load_json(json)?;
        Ok(self)
    }

    /// Build the Converter with the configured options.
    pub fn build(self) -> Converter {
        Converter::new(self.opts)
    }
}

/// Configuration options for fetching pages.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Timeout applied to each endpoint attempt.
    pub timeout: Duration,
    pub user_agent: String,
    pub allow_private_networks: bool,
    pub headers: HashMap<String, String>,
    /// Largest accepted response body, in bytes.
    pub max_body_bytes: usize,
    /// Endpoints tried in order until one succeeds.
    pub endpoints: Vec<Endpoint>,
    pub http_client: Option<reqwest::Client>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "PageAlchemy/1.0".to_string(),
            allow_private_networks: false,
            headers: HashMap::new(),
            max_body_bytes: MAX_CONTENT_LENGTH,
            endpoints: vec![Endpoint::Direct],
            http_client: None,
        }
    }
}

/// Builder for constructing Fetcher instances.
#[derive(Debug, Clone, Default)]
pub struct FetcherBuilder {
    opts: FetchOptions,
}

impl FetcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-endpoint timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Allow or disallow requests to private networks.
    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.opts.allow_private_networks = allow;
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Set the largest accepted response body.
    pub fn max_body_bytes(mut self, max: usize) -> Self {
        self.opts.max_body_bytes = max;
        self
    }

    /// Append a relay endpoint, tried after the ones already configured.
    ///
    /// The template must contain `{url}`, which receives the percent-encoded
    /// target URL.
    pub fn relay(mut self, template: impl Into<String>) -> Self {
        self.opts.endpoints.push(Endpoint::Relay(template.into()));
        self
    }

    /// Replace the endpoint list.
    pub fn endpoints(mut self, endpoints: Vec<Endpoint>) -> Self {
        self.opts.endpoints = endpoints;
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Build the Fetcher. Fails only if the HTTP client cannot be created.
    pub fn build(self) -> Result<Fetcher, ConvertError> {
        Fetcher::new(self.opts)
    }
}
