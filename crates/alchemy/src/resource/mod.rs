// ABOUTME: Acquires raw HTML for conversion: HTTP fetching over an ordered endpoint list and file reading.
// ABOUTME: Handles SSRF protection, the 10 MB cap, per-endpoint timeouts and charset decoding.

use std::net::{IpAddr, ToSocketAddrs};
use std::path::Path;

use bytes::{Bytes, BytesMut};
use ipnet::{Ipv4Net, Ipv6Net};
use url::Url;

use crate::error::ConvertError;
use crate::options::{FetchOptions, FetcherBuilder};

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// One way of reaching a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Request the target URL itself.
    Direct,
    /// Request through a relay; `{url}` in the template receives the
    /// percent-encoded target.
    Relay(String),
}

impl Endpoint {
    /// The URL to request for `target` through this endpoint.
    pub fn request_url(&self, target: &Url) -> Result<String, ConvertError> {
        match self {
            Endpoint::Direct => Ok(target.to_string()),
            Endpoint::Relay(template) => {
                if !template.contains("{url}") {
                    return Err(ConvertError::invalid_url(
                        template.as_str(),
                        "Fetch",
                        Some(anyhow::anyhow!("relay template has no {{url}} placeholder")),
                    ));
                }
                let encoded: String =
                    url::form_urlencoded::byte_serialize(target.as_str().as_bytes()).collect();
                Ok(template.replace("{url}", &encoded))
            }
        }
    }
}

/// Result of a successful fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    /// URL after redirects.
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body as text, using charset hints from the content-type header.
    pub fn text(&self) -> String {
        decode_html_bytes(&self.body, self.content_type.as_deref())
    }
}

/// Fetches page HTML, trying each configured endpoint in order.
#[derive(Debug, Clone)]
pub struct Fetcher {
    opts: FetchOptions,
    http_client: reqwest::Client,
}

impl Fetcher {
    pub(crate) fn new(opts: FetchOptions) -> Result<Self, ConvertError> {
        let http_client = match opts.http_client.clone() {
            Some(client) => client,
            None => build_http_client(&opts)?,
        };
        Ok(Self { opts, http_client })
    }

    pub fn builder() -> FetcherBuilder {
        FetcherBuilder::new()
    }

    pub fn options(&self) -> &FetchOptions {
        &self.opts
    }

    /// Fetches `url` and returns its decoded HTML.
    ///
    /// Endpoints are tried in order and the first success wins. Each attempt
    /// has its own timeout. When every endpoint fails the last error is
    /// returned; there is no backoff between attempts.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ConvertError> {
        let target = validate_target(url)?;
        if !self.opts.allow_private_networks {
            ensure_public(&target, url).await?;
        }

        let mut last_err = ConvertError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("no endpoints configured")),
        );
        for endpoint in &self.opts.endpoints {
            let attempt = async {
                let request_url = endpoint.request_url(&target)?;
                if let Endpoint::Relay(_) = endpoint {
                    let relay = validate_target(&request_url)?;
                    if !self.opts.allow_private_networks {
                        ensure_public(&relay, &request_url).await?;
                    }
                }
                fetch(&self.http_client, &request_url, &self.opts).await
            };
            match attempt.await {
                Ok(result) => {
                    tracing::debug!(
                        url,
                        endpoint = ?endpoint,
                        status = result.status,
                        final_url = %result.final_url,
                        bytes = result.body.len(),
                        "fetched page"
                    );
                    return Ok(result.text());
                }
                Err(err) => {
                    tracing::warn!(url, endpoint = ?endpoint, error = %err, "endpoint failed");
                    last_err = err;
                }
            }
        }
        Err(last_err)
    }
}

fn build_http_client(opts: &FetchOptions) -> Result<reqwest::Client, ConvertError> {
    let allow_private = opts.allow_private_networks;
    let redirect_policy = reqwest::redirect::Policy::custom(move |attempt| {
        if !allow_private {
            let next = attempt.url();
            if let Some(host) = next.host_str() {
                let port = next.port_or_known_default().unwrap_or(80);
                if let Ok(ip) = host.parse::<IpAddr>() {
                    if is_private_ip(&ip) {
                        return attempt.error("redirect to private IP blocked");
                    }
                } else {
                    // synchronous DNS resolution to avoid async in redirect policy
                    match (host, port).to_socket_addrs() {
                        Ok(mut addrs) => {
                            if addrs.any(|sa| is_private_ip(&sa.ip())) {
                                return attempt.error("redirect to private IP blocked");
                            }
                        }
                        Err(_) => return attempt.error("DNS lookup failed during redirect"),
                    }
                }
            }
        }
        attempt.follow()
    });

    reqwest::Client::builder()
        .redirect(redirect_policy)
        .user_agent(&opts.user_agent)
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .map_err(|e| {
            ConvertError::fetch(
                "",
                "Build HTTP client",
                Some(anyhow::anyhow!("failed to build HTTP client: {}", e)),
            )
        })
}

/// Parses a target URL and requires http or https.
fn validate_target(url: &str) -> Result<Url, ConvertError> {
    if url.trim().is_empty() {
        return Err(ConvertError::invalid_url(url, "Fetch", None));
    }
    let parsed = Url::parse(url).map_err(|e| {
        ConvertError::invalid_url(url, "Fetch", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ConvertError::invalid_url(
            url,
            "Fetch",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }
    Ok(parsed)
}

/// Fails with an SSRF error if `url` points at a private or local address.
async fn ensure_public(url: &Url, original: &str) -> Result<(), ConvertError> {
    let Some(host) = url.host_str() else {
        return Ok(());
    };
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let blocked = || {
        ConvertError::ssrf(
            original,
            "Fetch",
            Some(anyhow::anyhow!("private IP addresses are not allowed")),
        )
    };

    if let Ok(ip) = host.parse::<IpAddr>() {
        return if is_private_ip(&ip) { Err(blocked()) } else { Ok(()) };
    }

    let port = url.port_or_known_default().unwrap_or(80);
    let addrs = tokio::net::lookup_host((host, port)).await.map_err(|e| {
        ConvertError::fetch(
            original,
            "Fetch",
            Some(anyhow::anyhow!("DNS lookup failed: {}", e)),
        )
    })?;
    for socket_addr in addrs {
        if is_private_ip(&socket_addr.ip()) {
            return Err(blocked());
        }
    }
    Ok(())
}

/// Check if an IP address is in a private/reserved range.
pub(crate) fn is_private_ip(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(ip) => {
            let ranges = [
                // RFC1918 private ranges
                "10.0.0.0/8",
                "172.16.0.0/12",
                "192.168.0.0/16",
                // Loopback
                "127.0.0.0/8",
                // Link-local
                "169.254.0.0/16",
            ];
            ip.is_unspecified()
                || ranges
                    .iter()
                    .filter_map(|r| r.parse::<Ipv4Net>().ok())
                    .any(|net| net.contains(ip))
        }
        IpAddr::V6(ip) => {
            if ip.is_loopback() || ip.is_unspecified() {
                return true;
            }
            if let Some(v4) = ip.to_ipv4_mapped() {
                return is_private_ip(&IpAddr::V4(v4));
            }
            // Unique local fc00::/7, link-local fe80::/10
            ["fc00::/7", "fe80::/10"]
                .iter()
                .filter_map(|r| r.parse::<Ipv6Net>().ok())
                .any(|net| net.contains(ip))
        }
    }
}

/// Requests one URL and enforces status and size limits.
async fn fetch(
    client: &reqwest::Client,
    url: &str,
    opts: &FetchOptions,
) -> Result<FetchResult, ConvertError> {
    let mut request = client.get(url).timeout(opts.timeout);
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    let mut response = request.send().await.map_err(|e| request_error(url, e))?;

    // Redirects are vetted by the client's policy; this covers clients
    // supplied by the caller.
    if !opts.allow_private_networks {
        let final_url = response.url().clone();
        ensure_public(&final_url, url).await?;
    }

    let max_bytes = opts.max_body_bytes;
    if let Some(len) = response.content_length() {
        if len > max_bytes as u64 {
            return Err(too_large(url, max_bytes));
        }
    }

    let status = response.status().as_u16();
    if status != 200 {
        return Err(ConvertError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("HTTP status {}", status)),
        ));
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    // Chunked responses carry no length; stop reading at the cap.
    let mut body = BytesMut::new();
    while let Some(chunk) = response.chunk().await.map_err(|e| request_error(url, e))? {
        if body.len() + chunk.len() > max_bytes {
            return Err(too_large(url, max_bytes));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(FetchResult {
        status,
        final_url,
        content_type,
        body: body.freeze(),
    })
}

fn too_large(url: &str, max_bytes: usize) -> ConvertError {
    ConvertError::fetch(
        url,
        "Fetch",
        Some(anyhow::anyhow!("content too large (limit {} bytes)", max_bytes)),
    )
}

fn request_error(url: &str, err: reqwest::Error) -> ConvertError {
    if err.is_timeout() {
        ConvertError::timeout(url, "Fetch", Some(anyhow::anyhow!("request timed out: {}", err)))
    } else {
        ConvertError::fetch(url, "Fetch", Some(anyhow::anyhow!("request failed: {}", err)))
    }
}

/// Reads an uploaded HTML file, enforcing `max_bytes` before decoding.
pub fn read_html_file(path: &Path, max_bytes: usize) -> Result<String, ConvertError> {
    let shown = path.display().to_string();
    let meta = std::fs::metadata(path).map_err(|e| {
        ConvertError::read(shown.as_str(), "Read", Some(anyhow::anyhow!("{}", e)))
    })?;
    if meta.len() > max_bytes as u64 {
        return Err(ConvertError::read(
            shown.as_str(),
            "Read",
            Some(anyhow::anyhow!(
                "file is {} bytes, limit is {} bytes",
                meta.len(),
                max_bytes
            )),
        ));
    }
    let bytes = std::fs::read(path).map_err(|e| {
        ConvertError::read(shown.as_str(), "Read", Some(anyhow::anyhow!("{}", e)))
    })?;
    Ok(decode_html_bytes(&bytes, None))
}

/// Decode body bytes to a String using a BOM, the content-type charset, or detection.
pub fn decode_html_bytes(body: &[u8], content_type: Option<&str>) -> String {
    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(body) {
        let (decoded, _) = encoding.decode_without_bom_handling(&body[bom_len..]);
        return decoded.into_owned();
    }

    if let Some(ct) = content_type {
        if let Some(charset) = extract_charset(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}
