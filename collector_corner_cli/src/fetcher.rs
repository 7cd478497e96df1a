use crate::error::FetchError;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Character budget of an excerpt handed to the generator.
pub const MAX_EXCERPT_CHARS: usize = 3500;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// Some storefronts refuse requests without a browser-looking agent.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0";
/// Product description container of the Shopify "Debut" template.
pub const DESCRIPTION_SELECTOR: &str = ".product-single__description";
const PARAGRAPH_SELECTOR: &str = "p, h2, li";

pub struct Fetcher {
    client: Client,
    max_chars: usize,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(BROWSER_USER_AGENT)
                .build()?,
            max_chars: MAX_EXCERPT_CHARS,
        })
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// GET the page once and reduce it to a bounded plain-text excerpt.
    ///
    /// An empty excerpt is a success; only transport, status and body
    /// failures are errors. There are no retries.
    pub async fn fetch_excerpt(&self, url: &str) -> Result<String, FetchError> {
        let target = parse_http_url(url)?;
        info!(url = %target, "fetching page");

        let res = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|e| classify(url, e, false))?;

        if !res.status().is_success() {
            warn!(url, status = %res.status(), "page fetch returned an error status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: res.status(),
            });
        }

        let body = res.text().await.map_err(|e| classify(url, e, true))?;
        let excerpt = extract_excerpt(&body, self.max_chars);
        debug!(
            url,
            html_bytes = body.len(),
            excerpt_chars = excerpt.chars().count(),
            "excerpt extracted"
        );
        Ok(excerpt)
    }
}

/// One-shot convenience around [`Fetcher`].
pub async fn fetch_excerpt(url: &str, timeout: Duration) -> Result<String, FetchError> {
    let fetcher = Fetcher::new(timeout).map_err(|source| FetchError::Request {
        url: url.to_string(),
        source,
    })?;
    fetcher.fetch_excerpt(url).await
}

fn parse_http_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url.trim()).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}

fn classify(url: &str, err: reqwest::Error, reading_body: bool) -> FetchError {
    warn!(url, error = %err, "page fetch failed");
    let url = url.to_string();
    if err.is_timeout() {
        FetchError::Timeout { url }
    } else if reading_body {
        FetchError::Body { url, source: err }
    } else {
        FetchError::Request { url, source: err }
    }
}

/// Pull title, storefront description and paragraph-like text out of `html`,
/// then cut the result to `max_chars` characters.
pub fn extract_excerpt(html: &str, max_chars: usize) -> String {
    let doc = Html::parse_document(html);
    let title_selector = selector("h1");
    let description_selector = selector(DESCRIPTION_SELECTOR);
    let paragraph_selector = selector(PARAGRAPH_SELECTOR);

    let mut parts = Vec::new();

    if let Some(title) = doc.select(&title_selector).map(node_text).find(|t| !t.is_empty()) {
        parts.push(format!("Title: {title}"));
    }

    if let Some(description) = doc.select(&description_selector).next().map(node_text) {
        if !description.is_empty() {
            parts.push(format!("Description: {description}"));
        }
    }

    let paragraphs: Vec<String> = doc
        .select(&paragraph_selector)
        .map(node_text)
        .filter(|text| !text.is_empty())
        .collect();
    if !paragraphs.is_empty() {
        parts.push(format!("Extra Paragraphs:\n{}", paragraphs.join("\n")));
    }

    let mut excerpt = parts.join("\n\n");
    truncate_chars(&mut excerpt, max_chars);
    excerpt
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

fn node_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate_chars(s: &mut String, max_chars: usize) {
    if let Some((idx, _)) = s.char_indices().nth(max_chars) {
        s.truncate(idx);
    }
}
