//! Google News RSS client for financial headlines
//!
//! Fetches the Google News search feed for market/finance coverage and
//! normalizes entries into [`NewsArticle`] values. Google News RSS needs
//! no API key.

use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, info};

use pulse_core::NewsArticle;

use crate::error::NewsError;

/// Google News search feed for financial news from the last day
pub const DEFAULT_FEED_URL: &str =
    "https://news.google.com/rss/search?q=stock+market+finance+when:1d&hl=en-IN&gl=IN&ceid=IN:en";

/// RSS feed client for financial headlines
pub struct FinanceNewsClient {
    client: Client,
    feed_url: String,
}

impl FinanceNewsClient {
    /// Create a client for the default financial feed
    pub fn new() -> Self {
        Self::with_feed_url(DEFAULT_FEED_URL)
    }

    /// Create a client for a custom feed URL
    pub fn with_feed_url(feed_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .user_agent("Mozilla/5.0 (compatible; FinPulse/1.0)")
                .build()
                .unwrap_or_else(|_| Client::new()),
            feed_url: feed_url.into(),
        }
    }

    /// Fetch the latest headlines, newest first as the feed orders them
    ///
    /// Deduplicates by link and truncates to `limit`.
    pub async fn fetch_latest(&self, limit: usize) -> Result<Vec<NewsArticle>, NewsError> {
        let response = self
            .client
            .get(&self.feed_url)
            .send()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NewsError::FeedError {
                status: response.status().as_u16(),
                message: format!("Failed to fetch {}", self.feed_url),
            });
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))?;

        // Google News serves RSS 2.0; fall back to Atom for custom feeds
        let mut articles = if let Ok(channel) = rss::Channel::read_from(&content[..]) {
            parse_rss_channel(&channel)
        } else if let Ok(feed) = atom_syndication::Feed::read_from(&content[..]) {
            parse_atom_feed(&feed)
        } else {
            return Err(NewsError::ParseError(format!(
                "Failed to parse feed: {}",
                self.feed_url
            )));
        };

        // Deduplicate by link
        let mut seen = std::collections::HashSet::new();
        articles.retain(|a| seen.insert(a.link.clone()));

        articles.truncate(limit);

        info!("Fetched {} news articles from RSS feed", articles.len());
        Ok(articles)
    }
}

impl Default for FinanceNewsClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an RSS channel into articles
fn parse_rss_channel(channel: &rss::Channel) -> Vec<NewsArticle> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let raw_title = item.title()?.to_string();
            let link = item.link()?.to_string();

            let pub_date = item
                .pub_date()
                .and_then(parse_feed_date)
                .unwrap_or_else(Utc::now);

            // Google News puts the publisher at the end of the title
            // ("Headline - Publisher"); dc:creator wins when present.
            let (title, title_source) = split_source_suffix(&raw_title);
            let source = item
                .dublin_core_ext()
                .and_then(|dc| dc.creators().first().cloned())
                .or(title_source)
                .unwrap_or_else(|| "Google News".to_string());

            let content = item.description().map(strip_html).unwrap_or_default();

            debug!("Parsed article from {}: {}", source, title);

            Some(NewsArticle {
                title,
                link,
                pub_date,
                source,
                content,
            })
        })
        .collect()
}

/// Parse an Atom feed into articles
fn parse_atom_feed(feed: &atom_syndication::Feed) -> Vec<NewsArticle> {
    feed.entries()
        .iter()
        .filter_map(|entry| {
            let title = entry.title().to_string();
            let link = entry.links().first().map(|l| l.href().to_string())?;

            let pub_date = entry
                .published()
                .or_else(|| Some(entry.updated()))
                .map(|d| d.with_timezone(&Utc))
                .unwrap_or_else(Utc::now);

            let content = entry
                .summary()
                .map(|s| strip_html(s.as_str()))
                .unwrap_or_default();

            Some(NewsArticle {
                title,
                link,
                pub_date,
                source: feed.title().to_string(),
                content,
            })
        })
        .collect()
}

/// Parse a feed timestamp, accepting RFC 2822 and RFC 3339
fn parse_feed_date(date: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(date)
        .ok()
        .map(|d| d.with_timezone(&Utc))
        .or_else(|| {
            DateTime::parse_from_rfc3339(date)
                .ok()
                .map(|d| d.with_timezone(&Utc))
        })
}

/// Split the "Headline - Publisher" convention used by Google News titles
fn split_source_suffix(title: &str) -> (String, Option<String>) {
    if let Some(pos) = title.rfind(" - ") {
        let headline = title[..pos].trim().to_string();
        let source = title[pos + 3..].trim().to_string();
        if !headline.is_empty() && !source.is_empty() {
            return (headline, Some(source));
        }
    }
    (title.to_string(), None)
}

/// Strip HTML tags and entities from feed descriptions
fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
