//! News data structures for the RSS-backed headline feed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A financial news article from the RSS feed
///
/// The link is the article's identity: it is unique within one fetch and
/// articles are superseded wholesale by the next fetch cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    /// Headline text
    pub title: String,
    /// Article URL
    pub link: String,
    /// Publication date
    pub pub_date: DateTime<Utc>,
    /// Publisher name (e.g., "Reuters", "CNBC")
    pub source: String,
    /// Body snippet extracted from the feed description
    pub content: String,
}

impl NewsArticle {
    /// Text to feed the classifier: the body snippet, or the headline
    /// when the feed carried no snippet.
    pub fn analysis_body(&self) -> &str {
        if self.content.trim().is_empty() {
            &self.title
        } else {
            &self.content
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(content: &str) -> NewsArticle {
        NewsArticle {
            title: "Markets rally on rate cut hopes".to_string(),
            link: "https://example.com/a".to_string(),
            pub_date: Utc::now(),
            source: "Example Wire".to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn analysis_body_prefers_content() {
        let a = article("Full body text");
        assert_eq!(a.analysis_body(), "Full body text");
    }

    #[test]
    fn analysis_body_falls_back_to_title() {
        let a = article("   ");
        assert_eq!(a.analysis_body(), "Markets rally on rate cut hopes");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let a = article("body");
        let json = serde_json::to_value(&a).unwrap();
        assert!(json.get("pubDate").is_some());
        assert!(json.get("pub_date").is_none());
    }
}
