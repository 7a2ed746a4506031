//! Sentiment verdict structures returned by the classifier
//!
//! Field names on the wire are camelCase to match what the dashboard
//! frontend consumes (`sentimentScore`, `affectedSectors`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a sentiment verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Bullish,
    Bearish,
    Neutral,
}

/// A company the classifier expects to benefit from the news
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub company: String,
    pub sector: String,
    /// Probability of upside, 0-100
    pub probability: f64,
    pub reason: String,
}

/// Upside/downside reasoning attached to a verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictReasoning {
    /// Stocks or sectors that may go up
    pub up: Vec<String>,
    /// Stocks or sectors that may go down
    pub down: Vec<String>,
    /// Detailed financial reasoning
    pub why: String,
}

/// Structured sentiment verdict for one article
///
/// Produced once per classifier call and consumed exactly once by the
/// aggregator; may additionally be held as the current selection for
/// display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentVerdict {
    pub headline: String,
    /// 1-10
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub explanation: String,
    pub affected_sectors: Vec<String>,
    pub key_entities: Vec<String>,
    pub predicted_market_reaction: String,
    /// 0-100
    pub bullish_probability: f64,
    pub opportunities: Vec<Opportunity>,
    pub reasoning: VerdictReasoning,
}

/// A scored point in the rolling sentiment history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub score: f64,
    pub label: SentimentLabel,
}

/// The fixed set of sectors tracked by the dashboard heatmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sector {
    Technology,
    Banking,
    Defense,
    Energy,
    Automotive,
    Pharmaceuticals,
}

impl Sector {
    /// All tracked sectors, in display order.
    pub const ALL: [Sector; 6] = [
        Sector::Technology,
        Sector::Banking,
        Sector::Defense,
        Sector::Energy,
        Sector::Automotive,
        Sector::Pharmaceuticals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::Technology => "Technology",
            Sector::Banking => "Banking",
            Sector::Defense => "Defense",
            Sector::Energy => "Energy",
            Sector::Automotive => "Automotive",
            Sector::Pharmaceuticals => "Pharmaceuticals",
        }
    }

    /// Map a classifier-supplied sector name onto the fixed set.
    ///
    /// Matching is case-insensitive; names outside the set (e.g. "Crypto",
    /// "Other") return `None` and are dropped by the aggregator.
    pub fn parse(name: &str) -> Option<Sector> {
        let name = name.trim();
        Sector::ALL
            .iter()
            .copied()
            .find(|s| s.as_str().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_parse_exact() {
        assert_eq!(Sector::parse("Technology"), Some(Sector::Technology));
        assert_eq!(Sector::parse("Pharmaceuticals"), Some(Sector::Pharmaceuticals));
    }

    #[test]
    fn sector_parse_is_case_insensitive() {
        assert_eq!(Sector::parse("technology"), Some(Sector::Technology));
        assert_eq!(Sector::parse("BANKING"), Some(Sector::Banking));
        assert_eq!(Sector::parse("  energy "), Some(Sector::Energy));
    }

    #[test]
    fn sector_parse_rejects_unknown_names() {
        assert_eq!(Sector::parse("Crypto"), None);
        assert_eq!(Sector::parse("Other"), None);
        assert_eq!(Sector::parse(""), None);
    }

    #[test]
    fn verdict_round_trips_camel_case() {
        let json = serde_json::json!({
            "headline": "Chipmaker beats earnings",
            "sentimentScore": 8.0,
            "sentimentLabel": "Bullish",
            "explanation": "Strong quarter",
            "affectedSectors": ["Technology"],
            "keyEntities": ["ACME"],
            "predictedMarketReaction": "Semis open higher",
            "bullishProbability": 78.0,
            "opportunities": [],
            "reasoning": {"up": ["ACME"], "down": [], "why": "Guidance raised"}
        });
        let verdict: SentimentVerdict = serde_json::from_value(json).unwrap();
        assert_eq!(verdict.sentiment_label, SentimentLabel::Bullish);
        assert_eq!(verdict.affected_sectors, vec!["Technology"]);

        let back = serde_json::to_value(&verdict).unwrap();
        assert!(back.get("sentimentScore").is_some());
        assert!(back.get("bullishProbability").is_some());
    }
}
