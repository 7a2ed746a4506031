//! Shared aggregate state for the dashboard
//!
//! Three aggregates are folded out of classifier verdicts: a capped rolling
//! score history, per-sector running means, and a capped opportunity board.
//! All mutation funnels through [`AggregateState::merge`]; readers take
//! snapshots.

use std::collections::{BTreeMap, VecDeque};

use chrono::Utc;
use serde::Serialize;

use pulse_core::{HistoryPoint, Opportunity, Sector, SentimentVerdict};

/// Rolling history keeps the most recent 20 scores, oldest evicted first.
pub const HISTORY_CAPACITY: usize = 20;

/// Opportunity board keeps the 15 newest entries.
pub const OPPORTUNITY_CAPACITY: usize = 15;

/// Running sum/count for one sector
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SectorAggregate {
    pub sum: f64,
    pub count: u64,
}

impl SectorAggregate {
    /// Mean score, or `None` when no verdict has touched this sector yet.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// One row of the sector heatmap
#[derive(Debug, Clone, Serialize)]
pub struct SectorMood {
    pub sector: Sector,
    /// `None` renders as "No Data"
    pub mean: Option<f64>,
    pub count: u64,
}

/// Read-only snapshot of the aggregates for the presentation layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSnapshot {
    pub history: Vec<HistoryPoint>,
    pub sectors: Vec<SectorMood>,
    pub opportunities: Vec<Opportunity>,
    pub mood_index: Option<f64>,
    pub mood_label: Option<&'static str>,
    pub analyzed_count: u64,
}

/// In-memory aggregates; reset on process restart.
#[derive(Debug)]
pub struct AggregateState {
    /// Chronological, capacity [`HISTORY_CAPACITY`]
    history: VecDeque<HistoryPoint>,
    /// Pre-seeded with every tracked sector
    sectors: BTreeMap<Sector, SectorAggregate>,
    /// Newest first, capacity [`OPPORTUNITY_CAPACITY`]
    opportunities: Vec<Opportunity>,
    /// Verdicts merged since startup
    analyzed_count: u64,
}

impl AggregateState {
    pub fn new() -> Self {
        Self {
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            sectors: Sector::ALL
                .iter()
                .map(|s| (*s, SectorAggregate::default()))
                .collect(),
            opportunities: Vec::new(),
            analyzed_count: 0,
        }
    }

    /// Fold one verdict into the aggregates.
    ///
    /// This is the only mutation entry point; callers serialize access
    /// through the pipeline's lock.
    pub fn merge(&mut self, verdict: &SentimentVerdict) {
        // Rolling history, oldest evicted first
        self.history.push_back(HistoryPoint {
            timestamp: Utc::now(),
            score: verdict.sentiment_score,
            label: verdict.sentiment_label,
        });
        while self.history.len() > HISTORY_CAPACITY {
            self.history.pop_front();
        }

        // Sector running means; names outside the fixed set are dropped
        for name in &verdict.affected_sectors {
            if let Some(sector) = Sector::parse(name) {
                let agg = self.sectors.entry(sector).or_default();
                agg.sum += verdict.sentiment_score;
                agg.count += 1;
            }
        }

        // Opportunity board, newest first
        if !verdict.opportunities.is_empty() {
            let mut board =
                Vec::with_capacity(verdict.opportunities.len() + self.opportunities.len());
            board.extend(verdict.opportunities.iter().cloned());
            board.append(&mut self.opportunities);
            board.truncate(OPPORTUNITY_CAPACITY);
            self.opportunities = board;
        }

        self.analyzed_count += 1;
    }

    /// Mean of the rolling history, `None` when empty.
    pub fn mood_index(&self) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }
        let sum: f64 = self.history.iter().map(|p| p.score).sum();
        Some(sum / self.history.len() as f64)
    }

    pub fn history(&self) -> &VecDeque<HistoryPoint> {
        &self.history
    }

    pub fn sector(&self, sector: Sector) -> SectorAggregate {
        self.sectors.get(&sector).copied().unwrap_or_default()
    }

    pub fn opportunities(&self) -> &[Opportunity] {
        &self.opportunities
    }

    pub fn analyzed_count(&self) -> u64 {
        self.analyzed_count
    }

    /// Build a serializable snapshot for the dashboard.
    pub fn snapshot(&self) -> AggregateSnapshot {
        let mood_index = self.mood_index();
        AggregateSnapshot {
            history: self.history.iter().cloned().collect(),
            sectors: Sector::ALL
                .iter()
                .map(|s| {
                    let agg = self.sector(*s);
                    SectorMood {
                        sector: *s,
                        mean: agg.mean(),
                        count: agg.count,
                    }
                })
                .collect(),
            opportunities: self.opportunities.clone(),
            mood_index,
            mood_label: mood_index.map(interpret_mood),
            analyzed_count: self.analyzed_count,
        }
    }
}

impl Default for AggregateState {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a mood index onto the dashboard's interpretation labels.
pub fn interpret_mood(score: f64) -> &'static str {
    if score >= 8.0 {
        "Strongly Bullish"
    } else if score >= 6.0 {
        "Moderately Bullish"
    } else if score >= 4.0 {
        "Neutral / Mixed"
    } else {
        "Bearish Sentiment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::{SentimentLabel, VerdictReasoning};

    fn verdict(score: f64, label: SentimentLabel, sectors: &[&str]) -> SentimentVerdict {
        SentimentVerdict {
            headline: format!("headline scoring {}", score),
            sentiment_score: score,
            sentiment_label: label,
            explanation: String::new(),
            affected_sectors: sectors.iter().map(|s| s.to_string()).collect(),
            key_entities: vec![],
            predicted_market_reaction: String::new(),
            bullish_probability: 50.0,
            opportunities: vec![],
            reasoning: VerdictReasoning {
                up: vec![],
                down: vec![],
                why: String::new(),
            },
        }
    }

    fn opportunity(company: &str) -> Opportunity {
        Opportunity {
            company: company.to_string(),
            sector: "Technology".to_string(),
            probability: 70.0,
            reason: String::new(),
        }
    }

    #[test]
    fn history_evicts_oldest_beyond_capacity() {
        let mut state = AggregateState::new();
        let scores: Vec<f64> = (0..25).map(|i| (i % 10) as f64 + 1.0).collect();
        for score in &scores {
            state.merge(&verdict(*score, SentimentLabel::Neutral, &[]));
        }

        assert_eq!(state.history().len(), HISTORY_CAPACITY);
        let kept: Vec<f64> = state.history().iter().map(|p| p.score).collect();
        assert_eq!(kept, scores[5..].to_vec());
    }

    #[test]
    fn opportunity_board_is_newest_first_and_capped() {
        let mut state = AggregateState::new();

        let mut first = verdict(7.0, SentimentLabel::Bullish, &[]);
        first.opportunities = vec![opportunity("A"), opportunity("B")];
        state.merge(&first);

        let mut second = verdict(6.0, SentimentLabel::Neutral, &[]);
        second.opportunities = vec![opportunity("C")];
        state.merge(&second);

        let names: Vec<&str> = state
            .opportunities()
            .iter()
            .map(|o| o.company.as_str())
            .collect();
        assert_eq!(names, vec!["C", "A", "B"]);

        // Fill past capacity; the newest entries always survive
        let mut flood = verdict(8.0, SentimentLabel::Bullish, &[]);
        flood.opportunities = (0..20).map(|i| opportunity(&format!("N{}", i))).collect();
        state.merge(&flood);

        assert_eq!(state.opportunities().len(), OPPORTUNITY_CAPACITY);
        assert_eq!(state.opportunities()[0].company, "N0");
        assert_eq!(state.opportunities()[14].company, "N14");
    }

    #[test]
    fn sector_mean_is_none_without_data() {
        let state = AggregateState::new();
        for sector in Sector::ALL {
            assert!(state.sector(sector).mean().is_none());
        }
    }

    #[test]
    fn sector_mean_accumulates() {
        let mut state = AggregateState::new();
        state.merge(&verdict(6.0, SentimentLabel::Neutral, &["Technology"]));
        state.merge(&verdict(8.0, SentimentLabel::Bullish, &["Technology"]));

        let agg = state.sector(Sector::Technology);
        assert_eq!(agg.count, 2);
        assert_eq!(agg.mean(), Some(7.0));
        assert!(state.sector(Sector::Banking).mean().is_none());
    }

    #[test]
    fn unknown_sectors_are_dropped() {
        let mut state = AggregateState::new();
        state.merge(&verdict(9.0, SentimentLabel::Bullish, &["Crypto", "Real Estate"]));

        for sector in Sector::ALL {
            assert_eq!(state.sector(sector).count, 0);
        }
        // The verdict itself still counts toward the history
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn sector_names_match_case_insensitively() {
        let mut state = AggregateState::new();
        state.merge(&verdict(5.0, SentimentLabel::Neutral, &["technology", "BANKING"]));

        assert_eq!(state.sector(Sector::Technology).count, 1);
        assert_eq!(state.sector(Sector::Banking).count, 1);
    }

    #[test]
    fn mood_index_is_history_mean() {
        let mut state = AggregateState::new();
        assert!(state.mood_index().is_none());

        state.merge(&verdict(9.0, SentimentLabel::Bullish, &[]));
        state.merge(&verdict(3.0, SentimentLabel::Bearish, &[]));
        state.merge(&verdict(6.0, SentimentLabel::Neutral, &[]));

        assert_eq!(state.mood_index(), Some(6.0));
        assert_eq!(interpret_mood(6.0), "Moderately Bullish");
    }

    #[test]
    fn mood_interpretation_thresholds() {
        assert_eq!(interpret_mood(8.0), "Strongly Bullish");
        assert_eq!(interpret_mood(7.9), "Moderately Bullish");
        assert_eq!(interpret_mood(6.0), "Moderately Bullish");
        assert_eq!(interpret_mood(5.9), "Neutral / Mixed");
        assert_eq!(interpret_mood(4.0), "Neutral / Mixed");
        assert_eq!(interpret_mood(3.9), "Bearish Sentiment");
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut state = AggregateState::new();
        state.merge(&verdict(8.0, SentimentLabel::Bullish, &["Energy"]));

        let snap = state.snapshot();
        assert_eq!(snap.history.len(), 1);
        assert_eq!(snap.sectors.len(), Sector::ALL.len());
        assert_eq!(snap.mood_index, Some(8.0));
        assert_eq!(snap.mood_label, Some("Strongly Bullish"));
        assert_eq!(snap.analyzed_count, 1);

        let energy = snap
            .sectors
            .iter()
            .find(|s| s.sector == Sector::Energy)
            .unwrap();
        assert_eq!(energy.mean, Some(8.0));
    }
}
