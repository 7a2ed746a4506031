//! OpenAI-backed sentiment classifier

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use pulse_core::SentimentVerdict;
use tracing::instrument;

use crate::classifier::Classifier;
use crate::error::AnalysisError;

const SYSTEM_INSTRUCTION: &str =
    "You are a professional financial analyst. Provide structured, high-quality financial intelligence.";

#[derive(Debug, Clone)]
pub struct OpenAiClassifier {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClassifier {
    pub fn new() -> Result<Self, AnalysisError> {
        // async-openai reads OPENAI_API_KEY from env automatically
        let config = OpenAIConfig::default();
        let client = Client::with_config(config);

        Ok(Self {
            client,
            model: "gpt-4o".to_string(),
        })
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

#[async_trait]
impl Classifier for OpenAiClassifier {
    #[instrument(skip(self, body))]
    async fn classify(
        &self,
        headline: &str,
        body: &str,
    ) -> Result<SentimentVerdict, AnalysisError> {
        let user_prompt = build_prompt(headline, body);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_INSTRUCTION)
                    .build()
                    .map_err(|e| AnalysisError::Api(e.to_string()))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_prompt)
                    .build()
                    .map_err(|e| AnalysisError::Api(e.to_string()))?
                    .into(),
            ])
            .temperature(0.3)
            .build()
            .map_err(|e| AnalysisError::Api(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AnalysisError::Api(format!("OpenAI API error: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| AnalysisError::Parse("No response from model".to_string()))?;

        let json_str = extract_json(content)?;

        let verdict: SentimentVerdict = serde_json::from_str(&json_str)
            .map_err(|e| AnalysisError::Parse(format!("Failed to parse verdict: {}", e)))?;

        validate_verdict(&verdict)?;

        Ok(verdict)
    }
}

/// Build the analysis prompt for one article
fn build_prompt(headline: &str, body: &str) -> String {
    format!(
        r#"Analyze the following financial news article and provide a detailed sentiment analysis and market impact prediction.

Headline: {headline}
Content: {body}

Score interpretation:
1-3 = strongly bearish
4-5 = mildly bearish
6-7 = neutral to slightly bullish
8-10 = strongly bullish

Please categorize the news into one or more of these specific sectors if applicable:
- Technology
- Banking
- Defense
- Energy
- Automotive
- Pharmaceuticals
- Other

Also, identify specific companies that are predicted to benefit from this news (Opportunity Radar).

Respond with valid JSON in this exact format:
{{
  "headline": "The article headline",
  "sentimentScore": 7.0,
  "sentimentLabel": "Bullish|Bearish|Neutral",
  "explanation": "Why the news is read this way",
  "affectedSectors": ["Technology"],
  "keyEntities": ["Company or person names"],
  "predictedMarketReaction": "Expected market reaction",
  "bullishProbability": 65.0,
  "opportunities": [
    {{
      "company": "Company name",
      "sector": "Sector name",
      "probability": 70.0,
      "reason": "Why this company benefits"
    }}
  ],
  "reasoning": {{
    "up": ["Stocks or sectors that may go up"],
    "down": ["Stocks or sectors that may go down"],
    "why": "Detailed financial reasoning"
  }}
}}

sentimentScore must be between 1 and 10; bullishProbability and every opportunity probability must be between 0 and 100."#
    )
}

/// Check the numeric ranges the verdict contract promises
fn validate_verdict(verdict: &SentimentVerdict) -> Result<(), AnalysisError> {
    if !(1.0..=10.0).contains(&verdict.sentiment_score) {
        return Err(AnalysisError::InvalidVerdict(format!(
            "sentimentScore {} outside [1, 10]",
            verdict.sentiment_score
        )));
    }
    if !(0.0..=100.0).contains(&verdict.bullish_probability) {
        return Err(AnalysisError::InvalidVerdict(format!(
            "bullishProbability {} outside [0, 100]",
            verdict.bullish_probability
        )));
    }
    for opp in &verdict.opportunities {
        if !(0.0..=100.0).contains(&opp.probability) {
            return Err(AnalysisError::InvalidVerdict(format!(
                "opportunity probability {} outside [0, 100] for {}",
                opp.probability, opp.company
            )));
        }
    }
    Ok(())
}

/// Extract JSON from a response that might contain markdown code blocks
fn extract_json(content: &str) -> Result<String, AnalysisError> {
    // Try to find JSON in code blocks first
    if let Some(start) = content.find("```json") {
        let start = start + 7;
        if let Some(end) = content[start..].find("```") {
            return Ok(content[start..start + end].trim().to_string());
        }
    }

    // Try plain code blocks
    if let Some(start) = content.find("```") {
        let start = start + 3;
        // Skip language identifier if present
        let start = content[start..]
            .find('\n')
            .map(|n| start + n + 1)
            .unwrap_or(start);
        if let Some(end) = content[start..].find("```") {
            return Ok(content[start..start + end].trim().to_string());
        }
    }

    // Try to find raw JSON
    if let Some(start) = content.find('{') {
        if let Some(end) = content.rfind('}') {
            return Ok(content[start..=end].to_string());
        }
    }

    Err(AnalysisError::Parse("No JSON found in response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::{Opportunity, SentimentLabel, VerdictReasoning};

    fn verdict(score: f64, bullish: f64) -> SentimentVerdict {
        SentimentVerdict {
            headline: "Test".to_string(),
            sentiment_score: score,
            sentiment_label: SentimentLabel::Neutral,
            explanation: String::new(),
            affected_sectors: vec![],
            key_entities: vec![],
            predicted_market_reaction: String::new(),
            bullish_probability: bullish,
            opportunities: vec![],
            reasoning: VerdictReasoning {
                up: vec![],
                down: vec![],
                why: String::new(),
            },
        }
    }

    #[test]
    fn extract_json_from_fenced_block() {
        let content = "Here you go:\n```json\n{\"a\": 1}\n```\nDone.";
        assert_eq!(extract_json(content).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn extract_json_from_plain_fence() {
        let content = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json(content).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn extract_json_from_raw_braces() {
        let content = "The result is {\"a\": 1} as requested";
        assert_eq!(extract_json(content).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn extract_json_fails_without_json() {
        assert!(extract_json("no structured data here").is_err());
    }

    #[test]
    fn validate_accepts_in_range_verdict() {
        assert!(validate_verdict(&verdict(7.0, 60.0)).is_ok());
        assert!(validate_verdict(&verdict(1.0, 0.0)).is_ok());
        assert!(validate_verdict(&verdict(10.0, 100.0)).is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_score() {
        assert!(matches!(
            validate_verdict(&verdict(11.0, 50.0)),
            Err(AnalysisError::InvalidVerdict(_))
        ));
        assert!(matches!(
            validate_verdict(&verdict(0.5, 50.0)),
            Err(AnalysisError::InvalidVerdict(_))
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_probability() {
        assert!(matches!(
            validate_verdict(&verdict(5.0, 101.0)),
            Err(AnalysisError::InvalidVerdict(_))
        ));

        let mut v = verdict(5.0, 50.0);
        v.opportunities.push(Opportunity {
            company: "ACME".to_string(),
            sector: "Technology".to_string(),
            probability: -1.0,
            reason: String::new(),
        });
        assert!(matches!(
            validate_verdict(&v),
            Err(AnalysisError::InvalidVerdict(_))
        ));
    }

    #[test]
    fn prompt_names_the_fixed_sectors() {
        let prompt = build_prompt("Fed cuts rates", "Policy easing begins");
        for sector in ["Technology", "Banking", "Defense", "Energy", "Automotive", "Pharmaceuticals"] {
            assert!(prompt.contains(sector));
        }
        assert!(prompt.contains("Fed cuts rates"));
    }
}
