//! Order display heuristics
//!
//! Scans call transcripts for phrases like "added a latte" to show a running
//! order list and a product picture. This is a best-effort presentation aid,
//! not a reconciled order; a structured order event from the agent can
//! replace it by providing another [`OrderExtractor`].

use regex::Regex;
use serde::{Deserialize, Serialize};

/// One turn of a call transcript, as delivered by the browser client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TranscriptTurn {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl TranscriptTurn {
    fn is_empty(&self) -> bool {
        self.role.is_empty() || self.content.is_empty()
    }
}

/// What the UI should show for the current transcript
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderSnapshot {
    pub items: Vec<String>,
    pub image: Option<String>,
}

pub trait OrderExtractor: Send + Sync {
    fn extract(&self, transcript: &[TranscriptTurn]) -> OrderSnapshot;
}

/// Product keyword and the image shown when a customer mentions it
#[derive(Debug, Clone)]
pub struct ProductImage {
    pub keyword: String,
    pub path: String,
}

impl ProductImage {
    pub fn new(keyword: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            path: path.into(),
        }
    }
}

/// Extractor driven by "added/ordered/got ..." phrases in agent speech
pub struct PhraseOrderExtractor {
    pattern: Regex,
    images: Vec<ProductImage>,
}

impl PhraseOrderExtractor {
    pub fn new(images: Vec<ProductImage>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(r"(?i)(?:added|ordered|got)\s+([^.!?]+)")?,
            images,
        })
    }

    /// Extractor with the café's product pictures
    pub fn cafe() -> Result<Self, regex::Error> {
        Self::new(vec![
            ProductImage::new("almond milk drink", "/assets/products/almond-milk-drink.png"),
            ProductImage::new("herbal tea", "/assets/products/herbal-tea.png"),
        ])
    }

    fn spoken_by<'a>(transcript: &'a [TranscriptTurn], role: &str) -> Vec<&'a str> {
        transcript
            .iter()
            .filter(|t| !t.is_empty() && t.role == role)
            .map(|t| t.content.as_str())
            .collect()
    }

    fn items(&self, agent_text: &str) -> Vec<String> {
        self.pattern
            .captures_iter(agent_text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }

    fn image(&self, user_text: &str) -> Option<String> {
        self.images
            .iter()
            .find(|p| user_text.contains(&p.keyword))
            .map(|p| p.path.clone())
    }
}

impl OrderExtractor for PhraseOrderExtractor {
    fn extract(&self, transcript: &[TranscriptTurn]) -> OrderSnapshot {
        let agent_text = Self::spoken_by(transcript, "agent").join(" ");
        let user_text = Self::spoken_by(transcript, "user").join(" ").to_lowercase();

        OrderSnapshot {
            items: self.items(&agent_text),
            image: self.image(&user_text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: &str, content: &str) -> TranscriptTurn {
        TranscriptTurn {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    fn extractor() -> PhraseOrderExtractor {
        PhraseOrderExtractor::cafe().unwrap()
    }

    #[test]
    fn test_items_from_agent_turns() {
        let snapshot = extractor().extract(&[
            turn("user", "A caramel latte please"),
            turn("agent", "I've added a Caramel Latte. I got you a muffin!"),
        ]);
        assert_eq!(snapshot.items, vec!["a Caramel Latte", "you a muffin"]);
    }

    #[test]
    fn test_items_span_turns_in_order() {
        let snapshot = extractor().extract(&[
            turn("agent", "Ordered one Turtle Mocha."),
            turn("user", "and I ordered a cookie."),
            turn("agent", "ADDED a cookie? Anything else?"),
        ]);
        assert_eq!(snapshot.items, vec!["one Turtle Mocha", "a cookie"]);
    }

    #[test]
    fn test_user_phrases_are_ignored() {
        let snapshot = extractor().extract(&[turn("user", "I got a coupon.")]);
        assert!(snapshot.items.is_empty());
    }

    #[test]
    fn test_image_from_user_keywords() {
        let snapshot = extractor().extract(&[
            turn("user", "Can I get an Herbal Tea?"),
            turn("agent", "Sure."),
        ]);
        assert_eq!(snapshot.image.as_deref(), Some("/assets/products/herbal-tea.png"));
    }

    #[test]
    fn test_first_configured_image_wins() {
        let snapshot = extractor().extract(&[turn(
            "user",
            "herbal tea, no wait, an almond milk drink",
        )]);
        assert_eq!(
            snapshot.image.as_deref(),
            Some("/assets/products/almond-milk-drink.png")
        );
    }

    #[test]
    fn test_incomplete_turns_are_skipped() {
        let snapshot = extractor().extract(&[
            turn("", "added a ghost."),
            turn("agent", ""),
            turn("agent", "Added a scone."),
        ]);
        assert_eq!(snapshot.items, vec!["a scone"]);
        assert!(snapshot.image.is_none());
    }

    #[test]
    fn test_empty_transcript() {
        assert_eq!(extractor().extract(&[]), OrderSnapshot::default());
    }
}
