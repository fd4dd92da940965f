//! Indirect injection risk detection.
//!
//! Indirect injection rides in content the model is asked to process
//! (documents, emails, feedback) rather than in the prompt itself. This pass
//! does not inspect any such content; it only flags prompts whose phrasing
//! places them in a context known to carry that risk.

use crate::signatures::SignatureSet;
use tracing::debug;

/// Detector for contexts susceptible to indirect injection
pub struct IndirectRiskDetector {
    /// (configured text, lowercase fold) per context phrase
    phrases: Vec<(String, String)>,
}

impl IndirectRiskDetector {
    /// Create a detector from the signature set
    pub fn new(signatures: &SignatureSet) -> Self {
        let phrases = signatures
            .indirect_phrases
            .iter()
            .map(|p| (p.clone(), p.to_lowercase()))
            .collect();

        Self { phrases }
    }

    /// Detect all risk-context phrases contained in a prompt
    ///
    /// Phrases are literal and matched case-insensitively, in configured order.
    pub fn detect(&self, prompt: &str) -> Vec<String> {
        let folded = prompt.to_lowercase();
        let mut matches = Vec::new();

        for (text, phrase) in &self.phrases {
            if folded.contains(phrase.as_str()) {
                debug!(phrase = %text, "Indirect-risk context phrase matched");
                matches.push(text.clone());
            }
        }

        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signatures() -> SignatureSet {
        SignatureSet {
            keywords: Vec::new(),
            regex_patterns: Vec::new(),
            indirect_phrases: vec![
                "summarize the following document".to_string(),
                "analyze the provided email".to_string(),
            ],
        }
    }

    #[test]
    fn test_phrase_match_is_case_insensitive() {
        let detector = IndirectRiskDetector::new(&signatures());

        let matches = detector.detect("Please SUMMARIZE the Following Document: quarterly report");
        assert_eq!(matches, vec!["summarize the following document"]);
    }

    #[test]
    fn test_multiple_phrases_are_recorded() {
        let detector = IndirectRiskDetector::new(&signatures());

        let matches = detector
            .detect("Summarize the following document and analyze the provided email please");
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_ordinary_prompt_has_no_matches() {
        let detector = IndirectRiskDetector::new(&signatures());
        assert!(detector.detect("Write a poem about a cat and a dog").is_empty());
    }
}
