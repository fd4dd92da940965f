//! Direct prompt injection detection.
//!
//! Runs the keyword and regex signature passes over a prompt. Every hit is
//! recorded; no check short-circuits, so a classification always reflects the
//! full signature surface.

use crate::signatures::SignatureSet;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Kind of signature that produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Keyword,
    Regex,
}

impl MatchKind {
    /// Get the display name for this match kind
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Keyword => "keyword",
            MatchKind::Regex => "regex",
        }
    }
}

/// A single direct-injection signature hit
///
/// Carries the configured signature text, not the prompt fragment it matched,
/// so reports stay stable across case or spacing variants of the same attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureMatch {
    /// Which signature pass fired
    pub kind: MatchKind,
    /// The signature as configured in the store
    pub signature: String,
}

/// Detector for direct injection attempts
pub struct DirectInjectionDetector {
    /// (configured text, lowercase fold) per keyword signature
    keywords: Vec<(String, String)>,
    /// (source text, compiled matcher) per surviving regex signature
    patterns: Vec<(String, Regex)>,
}

impl DirectInjectionDetector {
    /// Compile a detector from the signature set
    ///
    /// Each regex compiles independently with case-insensitive matching. A
    /// signature that fails to compile is skipped with a warning and the rest
    /// of the set remains in effect.
    pub fn new(signatures: &SignatureSet) -> Self {
        let keywords = signatures
            .keywords
            .iter()
            .map(|k| (k.clone(), k.to_lowercase()))
            .collect();

        let mut patterns = Vec::with_capacity(signatures.regex_patterns.len());
        for source in &signatures.regex_patterns {
            match RegexBuilder::new(source).case_insensitive(true).build() {
                Ok(regex) => patterns.push((source.clone(), regex)),
                Err(e) => {
                    warn!(pattern = %source, error = %e, "Skipping invalid regex signature")
                }
            }
        }

        Self { keywords, patterns }
    }

    /// Detect all direct injection signatures in a prompt
    ///
    /// Returns keyword hits first, then regex hits, each in configured order.
    pub fn detect(&self, prompt: &str) -> Vec<SignatureMatch> {
        let mut matches = Vec::new();
        let folded = prompt.to_lowercase();

        for (text, keyword) in &self.keywords {
            if folded.contains(keyword.as_str()) {
                debug!(keyword = %text, "Direct injection keyword matched");
                matches.push(SignatureMatch {
                    kind: MatchKind::Keyword,
                    signature: text.clone(),
                });
            }
        }

        for (source, regex) in &self.patterns {
            if regex.is_match(prompt) {
                debug!(pattern = %source, "Direct injection regex matched");
                matches.push(SignatureMatch {
                    kind: MatchKind::Regex,
                    signature: source.clone(),
                });
            }
        }

        matches
    }
}
