//! Prompt classification against the loaded signature set.

pub mod direct;
pub mod indirect;

pub use direct::{DirectInjectionDetector, MatchKind, SignatureMatch};
pub use indirect::IndirectRiskDetector;

use crate::signatures::SignatureSet;
use serde::{Deserialize, Serialize};

/// Outcome of classifying one prompt
///
/// Produced fresh per prompt and never mutated afterwards. Matches across all
/// signature kinds are retained together; detection never stops at the first
/// hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// At least one keyword or regex signature matched
    pub direct_injection_detected: bool,
    /// Every direct signature hit, keywords before regexes, in configured order
    pub direct_matches: Vec<SignatureMatch>,
    /// At least one indirect-risk context phrase matched
    pub indirect_risk_detected: bool,
    /// Every matched context phrase, in configured order
    pub indirect_matches: Vec<String>,
}

impl ClassificationResult {
    /// Check whether no signature of any kind matched
    pub fn is_clean(&self) -> bool {
        !self.direct_injection_detected && !self.indirect_risk_detected
    }
}

/// Classifier combining the direct and indirect signature passes
///
/// Compiled once from the signature set; classification itself is a pure read
/// and safe to call from concurrent requests.
pub struct Detector {
    direct: DirectInjectionDetector,
    indirect: IndirectRiskDetector,
    empty: bool,
}

impl Detector {
    /// Compile a detector from the signature set
    pub fn new(signatures: &SignatureSet) -> Self {
        Self {
            direct: DirectInjectionDetector::new(signatures),
            indirect: IndirectRiskDetector::new(signatures),
            empty: signatures.is_empty(),
        }
    }

    /// Classify a prompt against every configured signature
    ///
    /// An empty prompt or an empty signature set yields the all-clean result.
    pub fn detect(&self, prompt: &str) -> ClassificationResult {
        if prompt.is_empty() || self.empty {
            return ClassificationResult::default();
        }

        let direct_matches = self.direct.detect(prompt);
        let indirect_matches = self.indirect.detect(prompt);

        ClassificationResult {
            direct_injection_detected: !direct_matches.is_empty(),
            indirect_risk_detected: !indirect_matches.is_empty(),
            direct_matches,
            indirect_matches,
        }
    }
}
