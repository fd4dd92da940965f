//! Policy engine: maps a classification to an allow or block decision.

use crate::detection::ClassificationResult;
use serde::{Deserialize, Serialize};

/// Enforcement action for one prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Allow,
    Block,
}

impl Action {
    /// Get the display name for this action
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Allow => "allow",
            Action::Block => "block",
        }
    }
}

/// Policy flags controlling when detections block
///
/// `block_on_injection` is the master switch; with it off every prompt is
/// allowed regardless of classification. `block_on_indirect_risk` decides
/// whether an indirect-risk match with no direct match blocks on its own, and
/// has no effect while the master switch is off. Both default to on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Block prompts that match direct-injection signatures
    pub block_on_injection: bool,
    /// Also block prompts that only match indirect-risk context phrases
    pub block_on_indirect_risk: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            block_on_injection: true,
            block_on_indirect_risk: true,
        }
    }
}

/// A policy decision together with the classification that justified it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDecision {
    pub action: Action,
    pub classification: ClassificationResult,
}

impl PolicyDecision {
    /// Check whether the decision is a block
    pub fn is_blocked(&self) -> bool {
        self.action == Action::Block
    }
}

impl PolicyConfig {
    /// Decide whether a classified prompt may proceed to the backend
    ///
    /// Deterministic: the same classification and flags always yield the same
    /// decision. The classification travels with the decision so callers can
    /// report what triggered a block.
    pub fn decide(&self, classification: ClassificationResult) -> PolicyDecision {
        let block = self.block_on_injection
            && (classification.direct_injection_detected
                || (self.block_on_indirect_risk && classification.indirect_risk_detected));

        PolicyDecision {
            action: if block { Action::Block } else { Action::Allow },
            classification,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{MatchKind, SignatureMatch};

    fn direct_hit() -> ClassificationResult {
        ClassificationResult {
            direct_injection_detected: true,
            direct_matches: vec![SignatureMatch {
                kind: MatchKind::Keyword,
                signature: "ignore all previous instructions".to_string(),
            }],
            indirect_risk_detected: false,
            indirect_matches: Vec::new(),
        }
    }

    fn indirect_hit() -> ClassificationResult {
        ClassificationResult {
            direct_injection_detected: false,
            direct_matches: Vec::new(),
            indirect_risk_detected: true,
            indirect_matches: vec!["summarize the following document".to_string()],
        }
    }

    #[test]
    fn test_action_display_names() {
        assert_eq!(Action::Allow.as_str(), "allow");
        assert_eq!(Action::Block.as_str(), "block");
    }

    #[test]
    fn test_clean_classification_is_allowed() {
        let decision = PolicyConfig::default().decide(ClassificationResult::default());
        assert_eq!(decision.action, Action::Allow);
    }

    #[test]
    fn test_direct_injection_blocks_by_default() {
        let decision = PolicyConfig::default().decide(direct_hit());
        assert!(decision.is_blocked());
        assert_eq!(decision.classification.direct_matches.len(), 1);
    }

    #[test]
    fn test_indirect_risk_blocks_by_default() {
        let decision = PolicyConfig::default().decide(indirect_hit());
        assert!(decision.is_blocked());
    }

    #[test]
    fn test_indirect_risk_allowed_when_flag_off() {
        let policy = PolicyConfig {
            block_on_injection: true,
            block_on_indirect_risk: false,
        };

        assert_eq!(policy.decide(indirect_hit()).action, Action::Allow);
        // Direct detections still block.
        assert!(policy.decide(direct_hit()).is_blocked());
    }

    #[test]
    fn test_master_switch_off_allows_everything() {
        let policy = PolicyConfig {
            block_on_injection: false,
            block_on_indirect_risk: true,
        };

        assert_eq!(policy.decide(direct_hit()).action, Action::Allow);
        assert_eq!(policy.decide(indirect_hit()).action, Action::Allow);
    }

    #[test]
    fn test_decision_carries_classification() {
        let decision = PolicyConfig::default().decide(indirect_hit());
        assert_eq!(
            decision.classification.indirect_matches,
            vec!["summarize the following document"]
        );
    }
}
