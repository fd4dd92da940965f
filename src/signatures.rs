//! Signature store: detection signatures loaded from a JSON document.
//!
//! The store is read once at startup and never mutated afterwards. A missing
//! or malformed document degrades to an empty set so the filter keeps serving
//! traffic (permissively) instead of refusing to start.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// On-disk signature document
///
/// Field names follow the external JSON format. Any missing array defaults to
/// empty, so a document may carry only the signature kinds it needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignatureFile {
    /// Literal strings indicating direct injection attempts
    #[serde(default)]
    pub direct_injection_keywords: Vec<String>,
    /// Regular expressions indicating direct injection attempts
    #[serde(default)]
    pub direct_injection_regex: Vec<String>,
    /// Context phrases marking prompts susceptible to indirect injection
    #[serde(default)]
    pub indirect_injection_placeholders: Vec<String>,
}

/// In-memory signature set
///
/// Immutable for the process lifetime; the detector compiles it once and
/// every request reads the compiled form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureSet {
    /// Literal keyword signatures, matched case-insensitively
    pub keywords: Vec<String>,
    /// Regex signature sources, compiled per-pattern by the detector
    pub regex_patterns: Vec<String>,
    /// Context phrases denoting indirect-injection risk
    pub indirect_phrases: Vec<String>,
}

impl From<SignatureFile> for SignatureSet {
    fn from(file: SignatureFile) -> Self {
        Self {
            keywords: file.direct_injection_keywords,
            regex_patterns: file.direct_injection_regex,
            indirect_phrases: file.indirect_injection_placeholders,
        }
    }
}

/// Errors raised while loading a signature document
#[derive(Debug, Error)]
pub enum SignatureLoadError {
    #[error("signature file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("invalid JSON in signature file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read signature file {path}: {source}")]
    Unexpected {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SignatureSet {
    /// Load a signature set from a JSON document at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SignatureLoadError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SignatureLoadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => SignatureLoadError::Unexpected {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let file: SignatureFile =
            serde_json::from_str(&content).map_err(|e| SignatureLoadError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(file.into())
    }

    /// Load a signature set, falling back to an empty set on any load error
    ///
    /// The failure is logged and the filter runs with no signatures, meaning
    /// every prompt classifies as clean until the document is fixed.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::load(&path) {
            Ok(set) => {
                info!(
                    keywords = set.keywords.len(),
                    regexes = set.regex_patterns.len(),
                    indirect = set.indirect_phrases.len(),
                    "Loaded signature set"
                );
                set
            }
            Err(e) => {
                warn!(error = %e, "Signature loading failed, continuing with an empty set");
                Self::default()
            }
        }
    }

    /// Check whether any signatures of any kind are configured
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
            && self.regex_patterns.is_empty()
            && self.indirect_phrases.is_empty()
    }
}
