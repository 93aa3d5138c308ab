//! Analysis session: the rule set, legend and registry in use.

use loglens_rules::{extract_document, ErrorRecord, ParsedToken, RuleSet, ThemeLegend};
use serde::Serialize;
use tracing::{debug, info};

use crate::registry::{shared_registry, DocumentErrorLog, SharedRegistry};

/// Version label used when a document does not name one.
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Result of analyzing one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalysis {
    /// Tokens for the renderer, sorted by line then column.
    pub tokens: Vec<ParsedToken>,
    /// Errors the registry holds for the document.
    ///
    /// For a document that was already registered these are the first
    /// registration's errors, not this text's.
    pub errors: Vec<ErrorRecord>,
    /// Whether this call created the registry entry.
    pub newly_registered: bool,
}

/// Owns the active configuration and the error registry.
///
/// Reloading configuration is the only way to replace the rule set, and it
/// clears every registered document.
#[derive(Debug)]
pub struct AnalysisSession {
    rules: RuleSet,
    legend: ThemeLegend,
    registry: SharedRegistry,
    default_version: String,
}

impl AnalysisSession {
    /// Creates a session with a fresh registry.
    #[must_use]
    pub fn new(rules: RuleSet, legend: ThemeLegend) -> Self {
        Self {
            rules,
            legend,
            registry: shared_registry(),
            default_version: DEFAULT_VERSION.to_string(),
        }
    }

    /// Sets the version label used when [`Self::analyze`] gets none.
    #[must_use]
    pub fn with_default_version(mut self, version: impl Into<String>) -> Self {
        self.default_version = version.into();
        self
    }

    /// Classifies `text` and registers its errors under `document_key`.
    pub fn analyze(&self, document_key: &str, text: &str, version: Option<&str>) -> DocumentAnalysis {
        let extraction = extract_document(text, &self.rules);
        let version = version.unwrap_or(&self.default_version);

        let newly_registered = self.registry.register(document_key, extraction.errors, version);
        let errors = self
            .registry
            .get(document_key)
            .map(|log| log.errors)
            .unwrap_or_default();

        debug!(
            document = document_key,
            tokens = extraction.tokens.len(),
            errors = errors.len(),
            newly_registered,
            "document analyzed"
        );

        DocumentAnalysis {
            tokens: extraction.tokens,
            errors,
            newly_registered,
        }
    }

    /// Forgets a closed document. Returns whether it was registered.
    pub fn close(&self, document_key: &str) -> bool {
        self.registry.evict(document_key)
    }

    /// Replaces the rule set and legend, dropping every registration.
    pub fn reload(&mut self, rules: RuleSet, legend: ThemeLegend) {
        info!(
            rules = rules.len(),
            categories = legend.categories().len(),
            dropped_documents = self.registry.len(),
            "configuration reloaded"
        );
        self.rules = rules;
        self.legend = legend;
        self.registry.clear();
    }

    /// Registered documents and their errors, in registration order.
    #[must_use]
    pub fn panel(&self) -> Vec<(String, DocumentErrorLog)> {
        self.registry.snapshot()
    }

    /// Active rule set.
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Active legend.
    #[must_use]
    pub const fn legend(&self) -> &ThemeLegend {
        &self.legend
    }

    /// Shared registry, for handing to a navigator.
    #[must_use]
    pub const fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Version label used when none is given.
    #[must_use]
    pub fn default_version(&self) -> &str {
        &self.default_version
    }
}
