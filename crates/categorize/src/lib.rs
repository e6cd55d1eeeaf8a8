//! Image categorization: vision labels reconciled against the built-in
//! keyword table and the custom category vocabulary of the content store.
//!
//! [`CategorySuggester::analyze`] never fails. Any stage that cannot
//! complete yields [`AnalysisResult::fallback`].

pub mod builtin;
pub mod credentials;
pub mod result;
pub mod scoring;
pub mod suggester;
pub mod vocabulary;

pub use {
    credentials::{CredentialResolver, CredentialSource, EnvSource, SettingsSource},
    result::{AnalysisResult, OTHER_CATEGORY},
    scoring::{CategoryScore, score_categories, suggest_multiple_categories},
    suggester::{AnalysisRequest, CategorySuggester},
    vocabulary::VocabularyReader,
};
