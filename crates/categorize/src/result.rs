use {
    darkroom_vision::{Label, VisionOutput},
    serde::{Deserialize, Serialize},
};

use crate::scoring::CategoryScore;

/// Suggested category when nothing scores.
pub const OTHER_CATEGORY: &str = "Other";

/// Labels included in the generated description.
const DESCRIPTION_LABELS: usize = 5;

/// Outcome of analyzing one uploaded image.
///
/// `suggested_category` is always `suggested_categories[0]` and neither is
/// ever empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub labels: Vec<Label>,
    pub description: String,
    pub suggested_category: String,
    /// Best first.
    pub suggested_categories: Vec<String>,
    /// Full ranked list; empty when no label overlaps any vocabulary.
    pub suggested_category_matches: Vec<CategoryScore>,
    pub extracted_text: String,
    pub colors: Vec<String>,
    pub objects: Vec<String>,
    /// `false` only for the fallback result.
    pub analysis_succeeded: bool,
}

impl AnalysisResult {
    /// Fixed result returned whenever analysis cannot complete.
    pub fn fallback() -> Self {
        Self {
            labels: vec![Label::new("image", 1.0)],
            description: "Image analysis unavailable".into(),
            suggested_category: OTHER_CATEGORY.into(),
            suggested_categories: vec![OTHER_CATEGORY.into()],
            suggested_category_matches: Vec::new(),
            extracted_text: String::new(),
            colors: vec!["neutral".into(); 3],
            objects: Vec::new(),
            analysis_succeeded: false,
        }
    }

    /// Assemble a successful result, substituting [`OTHER_CATEGORY`] when
    /// `suggestions` is empty.
    pub(crate) fn assemble(
        output: VisionOutput,
        suggestions: Vec<String>,
        matches: Vec<CategoryScore>,
    ) -> Self {
        let VisionOutput {
            labels,
            caption,
            extracted_text,
            colors,
            objects,
        } = output;
        let suggested_categories = if suggestions.is_empty() {
            vec![OTHER_CATEGORY.to_string()]
        } else {
            suggestions
        };
        let description = caption
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| describe(&labels));

        Self {
            suggested_category: suggested_categories[0].clone(),
            suggested_categories,
            suggested_category_matches: matches,
            labels,
            description,
            extracted_text,
            colors,
            objects,
            analysis_succeeded: true,
        }
    }
}

fn describe(labels: &[Label]) -> String {
    if labels.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = labels
        .iter()
        .take(DESCRIPTION_LABELS)
        .map(|l| l.text.as_str())
        .collect();
    format!("Detected: {}", names.join(", "))
}
