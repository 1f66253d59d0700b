use serde::{Deserialize, Serialize};

use super::null_as_empty;

/// AI improvement report from `POST /api/ai-suggestions`.
///
/// Independent of `ScanResult`: both are computed from the same inputs but
/// are never merged and may disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSuggestionResult {
    #[serde(default)]
    pub improved_summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub skills_suggestions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rewritten_experience_bullets: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub project_suggestions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub keyword_placement_tips: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ats_warnings: Vec<String>,
}

impl AiSuggestionResult {
    /// Titled sections in display order, skipping the empty ones.
    pub fn sections(&self) -> Vec<(&'static str, &[String])> {
        [
            ("Skills Suggestions", self.skills_suggestions.as_slice()),
            (
                "Rewritten Experience Bullets",
                self.rewritten_experience_bullets.as_slice(),
            ),
            ("Project Suggestions", self.project_suggestions.as_slice()),
            (
                "Keyword Placement Tips",
                self.keyword_placement_tips.as_slice(),
            ),
            ("ATS Warnings", self.ats_warnings.as_slice()),
        ]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .collect()
    }

    /// The improved summary, if the model produced a non-blank one.
    pub fn summary(&self) -> Option<&str> {
        self.improved_summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_report_decodes() {
        let payload = json!({
            "improvedSummary": "Backend engineer focused on Python services on AWS.",
            "skillsSuggestions": ["Terraform"],
            "atsWarnings": null
        });
        let report: AiSuggestionResult = serde_json::from_value(payload).unwrap();
        assert_eq!(report.skills_suggestions, vec!["Terraform"]);
        assert!(report.ats_warnings.is_empty());
        assert!(report.project_suggestions.is_empty());
    }

    #[test]
    fn test_sections_skip_empty_lists() {
        let report = AiSuggestionResult {
            skills_suggestions: vec!["Kubernetes".to_string()],
            ats_warnings: vec!["Avoid tables".to_string(), "Avoid headers".to_string()],
            ..Default::default()
        };
        let titles: Vec<&str> = report.sections().iter().map(|(t, _)| *t).collect();
        assert_eq!(titles, vec!["Skills Suggestions", "ATS Warnings"]);
    }

    #[test]
    fn test_blank_summary_is_hidden() {
        let report = AiSuggestionResult {
            improved_summary: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(report.summary(), None);
    }

    #[test]
    fn test_empty_object_is_a_valid_report() {
        let report: AiSuggestionResult = serde_json::from_str("{}").unwrap();
        assert_eq!(report, AiSuggestionResult::default());
        assert!(report.sections().is_empty());
    }
}
