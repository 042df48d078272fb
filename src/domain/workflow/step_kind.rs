//! Closed set of step kinds and the fixed instruction table behind them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::WorkflowError;

/// A single text transformation a workflow step can perform.
///
/// The kebab-case serde names are the wire contract for both workflow creation and
/// execution. Adding a kind means adding a variant here; every `match` below must then
/// bind it to its label, description and instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    CleanText,
    Summarize,
    ExtractKeyPoints,
    TagCategory,
}

impl StepKind {
    /// Every kind, in catalogue order
    pub const ALL: [StepKind; 4] = [
        StepKind::CleanText,
        StepKind::Summarize,
        StepKind::ExtractKeyPoints,
        StepKind::TagCategory,
    ];

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CleanText => "clean-text",
            Self::Summarize => "summarize",
            Self::ExtractKeyPoints => "extract-key-points",
            Self::TagCategory => "tag-category",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::CleanText => "Clean Text",
            Self::Summarize => "Summarize",
            Self::ExtractKeyPoints => "Extract Key Points",
            Self::TagCategory => "Tag Category",
        }
    }

    /// Short description shown next to the label
    pub fn description(&self) -> &'static str {
        match self {
            Self::CleanText => "Remove formatting, fix typos",
            Self::Summarize => "Create concise summary",
            Self::ExtractKeyPoints => "Extract main points",
            Self::TagCategory => "Categorize content",
        }
    }

    /// System instruction handed to the language model for this kind
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::CleanText => {
                "You clean up text. Remove markup and stray formatting, fix spelling and \
                 grammar mistakes, and normalize whitespace. Keep the meaning and wording \
                 otherwise unchanged. Reply with the cleaned text only."
            }
            Self::Summarize => {
                "You summarize text. Write a concise summary of the input that keeps its \
                 key facts and conclusions. Reply with the summary only."
            }
            Self::ExtractKeyPoints => {
                "You extract key points. List the main points of the input as short \
                 bullet points, one per line, most important first. Reply with the list only."
            }
            Self::TagCategory => {
                "You categorize text. Assign the input a primary category and up to five \
                 topical tags. Reply in the form 'Category: <category>' followed by \
                 'Tags: <tag>, <tag>, ...'."
            }
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| WorkflowError::unknown_step_type(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_kinds() {
        for kind in StepKind::ALL {
            assert_eq!(kind.as_str().parse::<StepKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_unknown_kind() {
        let err = "translate".parse::<StepKind>().unwrap_err();
        assert_eq!(err, WorkflowError::unknown_step_type("translate"));
        assert_eq!(err.to_string(), "unknown step type");
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Summarize".parse::<StepKind>().is_err());
        assert!("clean_text".parse::<StepKind>().is_err());
    }

    #[test]
    fn test_serde_matches_wire_values() {
        for kind in StepKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }

        let parsed: StepKind = serde_json::from_str("\"extract-key-points\"").unwrap();
        assert_eq!(parsed, StepKind::ExtractKeyPoints);
    }

    #[test]
    fn test_every_kind_has_distinct_instruction() {
        let mut instructions: Vec<_> = StepKind::ALL.iter().map(|k| k.instruction()).collect();
        instructions.sort();
        instructions.dedup();
        assert_eq!(instructions.len(), StepKind::ALL.len());
    }
}
