//! The closed set of pipeline stages.

use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Stage a deal currently occupies.
///
/// Declaration order is the display order (kanban columns left to right).
/// There is no transition graph: every stage can move to every other stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DealStage {
    Prospect,
    UnderEvaluation,
    TermSheetSubmitted,
    Closed,
    Lost,
}

impl DealStage {
    /// All stages in display order
    pub const ALL: [DealStage; 5] = [
        DealStage::Prospect,
        DealStage::UnderEvaluation,
        DealStage::TermSheetSubmitted,
        DealStage::Closed,
        DealStage::Lost,
    ];

    /// Wire code, also used as the filter value
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStage::Prospect => "Prospect",
            DealStage::UnderEvaluation => "UnderEvaluation",
            DealStage::TermSheetSubmitted => "TermSheetSubmitted",
            DealStage::Closed => "Closed",
            DealStage::Lost => "Lost",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DealStage::Prospect => "Prospect",
            DealStage::UnderEvaluation => "Under Evaluation",
            DealStage::TermSheetSubmitted => "Term Sheet Submitted",
            DealStage::Closed => "Closed",
            DealStage::Lost => "Lost",
        }
    }

    /// Zero-based column position
    pub fn position(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or_default()
    }

    /// Move to `target`. Total: any stage may follow any stage, including itself.
    pub fn transition_to(self, target: DealStage) -> DealStage {
        target
    }
}

impl fmt::Display for DealStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealStage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DealStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownValue {
                field: "stage",
                value: s.to_string(),
            })
    }
}
