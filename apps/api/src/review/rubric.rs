//! Rubric variants a student can pick for their review.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::prompts::reviewer_instructions;

#[derive(Debug, Error, PartialEq)]
pub enum RubricError {
    #[error("Please select a review type")]
    Missing,

    #[error("Unknown review type {0:?}; expected 0, 1 or 2")]
    Unknown(String),
}

/// The review track a paper belongs to. Serialized as its numeric index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RubricVariant {
    OutsideProject,
    InContextLearning,
    Interpretability,
}

impl RubricVariant {
    pub const ALL: [RubricVariant; 3] = [
        RubricVariant::OutsideProject,
        RubricVariant::InContextLearning,
        RubricVariant::Interpretability,
    ];

    pub fn index(self) -> u8 {
        match self {
            RubricVariant::OutsideProject => 0,
            RubricVariant::InContextLearning => 1,
            RubricVariant::Interpretability => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RubricVariant::OutsideProject => "Your own project from outside of EECS",
            RubricVariant::InContextLearning => {
                "Theoretical/empirical study of in-context learning"
            }
            RubricVariant::Interpretability => "Interpretability",
        }
    }

    /// Reviewer instructions for this track. All tracks currently share one rubric.
    pub fn instructions(self) -> String {
        reviewer_instructions()
    }

    /// Parses the raw form value sent by clients (`"0"`, `"1"`, `"2"`).
    pub fn parse_field(raw: &str) -> Result<Self, RubricError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(RubricError::Missing);
        }
        raw.parse::<u8>()
            .ok()
            .and_then(|index| Self::try_from(index).ok())
            .ok_or_else(|| RubricError::Unknown(raw.to_string()))
    }
}

impl TryFrom<u8> for RubricVariant {
    type Error = RubricError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.index() == index)
            .ok_or_else(|| RubricError::Unknown(index.to_string()))
    }
}

impl From<RubricVariant> for u8 {
    fn from(variant: RubricVariant) -> Self {
        variant.index()
    }
}

/// Listing entry for `GET /api/v1/rubrics`.
#[derive(Debug, Clone, Serialize)]
pub struct RubricSummary {
    pub value: u8,
    pub label: &'static str,
}

pub fn list_rubrics() -> Vec<RubricSummary> {
    RubricVariant::ALL
        .into_iter()
        .map(|variant| RubricSummary {
            value: variant.index(),
            label: variant.label(),
        })
        .collect()
}
