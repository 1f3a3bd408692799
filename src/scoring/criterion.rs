//! Evaluation criteria and per-criterion scores

use crate::error::{Result, ScreenerError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One evaluation dimension. The set and its order are fixed; comparison
/// axes and report rows always follow [`CriterionKey::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriterionKey {
    Experience,
    Skills,
    Education,
    Languages,
    Strengths,
    Weaknesses,
}

impl CriterionKey {
    /// All criteria, in presentation order.
    pub const ALL: [CriterionKey; 6] = [
        CriterionKey::Experience,
        CriterionKey::Skills,
        CriterionKey::Education,
        CriterionKey::Languages,
        CriterionKey::Strengths,
        CriterionKey::Weaknesses,
    ];

    /// The criteria that contribute to the weighted base score.
    pub const POSITIVE: [CriterionKey; 5] = [
        CriterionKey::Experience,
        CriterionKey::Skills,
        CriterionKey::Education,
        CriterionKey::Languages,
        CriterionKey::Strengths,
    ];

    /// Weaknesses is a penalty dimension scored on a negative range.
    pub fn is_penalty(&self) -> bool {
        matches!(self, CriterionKey::Weaknesses)
    }

    /// Inclusive value bounds for this criterion.
    pub fn range(&self) -> (f32, f32) {
        if self.is_penalty() {
            (-3.0, 0.0)
        } else {
            (0.0, 10.0)
        }
    }
}

impl fmt::Display for CriterionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CriterionKey::Experience => "experience",
            CriterionKey::Skills => "skills",
            CriterionKey::Education => "education",
            CriterionKey::Languages => "languages",
            CriterionKey::Strengths => "strengths",
            CriterionKey::Weaknesses => "weaknesses",
        };
        write!(f, "{}", name)
    }
}

/// Score of one candidate along one criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion: CriterionKey,
    pub value: f32,
    pub justification: String,
}

impl CriterionScore {
    /// Builds a validated score. Out-of-range values and empty
    /// justifications never escape the scoring layer.
    pub fn new(criterion: CriterionKey, value: f32, justification: String) -> Result<Self> {
        let (min, max) = criterion.range();
        if !value.is_finite() || value < min || value > max {
            return Err(ScreenerError::Backend(format!(
                "value {} outside [{}, {}] for criterion '{}'",
                value, min, max, criterion
            )));
        }
        if justification.trim().is_empty() {
            return Err(ScreenerError::Backend(format!(
                "empty justification for criterion '{}'",
                criterion
            )));
        }
        Ok(Self {
            criterion,
            value,
            justification,
        })
    }
}
