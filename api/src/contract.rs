//! Request/response shapes exchanged with the feedback backend.
//!
//! Score maps keep the backend's key order: the order competencies arrive in
//! is the order the radar axes are drawn in.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Competency name → score on the backend's bounded scale.
pub type ScoreMap = IndexMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredScores {
    pub individual_scores: ScoreMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_averages: Option<ScoreMap>,
}

/// Scores for one person. Older backends answer with a bare competency map
/// instead of the structured object; both decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScorePayload {
    Structured(StructuredScores),
    Flat(ScoreMap),
}

impl ScorePayload {
    pub fn individual(&self) -> &ScoreMap {
        match self {
            ScorePayload::Structured(scores) => &scores.individual_scores,
            ScorePayload::Flat(map) => map,
        }
    }

    pub fn team(&self) -> Option<&ScoreMap> {
        match self {
            ScorePayload::Structured(scores) => scores.team_averages.as_ref(),
            ScorePayload::Flat(_) => None,
        }
    }

    /// Team averages in the individual axis order.
    ///
    /// Missing team averages fall back to the individual scores; a
    /// competency absent from the team map takes the individual value.
    pub fn aligned_team(&self) -> ScoreMap {
        let individual = self.individual();
        match self.team() {
            Some(team) => individual
                .iter()
                .map(|(axis, own)| (axis.clone(), team.get(axis).copied().unwrap_or(*own)))
                .collect(),
            None => {
                tracing::warn!("no team averages in payload; using individual scores as reference");
                individual.clone()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonScoreRecord {
    pub person_name: String,
    pub scores: ScorePayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GifExportRequest {
    pub svg_data: String,
    pub person_name: String,
    pub export_path: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub persons: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoresResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub scores: Option<ScorePayload>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AllPersonsResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub persons_data: Option<Vec<PersonScoreRecord>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    #[serde(default)]
    pub available_persons: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusOnlyResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Turns the `success`/`error` pair every endpoint carries into a result.
///
/// An explicit `success: false` always fails. A missing flag only fails when
/// the body carries an error message.
pub(crate) fn check_success(
    success: Option<bool>,
    error: Option<String>,
    fallback: &str,
) -> Result<(), ApiError> {
    match (success, error) {
        (Some(true), _) => Ok(()),
        (Some(false), err) => Err(ApiError::Rejected(err.unwrap_or_else(|| fallback.to_string()))),
        (None, Some(err)) => Err(ApiError::Rejected(err)),
        (None, None) => Ok(()),
    }
}

/// Extracts the payload field once the envelope checked out.
pub(crate) fn require<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::Decode(format!("missing `{field}` in response")))
}
