//! Plot-ready series built from backend score payloads.

use api::{ScoreMap, ScorePayload};

use super::geometry::clamp_score;

#[derive(Debug, Clone, PartialEq)]
pub struct CompetencyScore {
    pub axis: String,
    pub value: f64,
}

impl CompetencyScore {
    pub fn new(axis: impl Into<String>, value: f64) -> Self {
        Self {
            axis: axis.into(),
            value,
        }
    }
}

/// A named polygon on the chart. Every series drawn together shares the
/// same ordered axis list.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub axes: Vec<CompetencyScore>,
}

impl Series {
    pub fn new(name: impl Into<String>, axes: Vec<CompetencyScore>) -> Self {
        Self {
            name: name.into(),
            axes,
        }
    }

    pub fn from_map(name: impl Into<String>, scores: &ScoreMap) -> Self {
        Self::new(
            name,
            scores
                .iter()
                .map(|(axis, value)| CompetencyScore::new(axis.clone(), *value))
                .collect(),
        )
    }

    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.axes.iter().map(|score| score.axis.as_str())
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }
}

/// Chart series for one person: the team reference first, the person second.
pub fn person_series(payload: &ScorePayload, person_name: &str, team_label: &str) -> Vec<Series> {
    let team = payload.aligned_team();
    vec![
        Series::from_map(team_label, &team),
        Series::from_map(person_name, payload.individual()),
    ]
}

/// One line of the plain score list shown when no chart can be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    pub axis: String,
    pub value: f64,
    pub team: Option<f64>,
    /// Bar fill in `[0, 100]`.
    pub percent: u32,
}

/// Rows in backend order, bars scaled against `max_value`.
pub fn score_rows(payload: &ScorePayload, max_value: f64) -> Vec<ScoreRow> {
    let team = payload.team();
    payload
        .individual()
        .iter()
        .map(|(axis, value)| {
            let percent = if max_value > 0.0 {
                (clamp_score(*value, max_value) / max_value * 100.0).round() as u32
            } else {
                0
            };
            ScoreRow {
                axis: axis.clone(),
                value: *value,
                team: team.and_then(|t| t.get(axis).copied()),
                percent,
            }
        })
        .collect()
}
