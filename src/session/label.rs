use crate::session::result::SessionResult;
use serde::{Deserialize, Serialize};

/// Final verdict for one measured run, folding the outcome of the unit of
/// work together with the quality of its measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RunLabel {
    /// The work passed and every tracked series produced a usable delta.
    Success,

    /// The unit of work itself failed.
    Fail,

    /// The work passed but the measurement could not be fully produced.
    Skip,
}

impl RunLabel {
    /// Classify a run from the work's outcome and its measurement record.
    ///
    /// A failing unit of work is always `Fail`, never downgraded to `Skip`
    /// by measurement trouble and never promoted by a clean measurement.
    /// With passing work, a missing result (the session never produced one)
    /// or an incomplete one yields `Skip`.
    #[must_use]
    pub fn classify(work_passed: bool, result: Option<&SessionResult>) -> Self {
        if !work_passed {
            return Self::Fail;
        }

        match result {
            Some(result) if result.is_complete() => Self::Success,
            _ => Self::Skip,
        }
    }
}
