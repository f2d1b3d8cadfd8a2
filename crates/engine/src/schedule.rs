//! Calendar projection of a timeline.
//!
//! Stages are laid out back to back from a start date. The early track uses
//! each stage's lower estimate, the late track its upper estimate.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use timeline_core::{StageType, StructuredTimeline};

/// Days counted per month when a duration has a fractional part.
const DAYS_PER_MONTH: f64 = 30.0;

/// One stage placed on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledStage {
    /// Stage title
    pub title: String,
    /// Stage type
    pub stage_type: StageType,
    /// Start if every earlier stage runs short
    pub earliest_start: NaiveDate,
    /// End if this and every earlier stage run short
    pub earliest_end: NaiveDate,
    /// Start if every earlier stage runs long
    pub latest_start: NaiveDate,
    /// End if this and every earlier stage run long
    pub latest_end: NaiveDate,
}

/// Lay the stages of `timeline` out from `start`, in stage order.
///
/// Stages without an estimate take no time.
pub fn project_schedule(timeline: &StructuredTimeline, start: NaiveDate) -> Vec<ScheduledStage> {
    let mut early = start;
    let mut late = start;

    timeline
        .stages
        .iter()
        .map(|stage| {
            let (min, max) = timeline
                .duration_of(&stage.title)
                .map(|d| (d.duration_months_min, d.duration_months_max))
                .unwrap_or((0.0, 0.0));

            let earliest_start = early;
            let latest_start = late;
            early = add_months(early, min);
            late = add_months(late, max);

            ScheduledStage {
                title: stage.title.clone(),
                stage_type: stage.stage_type,
                earliest_start,
                earliest_end: early,
                latest_start,
                latest_end: late,
            }
        })
        .collect()
}

/// Add a possibly fractional number of months, saturating at the last representable date.
fn add_months(date: NaiveDate, months: f64) -> NaiveDate {
    if !(months > 0.0) {
        return date;
    }
    let whole = months.trunc();
    let days = ((months - whole) * DAYS_PER_MONTH).round();

    date.checked_add_months(Months::new(whole as u32))
        .and_then(|d| d.checked_add_days(Days::new(days as u64)))
        .unwrap_or(NaiveDate::MAX)
}
