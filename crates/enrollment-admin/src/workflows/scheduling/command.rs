use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::LocationId;
use super::hours::HourOfDay;

/// Serializable form of every wizard mutation, applied through
/// [`ScheduleSelection::apply`](super::ScheduleSelection::apply).
///
/// `AddCustomHour` carries the raw string so malformed hours reach the state
/// model and are dropped there instead of failing request decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScheduleCommand {
    ToggleDate {
        date: NaiveDate,
    },
    ToggleDefaultHour {
        hour: HourOfDay,
    },
    SelectLocation {
        #[serde(default)]
        local_id: Option<LocationId>,
    },
    BeginCustomizing {
        date: NaiveDate,
    },
    SetCustomHours {
        date: NaiveDate,
        hours: Vec<HourOfDay>,
    },
    UseDefaultHours {
        date: NaiveDate,
    },
    AddCustomHour {
        date: NaiveDate,
        hour: String,
    },
    RemoveCustomHour {
        date: NaiveDate,
        hour: HourOfDay,
    },
    NextStep,
    PreviousStep,
}
