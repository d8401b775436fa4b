use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{LocationId, WizardStep};
use super::hours::HourOfDay;
use super::selection::ScheduleSelection;

/// Payload accepted by the external exam-schedule endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSubmission {
    pub local_id: LocationId,
    pub dates: Vec<ScheduledDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledDate {
    pub date: NaiveDate,
    pub hours: Vec<HourOfDay>,
}

/// One flattened `(location, date, hour)` slot, used for exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleSlotRow {
    pub local_id: String,
    pub date: NaiveDate,
    pub hour: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("select an exam location before submitting")]
    MissingLocation,
    #[error("select at least one exam date before submitting")]
    NoDates,
    #[error("{} has no exam hours; add an hour or revert it to the default hours", .0.format("%d/%m/%Y"))]
    DateWithoutHours(NaiveDate),
}

impl ScheduleSubmission {
    /// Resolves every selected day to its effective hours.
    pub fn from_selection(selection: &ScheduleSelection) -> Result<Self, SubmissionError> {
        let local_id = selection
            .local_id()
            .cloned()
            .ok_or(SubmissionError::MissingLocation)?;

        if selection.selected_date_count() == 0 {
            return Err(SubmissionError::NoDates);
        }

        let dates = selection
            .selected_dates()
            .map(|date| {
                let hours: Vec<HourOfDay> =
                    selection.hours_for_date(date).iter().copied().collect();
                if hours.is_empty() {
                    Err(SubmissionError::DateWithoutHours(date))
                } else {
                    Ok(ScheduledDate { date, hours })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { local_id, dates })
    }

    pub fn slot_count(&self) -> usize {
        self.dates.iter().map(|entry| entry.hours.len()).sum()
    }

    pub fn rows(&self) -> Vec<ScheduleSlotRow> {
        self.dates
            .iter()
            .flat_map(|entry| {
                entry.hours.iter().map(move |hour| ScheduleSlotRow {
                    local_id: self.local_id.0.clone(),
                    date: entry.date,
                    hour: hour.to_string(),
                })
            })
            .collect()
    }
}

/// Read model of a wizard session for API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleView {
    pub step: WizardStep,
    pub step_index: u8,
    pub step_label: &'static str,
    pub can_proceed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_id: Option<LocationId>,
    pub default_hours: Vec<HourOfDay>,
    pub dates: Vec<DateView>,
    pub dates_without_hours: Vec<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateView {
    pub date: NaiveDate,
    pub customized: bool,
    pub hours: Vec<HourOfDay>,
}

impl ScheduleView {
    pub fn of(selection: &ScheduleSelection) -> Self {
        let dates = selection
            .selected_dates()
            .map(|date| DateView {
                date,
                customized: selection.is_date_customized(date),
                hours: selection.hours_for_date(date).iter().copied().collect(),
            })
            .collect();

        Self {
            step: selection.step(),
            step_index: selection.step().index(),
            step_label: selection.step().label(),
            can_proceed: selection.can_proceed(),
            local_id: selection.local_id().cloned(),
            default_hours: selection.default_hours().iter().copied().collect(),
            dates,
            dates_without_hours: selection.dates_without_hours(),
        }
    }
}
