use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, TimeZone};

use super::command::ScheduleCommand;
use super::domain::{LocationId, WizardStep};
use super::hours::HourOfDay;

/// State owned by one run of the exam-scheduling wizard.
///
/// Dates without an entry in `custom_hours` resolve to `default_hours` when
/// read, so edits to the defaults reach every non-customized date without
/// copying. Every mutation goes through the methods below (or
/// [`ScheduleSelection::apply`]) so the custom-hours/selected-dates
/// invariant cannot be broken from outside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleSelection {
    selected_dates: BTreeSet<NaiveDate>,
    default_hours: BTreeSet<HourOfDay>,
    custom_hours: BTreeMap<NaiveDate, BTreeSet<HourOfDay>>,
    local_id: Option<LocationId>,
    step: WizardStep,
}

impl ScheduleSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or removes a calendar day. Removing a day also drops its override.
    /// Returns whether the day is selected afterwards.
    pub fn toggle_date(&mut self, date: NaiveDate) -> bool {
        if self.selected_dates.remove(&date) {
            self.custom_hours.remove(&date);
            false
        } else {
            self.selected_dates.insert(date);
            true
        }
    }

    /// Timestamp flavour of [`toggle_date`](Self::toggle_date); only the local calendar day counts.
    pub fn toggle_datetime<Tz: TimeZone>(&mut self, at: &DateTime<Tz>) -> bool {
        self.toggle_date(at.date_naive())
    }

    pub fn is_date_selected(&self, date: NaiveDate) -> bool {
        self.selected_dates.contains(&date)
    }

    /// Selected days in ascending order.
    pub fn selected_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.selected_dates.iter().copied()
    }

    pub fn selected_date_count(&self) -> usize {
        self.selected_dates.len()
    }

    /// Returns whether the hour is part of the defaults afterwards.
    pub fn toggle_default_hour(&mut self, hour: HourOfDay) -> bool {
        if self.default_hours.remove(&hour) {
            false
        } else {
            self.default_hours.insert(hour);
            true
        }
    }

    pub fn default_hours(&self) -> &BTreeSet<HourOfDay> {
        &self.default_hours
    }

    pub fn is_date_customized(&self, date: NaiveDate) -> bool {
        self.custom_hours.contains_key(&date)
    }

    /// Effective hours for a day: its override when present, the defaults otherwise.
    pub fn hours_for_date(&self, date: NaiveDate) -> &BTreeSet<HourOfDay> {
        self.custom_hours.get(&date).unwrap_or(&self.default_hours)
    }

    /// Installs an explicit override. Ignored for days that are not selected.
    pub fn set_custom_hours_for_date<I>(&mut self, date: NaiveDate, hours: I) -> bool
    where
        I: IntoIterator<Item = HourOfDay>,
    {
        if !self.selected_dates.contains(&date) {
            return false;
        }
        self.custom_hours.insert(date, hours.into_iter().collect());
        true
    }

    /// Starts customizing a day from a copy of the current defaults.
    /// An existing override is left untouched.
    pub fn begin_customizing(&mut self, date: NaiveDate) -> bool {
        if self.custom_hours.contains_key(&date) {
            return false;
        }
        let seed = self.default_hours.clone();
        self.set_custom_hours_for_date(date, seed)
    }

    /// Drops the override so the day tracks the defaults again.
    pub fn use_default_hours_for_date(&mut self, date: NaiveDate) -> bool {
        self.custom_hours.remove(&date).is_some()
    }

    /// Adds one hour to a day's override, creating an empty override first
    /// when the day has none. Malformed input and duplicates are no-ops.
    pub fn add_custom_hour_to_date(&mut self, date: NaiveDate, raw: &str) -> bool {
        if !self.selected_dates.contains(&date) {
            return false;
        }
        let Ok(hour) = HourOfDay::parse(raw) else {
            return false;
        };
        self.custom_hours.entry(date).or_default().insert(hour)
    }

    /// Removes one hour from a day's override. An override emptied this way
    /// stays in place; it does not fall back to the defaults.
    pub fn remove_custom_hour_from_date(&mut self, date: NaiveDate, hour: HourOfDay) -> bool {
        self.custom_hours
            .get_mut(&date)
            .map(|hours| hours.remove(&hour))
            .unwrap_or(false)
    }

    /// Selected days whose effective hour set is empty.
    pub fn dates_without_hours(&self) -> Vec<NaiveDate> {
        self.selected_dates
            .iter()
            .copied()
            .filter(|date| self.hours_for_date(*date).is_empty())
            .collect()
    }

    pub fn local_id(&self) -> Option<&LocationId> {
        self.local_id.as_ref()
    }

    pub fn select_location(&mut self, local_id: Option<LocationId>) {
        self.local_id = local_id.filter(|id| !id.is_blank());
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Gate for the "next" control. The summary step has no further gating.
    pub fn can_proceed(&self) -> bool {
        match self.step {
            WizardStep::Selection => {
                self.local_id.is_some()
                    && !self.selected_dates.is_empty()
                    && !self.default_hours.is_empty()
            }
            WizardStep::Summary => true,
        }
    }

    pub fn next_step(&mut self) -> bool {
        match self.step {
            WizardStep::Selection if self.can_proceed() => {
                self.step = WizardStep::Summary;
                true
            }
            _ => false,
        }
    }

    pub fn previous_step(&mut self) -> bool {
        match self.step {
            WizardStep::Summary => {
                self.step = WizardStep::Selection;
                true
            }
            WizardStep::Selection => false,
        }
    }

    /// Applies a command and reports whether the state changed.
    pub fn apply(&mut self, command: ScheduleCommand) -> bool {
        match command {
            ScheduleCommand::ToggleDate { date } => {
                self.toggle_date(date);
                true
            }
            ScheduleCommand::ToggleDefaultHour { hour } => {
                self.toggle_default_hour(hour);
                true
            }
            ScheduleCommand::SelectLocation { local_id } => {
                let before = self.local_id.clone();
                self.select_location(local_id);
                before != self.local_id
            }
            ScheduleCommand::BeginCustomizing { date } => self.begin_customizing(date),
            ScheduleCommand::SetCustomHours { date, hours } => {
                self.set_custom_hours_for_date(date, hours)
            }
            ScheduleCommand::UseDefaultHours { date } => self.use_default_hours_for_date(date),
            ScheduleCommand::AddCustomHour { date, hour } => {
                self.add_custom_hour_to_date(date, &hour)
            }
            ScheduleCommand::RemoveCustomHour { date, hour } => {
                self.remove_custom_hour_from_date(date, hour)
            }
            ScheduleCommand::NextStep => self.next_step(),
            ScheduleCommand::PreviousStep => self.previous_step(),
        }
    }
}
