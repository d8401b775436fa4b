use crate::infra::{parse_custom_hours, parse_date, parse_hour, CustomHoursArg};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use enrollment_admin::config::AppConfig;
use enrollment_admin::error::AppError;
use enrollment_admin::export::{self, ExportFormat};
use enrollment_admin::format::format_date_br;
use enrollment_admin::resources::entities::ExamLocations;
use enrollment_admin::resources::{HttpTransport, PageQuery, ResourceClient};
use enrollment_admin::workflows::scheduling::{
    HourOfDay, LocationId, ScheduleCommand, ScheduleSelection, ScheduleSubmission, ScheduleView,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Stateless description of a whole wizard run, used by the preview endpoint and CLI.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SchedulePreviewRequest {
    #[serde(default)]
    pub(crate) local_id: Option<LocationId>,
    #[serde(default)]
    pub(crate) dates: Vec<NaiveDate>,
    #[serde(default)]
    pub(crate) default_hours: Vec<HourOfDay>,
    /// Explicit overrides. Hours are raw strings; malformed ones are dropped.
    #[serde(default)]
    pub(crate) custom_hours: BTreeMap<NaiveDate, Vec<String>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SchedulePreviewResponse {
    pub(crate) state: ScheduleView,
    pub(crate) slot_count: usize,
    pub(crate) submission: ScheduleSubmission,
}

impl SchedulePreviewRequest {
    fn commands(&self) -> Vec<ScheduleCommand> {
        let mut commands = vec![ScheduleCommand::SelectLocation {
            local_id: self.local_id.clone(),
        }];

        let dates: BTreeSet<NaiveDate> = self.dates.iter().copied().collect();
        commands.extend(
            dates
                .into_iter()
                .map(|date| ScheduleCommand::ToggleDate { date }),
        );

        let hours: BTreeSet<HourOfDay> = self.default_hours.iter().copied().collect();
        commands.extend(
            hours
                .into_iter()
                .map(|hour| ScheduleCommand::ToggleDefaultHour { hour }),
        );

        for (date, hours) in &self.custom_hours {
            commands.push(ScheduleCommand::SetCustomHours {
                date: *date,
                hours: Vec::new(),
            });
            commands.extend(hours.iter().map(|hour| ScheduleCommand::AddCustomHour {
                date: *date,
                hour: hour.clone(),
            }));
        }

        commands
    }

    pub(crate) fn build_selection(&self) -> ScheduleSelection {
        let mut selection = ScheduleSelection::new();
        for command in self.commands() {
            selection.apply(command);
        }
        selection
    }
}

pub(crate) fn preview(request: &SchedulePreviewRequest) -> Result<SchedulePreviewResponse, AppError> {
    let selection = request.build_selection();
    let submission = ScheduleSubmission::from_selection(&selection)?;

    Ok(SchedulePreviewResponse {
        state: ScheduleView::of(&selection),
        slot_count: submission.slot_count(),
        submission,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum PreviewFormat {
    #[default]
    Text,
    Csv,
    Json,
}

#[derive(Args, Debug)]
pub(crate) struct SchedulePreviewArgs {
    /// Exam location id
    #[arg(long = "location")]
    pub(crate) local_id: String,
    /// Exam date (YYYY-MM-DD); repeat for several dates
    #[arg(long = "date", value_parser = parse_date, required = true)]
    pub(crate) dates: Vec<NaiveDate>,
    /// Default hour (HH:mm) for every date without an override; repeatable
    #[arg(long = "hour", value_parser = parse_hour)]
    pub(crate) default_hours: Vec<HourOfDay>,
    /// Per-date override as YYYY-MM-DD=HH:mm[,HH:mm]; repeatable
    #[arg(long = "custom", value_parser = parse_custom_hours)]
    pub(crate) custom: Vec<CustomHoursArg>,
    /// Output format
    #[arg(long, value_enum, default_value_t = PreviewFormat::Text)]
    pub(crate) format: PreviewFormat,
}

impl From<&SchedulePreviewArgs> for SchedulePreviewRequest {
    fn from(args: &SchedulePreviewArgs) -> Self {
        let mut custom_hours: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
        for entry in &args.custom {
            custom_hours
                .entry(entry.date)
                .or_default()
                .extend(entry.hours.iter().cloned());
        }

        Self {
            local_id: Some(LocationId::new(args.local_id.clone())),
            dates: args.dates.clone(),
            default_hours: args.default_hours.clone(),
            custom_hours,
        }
    }
}

pub(crate) fn run_schedule_preview(args: SchedulePreviewArgs) -> Result<(), AppError> {
    let request = SchedulePreviewRequest::from(&args);
    let response = preview(&request)?;

    match args.format {
        PreviewFormat::Text => render_preview(&response),
        PreviewFormat::Csv => {
            let rows = response.submission.rows();
            print!("{}", export::export_csv(&rows)?);
        }
        PreviewFormat::Json => {
            let document = export::export(ExportFormat::Json, "preview", &[&response.submission])?;
            println!("{}", document.body);
        }
    }

    Ok(())
}

fn render_preview(response: &SchedulePreviewResponse) {
    println!("Exam schedule preview");
    println!("Location: {}", response.submission.local_id);
    println!(
        "Default hours: {}",
        join_hours(response.state.default_hours.iter())
    );

    println!("\nDates");
    for entry in &response.state.dates {
        let marker = if entry.customized { " (custom)" } else { "" };
        println!(
            "- {}: {}{}",
            format_date_br(entry.date),
            join_hours(entry.hours.iter()),
            marker
        );
    }

    println!(
        "\n{} dates, {} exam slots",
        response.submission.dates.len(),
        response.slot_count
    );
}

fn join_hours<'a>(hours: impl Iterator<Item = &'a HourOfDay>) -> String {
    let rendered: Vec<String> = hours.map(ToString::to_string).collect();
    if rendered.is_empty() {
        "none".to_string()
    } else {
        rendered.join(", ")
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct LocationsArgs {
    /// Filter by name or address
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Page to show (1-based)
    #[arg(long, default_value_t = 1)]
    pub(crate) page: u32,
    /// Print the raw JSON records instead of a listing
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_locations(args: LocationsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let transport = Arc::new(HttpTransport::new(&config.upstream)?);
    let client = ResourceClient::<ExamLocations, _>::new(transport);

    let query = PageQuery {
        page: args.page.max(1),
        per_page: config.upstream.page_size,
        search: args.search,
    };
    let page = client.list(&query).await?;

    if args.json {
        println!("{}", export::export_json(&page.items)?);
        return Ok(());
    }

    if page.items.is_empty() {
        println!("No exam locations found");
        return Ok(());
    }

    println!(
        "Exam locations (page {} of {}, {} total)",
        page.page,
        page.page_count(),
        page.total
    );
    for location in &page.items {
        println!(
            "- {} | {} | {}",
            location.id, location.name, location.full_address
        );
    }
    Ok(())
}
