use chrono::NaiveDate;
use enrollment_admin::config::UpstreamConfig;
use enrollment_admin::resources::{HttpTransport, TransportError};
use enrollment_admin::workflows::scheduling::{HourOfDay, HttpScheduleGateway};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn build_gateway(
    config: &UpstreamConfig,
) -> Result<HttpScheduleGateway<HttpTransport>, TransportError> {
    let transport = Arc::new(HttpTransport::new(config)?);
    Ok(HttpScheduleGateway::new(transport))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_hour(raw: &str) -> Result<HourOfDay, String> {
    HourOfDay::parse(raw).map_err(|err| err.to_string())
}

/// Per-date override given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CustomHoursArg {
    pub(crate) date: NaiveDate,
    pub(crate) hours: Vec<String>,
}

/// Parses `YYYY-MM-DD=HH:mm[,HH:mm...]`. Hours stay raw so the state model
/// applies its own validation when they are added.
pub(crate) fn parse_custom_hours(raw: &str) -> Result<CustomHoursArg, String> {
    let (date, hours) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected DATE=HH:mm[,HH:mm] but got '{raw}'"))?;
    let date = parse_date(date)?;
    let hours = hours
        .split(',')
        .map(str::trim)
        .filter(|hour| !hour.is_empty())
        .map(str::to_string)
        .collect();
    Ok(CustomHoursArg { date, hours })
}
