use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::resources::{ClientError, TransportError};
use crate::workflows::scheduling::{
    ExamLocation, InMemorySessionStore, LocationId, ScheduleCommand, ScheduleGateway,
    ScheduleSubmission, ScheduleWizardService, SessionId, SubmissionReceipt,
};

/// Gateway double that records submissions and can be told to fail.
#[derive(Default)]
pub(super) struct RecordingGateway {
    pub(super) submissions: Mutex<Vec<ScheduleSubmission>>,
    pub(super) fail_with_status: Mutex<Option<u16>>,
    pub(super) latency: Option<Duration>,
}

impl RecordingGateway {
    pub(super) fn failing(status: u16) -> Self {
        let gateway = Self::default();
        *gateway.fail_with_status.lock().expect("gateway mutex poisoned") = Some(status);
        gateway
    }

    /// Holds every submit for `latency` before answering.
    pub(super) fn slow(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    pub(super) fn submissions(&self) -> Vec<ScheduleSubmission> {
        self.submissions
            .lock()
            .expect("gateway mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl ScheduleGateway for RecordingGateway {
    async fn locations(&self) -> Result<Vec<ExamLocation>, ClientError> {
        if self
            .fail_with_status
            .lock()
            .expect("gateway mutex poisoned")
            .is_some()
        {
            return Err(ClientError::Transport(TransportError::Timeout));
        }
        Ok(vec![
            ExamLocation {
                id: LocationId::new("escola-central"),
                name: "Escola Estadual Central".to_string(),
                full_address: "Rua das Flores, 100 - Centro, Campinas - SP".to_string(),
            },
            ExamLocation {
                id: LocationId::new("campus-norte"),
                name: "Campus Norte".to_string(),
                full_address: "Av. Brasil, 2500 - Jardim Norte, Campinas - SP".to_string(),
            },
        ])
    }

    async fn submit(
        &self,
        submission: &ScheduleSubmission,
    ) -> Result<SubmissionReceipt, ClientError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(status) = *self.fail_with_status.lock().expect("gateway mutex poisoned") {
            return Err(ClientError::Status {
                status,
                message: None,
            });
        }
        self.submissions
            .lock()
            .expect("gateway mutex poisoned")
            .push(submission.clone());
        Ok(SubmissionReceipt {
            id: Some("sched-001".to_string()),
            message: None,
        })
    }
}

pub(super) type TestService = ScheduleWizardService<InMemorySessionStore, RecordingGateway>;

pub(super) fn build_service(
    gateway: RecordingGateway,
) -> (TestService, Arc<InMemorySessionStore>, Arc<RecordingGateway>) {
    let store = Arc::new(InMemorySessionStore::default());
    let gateway = Arc::new(gateway);
    let service = ScheduleWizardService::new(store.clone(), gateway.clone());
    (service, store, gateway)
}

pub(super) fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).expect("valid date")
}

pub(super) fn hour(raw: &str) -> crate::workflows::scheduling::HourOfDay {
    raw.parse().expect("valid hour")
}

/// Drives a fresh session to a state where "next" is allowed.
pub(super) fn ready_session(service: &TestService) -> SessionId {
    let snapshot = service.start().expect("session starts");
    let id = snapshot.session_id;
    for command in [
        ScheduleCommand::SelectLocation {
            local_id: Some(LocationId::new("escola-central")),
        },
        ScheduleCommand::ToggleDate { date: day(14) },
        ScheduleCommand::ToggleDate { date: day(15) },
        ScheduleCommand::ToggleDefaultHour {
            hour: hour("08:00"),
        },
        ScheduleCommand::AddCustomHour {
            date: day(15),
            hour: "13:30".to_string(),
        },
    ] {
        service.apply(&id, command).expect("command applies");
    }
    id
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
