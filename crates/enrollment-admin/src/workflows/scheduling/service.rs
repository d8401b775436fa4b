use std::sync::Arc;

use axum::http::StatusCode;
use serde::Serialize;
use tracing::{info, warn};

use super::command::ScheduleCommand;
use super::domain::{ExamLocation, WizardStep};
use super::gateway::{ScheduleGateway, SubmissionReceipt};
use super::selection::ScheduleSelection;
use super::session::{SessionId, SessionStore, StoreError};
use super::submission::{ScheduleSubmission, ScheduleView, SubmissionError};
use crate::export::{self, ExportDocument, ExportError, ExportFormat};
use crate::resources::ClientError;

/// Hosts wizard runs server-side: every request loads the selection, applies
/// one named operation and stores it back.
pub struct ScheduleWizardService<S, G> {
    store: Arc<S>,
    gateway: Arc<G>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub changed: bool,
    pub state: ScheduleView,
}

impl<S, G> ScheduleWizardService<S, G>
where
    S: SessionStore + 'static,
    G: ScheduleGateway + 'static,
{
    pub fn new(store: Arc<S>, gateway: Arc<G>) -> Self {
        Self { store, gateway }
    }

    pub fn start(&self) -> Result<SessionSnapshot, WizardError> {
        let session_id = SessionId::generate();
        let selection = ScheduleSelection::new();
        let state = ScheduleView::of(&selection);
        self.store.insert(session_id.clone(), selection)?;
        info!(%session_id, "schedule wizard started");

        Ok(SessionSnapshot {
            session_id,
            changed: true,
            state,
        })
    }

    pub fn view(&self, session_id: &SessionId) -> Result<SessionSnapshot, WizardError> {
        let selection = self.load(session_id)?;
        Ok(SessionSnapshot {
            session_id: session_id.clone(),
            changed: false,
            state: ScheduleView::of(&selection),
        })
    }

    pub fn apply(
        &self,
        session_id: &SessionId,
        command: ScheduleCommand,
    ) -> Result<SessionSnapshot, WizardError> {
        let (changed, state) = self
            .store
            .update(session_id, |selection| {
                let changed = selection.apply(command);
                (changed, ScheduleView::of(selection))
            })?
            .ok_or_else(|| WizardError::UnknownSession(session_id.clone()))?;

        Ok(SessionSnapshot {
            session_id: session_id.clone(),
            changed,
            state,
        })
    }

    pub fn export(
        &self,
        session_id: &SessionId,
        format: ExportFormat,
    ) -> Result<ExportDocument, WizardError> {
        let selection = self.load(session_id)?;
        let submission = ScheduleSubmission::from_selection(&selection)?;
        let stem = format!("exam-schedule-{}", submission.local_id);
        Ok(export::export(format, &stem, &submission.rows())?)
    }

    pub async fn locations(&self) -> Result<Vec<ExamLocation>, WizardError> {
        let locations = self.gateway.locations().await?;
        Ok(locations)
    }

    /// Sends the schedule from the summary step. The session is claimed before
    /// the upstream call, so a concurrent submit sees it as unknown; it is put
    /// back when the schedule is rejected locally or by the upstream.
    pub async fn submit(&self, session_id: &SessionId) -> Result<SubmissionReceipt, WizardError> {
        let selection = self
            .store
            .take(session_id)?
            .ok_or_else(|| WizardError::UnknownSession(session_id.clone()))?;

        let submission = match Self::prepare(&selection) {
            Ok(submission) => submission,
            Err(err) => {
                self.store.insert(session_id.clone(), selection)?;
                return Err(err);
            }
        };

        let receipt = match self.gateway.submit(&submission).await {
            Ok(receipt) => receipt,
            Err(err) => {
                warn!(%session_id, error = %err, "schedule submission failed");
                self.store.insert(session_id.clone(), selection)?;
                return Err(err.into());
            }
        };

        info!(
            %session_id,
            local_id = %submission.local_id,
            dates = submission.dates.len(),
            slots = submission.slot_count(),
            "exam schedule submitted"
        );
        Ok(receipt)
    }

    pub fn discard(&self, session_id: &SessionId) -> Result<(), WizardError> {
        if self.store.discard(session_id)? {
            info!(%session_id, "schedule wizard discarded");
            Ok(())
        } else {
            Err(WizardError::UnknownSession(session_id.clone()))
        }
    }

    fn prepare(selection: &ScheduleSelection) -> Result<ScheduleSubmission, WizardError> {
        if selection.step() != WizardStep::Summary {
            return Err(WizardError::NotAtSummary);
        }
        Ok(ScheduleSubmission::from_selection(selection)?)
    }

    fn load(&self, session_id: &SessionId) -> Result<ScheduleSelection, WizardError> {
        self.store
            .fetch(session_id)?
            .ok_or_else(|| WizardError::UnknownSession(session_id.clone()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("schedule session '{0}' not found")]
    UnknownSession(SessionId),
    #[error("the schedule can only be submitted from the summary step")]
    NotAtSummary,
    #[error(transparent)]
    Incomplete(#[from] SubmissionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Gateway(#[from] ClientError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl WizardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownSession(_) => StatusCode::NOT_FOUND,
            Self::NotAtSummary => StatusCode::CONFLICT,
            Self::Incomplete(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Export(ExportError::UnknownFormat(_)) => StatusCode::BAD_REQUEST,
            Self::Gateway(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
