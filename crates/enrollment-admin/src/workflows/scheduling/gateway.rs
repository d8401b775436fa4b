use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::ExamLocation;
use super::submission::ScheduleSubmission;
use crate::resources::entities::ExamLocations;
use crate::resources::{
    execute, ClientError, HttpMethod, PageQuery, RequestDescriptor, ResourceClient, Transport,
};

const SCHEDULE_PATH: &str = "/exam-schedules";
const LOCATION_PAGE_SIZE: u32 = 500;

/// Acknowledgement returned by the schedule endpoint. Both fields are optional
/// because the endpoint may answer `204 No Content`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// External collaborators of the wizard: the location list and the save call.
#[async_trait]
pub trait ScheduleGateway: Send + Sync {
    async fn locations(&self) -> Result<Vec<ExamLocation>, ClientError>;
    async fn submit(&self, submission: &ScheduleSubmission)
        -> Result<SubmissionReceipt, ClientError>;
}

/// Gateway talking to the enrollment REST API.
pub struct HttpScheduleGateway<T: ?Sized> {
    transport: Arc<T>,
    locations: ResourceClient<ExamLocations, T>,
}

impl<T: Transport + ?Sized> HttpScheduleGateway<T> {
    pub fn new(transport: Arc<T>) -> Self {
        let locations = ResourceClient::new(transport.clone());
        Self {
            transport,
            locations,
        }
    }
}

#[async_trait]
impl<T: Transport + ?Sized> ScheduleGateway for HttpScheduleGateway<T> {
    /// Walks every page until the reported total is collected or the
    /// provider returns an empty page.
    async fn locations(&self) -> Result<Vec<ExamLocation>, ClientError> {
        let mut query = PageQuery::first(LOCATION_PAGE_SIZE);
        let mut locations = Vec::new();
        loop {
            let page = self.locations.list(&query).await?;
            let exhausted = page.items.is_empty();
            locations.extend(page.items);
            if exhausted || locations.len() as u64 >= page.total {
                break;
            }
            query.page += 1;
        }

        debug!(count = locations.len(), pages = query.page, "exam locations loaded");
        Ok(locations)
    }

    async fn submit(
        &self,
        submission: &ScheduleSubmission,
    ) -> Result<SubmissionReceipt, ClientError> {
        let request = RequestDescriptor::new(HttpMethod::Post, SCHEDULE_PATH).with_json(submission)?;
        let receipt: Option<SubmissionReceipt> = execute(&*self.transport, request).await?;
        Ok(receipt.unwrap_or_default())
    }
}
