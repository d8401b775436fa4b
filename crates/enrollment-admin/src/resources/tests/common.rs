use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::resources::entities::Users;
use crate::resources::{
    PaginatedResource, RequestDescriptor, ResourceClient, Transport, TransportError,
    TransportResponse,
};

/// Replays queued responses and records every request it receives.
#[derive(Default)]
pub(super) struct StubTransport {
    pub(super) responses: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    pub(super) requests: Mutex<Vec<RequestDescriptor>>,
}

impl StubTransport {
    pub(super) fn push_json(&self, status: u16, body: Value) {
        self.responses
            .lock()
            .expect("stub mutex poisoned")
            .push_back(Ok(TransportResponse {
                status,
                body: serde_json::to_vec(&body).expect("json body"),
            }));
    }

    pub(super) fn push_empty(&self, status: u16) {
        self.responses
            .lock()
            .expect("stub mutex poisoned")
            .push_back(Ok(TransportResponse {
                status,
                body: Vec::new(),
            }));
    }

    pub(super) fn push_error(&self, error: TransportError) {
        self.responses
            .lock()
            .expect("stub mutex poisoned")
            .push_back(Err(error));
    }

    pub(super) fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().expect("stub mutex poisoned").clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<TransportResponse, TransportError> {
        self.requests
            .lock()
            .expect("stub mutex poisoned")
            .push(request);
        self.responses
            .lock()
            .expect("stub mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("no response queued".to_string())))
    }
}

pub(super) fn user_json(id: u64) -> Value {
    json!({
        "id": id,
        "name": format!("Operator {id}"),
        "email": format!("operator{id}@selecao.example.org"),
        "role": "operator"
    })
}

pub(super) fn users_page(ids: &[u64], total: u64) -> Value {
    json!({
        "data": ids.iter().map(|id| user_json(*id)).collect::<Vec<_>>(),
        "total": total
    })
}

pub(super) fn users_table(
    per_page: u32,
) -> (PaginatedResource<Users, StubTransport>, Arc<StubTransport>) {
    let transport = Arc::new(StubTransport::default());
    let client = ResourceClient::<Users, _>::new(transport.clone());
    (PaginatedResource::new(client, per_page), transport)
}

pub(super) fn query_value<'a>(request: &'a RequestDescriptor, key: &str) -> Option<&'a str> {
    request
        .query
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}
