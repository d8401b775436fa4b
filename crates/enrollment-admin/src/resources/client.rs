use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

use super::pagination::{Page, PageQuery};
use super::request::{RequestDescriptor, Resource, ResourceRequests};
use super::transport::{Transport, TransportError};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("enrollment API answered {status}{}", message_suffix(.message))]
    Status { status: u16, message: Option<String> },
    #[error("unexpected payload from the enrollment API: {0}")]
    Payload(#[from] serde_json::Error),
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(text) => format!(": {text}"),
        None => String::new(),
    }
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "error", alias = "detail")]
    message: Option<String>,
}

/// Sends one request and decodes the JSON answer. An empty body decodes as
/// JSON `null`, so `()` and `Option<_>` targets accept `204 No Content`.
pub async fn execute<T, O>(transport: &T, request: RequestDescriptor) -> Result<O, ClientError>
where
    T: Transport + ?Sized,
    O: DeserializeOwned,
{
    let method = request.method.as_str();
    let path = request.path.clone();
    let response = transport.send(request).await?;

    if !response.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&response.body)
            .ok()
            .and_then(|body| body.message);
        warn!(method, %path, status = response.status, "enrollment api rejected request");
        return Err(ClientError::Status {
            status: response.status,
            message,
        });
    }

    let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &response.body
    };
    Ok(serde_json::from_slice(body)?)
}

/// Typed CRUD client for one resource collection.
pub struct ResourceClient<R, T: ?Sized> {
    transport: Arc<T>,
    _resource: PhantomData<fn() -> R>,
}

impl<R, T: ?Sized> Clone for ResourceClient<R, T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R, T> ResourceClient<R, T>
where
    R: Resource,
    T: Transport + ?Sized,
{
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            _resource: PhantomData,
        }
    }

    pub async fn list(&self, query: &PageQuery) -> Result<Page<R::Record>, ClientError> {
        let envelope: ListEnvelope<R::Record> =
            execute(&*self.transport, ResourceRequests::<R>::list(query)).await?;
        Ok(envelope.into_page(query))
    }

    pub async fn get(&self, id: &R::Id) -> Result<R::Record, ClientError> {
        execute(&*self.transport, ResourceRequests::<R>::get(id)).await
    }

    pub async fn create(&self, draft: &R::Draft) -> Result<R::Record, ClientError> {
        execute(&*self.transport, ResourceRequests::<R>::create(draft)?).await
    }

    pub async fn update(&self, id: &R::Id, draft: &R::Draft) -> Result<R::Record, ClientError> {
        execute(&*self.transport, ResourceRequests::<R>::update(id, draft)?).await
    }

    pub async fn delete(&self, id: &R::Id) -> Result<(), ClientError> {
        let _: Option<serde_json::Value> =
            execute(&*self.transport, ResourceRequests::<R>::delete(id)).await?;
        Ok(())
    }
}

/// List payloads come either wrapped (`{"data": [...], "total": n}`) or as a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListEnvelope<T> {
    Wrapped {
        #[serde(alias = "data", alias = "results")]
        items: Vec<T>,
        #[serde(default)]
        total: Option<u64>,
    },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    fn into_page(self, query: &PageQuery) -> Page<T> {
        let (items, total) = match self {
            Self::Wrapped { items, total } => {
                let total = total.unwrap_or(items.len() as u64);
                (items, total)
            }
            Self::Bare(items) => {
                let total = items.len() as u64;
                (items, total)
            }
        };

        Page {
            items,
            total,
            page: query.page,
            per_page: query.per_page,
        }
    }
}
