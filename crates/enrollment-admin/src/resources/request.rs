use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::pagination::PageQuery;

/// An entity exposed by the enrollment API as a REST collection.
pub trait Resource: Send + Sync + 'static {
    /// Collection path relative to the API base, e.g. `/users`.
    const COLLECTION: &'static str;
    /// Singular, lower-case name used in user-facing notices.
    const LABEL: &'static str;

    type Id: fmt::Display + Clone + Send + Sync;
    type Record: Serialize + DeserializeOwned + Clone + Send + Sync;
    type Draft: Serialize + Send + Sync;

    fn id(record: &Self::Record) -> Self::Id;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Transport-agnostic description of one API call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// Builds the request descriptors for one resource type.
pub struct ResourceRequests<R>(PhantomData<fn() -> R>);

impl<R: Resource> ResourceRequests<R> {
    pub fn list(query: &PageQuery) -> RequestDescriptor {
        let mut request = RequestDescriptor::new(HttpMethod::Get, R::COLLECTION)
            .with_query("page", query.page)
            .with_query("per_page", query.per_page);
        if let Some(term) = query.search_term() {
            request = request.with_query("search", term);
        }
        request
    }

    pub fn get(id: &R::Id) -> RequestDescriptor {
        RequestDescriptor::new(HttpMethod::Get, Self::member_path(id))
    }

    pub fn create(draft: &R::Draft) -> Result<RequestDescriptor, serde_json::Error> {
        RequestDescriptor::new(HttpMethod::Post, R::COLLECTION).with_json(draft)
    }

    pub fn update(id: &R::Id, draft: &R::Draft) -> Result<RequestDescriptor, serde_json::Error> {
        RequestDescriptor::new(HttpMethod::Put, Self::member_path(id)).with_json(draft)
    }

    pub fn delete(id: &R::Id) -> RequestDescriptor {
        RequestDescriptor::new(HttpMethod::Delete, Self::member_path(id))
    }

    fn member_path(id: &R::Id) -> String {
        format!("{}/{}", R::COLLECTION, id)
    }
}
