//! Generic REST plumbing for the enrollment API.
//!
//! Each entity implements [`Resource`]; [`ResourceRequests`] turns it into
//! request descriptors, [`ResourceClient`] executes them over a
//! [`Transport`], and [`PaginatedResource`] keeps the list/pagination/notice
//! bookkeeping a table screen needs.

pub mod client;
pub mod entities;
pub mod notice;
pub mod pagination;
pub mod request;
pub mod transport;

#[cfg(test)]
mod tests;

pub use client::{execute, ClientError, ResourceClient};
pub use notice::{Notice, NoticeSeverity};
pub use pagination::{Page, PageQuery, PaginatedResource};
pub use request::{HttpMethod, RequestDescriptor, Resource, ResourceRequests};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};
