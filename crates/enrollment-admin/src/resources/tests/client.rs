use std::sync::Arc;

use serde_json::json;

use super::common::*;
use crate::resources::entities::{
    CandidateDocuments, Cities, CityDraft, DocumentReview, DocumentStatus, ExamLocations, Users,
};
use crate::resources::{
    ClientError, HttpMethod, PageQuery, ResourceClient, ResourceRequests, TransportError,
};
use crate::workflows::scheduling::LocationId;

#[test]
fn list_descriptor_carries_pagination_and_trimmed_search() {
    let query = PageQuery {
        page: 3,
        per_page: 25,
        search: Some("  campinas ".to_string()),
    };
    let request = ResourceRequests::<Cities>::list(&query);

    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.path, "/cities");
    assert_eq!(query_value(&request, "page"), Some("3"));
    assert_eq!(query_value(&request, "per_page"), Some("25"));
    assert_eq!(query_value(&request, "search"), Some("campinas"));
    assert!(request.body.is_none());
}

#[test]
fn blank_search_is_not_sent() {
    let query = PageQuery {
        search: Some("   ".to_string()),
        ..PageQuery::default()
    };
    let request = ResourceRequests::<Users>::list(&query);
    assert_eq!(query_value(&request, "search"), None);
}

#[test]
fn member_descriptors_use_record_ids() {
    let draft = CityDraft {
        name: "Sorocaba".to_string(),
        state: "SP".to_string(),
    };
    let update = ResourceRequests::<Cities>::update(&42, &draft).expect("encodes");
    assert_eq!(update.method, HttpMethod::Put);
    assert_eq!(update.path, "/cities/42");
    assert_eq!(update.body, Some(json!({ "name": "Sorocaba", "state": "SP" })));

    let delete = ResourceRequests::<ExamLocations>::delete(&LocationId::new("loc-7"));
    assert_eq!(delete.method, HttpMethod::Delete);
    assert_eq!(delete.path, "/exam-locations/loc-7");
}

#[tokio::test]
async fn list_accepts_wrapped_and_bare_payloads() {
    let transport = Arc::new(StubTransport::default());
    let client = ResourceClient::<Users, _>::new(transport.clone());

    transport.push_json(200, users_page(&[1, 2], 12));
    let page = client.list(&PageQuery::first(2)).await.expect("wrapped page");
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 12);
    assert_eq!(page.page_count(), 6);

    transport.push_json(200, json!([user_json(9)]));
    let page = client.list(&PageQuery::first(10)).await.expect("bare page");
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, 9);
    assert!(page.items[0].active);
}

#[tokio::test]
async fn error_status_keeps_server_message() {
    let transport = Arc::new(StubTransport::default());
    let client = ResourceClient::<CandidateDocuments, _>::new(transport.clone());
    transport.push_json(422, json!({ "message": "Document already reviewed" }));

    let review = DocumentReview {
        status: DocumentStatus::Approved,
        review_note: None,
    };
    let err = client.update(&5, &review).await.expect_err("rejected");

    assert_eq!(err.status(), Some(422));
    assert_eq!(
        err.to_string(),
        "enrollment API answered 422: Document already reviewed"
    );
    let sent = transport.requests();
    assert_eq!(sent[0].body, Some(json!({ "status": "approved" })));
}

#[tokio::test]
async fn delete_accepts_no_content() {
    let transport = Arc::new(StubTransport::default());
    let client = ResourceClient::<Cities, _>::new(transport.clone());
    transport.push_empty(204);

    client.delete(&3).await.expect("delete succeeds");
    assert_eq!(transport.requests()[0].path, "/cities/3");
}

#[tokio::test]
async fn transport_failures_surface_as_client_errors() {
    let transport = Arc::new(StubTransport::default());
    let client = ResourceClient::<Cities, _>::new(transport.clone());
    transport.push_error(TransportError::Timeout);

    let err = client.get(&1).await.expect_err("timeout");
    assert!(matches!(err, ClientError::Transport(TransportError::Timeout)));

    transport.push_json(200, json!({ "unexpected": true }));
    let err = client.get(&1).await.expect_err("bad payload");
    assert!(matches!(err, ClientError::Payload(_)));
}
