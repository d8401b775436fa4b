use serde_json::json;

use super::common::*;
use crate::resources::entities::UserDraft;
use crate::resources::{NoticeSeverity, TransportError};

fn draft() -> UserDraft {
    UserDraft {
        name: "Ana Souza".to_string(),
        email: "ana@selecao.example.org".to_string(),
        role: "manager".to_string(),
        cpf: Some("123.456.789-09".to_string()),
        phone: None,
    }
}

#[tokio::test]
async fn load_tracks_items_and_total() {
    let (mut table, transport) = users_table(5);
    transport.push_json(200, users_page(&[1, 2, 3, 4, 5], 13));

    assert!(table.load().await);
    assert_eq!(table.items().len(), 5);
    assert_eq!(table.total(), 13);
    assert_eq!(table.page_count(), 3);
    assert!(!table.is_loading());
    assert!(table.error().is_none());
}

#[tokio::test]
async fn go_to_page_clamps_to_known_range() {
    let (mut table, transport) = users_table(5);
    transport.push_json(200, users_page(&[1, 2, 3, 4, 5], 13));
    table.load().await;

    transport.push_json(200, users_page(&[11, 12, 13], 13));
    table.go_to_page(9).await;
    assert_eq!(table.query().page, 3);

    transport.push_json(200, users_page(&[1, 2, 3, 4, 5], 13));
    table.go_to_page(0).await;
    assert_eq!(table.query().page, 1);
}

#[tokio::test]
async fn search_resets_to_first_page() {
    let (mut table, transport) = users_table(5);
    transport.push_json(200, users_page(&[1, 2, 3, 4, 5], 13));
    table.load().await;
    transport.push_json(200, users_page(&[6, 7, 8, 9, 10], 13));
    table.go_to_page(2).await;

    transport.push_json(200, users_page(&[7], 1));
    table.search(" operator 7 ").await;

    assert_eq!(table.query().page, 1);
    assert_eq!(table.query().search.as_deref(), Some("operator 7"));
    let last = transport.requests().pop().expect("request sent");
    assert_eq!(query_value(&last, "search"), Some("operator 7"));
    assert_eq!(query_value(&last, "page"), Some("1"));
}

#[tokio::test]
async fn load_failure_sets_error_and_notice() {
    let (mut table, transport) = users_table(10);
    transport.push_error(TransportError::Connect("refused".to_string()));

    assert!(!table.load().await);
    assert_eq!(
        table.error(),
        Some("Unable to reach the server. Check your connection.")
    );
    let notice = table.take_notice().expect("notice raised");
    assert_eq!(notice.severity, NoticeSeverity::Error);
    assert!(table.notice().is_none());
}

#[tokio::test]
async fn create_reloads_and_announces_success() {
    let (mut table, transport) = users_table(10);
    transport.push_json(201, user_json(77));
    transport.push_json(200, users_page(&[77], 1));

    let created = table.create(&draft()).await.expect("created");
    assert_eq!(created.id, 77);
    assert_eq!(table.items().len(), 1);
    let notice = table.take_notice().expect("notice raised");
    assert_eq!(notice.severity, NoticeSeverity::Success);
    assert_eq!(notice.message, "User created.");
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn forbidden_update_maps_to_permission_notice() {
    let (mut table, transport) = users_table(10);
    transport.push_json(403, json!({ "error": "forbidden" }));

    assert!(table.update(&3, &draft()).await.is_none());
    assert_eq!(
        table.take_notice().map(|notice| notice.message),
        Some("You do not have permission to update this user.".to_string())
    );
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn deleting_last_row_steps_back_a_page() {
    let (mut table, transport) = users_table(5);
    transport.push_json(200, users_page(&[1, 2, 3, 4, 5], 6));
    table.load().await;
    transport.push_json(200, users_page(&[6], 6));
    table.go_to_page(2).await;
    assert_eq!(table.query().page, 2);

    transport.push_empty(204);
    transport.push_json(200, users_page(&[], 5));
    transport.push_json(200, users_page(&[1, 2, 3, 4, 5], 5));

    assert!(table.remove(&6).await);
    assert_eq!(table.query().page, 1);
    assert_eq!(table.items().len(), 5);
    assert_eq!(
        table.take_notice().map(|notice| notice.message),
        Some("User deleted.".to_string())
    );
}
