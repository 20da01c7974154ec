//! Group lifecycle.

use crate::common::*;
use kintone_connector::objects::NAME_NAME;
use kintone_connector::transport::{Method, MockTransport};
use kintone_connector::{Attribute, AttributeDelta, ObjectClass, OperationOptions, Uid};
use serde_json::json;

#[tokio::test]
async fn test_create_group_returns_generated_id() {
    let mock = MockTransport::new();
    mock.respond(Method::Post, &url("groups.json"), ok()).await;
    respond_to_code(
        &mock,
        "groups",
        "foo",
        json!({"id": "1", "code": "foo", "name": "FOO", "description": "This is foo group."}),
    )
    .await;

    let uid = connector(&mock)
        .create(
            ObjectClass::Group,
            &[
                Attribute::single(NAME_NAME, "foo"),
                Attribute::single("name", "FOO"),
                Attribute::single("description", "This is foo group."),
            ],
        )
        .await
        .unwrap();

    assert_eq!(uid, Uid::with_name("1", "foo"));

    let posted = mock.requests_to(Method::Post, &url("groups.json")).await;
    assert_eq!(posted.len(), 1);
    assert_eq!(
        posted[0].body,
        Some(json!({"groups": [{
            "code": "foo",
            "name": "FOO",
            "description": "This is foo group."
        }]}))
    );
}

#[tokio::test]
async fn test_rename_only_update_issues_single_rename() {
    let mock = MockTransport::new();
    mock.respond(Method::Put, &url("groups/codes.json"), ok()).await;

    connector(&mock)
        .update_delta(
            ObjectClass::Group,
            &Uid::with_name("1", "foo"),
            &[AttributeDelta::replace_single(NAME_NAME, "bar")],
            &OperationOptions::new(),
        )
        .await
        .unwrap();

    let requests = mock.requests().await;
    assert_eq!(calls(&requests), vec![(Method::Put, "groups/codes.json".to_string())]);
    assert_eq!(
        requests[0].body,
        Some(json!({"codes": [{"currentCode": "foo", "newCode": "bar"}]}))
    );
}

#[tokio::test]
async fn test_update_resolves_code_from_id() {
    let mock = MockTransport::new();
    mock.respond_to_query(
        Method::Get,
        &url("groups.json"),
        &[("ids", "1")],
        records("groups", json!([{"id": "1", "code": "foo", "name": "FOO"}])),
    )
    .await;
    mock.respond(Method::Put, &url("groups.json"), ok()).await;

    connector(&mock)
        .update_delta(
            ObjectClass::Group,
            &Uid::new("1"),
            &[AttributeDelta::clear("description")],
            &OperationOptions::new(),
        )
        .await
        .unwrap();

    let updates = mock.requests_to(Method::Put, &url("groups.json")).await;
    assert_eq!(
        updates[0].body,
        Some(json!({"groups": [{"code": "foo", "description": ""}]}))
    );
}

#[tokio::test]
async fn test_delete_sends_code() {
    let mock = MockTransport::new();
    mock.respond(Method::Delete, &url("groups.json"), ok()).await;

    connector(&mock)
        .delete(ObjectClass::Group, &Uid::with_name("1", "foo"))
        .await
        .unwrap();

    let deletes = mock.requests_to(Method::Delete, &url("groups.json")).await;
    assert_eq!(deletes[0].body, Some(json!({"codes": ["foo"]})));
}

#[tokio::test]
async fn test_create_without_attributes_is_rejected() {
    let mock = MockTransport::new();
    let result = connector(&mock).create(ObjectClass::Group, &[]).await;
    assert!(matches!(
        result,
        Err(kintone_connector::ConnectorError::InvalidAttributeValue { .. })
    ));
    assert!(mock.requests().await.is_empty());
}
