//! Organization lifecycle.

use crate::common::*;
use kintone_connector::objects::NAME_NAME;
use kintone_connector::transport::{Method, MockTransport};
use kintone_connector::{Attribute, AttributeDelta, ObjectClass, OperationOptions, Uid};
use serde_json::json;

#[tokio::test]
async fn test_create_organization_under_parent() {
    let mock = MockTransport::new();
    mock.respond(Method::Post, &url("organizations.json"), ok()).await;
    respond_to_code(
        &mock,
        "organizations",
        "sales",
        json!({"id": "10", "code": "sales", "name": "Sales", "parentCode": "hq"}),
    )
    .await;

    let uid = connector(&mock)
        .create(
            ObjectClass::Organization,
            &[
                Attribute::single(NAME_NAME, "sales"),
                Attribute::single("name", "Sales"),
                Attribute::single("parentCode", "hq"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(uid.value(), "10");
    let posted = mock.requests_to(Method::Post, &url("organizations.json")).await;
    assert_eq!(
        posted[0].body,
        Some(json!({"organizations": [{"code": "sales", "name": "Sales", "parentCode": "hq"}]}))
    );
}

#[tokio::test]
async fn test_update_then_rename() {
    let mock = MockTransport::new();
    mock.respond(Method::Put, &url("organizations.json"), ok()).await;
    mock.respond(Method::Put, &url("organizations/codes.json"), ok()).await;

    connector(&mock)
        .update_delta(
            ObjectClass::Organization,
            &Uid::with_name("10", "sales"),
            &[
                AttributeDelta::replace_single(NAME_NAME, "sales-east"),
                AttributeDelta::replace_single("localName", "East"),
            ],
            &OperationOptions::new(),
        )
        .await
        .unwrap();

    let requests = mock.requests().await;
    assert_eq!(
        calls(&requests),
        vec![
            (Method::Put, "organizations.json".to_string()),
            (Method::Put, "organizations/codes.json".to_string()),
        ]
    );
    assert_eq!(
        requests[0].body,
        Some(json!({"organizations": [{"code": "sales", "localName": "East"}]}))
    );
}
