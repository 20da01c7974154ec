//! User lifecycle, associations and write ordering.

use crate::common::*;
use kintone_connector::objects::{GuardedString, NAME_NAME, PASSWORD_NAME};
use kintone_connector::transport::{HttpResponse, Method, MockTransport};
use kintone_connector::{Attribute, AttributeDelta, ObjectClass, OperationOptions, Uid};
use serde_json::json;

fn foo() -> Uid {
    Uid::with_name("1", "foo")
}

#[tokio::test]
async fn test_group_delta_merges_with_current_memberships() {
    let mock = MockTransport::new();
    mock.respond(
        Method::Get,
        &url("user/groups.json"),
        HttpResponse::json(
            200,
            &json!({"groups": [
                {"id": "3", "code": "group3", "name": "G3"},
                {"id": "4", "code": "group4", "name": "G4"},
                {"id": "5", "code": "group5", "name": "G5"}
            ]}),
        ),
    )
    .await;
    mock.respond(Method::Put, &url("user/groups.json"), ok()).await;

    connector(&mock)
        .update_delta(
            ObjectClass::User,
            &foo(),
            &[AttributeDelta::add_remove(
                "groups",
                ["group1", "group2"],
                ["group3", "group4"],
            )],
            &OperationOptions::new(),
        )
        .await
        .unwrap();

    let requests = mock.requests().await;
    assert_eq!(
        calls(&requests),
        vec![
            (Method::Get, "user/groups.json".to_string()),
            (Method::Put, "user/groups.json".to_string()),
        ]
    );
    assert_eq!(query(&requests[0], "code"), Some("foo"));
    assert_eq!(
        requests[1].body,
        Some(json!({"code": "foo", "groups": ["group5", "group1", "group2"]}))
    );
}

#[tokio::test]
async fn test_writes_are_ordered_and_rename_comes_last() {
    let mock = MockTransport::new();
    mock.respond(Method::Put, &url("users.json"), ok()).await;
    mock.respond(
        Method::Get,
        &url("users/services.json"),
        HttpResponse::json(200, &json!({"users": [{"code": "foo", "services": ["kintone"]}]})),
    )
    .await;
    mock.respond(Method::Put, &url("users/services.json"), ok()).await;
    mock.respond(
        Method::Get,
        &url("user/organizations.json"),
        HttpResponse::json(
            200,
            &json!({"organizationTitles": [
                {"organization": {"id": "1", "code": "sales"}, "title": {"id": "2", "code": "manager"}}
            ]}),
        ),
    )
    .await;
    mock.respond(Method::Put, &url("userOrganizations.json"), ok()).await;
    mock.respond(
        Method::Get,
        &url("user/groups.json"),
        HttpResponse::json(200, &json!({"groups": []})),
    )
    .await;
    mock.respond(Method::Put, &url("user/groups.json"), ok()).await;
    mock.respond(Method::Put, &url("users/codes.json"), ok()).await;

    connector(&mock)
        .update_delta(
            ObjectClass::User,
            &foo(),
            &[
                AttributeDelta::replace_single(NAME_NAME, "foo2"),
                AttributeDelta::add_remove("groups", ["dev"], Vec::<&str>::new()),
                AttributeDelta::add_remove("organizations", ["dev"], ["sales#manager"]),
                AttributeDelta::add_remove("services", ["garoon"], Vec::<&str>::new()),
                AttributeDelta::replace_single("email", "foo@example.com"),
            ],
            &OperationOptions::new(),
        )
        .await
        .unwrap();

    let requests = mock.requests().await;
    assert_eq!(
        calls(&requests),
        vec![
            (Method::Put, "users.json".to_string()),
            (Method::Get, "users/services.json".to_string()),
            (Method::Put, "users/services.json".to_string()),
            (Method::Get, "user/organizations.json".to_string()),
            (Method::Put, "userOrganizations.json".to_string()),
            (Method::Get, "user/groups.json".to_string()),
            (Method::Put, "user/groups.json".to_string()),
            (Method::Put, "users/codes.json".to_string()),
        ]
    );

    // Every call before the rename addresses the old code.
    assert_eq!(
        requests[0].body,
        Some(json!({"users": [{"code": "foo", "email": "foo@example.com"}]}))
    );
    assert_eq!(
        requests[2].body,
        Some(json!({"users": [{"code": "foo", "services": ["kintone", "garoon"]}]}))
    );
    assert_eq!(
        requests[4].body,
        Some(json!({"userOrganizations": [{"code": "foo", "organizations": [{"orgCode": "dev"}]}]}))
    );
    assert_eq!(
        requests[7].body,
        Some(json!({"codes": [{"currentCode": "foo", "newCode": "foo2"}]}))
    );
}

#[tokio::test]
async fn test_empty_association_delta_makes_no_calls() {
    let mock = MockTransport::new();

    connector(&mock)
        .update_delta(
            ObjectClass::User,
            &foo(),
            &[AttributeDelta {
                name: "groups".to_string(),
                ..Default::default()
            }],
            &OperationOptions::new(),
        )
        .await
        .unwrap();

    assert!(mock.requests().await.is_empty());
}

#[tokio::test]
async fn test_create_user_writes_memberships_without_fetching() {
    let mock = MockTransport::new();
    mock.respond(Method::Post, &url("users.json"), ok()).await;
    respond_to_code(&mock, "users", "foo", json!({"id": "7", "code": "foo", "name": "Foo"})).await;
    mock.respond(Method::Put, &url("users/services.json"), ok()).await;
    mock.respond(Method::Put, &url("user/groups.json"), ok()).await;

    let uid = connector(&mock)
        .create(
            ObjectClass::User,
            &[
                Attribute::single(NAME_NAME, "foo"),
                Attribute::single(PASSWORD_NAME, GuardedString::new("pw")),
                Attribute::single("name", "Foo"),
                Attribute::single("__ENABLE__", true),
                Attribute::strings("services", ["kintone"]),
                Attribute::strings("groups", ["dev", "ops"]),
            ],
        )
        .await
        .unwrap();

    assert_eq!(uid, Uid::with_name("7", "foo"));

    let requests = mock.requests().await;
    assert_eq!(
        calls(&requests),
        vec![
            (Method::Post, "users.json".to_string()),
            (Method::Get, "users.json".to_string()),
            (Method::Put, "users/services.json".to_string()),
            (Method::Put, "user/groups.json".to_string()),
        ]
    );
    assert_eq!(
        requests[0].body,
        Some(json!({"users": [{"code": "foo", "password": "pw", "name": "Foo", "valid": true}]}))
    );
    assert_eq!(
        requests[3].body,
        Some(json!({"code": "foo", "groups": ["dev", "ops"]}))
    );
}

#[tokio::test]
async fn test_clearing_sort_order_sends_empty_string() {
    let mock = MockTransport::new();
    mock.respond(Method::Put, &url("users.json"), ok()).await;

    connector(&mock)
        .update_delta(
            ObjectClass::User,
            &foo(),
            &[AttributeDelta::clear("sortOrder"), AttributeDelta::clear("birthDate")],
            &OperationOptions::new(),
        )
        .await
        .unwrap();

    let updates = mock.requests_to(Method::Put, &url("users.json")).await;
    assert_eq!(
        updates[0].body,
        Some(json!({"users": [{"code": "foo", "birthDate": "", "sortOrder": ""}]}))
    );
}

#[tokio::test]
async fn test_group_write_back_keeps_ignored_and_everyone() {
    let mock = MockTransport::new();
    mock.respond(
        Method::Get,
        &url("user/groups.json"),
        HttpResponse::json(
            200,
            &json!({"groups": [
                {"id": "1", "code": "everyone"},
                {"id": "2", "code": "hidden"},
                {"id": "3", "code": "dev"}
            ]}),
        ),
    )
    .await;
    mock.respond(Method::Put, &url("user/groups.json"), ok()).await;

    let mut config = test_config();
    config.ignore_group.insert("hidden".to_string());

    connector_with(&mock, config)
        .update_delta(
            ObjectClass::User,
            &foo(),
            &[AttributeDelta::add_remove("groups", ["new"], Vec::<&str>::new())],
            &OperationOptions::new(),
        )
        .await
        .unwrap();

    let updates = mock.requests_to(Method::Put, &url("user/groups.json")).await;
    assert_eq!(
        updates[0].body,
        Some(json!({"code": "foo", "groups": ["everyone", "hidden", "dev", "new"]}))
    );
}
