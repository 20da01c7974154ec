//! Filters, projections and pagination.

use crate::common::*;
use kintone_connector::objects::{AttributeValue, NAME_NAME, UID_NAME};
use kintone_connector::transport::{HttpResponse, Method, MockTransport};
use kintone_connector::{ConnectorObject, EqualsFilter, Filter, ObjectClass, OperationOptions, Uid};
use serde_json::json;

fn user_record(id: &str, code: &str) -> serde_json::Value {
    json!({
        "id": id,
        "code": code,
        "name": code.to_uppercase(),
        "email": format!("{}@example.com", code),
        "valid": true,
        "sortOrder": "3",
        "ctime": "2024-01-02T03:04:05Z",
        "mtime": "2024-01-02T03:04:05Z"
    })
}

#[tokio::test]
async fn test_explicit_page_with_no_records() {
    let mock = MockTransport::new();
    mock.respond(Method::Get, &url("groups.json"), records("groups", json!([])))
        .await;

    let mut found = Vec::new();
    let result = connector(&mock)
        .execute_query(
            ObjectClass::Group,
            None,
            |o| {
                found.push(o);
                true
            },
            &OperationOptions::new()
                .with_page_size(20)
                .with_paged_results_offset(1),
        )
        .await
        .unwrap();

    assert_eq!(result.handled, 0);
    assert_eq!(result.remaining_paged_results, Some(-20));
    assert!(found.is_empty());

    let requests = mock.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(query(&requests[0], "offset"), Some("0"));
    assert_eq!(query(&requests[0], "size"), Some("20"));
}

#[tokio::test]
async fn test_oversized_page_is_clamped_for_request_and_remaining_count() {
    let mock = MockTransport::new();
    let groups: Vec<_> = (1..=100)
        .map(|i| json!({"id": i.to_string(), "code": format!("group{}", i), "name": "G"}))
        .collect();
    mock.respond(Method::Get, &url("groups.json"), records("groups", json!(groups)))
        .await;

    let result = connector(&mock)
        .execute_query(
            ObjectClass::Group,
            None,
            |_| true,
            &OperationOptions::new()
                .with_page_size(500)
                .with_paged_results_offset(1),
        )
        .await
        .unwrap();

    assert_eq!(result.handled, 100);
    assert_eq!(result.remaining_paged_results, Some(0));

    let requests = mock.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(query(&requests[0], "size"), Some("100"));
}

#[tokio::test]
async fn test_full_scan_stops_on_short_page() {
    let mock = MockTransport::new();
    mock.respond_to_query(
        Method::Get,
        &url("users.json"),
        &[("offset", "0")],
        records("users", json!([user_record("1", "a"), user_record("2", "b")])),
    )
    .await;
    mock.respond_to_query(
        Method::Get,
        &url("users.json"),
        &[("offset", "2")],
        records("users", json!([user_record("3", "c")])),
    )
    .await;

    let mut names = Vec::new();
    let result = connector(&mock)
        .execute_query(
            ObjectClass::User,
            None,
            |o| {
                names.push(o.name.value().to_string());
                true
            },
            &OperationOptions::new().with_page_size(2),
        )
        .await
        .unwrap();

    assert_eq!(result.handled, 3);
    assert_eq!(result.remaining_paged_results, None);
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(mock.requests().await.len(), 2);
}

#[tokio::test]
async fn test_handler_can_stop_the_scan() {
    let mock = MockTransport::new();
    mock.respond(
        Method::Get,
        &url("users.json"),
        records("users", json!([user_record("1", "a"), user_record("2", "b")])),
    )
    .await;

    let result = connector(&mock)
        .execute_query(
            ObjectClass::User,
            None,
            |_| false,
            &OperationOptions::new().with_page_size(2),
        )
        .await
        .unwrap();

    assert_eq!(result.handled, 1);
    assert_eq!(mock.requests().await.len(), 1);
}

#[tokio::test]
async fn test_default_projection_reads_local_fields_only() {
    let mock = MockTransport::new();
    mock.respond_to_query(
        Method::Get,
        &url("users.json"),
        &[("ids", "1")],
        records("users", json!([user_record("1", "foo")])),
    )
    .await;

    let mut found: Vec<ConnectorObject> = Vec::new();
    connector(&mock)
        .execute_query(
            ObjectClass::User,
            Some(&Filter::ByUid(Uid::new("1"))),
            |o| {
                found.push(o);
                true
            },
            &OperationOptions::new(),
        )
        .await
        .unwrap();

    let user = &found[0];
    assert_eq!(user.uid, Uid::with_name("1", "foo"));
    assert_eq!(user.name.value(), "foo");
    assert_eq!(
        user.attribute("email").unwrap().values,
        vec![AttributeValue::from("foo@example.com")]
    );
    assert_eq!(
        user.attribute("sortOrder").unwrap().values,
        vec![AttributeValue::Integer(3)]
    );
    assert_eq!(
        user.attribute("__ENABLE__").unwrap().values,
        vec![AttributeValue::Boolean(true)]
    );
    assert!(user.attribute("ctime").unwrap().first_value().unwrap().as_datetime().is_some());
    assert!(user.attribute("groups").is_none());
    assert!(user.attribute("__PASSWORD__").is_none());
    assert!(user.attribute("phone").is_none());
    assert_eq!(mock.requests().await.len(), 1);
}

#[tokio::test]
async fn test_requested_groups_are_fetched_and_filtered() {
    let mock = MockTransport::new();
    respond_to_code(&mock, "users", "foo", user_record("1", "foo")).await;
    mock.respond(
        Method::Get,
        &url("user/groups.json"),
        HttpResponse::json(
            200,
            &json!({"groups": [
                {"id": "1", "code": "everyone"},
                {"id": "2", "code": "dev"},
                {"id": "3", "code": "hidden"}
            ]}),
        ),
    )
    .await;

    let mut config = test_config();
    config.ignore_group.insert("hidden".to_string());
    let filter = EqualsFilter::new(NAME_NAME, "foo").translate().unwrap();

    let mut found = Vec::new();
    connector_with(&mock, config)
        .execute_query(
            ObjectClass::User,
            Some(&filter),
            |o| {
                found.push(o);
                true
            },
            &OperationOptions::new().with_attributes_to_get(["groups", "email"]),
        )
        .await
        .unwrap();

    let user = &found[0];
    assert_eq!(
        user.attribute("groups").unwrap().values,
        vec![AttributeValue::from("dev")]
    );
    assert!(user.attribute("email").is_some());
    assert!(user.attribute("name").is_none());
}

#[tokio::test]
async fn test_partial_values_skip_association_fetches() {
    let mock = MockTransport::new();
    mock.respond(
        Method::Get,
        &url("users.json"),
        records("users", json!([user_record("1", "foo")])),
    )
    .await;

    let mut found = Vec::new();
    connector(&mock)
        .execute_query(
            ObjectClass::User,
            None,
            |o| {
                found.push(o);
                true
            },
            &OperationOptions::new()
                .with_return_default_attributes(true)
                .with_attributes_to_get(["organizations"])
                .with_allow_partial_attribute_values(true),
        )
        .await
        .unwrap();

    let organizations = found[0].attribute("organizations").unwrap();
    assert!(!organizations.complete);
    assert!(organizations.values.is_empty());
    assert!(found[0].attribute("email").is_some());
    assert_eq!(calls(&mock.requests().await), vec![(Method::Get, "users.json".to_string())]);
}

#[tokio::test]
async fn test_custom_items_are_read_back() {
    let mock = MockTransport::new();
    let mut record = user_record("1", "foo");
    record["customItemValues"] = json!([
        {"code": "custom1", "value": "x"},
        {"code": "custom2", "value": ""}
    ]);
    mock.respond(Method::Get, &url("users.json"), records("users", json!([record])))
        .await;

    let mut config = test_config();
    config.user_custom_item_schema = vec!["custom1".to_string(), "custom2".to_string()];

    let mut found = Vec::new();
    connector_with(&mock, config)
        .execute_query(
            ObjectClass::User,
            Some(&Filter::ByUid(Uid::new("1"))),
            |o| {
                found.push(o);
                true
            },
            &OperationOptions::new(),
        )
        .await
        .unwrap();

    assert_eq!(
        found[0].attribute("customItemValues.custom1").unwrap().values,
        vec![AttributeValue::from("x")]
    );
    assert!(found[0].attribute("customItemValues.custom2").is_none());
}

#[tokio::test]
async fn test_schema_lists_every_object_class() {
    let mock = MockTransport::new();
    let mut config = test_config();
    config.user_custom_item_schema = vec!["custom1".to_string()];
    let connector = connector_with(&mock, config);

    let schemas = connector.schema().await.unwrap();
    assert_eq!(schemas.attributes(ObjectClass::User).len(), 30);
    assert_eq!(schemas.attributes(ObjectClass::Organization).len(), 7);
    assert_eq!(schemas.attributes(ObjectClass::Group).len(), 5);
    assert!(
        schemas
            .attributes(ObjectClass::Group)
            .iter()
            .any(|a| a.name == UID_NAME && a.native_name == "groupId")
    );

    connector.dispose().await;
    assert!(mock.requests().await.is_empty());
}
