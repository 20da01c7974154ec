//! Response classification seen through the operation surface.

use crate::common::*;
use kintone_connector::objects::NAME_NAME;
use kintone_connector::transport::{HttpResponse, Method, MockTransport};
use kintone_connector::{
    Attribute, AttributeDelta, ConnectorError, Filter, ObjectClass, OperationOptions, Uid,
};
use serde_json::json;

fn group_attributes(code: &str) -> Vec<Attribute> {
    vec![
        Attribute::single(NAME_NAME, code),
        Attribute::single("name", code.to_uppercase()),
    ]
}

#[tokio::test]
async fn test_duplicate_create_is_a_conflict() {
    let mock = MockTransport::new();
    mock.respond(
        Method::Post,
        &url("groups.json"),
        code_error("groups", "The code already exists."),
    )
    .await;

    let err = connector(&mock)
        .create(ObjectClass::Group, &group_attributes("foo"))
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert!(matches!(err, ConnectorError::AlreadyExists { ref name, .. } if name == "foo"));
    // No read-back after a failed create.
    assert_eq!(mock.requests().await.len(), 1);
}

#[tokio::test]
async fn test_localized_conflict_phrases() {
    let mock = MockTransport::new();
    mock.respond(
        Method::Post,
        &url("users.json"),
        code_error("users", "指定したログイン名のユーザーはすでに登録されています。"),
    )
    .await;

    let err = connector(&mock)
        .create(ObjectClass::User, &group_attributes("foo"))
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_configured_phrases_extend_builtin_ones() {
    let mock = MockTransport::new();
    mock.respond(
        Method::Post,
        &url("groups.json"),
        code_error("groups", "Code is duplicated"),
    )
    .await;

    let err = connector(&mock)
        .create(ObjectClass::Group, &group_attributes("foo"))
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectorError::InvalidAttributeValue { .. }));

    let mut config = test_config();
    config.already_exists_phrases = vec!["is duplicated".to_string()];
    let err = connector_with(&mock, config)
        .create(ObjectClass::Group, &group_attributes("foo"))
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_rename_conflict_names_the_new_code() {
    let mock = MockTransport::new();
    mock.respond(
        Method::Put,
        &url("organizations/codes.json"),
        code_error("organizations", "already exists"),
    )
    .await;

    let err = connector(&mock)
        .update_delta(
            ObjectClass::Organization,
            &Uid::with_name("1", "sales"),
            &[AttributeDelta::replace_single(NAME_NAME, "dev")],
            &OperationOptions::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectorError::AlreadyExists { ref name, .. } if name == "dev"));
}

#[tokio::test]
async fn test_delete_of_vanished_object() {
    let mock = MockTransport::new();
    mock.respond(
        Method::Delete,
        &url("users.json"),
        code_error("users", "The specified user is not found."),
    )
    .await;

    let err = connector(&mock)
        .delete(ObjectClass::User, &Uid::with_name("1", "foo"))
        .await
        .unwrap_err();
    assert!(err.is_unknown_uid());
}

#[tokio::test]
async fn test_update_of_unknown_id_is_a_protocol_violation() {
    let mock = MockTransport::new();
    mock.respond(Method::Get, &url("groups.json"), records("groups", json!([])))
        .await;

    let err = connector(&mock)
        .update_delta(
            ObjectClass::Group,
            &Uid::new("99"),
            &[AttributeDelta::replace_single("name", "X")],
            &OperationOptions::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectorError::ProtocolViolation { .. }));
    // Nothing is written when the target cannot be resolved.
    assert_eq!(mock.requests().await.len(), 1);
}

#[tokio::test]
async fn test_bad_credentials_short_circuit() {
    let mock = MockTransport::new();
    mock.respond(
        Method::Get,
        &url("users.json"),
        HttpResponse::json(
            520,
            &json!({"code": "CB_WA01", "message": "Password authentication failed."}),
        ),
    )
    .await;

    let connector = connector(&mock);
    let err = connector
        .execute_query(ObjectClass::User, None, |_| true, &OperationOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectorError::AuthenticationFailed { .. }));

    let err = connector.test().await.unwrap_err();
    assert!(matches!(err, ConnectorError::AuthenticationFailed { .. }));
}

#[tokio::test]
async fn test_server_errors_are_transient() {
    let mock = MockTransport::new();
    mock.respond(
        Method::Get,
        &url("groups.json"),
        HttpResponse::new(503, "maintenance"),
    )
    .await;

    let err = connector(&mock)
        .execute_query(
            ObjectClass::Group,
            Some(&Filter::ByUid(Uid::new("1"))),
            |_| true,
            &OperationOptions::new(),
        )
        .await
        .unwrap_err();
    assert!(err.is_transient());
    assert!(err.to_string().contains("maintenance"));
}

#[tokio::test]
async fn test_failed_read_reports_status_and_body() {
    let mock = MockTransport::new();
    mock.respond(
        Method::Get,
        &url("groups.json"),
        HttpResponse::new(403, "forbidden"),
    )
    .await;

    let err = connector(&mock)
        .execute_query(
            ObjectClass::Group,
            Some(&Filter::ByUid(Uid::new("1"))),
            |_| true,
            &OperationOptions::new(),
        )
        .await
        .unwrap_err();
    match err {
        ConnectorError::Io { status, body, .. } => {
            assert_eq!(status, 403);
            assert_eq!(body, "forbidden");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_test() {
    let mock = MockTransport::new();
    mock.respond(Method::Get, &url("users.json"), records("users", json!([])))
        .await;
    connector(&mock).test().await.unwrap();

    mock.respond(Method::Get, &url("users.json"), HttpResponse::new(404, "no such domain"))
        .await;
    let err = connector(&mock).test().await.unwrap_err();
    assert!(matches!(
        err,
        ConnectorError::ConnectionFailed { ref message } if message.contains("404")
    ));
}
