//! Request and response bodies of the kintone user API.

use crate::error::{ConnectorError, ConnectorResult};
use crate::model::ResourceModel;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wrap one record in its collection envelope, e.g. `{"users": [..]}`.
pub fn envelope<M: ResourceModel>(model: &M) -> ConnectorResult<Value> {
    let mut map = Map::new();
    map.insert(
        M::COLLECTION.to_string(),
        Value::Array(vec![serde_json::to_value(model)?]),
    );
    Ok(Value::Object(map))
}

/// Extract the records of a collection envelope.
pub fn records<M: ResourceModel>(mut body: Value) -> ConnectorResult<Vec<M>> {
    let list = body
        .get_mut(M::COLLECTION)
        .map(Value::take)
        .ok_or_else(|| {
            ConnectorError::protocol(format!("Response has no '{}' array", M::COLLECTION))
        })?;
    serde_json::from_value(list).map_err(|e| {
        ConnectorError::protocol(format!("Invalid '{}' records: {}", M::COLLECTION, e))
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodesBody<T> {
    pub codes: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameCode {
    pub current_code: String,
    pub new_code: String,
}

/// `users/services.json` in both directions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserServicesBody {
    #[serde(default)]
    pub users: Vec<UserServices>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserServices {
    pub code: String,
    #[serde(default)]
    pub services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CodeRef {
    pub code: String,
}

/// Response of `user/organizations.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOrganizationsBody {
    #[serde(default)]
    pub organization_titles: Vec<OrganizationTitle>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationTitle {
    pub organization: CodeRef,
    #[serde(default)]
    pub title: Option<CodeRef>,
}

impl OrganizationTitle {
    /// `org` or `org<delimiter>title`.
    pub fn composite(&self, delimiter: &str) -> String {
        match &self.title {
            Some(title) => format!("{}{}{}", self.organization.code, delimiter, title.code),
            None => self.organization.code.clone(),
        }
    }
}

/// Request of `userOrganizations.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOrganizationsUpdate {
    pub user_organizations: Vec<UserOrganization>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserOrganization {
    pub code: String,
    pub organizations: Vec<OrganizationAssignment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationAssignment {
    pub org_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_code: Option<String>,
}

impl OrganizationAssignment {
    /// Split a composite code on the first delimiter.
    pub fn parse(composite: &str, delimiter: &str) -> Self {
        match composite.split_once(delimiter) {
            Some((org, title)) => Self {
                org_code: org.to_string(),
                title_code: Some(title.to_string()),
            },
            None => Self {
                org_code: composite.to_string(),
                title_code: None,
            },
        }
    }
}

/// Response of `user/groups.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserGroupsBody {
    #[serde(default)]
    pub groups: Vec<CodeRef>,
}

/// Request of `user/groups.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserGroupsUpdate {
    pub code: String,
    pub groups: Vec<String>,
}
