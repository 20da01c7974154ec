use super::field::lenient_integer;
use super::{Field, MembershipDelta, ResourceModel};
use crate::objects::ObjectClass;
use serde::{Deserialize, Serialize};

/// A user record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserModel {
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing)]
    pub ctime: Option<String>,
    #[serde(default, skip_serializing)]
    pub mtime: Option<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub valid: Field<bool>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub password: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub name: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub sur_name: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub given_name: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub sur_name_reading: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub given_name_reading: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub local_name: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub local_name_locale: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub timezone: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub locale: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub description: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub phone: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub mobile_phone: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub extension_number: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub email: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub callto: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub url: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub employee_number: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub birth_date: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub join_date: Field<String>,
    /// Identifier of the user's primary organization.
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub primary_organization: Field<String>,
    #[serde(
        default,
        deserialize_with = "lenient_integer",
        skip_serializing_if = "Field::is_unchanged"
    )]
    pub sort_order: Field<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_item_values: Vec<CustomItemValue>,

    #[serde(skip)]
    pub new_code: Option<String>,
    #[serde(skip)]
    pub services: MembershipDelta,
    #[serde(skip)]
    pub organizations: MembershipDelta,
    #[serde(skip)]
    pub groups: MembershipDelta,
}

/// Value of one custom item on a user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomItemValue {
    pub code: String,
    #[serde(default)]
    pub value: String,
}

impl UserModel {
    /// Set a custom item, replacing any value queued earlier for the same code.
    pub fn set_custom_item(&mut self, code: &str, value: String) {
        match self.custom_item_values.iter_mut().find(|c| c.code == code) {
            Some(item) => item.value = value,
            None => self.custom_item_values.push(CustomItemValue {
                code: code.to_string(),
                value,
            }),
        }
    }

    pub fn custom_item(&self, code: &str) -> Option<&str> {
        self.custom_item_values
            .iter()
            .find(|c| c.code == code)
            .map(|c| c.value.as_str())
    }
}

impl ResourceModel for UserModel {
    const OBJECT_CLASS: ObjectClass = ObjectClass::User;
    const COLLECTION: &'static str = "users";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    fn set_code(&mut self, code: String) {
        self.code = Some(code);
    }

    fn new_code(&self) -> Option<&str> {
        self.new_code.as_deref()
    }

    fn set_new_code(&mut self, code: String) {
        self.new_code = Some(code);
    }

    fn has_attributes_change(&self) -> bool {
        self.valid.is_changed()
            || self.password.is_changed()
            || self.name.is_changed()
            || self.sur_name.is_changed()
            || self.given_name.is_changed()
            || self.sur_name_reading.is_changed()
            || self.given_name_reading.is_changed()
            || self.local_name.is_changed()
            || self.local_name_locale.is_changed()
            || self.timezone.is_changed()
            || self.locale.is_changed()
            || self.description.is_changed()
            || self.phone.is_changed()
            || self.mobile_phone.is_changed()
            || self.extension_number.is_changed()
            || self.email.is_changed()
            || self.callto.is_changed()
            || self.url.is_changed()
            || self.employee_number.is_changed()
            || self.birth_date.is_changed()
            || self.join_date.is_changed()
            || self.primary_organization.is_changed()
            || self.sort_order.is_changed()
            || !self.custom_item_values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_model_has_no_changes() {
        let user = UserModel::default();
        assert!(!user.has_attributes_change());
        assert!(!user.has_code_change());
        assert!(!user.groups.has_change());
    }

    #[test]
    fn test_custom_items_serialize_in_order() {
        let mut user = UserModel::default();
        user.set_custom_item("custom1", "a".to_string());
        user.set_custom_item("custom2", String::new());
        user.set_custom_item("custom1", "b".to_string());

        assert!(user.has_attributes_change());
        assert_eq!(user.custom_item("custom1"), Some("b"));
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({"customItemValues": [
                {"code": "custom1", "value": "b"},
                {"code": "custom2", "value": ""}
            ]})
        );
    }

    #[test]
    fn test_decode_fetched_user() {
        let user: UserModel = serde_json::from_value(json!({
            "id": "12345",
            "code": "foo",
            "ctime": "2021-01-01T00:00:00Z",
            "valid": true,
            "name": "Foo Bar",
            "sortOrder": "10",
            "customItemValues": [{"code": "custom1", "value": "x"}],
            "unknownField": 1
        }))
        .unwrap();

        assert_eq!(user.id(), Some("12345"));
        assert_eq!(user.valid, Field::Set(true));
        assert_eq!(user.sort_order, Field::Set(10));
        assert_eq!(user.custom_item("custom1"), Some("x"));
        assert!(user.email.is_unchanged());
    }

    #[test]
    fn test_read_only_fields_are_not_sent() {
        let user = UserModel {
            id: Some("1".to_string()),
            code: Some("foo".to_string()),
            ctime: Some("2021-01-01T00:00:00Z".to_string()),
            email: Field::Cleared,
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({"code": "foo", "email": ""})
        );
    }
}
