use super::{Field, ResourceModel};
use crate::objects::ObjectClass;
use serde::{Deserialize, Serialize};

/// A group (role) record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupModel {
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub name: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unchanged")]
    pub description: Field<String>,
    /// `static` or `dynamic`; fixed at creation.
    #[serde(rename = "type", default, skip_serializing_if = "Field::is_unchanged")]
    pub group_type: Field<String>,

    #[serde(skip)]
    pub new_code: Option<String>,
}

impl ResourceModel for GroupModel {
    const OBJECT_CLASS: ObjectClass = ObjectClass::Group;
    const COLLECTION: &'static str = "groups";

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
        self.name.is_changed() || self.description.is_changed() || self.group_type.is_changed()
    }
}
