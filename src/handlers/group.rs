//! Group schema.

use crate::error::ConnectorResult;
use crate::model::GroupModel;
use crate::schema::{AttributeFlag, AttributeInfo, AttributeType, SchemaDefinition, TextField};

pub fn group_schema() -> ConnectorResult<SchemaDefinition<GroupModel>> {
    SchemaDefinition::<GroupModel>::builder()
        .uid("groupId", AttributeType::StringCaseIgnore)
        .name("code", AttributeType::StringCaseIgnore, &[])
        // Static or dynamic; the backend does not report it back.
        .add(
            AttributeInfo::new("type", AttributeType::String).flags(&[
                AttributeFlag::Required,
                AttributeFlag::NotUpdatable,
                AttributeFlag::NotReadable,
                AttributeFlag::NotReturnedByDefault,
            ]),
            TextField::plain(|m: &GroupModel| &m.group_type, |m| &mut m.group_type),
        )
        .add(
            AttributeInfo::new("name", AttributeType::String).flags(&[AttributeFlag::Required]),
            TextField::plain(|m: &GroupModel| &m.name, |m| &mut m.name),
        )
        .add(
            AttributeInfo::new("description", AttributeType::String),
            TextField::clearable(|m: &GroupModel| &m.description, |m| &mut m.description),
        )
        .build()
}
