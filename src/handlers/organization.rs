//! Organization schema.

use crate::error::ConnectorResult;
use crate::model::OrganizationModel;
use crate::schema::{AttributeFlag, AttributeInfo, AttributeType, SchemaDefinition, TextField};

pub fn organization_schema() -> ConnectorResult<SchemaDefinition<OrganizationModel>> {
    SchemaDefinition::<OrganizationModel>::builder()
        .uid("organizationId", AttributeType::StringCaseIgnore)
        .name("code", AttributeType::StringCaseIgnore, &[])
        .add(
            AttributeInfo::new("name", AttributeType::String).flags(&[AttributeFlag::Required]),
            TextField::plain(|m: &OrganizationModel| &m.name, |m| &mut m.name),
        )
        .add(
            AttributeInfo::new("localName", AttributeType::String),
            TextField::clearable(|m: &OrganizationModel| &m.local_name, |m| &mut m.local_name),
        )
        .add(
            AttributeInfo::new("localNameLocale", AttributeType::String),
            TextField::clearable(
                |m: &OrganizationModel| &m.local_name_locale,
                |m| &mut m.local_name_locale,
            ),
        )
        .add(
            AttributeInfo::new("parentCode", AttributeType::String),
            TextField::clearable(|m: &OrganizationModel| &m.parent_code, |m| &mut m.parent_code),
        )
        .add(
            AttributeInfo::new("description", AttributeType::String),
            TextField::clearable(|m: &OrganizationModel| &m.description, |m| &mut m.description),
        )
        .build()
}
