//! User schema.

use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, ConnectorResult};
use crate::model::UserModel;
use crate::objects::{AttributeValue, ENABLE_NAME, PASSWORD_NAME};
use crate::schema::{
    AssociationKind, AttributeFlag, AttributeInfo, AttributeMapper, AttributeType, BoolField,
    DateField, DateTimeField, IntegerField, MultiValuedMapper, SchemaBuilder, SchemaDefinition,
    SecretField, TextField,
};
use log::debug;

/// Prefix of the attributes backed by custom items.
pub const CUSTOM_ITEM_PREFIX: &str = "customItemValues.";

/// One custom item of a user, addressed by its code.
pub struct CustomItemField {
    code: String,
}

impl CustomItemField {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl AttributeMapper<UserModel> for CustomItemField {
    fn create(&self, value: Option<&AttributeValue>, model: &mut UserModel) -> ConnectorResult<()> {
        let value = match value {
            Some(value) => value
                .as_str()
                .ok_or_else(|| {
                    ConnectorError::invalid(format!("Expected a string value, got {:?}", value))
                })?
                .to_string(),
            None => String::new(),
        };
        model.set_custom_item(&self.code, value);
        Ok(())
    }

    fn read(&self, model: &UserModel) -> ConnectorResult<Option<AttributeValue>> {
        Ok(model
            .custom_item(&self.code)
            .filter(|v| !v.is_empty())
            .map(AttributeValue::from))
    }
}

macro_rules! text {
    ($builder:expr, $name:literal, $field:ident) => {
        $builder.add(
            AttributeInfo::new($name, AttributeType::String),
            TextField::clearable(|m: &UserModel| &m.$field, |m| &mut m.$field),
        )
    };
}

/// Build the user schema, including the configured custom items.
pub fn user_schema(config: &ConnectorConfig) -> ConnectorResult<SchemaDefinition<UserModel>> {
    let mut builder = SchemaDefinition::<UserModel>::builder()
        .uid("userId", AttributeType::StringCaseIgnore)
        .name("code", AttributeType::String, &[])
        .add(
            AttributeInfo::new(ENABLE_NAME, AttributeType::Boolean).native_name("valid"),
            BoolField::new(|m: &UserModel| &m.valid, |m| &mut m.valid),
        )
        .add(
            AttributeInfo::new(PASSWORD_NAME, AttributeType::GuardedString)
                .native_name("password")
                .flags(&[
                    AttributeFlag::Required,
                    AttributeFlag::NotReadable,
                    AttributeFlag::NotReturnedByDefault,
                ]),
            SecretField::new(|m: &mut UserModel| &mut m.password),
        )
        .add(
            AttributeInfo::new("name", AttributeType::String).flags(&[AttributeFlag::Required]),
            TextField::clearable(|m: &UserModel| &m.name, |m| &mut m.name),
        );

    builder = text!(builder, "surName", sur_name);
    builder = text!(builder, "givenName", given_name);
    builder = text!(builder, "surNameReading", sur_name_reading);
    builder = text!(builder, "givenNameReading", given_name_reading);
    builder = text!(builder, "localName", local_name);
    builder = text!(builder, "localNameLocale", local_name_locale);
    builder = text!(builder, "timezone", timezone);
    builder = text!(builder, "locale", locale);
    builder = text!(builder, "description", description);
    builder = text!(builder, "phone", phone);
    builder = text!(builder, "mobilePhone", mobile_phone);
    builder = text!(builder, "extensionNumber", extension_number);
    builder = text!(builder, "email", email);
    builder = text!(builder, "callto", callto);
    builder = text!(builder, "url", url);
    builder = text!(builder, "employeeNumber", employee_number);

    builder = builder
        .add(
            AttributeInfo::new("birthDate", AttributeType::Date),
            DateField::new(|m: &UserModel| &m.birth_date, |m| &mut m.birth_date),
        )
        .add(
            AttributeInfo::new("joinDate", AttributeType::Date),
            DateField::new(|m: &UserModel| &m.join_date, |m| &mut m.join_date),
        )
        .add(
            AttributeInfo::new("sortOrder", AttributeType::Integer),
            IntegerField::new(|m: &UserModel| &m.sort_order, |m| &mut m.sort_order),
        );

    builder = add_custom_items(builder, &config.user_custom_item_schema);

    builder
        .add_multiple(
            AttributeInfo::new("services", AttributeType::String)
                .flags(&[AttributeFlag::NotReturnedByDefault]),
            MultiValuedMapper::new(AssociationKind::Services, |m: &mut UserModel| &mut m.services),
        )
        .add_multiple(
            AttributeInfo::new("organizations", AttributeType::String)
                .flags(&[AttributeFlag::NotReturnedByDefault]),
            MultiValuedMapper::new(AssociationKind::Organizations, |m: &mut UserModel| {
                &mut m.organizations
            }),
        )
        .add_multiple(
            AttributeInfo::new("groups", AttributeType::String)
                .flags(&[AttributeFlag::NotReturnedByDefault]),
            MultiValuedMapper::new(AssociationKind::Groups, |m: &mut UserModel| &mut m.groups),
        )
        .add(
            AttributeInfo::new("ctime", AttributeType::DateTime)
                .flags(&[AttributeFlag::NotCreatable, AttributeFlag::NotUpdatable]),
            DateTimeField::new(|m: &UserModel| m.ctime.as_deref()),
        )
        .add(
            AttributeInfo::new("mtime", AttributeType::DateTime)
                .flags(&[AttributeFlag::NotCreatable, AttributeFlag::NotUpdatable]),
            DateTimeField::new(|m: &UserModel| m.mtime.as_deref()),
        )
        .build()
}

fn add_custom_items(
    mut builder: SchemaBuilder<UserModel>,
    codes: &[String],
) -> SchemaBuilder<UserModel> {
    for code in codes {
        debug!("Adding custom item '{}' to the user schema", code);
        builder = builder.add(
            AttributeInfo::new(format!("{}{}", CUSTOM_ITEM_PREFIX, code), AttributeType::String)
                .native_name("customItemValues"),
            CustomItemField::new(code.clone()),
        );
    }
    builder
}
