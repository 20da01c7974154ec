//! Applying caller attributes and deltas onto a resource model.
//!
//! The applier only moves values; it never fetches remote state and never
//! fills in values the caller did not send. Attribute names are expected to
//! have been validated against the published schema, so a name the registry
//! does not know is reported as [`ConnectorError::UnknownAttribute`].

use crate::error::{ConnectorError, ConnectorResult};
use crate::model::ResourceModel;
use crate::objects::{Attribute, AttributeDelta, AttributeValue};
use crate::schema::{AttributeInfo, Mapping, SchemaDefinition};
use log::{debug, trace};

/// Build a create payload from the caller's attributes.
///
/// Attributes absent from `attributes` leave their fields untouched.
/// Attributes declared not-creatable are skipped.
pub fn apply_create<M: ResourceModel>(
    schema: &SchemaDefinition<M>,
    attributes: &[Attribute],
    mut model: M,
) -> ConnectorResult<M> {
    for attribute in attributes {
        let entry = schema.lookup(&attribute.name)?;
        if !entry.info.creatable {
            debug!(
                "Skipping not-creatable attribute '{}' on {} create",
                attribute.name,
                schema.object_class()
            );
            continue;
        }
        check_types(&entry.info, &attribute.values)?;

        match &entry.mapping {
            Mapping::Single(mapper) => {
                let value = single_value(&entry.info, &attribute.values)?;
                mapper.create(value, &mut model).map_err(|e| annotate(&entry.info, e))?;
            }
            Mapping::Multi(mapper) => {
                mapper.replace(to_strings(&entry.info, &attribute.values)?, &mut model);
            }
        }
        trace!("Applied '{}' to {} create", attribute.name, schema.object_class());
    }
    Ok(model)
}

/// Build an update payload from the caller's deltas.
///
/// An empty replacement list clears a single-valued attribute. For
/// association attributes each present operand list is recorded separately
/// so the reconciler can merge them with the remote state. A delta with no
/// operand list is a no-op.
pub fn apply_delta<M: ResourceModel>(
    schema: &SchemaDefinition<M>,
    deltas: &[AttributeDelta],
    mut model: M,
) -> ConnectorResult<M> {
    for delta in deltas {
        let entry = schema.lookup(&delta.name)?;
        if !entry.info.updatable {
            return Err(ConnectorError::invalid(format!(
                "Attribute '{}' of {} cannot be updated",
                delta.name,
                schema.object_class()
            )));
        }

        match &entry.mapping {
            Mapping::Single(mapper) => {
                if delta.values_to_add.is_some() || delta.values_to_remove.is_some() {
                    return Err(ConnectorError::invalid(format!(
                        "Attribute '{}' of {} is single-valued",
                        delta.name,
                        schema.object_class()
                    )));
                }
                let Some(values) = &delta.values_to_replace else {
                    continue;
                };
                check_types(&entry.info, values)?;
                let value = single_value(&entry.info, values)?;
                mapper.delta(value, &mut model).map_err(|e| annotate(&entry.info, e))?;
            }
            Mapping::Multi(mapper) => {
                if let Some(values) = &delta.values_to_replace {
                    check_types(&entry.info, values)?;
                    mapper.replace(to_strings(&entry.info, values)?, &mut model);
                }
                if let Some(values) = non_empty(&delta.values_to_add) {
                    check_types(&entry.info, values)?;
                    mapper.add(to_strings(&entry.info, values)?, &mut model);
                }
                if let Some(values) = non_empty(&delta.values_to_remove) {
                    check_types(&entry.info, values)?;
                    mapper.remove(to_strings(&entry.info, values)?, &mut model);
                }
            }
        }
        trace!("Applied delta '{}' to {}", delta.name, schema.object_class());
    }
    Ok(model)
}

fn non_empty(values: &Option<Vec<AttributeValue>>) -> Option<&Vec<AttributeValue>> {
    values.as_ref().filter(|v| !v.is_empty())
}

fn check_types(info: &AttributeInfo, values: &[AttributeValue]) -> ConnectorResult<()> {
    match values.iter().find(|v| !info.attribute_type.accepts(v)) {
        Some(value) => Err(ConnectorError::invalid(format!(
            "Attribute '{}' expects {} values, got {:?}",
            info.name,
            info.attribute_type.as_str(),
            value
        ))),
        None => Ok(()),
    }
}

fn single_value<'a>(
    info: &AttributeInfo,
    values: &'a [AttributeValue],
) -> ConnectorResult<Option<&'a AttributeValue>> {
    match values {
        [] => Ok(None),
        [value] => Ok(Some(value)),
        _ => Err(ConnectorError::invalid(format!(
            "Attribute '{}' accepts a single value, got {}",
            info.name,
            values.len()
        ))),
    }
}

fn to_strings(info: &AttributeInfo, values: &[AttributeValue]) -> ConnectorResult<Vec<String>> {
    values
        .iter()
        .map(|v| {
            v.as_str().map(str::to_string).ok_or_else(|| {
                ConnectorError::invalid(format!("Attribute '{}' expects string values", info.name))
            })
        })
        .collect()
}

fn annotate(info: &AttributeInfo, err: ConnectorError) -> ConnectorError {
    match err {
        ConnectorError::InvalidAttributeValue { message } => {
            ConnectorError::invalid(format!("{}: {}", info.name, message))
        }
        other => other,
    }
}
