//! Immutable attribute registry for one object class.

use super::mapping::{
    AssociationKind, AttributeMapper, CodeField, IdField, Mapping, MultiValuedMapper,
};
use super::types::{AttributeFlag, AttributeInfo, AttributeType};
use crate::error::{ConnectorError, ConnectorResult};
use crate::model::ResourceModel;
use crate::objects::{NAME_NAME, ObjectClass, OperationOptions, UID_NAME};
use log::debug;
use std::collections::{HashMap, HashSet};

/// One declared attribute with its mapping strategy.
#[derive(Debug)]
pub struct SchemaEntry<M> {
    pub info: AttributeInfo,
    pub mapping: Mapping<M>,
}

/// The attributes of one object class, keyed by logical name.
///
/// Built once per schema request and never mutated afterwards.
#[derive(Debug)]
pub struct SchemaDefinition<M> {
    object_class: ObjectClass,
    entries: Vec<SchemaEntry<M>>,
    index: HashMap<String, usize>,
}

impl<M: ResourceModel> SchemaDefinition<M> {
    pub fn builder() -> SchemaBuilder<M> {
        SchemaBuilder {
            object_class: M::OBJECT_CLASS,
            entries: Vec::new(),
        }
    }

    pub fn object_class(&self) -> ObjectClass {
        self.object_class
    }

    /// All declared attributes in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeInfo> {
        self.entries.iter().map(|e| &e.info)
    }

    pub fn entries(&self) -> &[SchemaEntry<M>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SchemaEntry<M>> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Look up an attribute that the caller is expected to have validated.
    pub fn lookup(&self, name: &str) -> ConnectorResult<&SchemaEntry<M>> {
        self.get(name).ok_or_else(|| ConnectorError::UnknownAttribute {
            object_class: self.object_class,
            attribute: name.to_string(),
        })
    }

    /// Attributes returned when the caller does not ask for specific ones.
    pub fn returned_by_default(&self) -> impl Iterator<Item = &AttributeInfo> {
        self.attributes().filter(|a| a.returned_by_default)
    }

    /// Resolve which attributes a search returns and which remote fields it needs.
    ///
    /// Without either option the default attributes are returned. With
    /// "return default attributes" the explicit list is added to the defaults;
    /// otherwise an explicit list replaces them. Unknown names are ignored.
    pub fn attributes_to_get(&self, options: &OperationOptions) -> AttributesToGet {
        let return_defaults = options.return_default_attributes.unwrap_or(false);
        let mut requested: HashSet<&str> = HashSet::new();

        match &options.attributes_to_get {
            Some(names) => {
                if return_defaults {
                    requested.extend(self.returned_by_default().map(|a| a.name.as_str()));
                }
                for name in names {
                    if self.index.contains_key(name.as_str()) {
                        requested.insert(name.as_str());
                    } else {
                        debug!(
                            "Ignoring unknown attribute '{}' requested for {}",
                            name, self.object_class
                        );
                    }
                }
            }
            None => requested.extend(self.returned_by_default().map(|a| a.name.as_str())),
        }

        AttributesToGet {
            entries: self
                .attributes()
                .filter(|a| requested.contains(a.name.as_str()))
                .map(|a| (a.name.clone(), a.fetch_field().to_string()))
                .collect(),
        }
    }

    /// Split the requested attributes into local reads and remote fetches.
    ///
    /// Identifier and name are carried on the object itself and unreadable
    /// attributes are dropped. When partial values are allowed, associations
    /// are reported as incomplete instead of being fetched.
    pub fn plan_read(&self, to_get: &AttributesToGet, allow_partial: bool) -> ReadPlan {
        let mut steps = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            let info = &entry.info;
            if info.name == UID_NAME || info.name == NAME_NAME || !info.readable {
                continue;
            }
            if !to_get.contains(&info.name) {
                continue;
            }
            let step = match &entry.mapping {
                Mapping::Single(_) => ReadStep::Local(index),
                Mapping::Multi(_) if allow_partial => ReadStep::Incomplete(info.name.clone()),
                Mapping::Multi(mapper) => ReadStep::Fetch {
                    name: info.name.clone(),
                    kind: mapper.kind(),
                },
            };
            steps.push(step);
        }
        ReadPlan { steps }
    }
}

/// Requested attributes paired with the remote field each one needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributesToGet {
    entries: Vec<(String, String)>,
}

impl AttributesToGet {
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Distinct remote fields, in request order.
    pub fn fetch_fields(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|(_, f)| f.as_str())
            .filter(|f| seen.insert(*f))
            .collect()
    }

    pub fn fetch_field(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One step of building a connector object from a fetched record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadStep {
    /// Read from the record through the entry at this index.
    Local(usize),
    /// Fetch the association from its own endpoint.
    Fetch { name: String, kind: AssociationKind },
    /// Emit the attribute without values, marked incomplete.
    Incomplete(String),
}

/// Ordered read steps for one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadPlan {
    steps: Vec<ReadStep>,
}

impl ReadPlan {
    pub fn steps(&self) -> &[ReadStep] {
        &self.steps
    }

    /// Associations that cost a remote call per object.
    pub fn fetches(&self) -> impl Iterator<Item = AssociationKind> + '_ {
        self.steps.iter().filter_map(|s| match s {
            ReadStep::Fetch { kind, .. } => Some(*kind),
            _ => None,
        })
    }

    pub fn needs_fetch(&self) -> bool {
        self.fetches().next().is_some()
    }
}

/// Append-only builder for a [`SchemaDefinition`].
pub struct SchemaBuilder<M> {
    object_class: ObjectClass,
    entries: Vec<SchemaEntry<M>>,
}

impl<M: ResourceModel> SchemaBuilder<M> {
    /// Declare the identifier attribute, backed by the record's `id`.
    pub fn uid(mut self, native_name: &str, attribute_type: AttributeType) -> Self {
        let info = AttributeInfo::new(UID_NAME, attribute_type)
            .native_name(native_name)
            .fetch_from("id")
            .flags(&[AttributeFlag::NotCreatable, AttributeFlag::NotUpdatable]);
        self.entries.push(SchemaEntry {
            info,
            mapping: Mapping::Single(Box::new(IdField)),
        });
        self
    }

    /// Declare the name attribute, backed by the record's code.
    pub fn name(
        mut self,
        native_name: &str,
        attribute_type: AttributeType,
        flags: &[AttributeFlag],
    ) -> Self {
        let info = AttributeInfo::new(NAME_NAME, attribute_type)
            .native_name(native_name)
            .flags(flags)
            .flags(&[AttributeFlag::Required]);
        self.entries.push(SchemaEntry {
            info,
            mapping: Mapping::Single(Box::new(CodeField)),
        });
        self
    }

    pub fn add(mut self, info: AttributeInfo, mapper: impl AttributeMapper<M> + 'static) -> Self {
        self.entries.push(SchemaEntry {
            info,
            mapping: Mapping::Single(Box::new(mapper)),
        });
        self
    }

    pub fn add_multiple(mut self, info: AttributeInfo, mapper: MultiValuedMapper<M>) -> Self {
        self.entries.push(SchemaEntry {
            info: info.multi_valued(),
            mapping: Mapping::Multi(mapper),
        });
        self
    }

    /// Finish the registry.
    ///
    /// Fails when the identifier or name attribute is missing or a logical
    /// name is declared twice.
    pub fn build(self) -> ConnectorResult<SchemaDefinition<M>> {
        let mut index = HashMap::with_capacity(self.entries.len());
        for (i, entry) in self.entries.iter().enumerate() {
            if index.insert(entry.info.name.clone(), i).is_some() {
                return Err(ConnectorError::configuration(format!(
                    "Attribute '{}' is declared twice for {}",
                    entry.info.name, self.object_class
                )));
            }
        }
        for required in [UID_NAME, NAME_NAME] {
            if !index.contains_key(required) {
                return Err(ConnectorError::configuration(format!(
                    "Schema for {} has no {} attribute",
                    self.object_class, required
                )));
            }
        }

        debug!(
            "Built {} schema with {} attributes",
            self.object_class,
            self.entries.len()
        );

        Ok(SchemaDefinition {
            object_class: self.object_class,
            entries: self.entries,
            index,
        })
    }
}
