//! Operation sequences for each object class.
//!
//! [`ObjectHandler`] drives the mapping engine, the reconciler and the
//! backend client for one object class. The per-class schema declarations
//! live in the submodules.

pub mod group;
pub mod organization;
pub mod user;

pub use group::group_schema;
pub use organization::organization_schema;
pub use user::{CUSTOM_ITEM_PREFIX, CustomItemField, user_schema};

use crate::applier::{apply_create, apply_delta};
use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, ConnectorResult};
use crate::filter::Filter;
use crate::kintone::KintoneClient;
use crate::model::ResourceModel;
use crate::objects::{Attribute, AttributeDelta, ConnectorObject, Name, OperationOptions, Uid};
use crate::pagination::PageRequest;
use crate::reconciler::{EVERYONE_GROUP, filter_memberships, reconcile_membership};
use crate::schema::{AssociationKind, Mapping, ReadPlan, ReadStep, SchemaDefinition, SchemaEntry};
use crate::transport::Transport;
use log::{debug, info, trace};
use std::collections::HashSet;

/// Codes hidden from association reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipFilter {
    ignore_services: HashSet<String>,
    ignore_organizations: HashSet<String>,
    ignore_groups: HashSet<String>,
}

impl MembershipFilter {
    pub fn from_config(config: &ConnectorConfig) -> Self {
        Self {
            ignore_services: config.ignore_service.clone(),
            ignore_organizations: config.ignore_organization.clone(),
            ignore_groups: config.ignore_group.clone(),
        }
    }

    /// Drop ignored codes. The implicit `everyone` group is never reported.
    pub fn apply(&self, kind: AssociationKind, values: Vec<String>) -> Vec<String> {
        match kind {
            AssociationKind::Services => filter_memberships(values, &self.ignore_services, None),
            AssociationKind::Organizations => {
                filter_memberships(values, &self.ignore_organizations, None)
            }
            AssociationKind::Groups => {
                filter_memberships(values, &self.ignore_groups, Some(EVERYONE_GROUP))
            }
        }
    }
}

/// Create, update, delete and search for one object class.
pub struct ObjectHandler<'a, T, M> {
    client: &'a KintoneClient<T>,
    schema: &'a SchemaDefinition<M>,
    filter: &'a MembershipFilter,
}

impl<'a, T: Transport, M: ResourceModel> ObjectHandler<'a, T, M> {
    pub fn new(
        client: &'a KintoneClient<T>,
        schema: &'a SchemaDefinition<M>,
        filter: &'a MembershipFilter,
    ) -> Self {
        Self {
            client,
            schema,
            filter,
        }
    }

    /// Create the object, then write its initial associations.
    pub async fn create(&self, attributes: &[Attribute]) -> ConnectorResult<Uid> {
        let mut model = apply_create(self.schema, attributes, M::default())?;
        trace!("Create payload for {}: {:?}", M::OBJECT_CLASS, model);

        let uid = self.client.create(&model).await?;
        self.write_memberships(&uid, &mut model).await?;
        Ok(uid)
    }

    /// Apply a delta.
    ///
    /// Writes go out as regular fields, then each association in declaration
    /// order, then the rename. Every call addresses the object by the code
    /// resolved up front, so the rename has to come last.
    pub async fn update_delta(&self, uid: &Uid, deltas: &[AttributeDelta]) -> ConnectorResult<()> {
        let mut model = apply_delta(self.schema, deltas, M::default())?;
        let resolved = self.client.resolve::<M>(uid).await?;
        let code = resolved
            .name_hint()
            .ok_or_else(|| {
                ConnectorError::protocol(format!("{} {} has no code", M::OBJECT_CLASS, uid))
            })?
            .to_string();

        info!("Updating {} '{}' ({} deltas)", M::OBJECT_CLASS, code, deltas.len());

        if model.has_attributes_change() {
            model.set_code(code.clone());
            self.client.update(&resolved, &model).await?;
        }

        self.write_memberships(&resolved, &mut model).await?;

        match model.new_code() {
            Some(new_code) if new_code != code => {
                self.client.rename::<M>(&resolved, new_code).await?;
                info!("Renamed {} '{}' to '{}'", M::OBJECT_CLASS, code, new_code);
            }
            Some(_) => debug!("{} '{}' already has the requested code", M::OBJECT_CLASS, code),
            None => {}
        }
        Ok(())
    }

    pub async fn delete(&self, uid: &Uid) -> ConnectorResult<()> {
        self.client.delete::<M>(uid).await?;
        info!("Deleted {} {}", M::OBJECT_CLASS, uid);
        Ok(())
    }

    /// Search and feed each object to `handler` until it returns `false`.
    ///
    /// `page_size` is the size actually requested from the API. Returns the
    /// number of objects handled; see [`crate::pagination::paginate`] for the
    /// counting rules of a paged search.
    pub async fn search<H>(
        &self,
        filter: Option<&Filter>,
        mut handler: H,
        options: &OperationOptions,
        page_size: usize,
    ) -> ConnectorResult<usize>
    where
        H: FnMut(ConnectorObject) -> bool,
    {
        let to_get = self.schema.attributes_to_get(options);
        let plan = self
            .schema
            .plan_read(&to_get, options.should_allow_partial_attribute_values());
        debug!(
            "Searching {} with {} attributes, {} association fetches",
            M::OBJECT_CLASS,
            to_get.len(),
            plan.fetches().count()
        );

        match filter {
            Some(Filter::ByUid(uid)) => {
                let model = self.client.get_by_uid::<M>(uid).await?;
                handler(self.to_connector_object(model, &plan).await?);
                Ok(1)
            }
            Some(Filter::ByName(name)) => {
                let model = self.client.get_by_name::<M>(name.value()).await?;
                handler(self.to_connector_object(model, &plan).await?);
                Ok(1)
            }
            None => {
                let request = PageRequest::new(page_size, options.resolve_page_offset());
                self.client
                    .get_all::<M, _>(request, async |model: M| {
                        let object = self.to_connector_object(model, &plan).await?;
                        Ok(handler(object))
                    })
                    .await
            }
        }
    }

    /// Build the caller's view of a fetched record.
    pub async fn to_connector_object(
        &self,
        model: M,
        plan: &ReadPlan,
    ) -> ConnectorResult<ConnectorObject> {
        let id = model.id().ok_or_else(|| {
            ConnectorError::protocol(format!("{} record has no id", M::OBJECT_CLASS))
        })?;
        let code = model.code().ok_or_else(|| {
            ConnectorError::protocol(format!("{} {} has no code", M::OBJECT_CLASS, id))
        })?;

        let mut attributes = Vec::with_capacity(plan.steps().len());
        for step in plan.steps() {
            match step {
                ReadStep::Local(index) => {
                    let Some(SchemaEntry {
                        info,
                        mapping: Mapping::Single(mapper),
                    }) = self.schema.entries().get(*index)
                    else {
                        continue;
                    };
                    if let Some(value) = mapper.read(&model)? {
                        attributes.push(Attribute::new(info.name.clone(), vec![value]));
                    }
                }
                ReadStep::Fetch { name, kind } => {
                    let values = self.client.get_memberships(*kind, code).await?;
                    let values = self.filter.apply(*kind, values);
                    attributes.push(Attribute::strings(name.clone(), values));
                }
                ReadStep::Incomplete(name) => attributes.push(Attribute::incomplete(name.clone())),
            }
        }

        Ok(ConnectorObject {
            object_class: M::OBJECT_CLASS,
            uid: Uid::with_name(id, code),
            name: Name::new(code),
            attributes,
        })
    }

    /// Push every association change recorded on `model`.
    async fn write_memberships(&self, uid: &Uid, model: &mut M) -> ConnectorResult<()> {
        let client = self.client;
        for entry in self.schema.entries() {
            let Mapping::Multi(mapper) = &entry.mapping else {
                continue;
            };
            let delta = mapper.take(model);
            let kind = mapper.kind();
            let code = match uid.name_hint() {
                Some(code) => code,
                None if delta.has_change() => {
                    return Err(ConnectorError::invalid(format!(
                        "Cannot update {} of {} without its code",
                        kind, uid
                    )));
                }
                None => continue,
            };

            let fetch_current = move || client.get_memberships(kind, code);
            if let Some(values) = reconcile_membership(&delta, fetch_current).await? {
                client.update_memberships(kind, uid, &values).await?;
            }
        }
        Ok(())
    }
}
