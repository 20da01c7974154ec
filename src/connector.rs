//! The connector's operation surface.
//!
//! [`KintoneConnector`] dispatches each operation to the handler of its
//! object class and logs every failure before returning it.

use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, ConnectorResult};
use crate::filter::Filter;
use crate::handlers::{
    MembershipFilter, ObjectHandler, group_schema, organization_schema, user_schema,
};
use crate::kintone::KintoneClient;
use crate::model::{GroupModel, OrganizationModel, ResourceModel, UserModel};
use crate::objects::{
    Attribute, AttributeDelta, ConnectorObject, ObjectClass, OperationOptions, Uid,
};
use crate::schema::{AttributeInfo, SchemaDefinition};
use crate::transport::{ReqwestTransport, Transport};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::RwLock;

/// The schemas of all served object classes.
#[derive(Debug)]
pub struct Schemas {
    pub user: SchemaDefinition<UserModel>,
    pub organization: SchemaDefinition<OrganizationModel>,
    pub group: SchemaDefinition<GroupModel>,
}

impl Schemas {
    pub fn build(config: &ConnectorConfig) -> ConnectorResult<Self> {
        Ok(Self {
            user: user_schema(config)?,
            organization: organization_schema()?,
            group: group_schema()?,
        })
    }

    /// Published attributes of one object class.
    pub fn attributes(&self, object_class: ObjectClass) -> Vec<&AttributeInfo> {
        match object_class {
            ObjectClass::User => self.user.attributes().collect(),
            ObjectClass::Organization => self.organization.attributes().collect(),
            ObjectClass::Group => self.group.attributes().collect(),
        }
    }
}

/// Outcome of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Objects handed to the result handler.
    pub handled: usize,
    /// For a paged search, `handled - page_size * page_offset`.
    pub remaining_paged_results: Option<i64>,
}

/// Identity connector for kintone users, organizations and groups.
pub struct KintoneConnector<T> {
    config: ConnectorConfig,
    client: KintoneClient<T>,
    filter: MembershipFilter,
    schemas: RwLock<Option<Arc<Schemas>>>,
}

impl KintoneConnector<ReqwestTransport> {
    /// Build the HTTP transport and check that the API is reachable.
    pub async fn connect(config: ConnectorConfig) -> ConnectorResult<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        let connector = Self::new(config, transport)?;
        connector.client.test().await.inspect_err(log_failure)?;
        info!("Connector for {} initialized", connector.config.instance_name);
        Ok(connector)
    }
}

impl<T: Transport> KintoneConnector<T> {
    pub fn new(config: ConnectorConfig, transport: T) -> ConnectorResult<Self> {
        config.validate()?;
        let client = KintoneClient::new(&config, transport);
        Ok(Self {
            filter: MembershipFilter::from_config(&config),
            config,
            client,
            schemas: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn client(&self) -> &KintoneClient<T> {
        &self.client
    }

    /// Rebuild the schemas from the current configuration and publish them.
    pub async fn schema(&self) -> ConnectorResult<Arc<Schemas>> {
        let schemas = Arc::new(Schemas::build(&self.config).inspect_err(log_failure)?);
        *self.schemas.write().await = Some(Arc::clone(&schemas));
        debug!("Published schemas for {}", self.config.instance_name);
        Ok(schemas)
    }

    async fn schemas(&self) -> ConnectorResult<Arc<Schemas>> {
        if let Some(schemas) = self.schemas.read().await.as_ref() {
            return Ok(Arc::clone(schemas));
        }
        self.schema().await
    }

    pub async fn create(
        &self,
        object_class: ObjectClass,
        attributes: &[Attribute],
    ) -> ConnectorResult<Uid> {
        if attributes.is_empty() {
            return Err(ConnectorError::invalid("Attributes not provided or empty"));
        }
        let schemas = self.schemas().await?;
        let result = match object_class {
            ObjectClass::User => self.handler(&schemas.user).create(attributes).await,
            ObjectClass::Organization => {
                self.handler(&schemas.organization).create(attributes).await
            }
            ObjectClass::Group => self.handler(&schemas.group).create(attributes).await,
        };
        result.inspect_err(log_failure)
    }

    pub async fn update_delta(
        &self,
        object_class: ObjectClass,
        uid: &Uid,
        deltas: &[AttributeDelta],
        _options: &OperationOptions,
    ) -> ConnectorResult<()> {
        let schemas = self.schemas().await?;
        let result = match object_class {
            ObjectClass::User => self.handler(&schemas.user).update_delta(uid, deltas).await,
            ObjectClass::Organization => {
                self.handler(&schemas.organization).update_delta(uid, deltas).await
            }
            ObjectClass::Group => self.handler(&schemas.group).update_delta(uid, deltas).await,
        };
        result.inspect_err(|e| log_target_failure(e, "updating", object_class, uid))
    }

    pub async fn delete(&self, object_class: ObjectClass, uid: &Uid) -> ConnectorResult<()> {
        let schemas = self.schemas().await?;
        let result = match object_class {
            ObjectClass::User => self.handler(&schemas.user).delete(uid).await,
            ObjectClass::Organization => self.handler(&schemas.organization).delete(uid).await,
            ObjectClass::Group => self.handler(&schemas.group).delete(uid).await,
        };
        result.inspect_err(|e| log_target_failure(e, "deleting", object_class, uid))
    }

    /// Search one object class.
    ///
    /// `filter` is the translated filter; `None` walks the whole collection.
    /// The handler returns `false` to stop the search.
    pub async fn execute_query<H>(
        &self,
        object_class: ObjectClass,
        filter: Option<&Filter>,
        handler: H,
        options: &OperationOptions,
    ) -> ConnectorResult<SearchResult>
    where
        H: FnMut(ConnectorObject) -> bool,
    {
        let schemas = self.schemas().await?;
        let page_size = self
            .config
            .effective_page_size(options.resolve_page_size(self.config.default_query_page_size));

        let result = match object_class {
            ObjectClass::User => {
                self.handler(&schemas.user)
                    .search(filter, handler, options, page_size)
                    .await
            }
            ObjectClass::Organization => {
                self.handler(&schemas.organization)
                    .search(filter, handler, options, page_size)
                    .await
            }
            ObjectClass::Group => {
                self.handler(&schemas.group)
                    .search(filter, handler, options, page_size)
                    .await
            }
        };
        let handled = result.inspect_err(log_failure)?;

        let page_offset = options.resolve_page_offset();
        let remaining_paged_results = (page_offset > 0)
            .then(|| handled as i64 - (page_size as i64 * page_offset as i64));
        Ok(SearchResult {
            handled,
            remaining_paged_results,
        })
    }

    /// Check the connection and the credentials.
    pub async fn test(&self) -> ConnectorResult<()> {
        self.client.test().await.inspect_err(log_failure)
    }

    /// Drop the published schemas.
    pub async fn dispose(&self) {
        self.schemas.write().await.take();
        debug!("Disposed connector for {}", self.config.instance_name);
    }

    fn handler<'a, M: ResourceModel>(
        &'a self,
        schema: &'a SchemaDefinition<M>,
    ) -> ObjectHandler<'a, T, M> {
        ObjectHandler::new(&self.client, schema, &self.filter)
    }
}

fn log_failure(e: &ConnectorError) {
    if e.is_conflict() {
        warn!("Detected the object already exists: {}", e);
    } else {
        error!("Detected kintone connector error: {}", e);
    }
}

fn log_target_failure(e: &ConnectorError, action: &str, object_class: ObjectClass, uid: &Uid) {
    if e.is_unknown_uid() {
        warn!(
            "Not found object when {}. objectClass: {}, uid: {}",
            action, object_class, uid
        );
    } else {
        log_failure(e);
    }
}
