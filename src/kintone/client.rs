//! Endpoint-level access to users, organizations and groups.

use super::bodies::{
    CodesBody, OrganizationAssignment, RenameCode, UserGroupsBody, UserGroupsUpdate,
    UserOrganization, UserOrganizationsBody, UserOrganizationsUpdate, UserServices,
    UserServicesBody, envelope, records,
};
use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, ConnectorResult};
use crate::model::{ResourceModel, UserModel};
use crate::objects::{ObjectClass, Uid};
use crate::pagination::{PageRequest, paginate};
use crate::schema::AssociationKind;
use crate::transport::{
    ErrorClassifier, ErrorPhrases, KintoneErrorClassifier, RestClient, Transport,
};
use log::{debug, info};
use serde_json::Value;

/// First offset of the list endpoints.
const START_OFFSET: usize = 0;

/// Client for the kintone user API.
///
/// Every name-keyed call takes a resolved [`Uid`] whose name hint carries
/// the current code; see [`KintoneClient::resolve`].
#[derive(Debug)]
pub struct KintoneClient<T, C = KintoneErrorClassifier> {
    rest: RestClient<T, C>,
    base_url: String,
    organization_title_delimiter: String,
}

impl<T: Transport> KintoneClient<T> {
    /// Create a client with the classifier configured from `config`.
    pub fn new(config: &ConnectorConfig, transport: T) -> Self {
        let phrases =
            ErrorPhrases::with_extra(&config.already_exists_phrases, &config.not_found_phrases);
        Self::with_classifier(config, transport, KintoneErrorClassifier::new(phrases))
    }
}

impl<T: Transport, C: ErrorClassifier> KintoneClient<T, C> {
    pub fn with_classifier(config: &ConnectorConfig, transport: T, classifier: C) -> Self {
        Self {
            rest: RestClient::new(config.instance_name.clone(), transport, classifier),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            organization_title_delimiter: config.organization_title_delimiter.clone(),
        }
    }

    pub fn rest(&self) -> &RestClient<T, C> {
        &self.rest
    }

    fn instance_name(&self) -> &str {
        self.rest.instance_name()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    pub fn collection_url<M: ResourceModel>(&self) -> String {
        self.endpoint(&format!("{}.json", M::COLLECTION))
    }

    pub fn rename_url<M: ResourceModel>(&self) -> String {
        self.endpoint(&format!("{}/codes.json", M::COLLECTION))
    }

    pub fn user_services_url(&self) -> String {
        self.endpoint("users/services.json")
    }

    pub fn user_organizations_url(&self) -> String {
        self.endpoint("user/organizations.json")
    }

    pub fn user_organizations_update_url(&self) -> String {
        self.endpoint("userOrganizations.json")
    }

    pub fn user_groups_url(&self) -> String {
        self.endpoint("user/groups.json")
    }

    /// Check that the API is reachable with the configured credentials.
    pub async fn test(&self) -> ConnectorResult<()> {
        let url = self.collection_url::<UserModel>();
        let response = match self.rest.get(&url, &[("size", "1".to_string())]).await {
            Ok(response) => response,
            Err(ConnectorError::Network { source, .. }) => {
                return Err(ConnectorError::ConnectionFailed {
                    message: format!(
                        "Cannot connect to {} REST API: {}",
                        self.instance_name(),
                        source
                    ),
                });
            }
            Err(e) => return Err(e),
        };
        if response.status != 200 {
            return Err(ConnectorError::ConnectionFailed {
                message: format!(
                    "Failed {} test response. statusCode: {}, body: {}",
                    self.instance_name(),
                    response.status,
                    response.body
                ),
            });
        }
        info!("{} connector's connection test is OK", self.instance_name());
        Ok(())
    }

    /// Create a record and return its identifier.
    ///
    /// The create endpoint does not return the generated id, so the record
    /// is read back by code.
    pub async fn create<M: ResourceModel>(&self, model: &M) -> ConnectorResult<Uid> {
        let code = model
            .code()
            .ok_or_else(|| ConnectorError::invalid(format!("{} requires a code", M::OBJECT_CLASS)))?
            .to_string();

        self.rest
            .call_create(M::OBJECT_CLASS, &self.collection_url::<M>(), &envelope(model)?, &code)
            .await?;

        let created: M = self.get_by_name(&code).await?;
        let id = created.id().ok_or_else(|| {
            ConnectorError::protocol(format!("Created {} '{}' has no id", M::OBJECT_CLASS, code))
        })?;
        info!("Created {} '{}' with id {}", M::OBJECT_CLASS, code, id);
        Ok(Uid::with_name(id, code))
    }

    pub async fn get_by_uid<M: ResourceModel>(&self, uid: &Uid) -> ConnectorResult<M> {
        self.get_one(&[("ids", uid.value().to_string())], uid.value())
            .await
    }

    pub async fn get_by_name<M: ResourceModel>(&self, name: &str) -> ConnectorResult<M> {
        self.get_one(&[("codes", name.to_string())], name).await
    }

    async fn get_one<M: ResourceModel>(
        &self,
        query: &[(&str, String)],
        target: &str,
    ) -> ConnectorResult<M> {
        let body: Value = self
            .rest
            .fetch(M::OBJECT_CLASS, &self.collection_url::<M>(), query, target)
            .await?;
        let mut found: Vec<M> = records(body)?;
        if found.len() != 1 {
            return Err(ConnectorError::protocol(format!(
                "Cannot find {} {} {}: expected one record, got {}",
                self.instance_name(),
                M::OBJECT_CLASS,
                target,
                found.len()
            )));
        }
        Ok(found.remove(0))
    }

    /// Make sure the reference carries the current code.
    pub async fn resolve<M: ResourceModel>(&self, uid: &Uid) -> ConnectorResult<Uid> {
        if uid.name_hint().is_some() {
            return Ok(uid.clone());
        }
        let current: M = self.get_by_uid(uid).await?;
        let code = current.code().ok_or_else(|| {
            ConnectorError::protocol(format!("{} {} has no code", M::OBJECT_CLASS, uid.value()))
        })?;
        debug!("Resolved {} {} to code '{}'", M::OBJECT_CLASS, uid.value(), code);
        Ok(Uid::with_name(uid.value(), code))
    }

    /// Update regular fields; `model` must carry the current code.
    pub async fn update<M: ResourceModel>(&self, uid: &Uid, model: &M) -> ConnectorResult<()> {
        self.rest
            .call_update(M::OBJECT_CLASS, &self.collection_url::<M>(), uid, &envelope(model)?)
            .await
    }

    pub async fn rename<M: ResourceModel>(&self, uid: &Uid, new_code: &str) -> ConnectorResult<()> {
        let body = CodesBody {
            codes: vec![RenameCode {
                current_code: code_of(uid)?.to_string(),
                new_code: new_code.to_string(),
            }],
        };
        self.rest
            .call_update(M::OBJECT_CLASS, &self.rename_url::<M>(), uid, &body)
            .await
            .map_err(|e| match e {
                ConnectorError::AlreadyExists { object_class, .. } => {
                    ConnectorError::AlreadyExists {
                        object_class,
                        name: new_code.to_string(),
                    }
                }
                other => other,
            })
    }

    pub async fn delete<M: ResourceModel>(&self, uid: &Uid) -> ConnectorResult<()> {
        let resolved = self.resolve::<M>(uid).await?;
        let body = CodesBody {
            codes: vec![code_of(&resolved)?.to_string()],
        };
        self.rest
            .call_delete(M::OBJECT_CLASS, &self.collection_url::<M>(), &resolved, Some(&body))
            .await
    }

    pub async fn fetch_page<M: ResourceModel>(
        &self,
        start: usize,
        size: usize,
    ) -> ConnectorResult<Vec<M>> {
        let query = [("offset", start.to_string()), ("size", size.to_string())];
        let body: Value = self
            .rest
            .fetch(M::OBJECT_CLASS, &self.collection_url::<M>(), &query, M::COLLECTION)
            .await?;
        records(body)
    }

    /// Walk the collection and feed each record to `handler`.
    pub async fn get_all<M, H>(&self, request: PageRequest, handler: H) -> ConnectorResult<usize>
    where
        M: ResourceModel,
        H: AsyncFnMut(M) -> ConnectorResult<bool>,
    {
        paginate(
            request.with_start_offset(START_OFFSET),
            async |start, size| self.fetch_page::<M>(start, size).await,
            handler,
        )
        .await
    }

    /// Current members of one association of a user.
    pub async fn get_memberships(
        &self,
        kind: AssociationKind,
        code: &str,
    ) -> ConnectorResult<Vec<String>> {
        match kind {
            AssociationKind::Services => self.get_services_for_user(code).await,
            AssociationKind::Organizations => self.get_organizations_for_user(code).await,
            AssociationKind::Groups => self.get_groups_for_user(code).await,
        }
    }

    /// Replace one association of a user.
    pub async fn update_memberships(
        &self,
        kind: AssociationKind,
        uid: &Uid,
        values: &[String],
    ) -> ConnectorResult<()> {
        debug!("Writing {} {} for user {}", values.len(), kind, uid);
        match kind {
            AssociationKind::Services => self.update_services_for_user(uid, values).await,
            AssociationKind::Organizations => self.update_organizations_for_user(uid, values).await,
            AssociationKind::Groups => self.update_groups_for_user(uid, values).await,
        }
    }

    pub async fn get_services_for_user(&self, code: &str) -> ConnectorResult<Vec<String>> {
        let url = self.user_services_url();
        let body: UserServicesBody = self
            .rest
            .fetch(ObjectClass::User, &url, &[("codes", code.to_string())], code)
            .await?;
        Ok(body
            .users
            .into_iter()
            .find(|u| u.code == code)
            .map(|u| u.services)
            .unwrap_or_default())
    }

    pub async fn update_services_for_user(
        &self,
        uid: &Uid,
        services: &[String],
    ) -> ConnectorResult<()> {
        let body = UserServicesBody {
            users: vec![UserServices {
                code: code_of(uid)?.to_string(),
                services: services.to_vec(),
            }],
        };
        self.rest
            .call_update(ObjectClass::User, &self.user_services_url(), uid, &body)
            .await
    }

    /// Organizations of a user as `org` or `org<delimiter>title` codes.
    pub async fn get_organizations_for_user(&self, code: &str) -> ConnectorResult<Vec<String>> {
        let url = self.user_organizations_url();
        let body: UserOrganizationsBody = self
            .rest
            .fetch(ObjectClass::User, &url, &[("code", code.to_string())], code)
            .await?;
        Ok(body
            .organization_titles
            .iter()
            .map(|o| o.composite(&self.organization_title_delimiter))
            .collect())
    }

    pub async fn update_organizations_for_user(
        &self,
        uid: &Uid,
        organizations: &[String],
    ) -> ConnectorResult<()> {
        let body = UserOrganizationsUpdate {
            user_organizations: vec![UserOrganization {
                code: code_of(uid)?.to_string(),
                organizations: organizations
                    .iter()
                    .map(|o| OrganizationAssignment::parse(o, &self.organization_title_delimiter))
                    .collect(),
            }],
        };
        self.rest
            .call_update(ObjectClass::User, &self.user_organizations_update_url(), uid, &body)
            .await
    }

    pub async fn get_groups_for_user(&self, code: &str) -> ConnectorResult<Vec<String>> {
        let body: UserGroupsBody = self
            .rest
            .fetch(ObjectClass::User, &self.user_groups_url(), &[("code", code.to_string())], code)
            .await?;
        Ok(body.groups.into_iter().map(|g| g.code).collect())
    }

    pub async fn update_groups_for_user(
        &self,
        uid: &Uid,
        groups: &[String],
    ) -> ConnectorResult<()> {
        let body = UserGroupsUpdate {
            code: code_of(uid)?.to_string(),
            groups: groups.to_vec(),
        };
        self.rest
            .call_update(ObjectClass::User, &self.user_groups_url(), uid, &body)
            .await
    }
}

/// The code of a resolved reference.
fn code_of(uid: &Uid) -> ConnectorResult<&str> {
    uid.name_hint()
        .ok_or_else(|| ConnectorError::invalid(format!("Reference {} has no resolved code", uid)))
}
