//! Resource models mirroring the remote API's JSON records.
//!
//! One model per object type. A model serves both as the decoded form of a
//! fetched record and as the payload of a create or update request; in the
//! latter role it also carries side-channel mutation markers (rename target,
//! membership deltas) that are never serialized.

pub mod field;
pub mod group;
pub mod organization;
pub mod user;

pub use field::Field;
pub use group::GroupModel;
pub use organization::OrganizationModel;
pub use user::{CustomItemValue, UserModel};

use crate::objects::ObjectClass;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Behaviour shared by every resource model.
pub trait ResourceModel:
    Serialize + DeserializeOwned + Default + std::fmt::Debug + Send + Sync + 'static
{
    /// The object class this model represents.
    const OBJECT_CLASS: ObjectClass;

    /// Plural record name used in URLs and JSON envelopes, e.g. `users`.
    const COLLECTION: &'static str;

    /// The system-generated identifier, present on fetched records.
    fn id(&self) -> Option<&str>;

    /// The mutable code addressing the record remotely.
    fn code(&self) -> Option<&str>;

    fn set_code(&mut self, code: String);

    /// Rename target requested by an update delta.
    fn new_code(&self) -> Option<&str>;

    fn set_new_code(&mut self, code: String);

    /// Whether any regular field takes part in this operation.
    fn has_attributes_change(&self) -> bool;

    fn has_code_change(&self) -> bool {
        self.new_code().is_some()
    }
}

/// A change request against one set-valued relation.
///
/// `replace` carries a full membership list (create, or a full-set delta);
/// `add` and `remove` carry a delta against the current remote state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDelta {
    pub replace: Option<Vec<String>>,
    pub add: Option<Vec<String>>,
    pub remove: Option<Vec<String>>,
}

impl MembershipDelta {
    pub fn has_change(&self) -> bool {
        self.replace.is_some() || self.add.is_some() || self.remove.is_some()
    }
}
