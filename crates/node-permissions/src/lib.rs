//! Capability flags for nodes connecting to a Meridian world server.
//!
//! A `NodePermissions` is an identified bundle of boolean capability flags.
//! World servers keep one per matching grant (per-user, per-group, standard
//! names) and union them with `|=` into the effective permissions of a
//! connecting node.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::BitOrAssign;
use uuid::Uuid;

/// Standard name granted to connections from the server's own machine.
pub const STANDARD_NAME_LOCALHOST: &str = "localhost";
/// Standard name granted to connections with a verified account.
pub const STANDARD_NAME_LOGGED_IN: &str = "logged-in";
/// Standard name granted to connections without an account.
pub const STANDARD_NAME_ANONYMOUS: &str = "anonymous";

/// The permission-set names with special meaning to world servers.
pub const STANDARD_NAMES: [&str; 3] = [
    STANDARD_NAME_LOCALHOST,
    STANDARD_NAME_LOGGED_IN,
    STANDARD_NAME_ANONYMOUS,
];

/// An identified, mergeable set of capability flags.
///
/// The identifier is fixed at construction; the flags are free to change.
/// The serde representation is the wire/storage record, so the field names
/// below are part of the external contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePermissions {
    #[serde(rename = "permissions_id")]
    id: String,

    /// May connect to a world server at all.
    #[serde(rename = "id_can_connect", default)]
    pub can_connect: bool,

    /// May lock and unlock entities.
    #[serde(rename = "id_can_adjust_locks", default)]
    pub can_adjust_locks: bool,

    /// May create permanent entities.
    #[serde(rename = "id_can_rez", default)]
    pub can_rez_permanent_entities: bool,

    /// May create temporary entities.
    #[serde(rename = "id_can_rez_tmp", default)]
    pub can_rez_temporary_entities: bool,

    /// May upload to the asset server.
    #[serde(rename = "id_can_write_to_asset_server", default)]
    pub can_write_to_asset_server: bool,

    /// May connect even when the server is at capacity.
    #[serde(rename = "id_can_connect_past_max_capacity", default)]
    pub can_connect_past_max_capacity: bool,
}

impl NodePermissions {
    /// Create a permission set with a generated unique identifier and the
    /// default agent flags.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    /// Create a permission set identified by `name`.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self::with_id(name.into())
    }

    fn with_id(id: String) -> Self {
        Self {
            id,
            can_connect: true,
            can_adjust_locks: false,
            can_rez_permanent_entities: false,
            can_rez_temporary_entities: false,
            can_write_to_asset_server: false,
            can_connect_past_max_capacity: false,
        }
    }

    /// The immutable identifier of this set.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set every flag to `value`.
    pub fn set_all(&mut self, value: bool) {
        self.can_connect = value;
        self.can_adjust_locks = value;
        self.can_rez_permanent_entities = value;
        self.can_rez_temporary_entities = value;
        self.can_write_to_asset_server = value;
        self.can_connect_past_max_capacity = value;
    }

    /// Convert to the generic key-value representation used for storage
    /// and network transmission.
    pub fn to_value(&self) -> Value {
        // serialization of this struct cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Rebuild from the generic key-value representation. Missing flags
    /// default to false.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

impl Default for NodePermissions {
    fn default() -> Self {
        Self::new()
    }
}

impl BitOrAssign<&NodePermissions> for NodePermissions {
    fn bitor_assign(&mut self, rhs: &NodePermissions) {
        self.can_connect |= rhs.can_connect;
        self.can_adjust_locks |= rhs.can_adjust_locks;
        self.can_rez_permanent_entities |= rhs.can_rez_permanent_entities;
        self.can_rez_temporary_entities |= rhs.can_rez_temporary_entities;
        self.can_write_to_asset_server |= rhs.can_write_to_asset_server;
        self.can_connect_past_max_capacity |= rhs.can_connect_past_max_capacity;
    }
}

impl BitOrAssign for NodePermissions {
    fn bitor_assign(&mut self, rhs: NodePermissions) {
        *self |= &rhs;
    }
}
