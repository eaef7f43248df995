//! Users and their roles.

use serde::{Deserialize, Serialize};

use super::kind::ResourceKind;
use super::record::{Record, ResourceSpec};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSpec {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl UserSpec {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl ResourceSpec for UserSpec {
    const KIND: ResourceKind = ResourceKind::User;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRoleSpec {
    pub role_name: String,
    /// Views of the application the role may open.
    #[serde(default)]
    pub views: Vec<String>,
}

impl ResourceSpec for UserRoleSpec {
    const KIND: ResourceKind = ResourceKind::UserRole;
}

pub type User = Record<UserSpec>;
pub type UserRole = Record<UserRoleSpec>;
