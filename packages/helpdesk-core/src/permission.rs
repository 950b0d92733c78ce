//! Doctype permission checks.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::{DeskError, Result};

/// User allowed everything without role grants.
pub const ADMINISTRATOR: &str = "Administrator";

/// Caller identity of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: String,
}

impl Session {
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }

    /// Session of the built-in administrator, used by maintenance routines.
    pub fn administrator() -> Self {
        Self::new(ADMINISTRATOR)
    }
}

/// Right requested on a doctype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionType {
    Read,
    Write,
    Create,
}

impl PermissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionType::Read => "read",
            PermissionType::Write => "write",
            PermissionType::Create => "create",
        }
    }
}

/// Decides whether a session holds a right on a doctype.
pub trait PermissionChecker: Send + Sync {
    fn has_permission(&self, session: &Session, doctype: &str, ptype: PermissionType) -> bool;
}

/// Fails with `PermissionDenied` unless the session holds `ptype` on `doctype`.
pub fn check_permission(
    checker: &dyn PermissionChecker,
    session: &Session,
    doctype: &str,
    ptype: PermissionType,
) -> Result<()> {
    if checker.has_permission(session, doctype, ptype) {
        return Ok(());
    }
    tracing::warn!(
        "Denied {} on {} for {}",
        ptype.as_str(),
        doctype,
        session.user
    );
    Err(DeskError::PermissionDenied {
        user: session.user.clone(),
        doctype: doctype.to_string(),
        ptype: ptype.as_str(),
    })
}

/// Role grant on a doctype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocPerm {
    pub role: String,
    pub rights: Vec<PermissionType>,
}

/// Serializable form of [`RolePermissions`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionTable {
    /// Doctype to role grants
    #[serde(default)]
    pub doctypes: HashMap<String, Vec<DocPerm>>,
    /// User to roles
    #[serde(default)]
    pub user_roles: HashMap<String, Vec<String>>,
}

/// Role-based permission checker. [`ADMINISTRATOR`] bypasses every check.
#[derive(Debug, Default)]
pub struct RolePermissions {
    table: RwLock<PermissionTable>,
}

impl RolePermissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_table(table: PermissionTable) -> Self {
        Self {
            table: RwLock::new(table),
        }
    }

    /// Grants `rights` on `doctype` to `role`.
    pub fn grant(&self, doctype: &str, role: &str, rights: &[PermissionType]) -> Result<()> {
        let mut table = self.table.write().map_err(|_| DeskError::LockPoisoned)?;
        let perms = table.doctypes.entry(doctype.to_string()).or_default();
        match perms.iter_mut().find(|perm| perm.role == role) {
            Some(perm) => {
                for right in rights {
                    if !perm.rights.contains(right) {
                        perm.rights.push(*right);
                    }
                }
            }
            None => perms.push(DocPerm {
                role: role.to_string(),
                rights: rights.to_vec(),
            }),
        }
        Ok(())
    }

    /// Adds `role` to `user`.
    pub fn assign_role(&self, user: &str, role: &str) -> Result<()> {
        let mut table = self.table.write().map_err(|_| DeskError::LockPoisoned)?;
        let roles = table.user_roles.entry(user.to_string()).or_default();
        if !roles.iter().any(|existing| existing == role) {
            roles.push(role.to_string());
        }
        Ok(())
    }

    /// Copies the grants out for persistence.
    pub fn to_table(&self) -> Result<PermissionTable> {
        let table = self.table.read().map_err(|_| DeskError::LockPoisoned)?;
        Ok(table.clone())
    }
}

impl PermissionChecker for RolePermissions {
    fn has_permission(&self, session: &Session, doctype: &str, ptype: PermissionType) -> bool {
        if session.user == ADMINISTRATOR {
            return true;
        }
        let Ok(table) = self.table.read() else {
            return false;
        };
        let roles: HashSet<&str> = table
            .user_roles
            .get(&session.user)
            .map(|roles| roles.iter().map(String::as_str).collect())
            .unwrap_or_default();
        table.doctypes.get(doctype).is_some_and(|perms| {
            perms
                .iter()
                .any(|perm| roles.contains(perm.role.as_str()) && perm.rights.contains(&ptype))
        })
    }
}
