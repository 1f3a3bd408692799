//! Authentication collaborator
//!
//! The core treats the role as an opaque authorization tag: the only
//! distinction it makes is viewer vs elevated (ops/admin), which gates the
//! ETL upload actions.

use crate::error::{Result, ScreenerError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    Ops,
    Admin,
}

impl Role {
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Ops | Role::Admin)
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "viewer" => Ok(Role::Viewer),
            "ops" => Ok(Role::Ops),
            "admin" => Ok(Role::Admin),
            other => Err(ScreenerError::InvalidInput(format!(
                "unknown role '{}', expected viewer, ops or admin",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            role,
        }
    }
}

pub trait AuthProvider {
    fn current_user(&self) -> Option<&CurrentUser>;
    fn sign_in(&mut self, user: CurrentUser) -> Result<()>;
    fn sign_out(&mut self);
}

/// Single-operator provider for the CLI; real deployments plug in an
/// identity service behind the same trait.
#[derive(Debug, Default)]
pub struct LocalAuth {
    user: Option<CurrentUser>,
}

impl AuthProvider for LocalAuth {
    fn current_user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    fn sign_in(&mut self, user: CurrentUser) -> Result<()> {
        self.user = Some(user);
        Ok(())
    }

    fn sign_out(&mut self) {
        self.user = None;
    }
}

/// Gate for upload/ETL actions.
pub fn require_elevated(user: &CurrentUser) -> Result<()> {
    if user.role.is_elevated() {
        Ok(())
    } else {
        Err(ScreenerError::AccessDenied(
            "this action requires the ops or admin role".to_string(),
        ))
    }
}
