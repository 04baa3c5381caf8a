//! Workstation roles and the actions they may perform

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of the person operating this project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Admin,
    Staff,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Staff => write!(f, "staff"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Actions gated by role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    AdjustStock,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::CreateProduct => write!(f, "create products"),
            Action::UpdateProduct => write!(f, "update products"),
            Action::DeleteProduct => write!(f, "delete products"),
            Action::AdjustStock => write!(f, "adjust stock"),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
#[error("Permission denied: role '{role}' cannot {action}")]
#[diagnostic(
    code(minv::permission_denied),
    help("Ask an admin, or set 'role: admin' in .minv/config.yaml")
)]
pub struct PermissionError {
    pub role: Role,
    pub action: Action,
}

impl Role {
    pub fn can(&self, action: Action) -> bool {
        match self {
            Role::Admin => true,
            Role::Staff => !matches!(action, Action::DeleteProduct),
        }
    }

    pub fn require(&self, action: Action) -> Result<(), PermissionError> {
        if self.can(action) {
            Ok(())
        } else {
            Err(PermissionError {
                role: *self,
                action,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_cannot_delete() {
        assert!(Role::Staff.can(Action::AdjustStock));
        assert!(Role::Staff.can(Action::CreateProduct));
        assert!(Role::Staff.require(Action::DeleteProduct).is_err());
        assert!(Role::Admin.require(Action::DeleteProduct).is_ok());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("staff".parse::<Role>().unwrap(), Role::Staff);
        assert!("owner".parse::<Role>().is_err());
    }
}
