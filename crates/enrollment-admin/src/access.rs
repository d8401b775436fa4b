//! Role-string checks for dashboard operators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Operator,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Operator => "operator",
        }
    }

    /// Only admins and managers may confirm exam schedules.
    pub const fn can_schedule_exams(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" | "administrator" | "administrador" => Ok(Self::Admin),
            "manager" | "gestor" => Ok(Self::Manager),
            "operator" | "operador" => Ok(Self::Operator),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_role_strings_case_insensitively() {
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" gestor ".parse::<Role>(), Ok(Role::Manager));
        assert_eq!("Operador".parse::<Role>(), Ok(Role::Operator));
        assert!("guest".parse::<Role>().is_err());
    }

    #[test]
    fn scheduling_is_limited_to_admins_and_managers() {
        assert!(Role::Admin.can_schedule_exams());
        assert!(Role::Manager.can_schedule_exams());
        assert!(!Role::Operator.can_schedule_exams());
    }
}
