use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque reference to an exam location supplied by the location provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub String);

impl LocationId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Location record as returned by the enrollment API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamLocation {
    pub id: LocationId,
    pub name: String,
    pub full_address: String,
}

/// Stage of the scheduling wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Selection,
    Summary,
}

impl WizardStep {
    pub const fn index(self) -> u8 {
        match self {
            Self::Selection => 0,
            Self::Summary => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Selection => "Date & hour selection",
            Self::Summary => "Summary",
        }
    }
}
