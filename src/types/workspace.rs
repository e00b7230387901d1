//! Workspace Types
//!
//! A workspace is the account-scoped entry point every payment endpoint
//! requires.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Workspace type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceType {
    /// Own payments.
    Payments,
    /// Third-party payments through a digital correspondent.
    DigitalCorban,
    /// Third-party payments through a physical correspondent.
    PhysicalCorban,
}

impl WorkspaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payments => "PAYMENTS",
            Self::DigitalCorban => "DIGITAL_CORBAN",
            Self::PhysicalCorban => "PHYSICAL_CORBAN",
        }
    }
}

/// Workspace as returned by the listing endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct Workspace {
    pub id: String,
    #[serde(rename = "type", default)]
    pub workspace_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Workspace {
    /// Active and of the requested type.
    pub fn is_active_of_type(&self, workspace_type: &WorkspaceType) -> bool {
        self.workspace_type.as_deref() == Some(workspace_type.as_str())
            && self.status.as_deref() == Some("ACTIVE")
    }
}

/// Listing envelope.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorkspaceList {
    #[serde(rename = "_content", default)]
    pub content: Vec<Workspace>,
}
