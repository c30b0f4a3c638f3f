//! Authenticated actor model used by the access policy

use serde::{Deserialize, Serialize};

/// Role of an authenticated user, mirrored from the portal's role model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    Admin,
    Manager,
    It,
    User,
    Viewer,
}

impl ActorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::It => "IT",
            Self::User => "USER",
            Self::Viewer => "VIEWER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ADMIN" => Some(Self::Admin),
            "MANAGER" => Some(Self::Manager),
            "IT" => Some(Self::It),
            "USER" => Some(Self::User),
            "VIEWER" => Some(Self::Viewer),
            _ => None,
        }
    }
}

/// An authenticated caller, as resolved by the (external) session layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: String,
    pub role: ActorRole,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: ActorRole) -> Self {
        Self { id: id.into(), role }
    }
}
