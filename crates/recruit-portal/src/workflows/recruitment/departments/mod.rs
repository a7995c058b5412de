//! Canonical department identifiers and the registry that resolves historical spellings.

mod aliases;
mod registry;

pub use registry::DepartmentRegistry;

use serde::{Serialize, Serializer};
use std::fmt;

/// The closed set of departments an applicant can apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Department {
    AiMl,
    Dev,
    OpenSource,
    GameDev,
    Cybersec,
    Robotics,
    Events,
    Design,
    Marketing,
    SocialMedia,
}

impl Department {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::AiMl,
            Self::Dev,
            Self::OpenSource,
            Self::GameDev,
            Self::Cybersec,
            Self::Robotics,
            Self::Events,
            Self::Design,
            Self::Marketing,
            Self::SocialMedia,
        ]
    }

    /// Canonical code stored in applicant records.
    pub const fn code(self) -> &'static str {
        match self {
            Self::AiMl => "ai-ml",
            Self::Dev => "dev",
            Self::OpenSource => "open-source",
            Self::GameDev => "game-dev",
            Self::Cybersec => "cybersec",
            Self::Robotics => "robotics",
            Self::Events => "events",
            Self::Design => "design",
            Self::Marketing => "marketing",
            Self::SocialMedia => "social-media",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AiMl => "AI / ML",
            Self::Dev => "Development",
            Self::OpenSource => "Open Source",
            Self::GameDev => "Game Development",
            Self::Cybersec => "Cybersecurity",
            Self::Robotics => "Robotics",
            Self::Events => "Events",
            Self::Design => "Design",
            Self::Marketing => "Marketing",
            Self::SocialMedia => "Social Media",
        }
    }
}

/// Result of normalizing a raw department identifier.
///
/// Only [`DepartmentRegistry::normalize`] produces values of this type. Identifiers that match
/// no known spelling are kept verbatim as [`DepartmentCode::Unrecognized`] so they stay visible
/// in listings and statistics instead of disappearing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DepartmentCode {
    Known(Department),
    Unrecognized(String),
}

impl DepartmentCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(department) => department.code(),
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Known(department) => department.label(),
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn department(&self) -> Option<Department> {
        match self {
            Self::Known(department) => Some(*department),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl fmt::Display for DepartmentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DepartmentCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
