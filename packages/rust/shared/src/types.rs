//! Core domain types for mdnotes document discovery.

use serde::{Deserialize, Serialize};

use crate::describe::describe;

/// File extension every discoverable document carries.
pub const DOCUMENT_EXTENSION: &str = ".md";

// ---------------------------------------------------------------------------
// Origin
// ---------------------------------------------------------------------------

/// Which discovery tier produced a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Parsed from the documents directory's HTML listing.
    DirectoryListing,
    /// Found by probing the candidate name × directory matrix.
    Probe,
    /// Listed by the hosting provider's contents API.
    HostApi,
    /// One of the built-in demo documents.
    Demo,
}

impl Origin {
    /// Short label used in logs and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectoryListing => "directory-listing",
            Self::Probe => "probe",
            Self::HostApi => "host-api",
            Self::Demo => "demo",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DocumentDescriptor
// ---------------------------------------------------------------------------

/// A discoverable document and where to fetch it.
///
/// Fields are read-only after construction; `path` is the uniqueness key
/// within one discovery run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    name: String,
    path: String,
    description: String,
    origin: Origin,
}

impl DocumentDescriptor {
    /// Build a descriptor, synthesizing its description from the file name.
    pub fn new(name: impl Into<String>, path: impl Into<String>, origin: Origin) -> Self {
        let name = name.into();
        let description = describe(&name);
        Self {
            name,
            path: path.into(),
            description,
            origin,
        }
    }

    /// File basename including the extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fetchable location, relative to the site base or absolute.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Human-readable one-line summary.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Tier that discovered this document.
    pub fn origin(&self) -> Origin {
        self.origin
    }
}
