/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primary key of a document, link or file in its catalog
pub type ResourceId = i64;

/// The three kinds of resource a user can pin.
/// Each kind maps to its own catalog and its own reference collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Document,
    Link,
    File,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [ResourceKind::Document, ResourceKind::Link, ResourceKind::File];

    /// Lowercase tag used on the wire (`resource_type` query, payload keys)
    pub fn tag(&self) -> &'static str {
        match self {
            ResourceKind::Document => "document",
            ResourceKind::Link => "link",
            ResourceKind::File => "file",
        }
    }

    /// Capitalized name used in client-facing messages
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Document => "Document",
            ResourceKind::Link => "Link",
            ResourceKind::File => "File",
        }
    }

    /// Catalog table owning the resources of this kind
    pub fn catalog_table(&self) -> &'static str {
        match self {
            ResourceKind::Document => "documents",
            ResourceKind::Link => "link_uploads",
            ResourceKind::File => "file_uploads",
        }
    }

    /// Junction table between pinned sets and this kind's catalog
    pub fn join_table(&self) -> &'static str {
        match self {
            ResourceKind::Document => "pinned_resources_document",
            ResourceKind::Link => "pinned_resources_link",
            ResourceKind::File => "pinned_resources_file",
        }
    }

    /// Foreign key column in the junction table
    pub fn join_column(&self) -> &'static str {
        match self {
            ResourceKind::Document => "document_id",
            ResourceKind::Link => "link_id",
            ResourceKind::File => "file_id",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid resource type")]
pub struct InvalidResourceKind(pub String);

impl FromStr for ResourceKind {
    type Err = InvalidResourceKind;

    /// Case-insensitive: `Link`, `LINK` and `link` are all accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "document" => Ok(ResourceKind::Document),
            "link" => Ok(ResourceKind::Link),
            "file" => Ok(ResourceKind::File),
            _ => Err(InvalidResourceKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kinds_case_insensitively() {
        assert_eq!("link".parse::<ResourceKind>(), Ok(ResourceKind::Link));
        assert_eq!("FILE".parse::<ResourceKind>(), Ok(ResourceKind::File));
        assert_eq!("Document".parse::<ResourceKind>(), Ok(ResourceKind::Document));
    }

    #[test]
    fn rejects_unknown_kinds() {
        assert!("video".parse::<ResourceKind>().is_err());
        assert!("".parse::<ResourceKind>().is_err());
        assert!(" link".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn labels_match_messages() {
        assert_eq!(ResourceKind::Link.label(), "Link");
        assert_eq!(ResourceKind::Document.to_string(), "document");
    }
}
