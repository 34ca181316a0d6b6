//! JSON mapping for pinned resource sets.
//!
//! Write path: a `PinRequest` of raw ids is resolved against the catalogs into
//! `PinnedIds`. Read path: a `PinnedResourceSet` is expanded into the summaries
//! the catalogs expose.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::database::models::{DocumentSummary, FileSummary, LinkSummary, PinnedIds, PinnedResourceSet};
use crate::error::ApiError;
use crate::store::{ResourceCatalog, StoreError};
use crate::types::{ResourceId, ResourceKind};

/// Expanded pinned set as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PinnedResourcesView {
    pub document: Vec<DocumentSummary>,
    pub link: Vec<LinkSummary>,
    pub file: Vec<FileSummary>,
}

impl PinnedResourcesView {
    pub fn len(&self) -> usize {
        self.document.len() + self.link.len() + self.file.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pin payload; each field is optional and absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PinRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Vec<ResourceId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Vec<ResourceId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<Vec<ResourceId>>,
}

impl PinRequest {
    pub fn field(&self, kind: ResourceKind) -> Option<&[ResourceId]> {
        match kind {
            ResourceKind::Document => self.document.as_deref(),
            ResourceKind::Link => self.link.as_deref(),
            ResourceKind::File => self.file.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(rename = "Message")]
    pub message: String,
}

impl MessageResponse {
    pub fn removed(kind: ResourceKind) -> Self {
        Self {
            message: format!("{} successfully removed", kind.label()),
        }
    }
}

/// Resolve every present field against its catalog.
/// Fails on the first kind that references ids the catalog does not hold.
pub async fn resolve(request: &PinRequest, catalog: &dyn ResourceCatalog) -> Result<PinnedIds, ApiError> {
    let mut field_errors = HashMap::new();
    for kind in ResourceKind::ALL {
        if let Some(bad) = request.field(kind).and_then(|ids| ids.iter().find(|id| **id <= 0)) {
            field_errors.insert(kind.tag().to_string(), format!("Invalid id {}", bad));
        }
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error("Invalid resource ids", Some(field_errors)));
    }

    let mut resolved = PinnedIds::default();
    for kind in ResourceKind::ALL {
        let Some(ids) = request.field(kind) else {
            continue;
        };
        let mut wanted = ids.to_vec();
        wanted.sort_unstable();
        wanted.dedup();

        let existing = catalog.existing(kind, &wanted).await?;
        let missing: Vec<ResourceId> = wanted.iter().copied().filter(|id| !existing.contains(id)).collect();
        if !missing.is_empty() {
            return Err(StoreError::MissingResources { kind, ids: missing }.into());
        }
        resolved.set(kind, wanted);
    }
    Ok(resolved)
}

/// Expand a pinned set into summaries, one batched catalog query per kind.
/// References whose resource has since been deleted are dropped.
pub async fn expand(set: &PinnedResourceSet, catalog: &dyn ResourceCatalog) -> Result<PinnedResourcesView, StoreError> {
    let documents: Vec<ResourceId> = set.documents.iter().copied().collect();
    let links: Vec<ResourceId> = set.links.iter().copied().collect();
    let files: Vec<ResourceId> = set.files.iter().copied().collect();

    let (document, link, file) = futures::try_join!(
        catalog.documents(&documents),
        catalog.links(&links),
        catalog.files(&files),
    )?;

    Ok(PinnedResourcesView { document, link, file })
}
