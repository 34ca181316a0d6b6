use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{AddOutcome, PinStore, ResourceCatalog, StoreError};
use crate::database::models::{DocumentSummary, FileSummary, LinkSummary, PinnedIds, PinnedResourceSet};
use crate::types::{ResourceId, ResourceKind};

/// In-process pinned sets, keyed by owner
#[derive(Clone, Default)]
pub struct MemoryPinStore {
    sets: Arc<RwLock<HashMap<Uuid, PinnedResourceSet>>>,
}

impl MemoryPinStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PinStore for MemoryPinStore {
    async fn find(&self, owner: Uuid) -> Result<Option<PinnedResourceSet>, StoreError> {
        Ok(self.sets.read().await.get(&owner).cloned())
    }

    async fn add(&self, owner: Uuid, additions: &PinnedIds) -> Result<AddOutcome, StoreError> {
        let mut sets = self.sets.write().await;
        let (set, created) = match sets.entry(owner) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => {
                info!("Creating pinned resource set for user {}", owner);
                (entry.insert(PinnedResourceSet::new(owner)), true)
            }
        };
        for kind in ResourceKind::ALL {
            set.pin(kind, additions.get(kind).iter().copied());
        }
        Ok(AddOutcome {
            set: set.clone(),
            created,
        })
    }

    async fn remove(&self, owner: Uuid, kind: ResourceKind, id: ResourceId) -> Result<(), StoreError> {
        let mut sets = self.sets.write().await;
        let set = sets
            .get_mut(&owner)
            .ok_or_else(|| StoreError::NotFound(format!("No pinned resources for user {}", owner)))?;
        set.unpin(kind, id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Seed data for the in-memory catalog, loaded from YAML or JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFixtures {
    #[serde(default)]
    pub documents: Vec<DocumentSummary>,
    #[serde(default)]
    pub links: Vec<LinkSummary>,
    #[serde(default)]
    pub files: Vec<FileSummary>,
}

impl CatalogFixtures {
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Fixture(format!("{}: {}", path.display(), e)))?;
        // YAML is a superset of JSON, so one parser covers both formats
        serde_yaml::from_str(&raw).map_err(|e| StoreError::Fixture(format!("{}: {}", path.display(), e)))
    }
}

#[derive(Default)]
struct CatalogData {
    documents: BTreeMap<ResourceId, DocumentSummary>,
    links: BTreeMap<ResourceId, LinkSummary>,
    files: BTreeMap<ResourceId, FileSummary>,
}

impl CatalogData {
    fn contains(&self, kind: ResourceKind, id: ResourceId) -> bool {
        match kind {
            ResourceKind::Document => self.documents.contains_key(&id),
            ResourceKind::Link => self.links.contains_key(&id),
            ResourceKind::File => self.files.contains_key(&id),
        }
    }
}

/// Stand-in for the external document, link and file stores
#[derive(Clone, Default)]
pub struct MemoryCatalog {
    data: Arc<RwLock<CatalogData>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixtures(fixtures: CatalogFixtures) -> Self {
        let data = CatalogData {
            documents: fixtures.documents.into_iter().map(|d| (d.id, d)).collect(),
            links: fixtures.links.into_iter().map(|l| (l.id, l)).collect(),
            files: fixtures.files.into_iter().map(|f| (f.id, f)).collect(),
        };
        info!(
            "Loaded catalog fixtures: {} documents, {} links, {} files",
            data.documents.len(),
            data.links.len(),
            data.files.len()
        );
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }

    pub async fn insert_document(&self, document: DocumentSummary) {
        self.data.write().await.documents.insert(document.id, document);
    }

    pub async fn insert_link(&self, link: LinkSummary) {
        self.data.write().await.links.insert(link.id, link);
    }

    pub async fn insert_file(&self, file: FileSummary) {
        self.data.write().await.files.insert(file.id, file);
    }

    /// Deletes a resource from its catalog, leaving any pinned reference dangling
    pub async fn delete(&self, kind: ResourceKind, id: ResourceId) -> bool {
        let mut data = self.data.write().await;
        match kind {
            ResourceKind::Document => data.documents.remove(&id).is_some(),
            ResourceKind::Link => data.links.remove(&id).is_some(),
            ResourceKind::File => data.files.remove(&id).is_some(),
        }
    }
}

fn lookup<T: Clone>(rows: &BTreeMap<ResourceId, T>, ids: &[ResourceId]) -> Vec<T> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids.iter().filter_map(|id| rows.get(id).cloned()).collect()
}

#[async_trait]
impl ResourceCatalog for MemoryCatalog {
    async fn existing(&self, kind: ResourceKind, ids: &[ResourceId]) -> Result<Vec<ResourceId>, StoreError> {
        let data = self.data.read().await;
        Ok(ids.iter().copied().filter(|id| data.contains(kind, *id)).collect())
    }

    async fn documents(&self, ids: &[ResourceId]) -> Result<Vec<DocumentSummary>, StoreError> {
        Ok(lookup(&self.data.read().await.documents, ids))
    }

    async fn links(&self, ids: &[ResourceId]) -> Result<Vec<LinkSummary>, StoreError> {
        Ok(lookup(&self.data.read().await.links, ids))
    }

    async fn files(&self, ids: &[ResourceId]) -> Result<Vec<FileSummary>, StoreError> {
        Ok(lookup(&self.data.read().await.files, ids))
    }
}
