//! Persistence seams for the pinned resources feature.
//!
//! `PinStore` owns the per-user pinned sets. `ResourceCatalog` fronts the
//! document, link and file stores that own the actual resources; this crate
//! only reads from them.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{DocumentSummary, FileSummary, LinkSummary, PinnedIds, PinnedResourceSet};
use crate::database::DatabaseError;
use crate::types::{ResourceId, ResourceKind};

pub use memory::{CatalogFixtures, MemoryCatalog, MemoryPinStore};
pub use postgres::{PgCatalog, PgPinStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{kind} ids do not exist: {ids:?}")]
    MissingResources {
        kind: ResourceKind,
        ids: Vec<ResourceId>,
    },

    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Result of `PinStore::add`
#[derive(Debug, Clone, PartialEq)]
pub struct AddOutcome {
    pub set: PinnedResourceSet,
    /// True when this call inserted the owner's set
    pub created: bool,
}

#[async_trait]
pub trait PinStore: Send + Sync {
    /// The owner's pinned set, if one has been created
    async fn find(&self, owner: Uuid) -> Result<Option<PinnedResourceSet>, StoreError>;

    /// Union `additions` into the owner's set, creating the set on first use.
    /// Applied atomically: either every id is added or none is. Of several
    /// concurrent first calls for one owner, exactly one reports `created`.
    /// Ids missing from the catalog at write time fail with `MissingResources`.
    async fn add(&self, owner: Uuid, additions: &PinnedIds) -> Result<AddOutcome, StoreError>;

    /// Remove one reference. Fails with `NotFound` when the owner has no set;
    /// an id that is not pinned is left alone.
    async fn remove(&self, owner: Uuid, kind: ResourceKind, id: ResourceId) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ResourceCatalog: Send + Sync {
    /// The subset of `ids` that exist in the catalog for `kind`
    async fn existing(&self, kind: ResourceKind, ids: &[ResourceId]) -> Result<Vec<ResourceId>, StoreError>;

    // Summary lookups skip ids the catalog no longer knows and return rows by ascending id.
    async fn documents(&self, ids: &[ResourceId]) -> Result<Vec<DocumentSummary>, StoreError>;
    async fn links(&self, ids: &[ResourceId]) -> Result<Vec<LinkSummary>, StoreError>;
    async fn files(&self, ids: &[ResourceId]) -> Result<Vec<FileSummary>, StoreError>;
}
