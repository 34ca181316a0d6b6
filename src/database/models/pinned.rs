use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::types::{ResourceId, ResourceKind};

/// Per-user container of pinned resource references.
///
/// Each collection is an independent set of ids into the matching catalog.
/// Ordered sets keep the API output stable (ascending id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedResourceSet {
    pub id: Uuid,
    pub owner: Uuid,
    pub documents: BTreeSet<ResourceId>,
    pub links: BTreeSet<ResourceId>,
    pub files: BTreeSet<ResourceId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PinnedResourceSet {
    pub fn new(owner: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner,
            documents: BTreeSet::new(),
            links: BTreeSet::new(),
            files: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn collection(&self, kind: ResourceKind) -> &BTreeSet<ResourceId> {
        match kind {
            ResourceKind::Document => &self.documents,
            ResourceKind::Link => &self.links,
            ResourceKind::File => &self.files,
        }
    }

    fn collection_mut(&mut self, kind: ResourceKind) -> &mut BTreeSet<ResourceId> {
        match kind {
            ResourceKind::Document => &mut self.documents,
            ResourceKind::Link => &mut self.links,
            ResourceKind::File => &mut self.files,
        }
    }

    /// Adds references of one kind. Returns how many were not already pinned.
    pub fn pin<I>(&mut self, kind: ResourceKind, ids: I) -> usize
    where
        I: IntoIterator<Item = ResourceId>,
    {
        let collection = self.collection_mut(kind);
        let added = ids.into_iter().filter(|id| collection.insert(*id)).count();
        if added > 0 {
            self.updated_at = Utc::now();
        }
        added
    }

    /// Removes one reference. Removing an id that is not pinned is a no-op.
    pub fn unpin(&mut self, kind: ResourceKind, id: ResourceId) -> bool {
        let removed = self.collection_mut(kind).remove(&id);
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    pub fn contains(&self, kind: ResourceKind, id: ResourceId) -> bool {
        self.collection(kind).contains(&id)
    }

    pub fn len(&self) -> usize {
        self.documents.len() + self.links.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ids to union into a pinned set, grouped by kind.
/// Produced by the serializer once every id has been resolved against its catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinnedIds {
    pub documents: Vec<ResourceId>,
    pub links: Vec<ResourceId>,
    pub files: Vec<ResourceId>,
}

impl PinnedIds {
    pub fn get(&self, kind: ResourceKind) -> &[ResourceId] {
        match kind {
            ResourceKind::Document => &self.documents,
            ResourceKind::Link => &self.links,
            ResourceKind::File => &self.files,
        }
    }

    pub fn set(&mut self, kind: ResourceKind, ids: Vec<ResourceId>) {
        match kind {
            ResourceKind::Document => self.documents = ids,
            ResourceKind::Link => self.links = ids,
            ResourceKind::File => self.files = ids,
        }
    }
}
