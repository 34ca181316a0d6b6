use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::format::{self, PinRequest, PinnedResourcesView};
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{AddOutcome, PinStore, ResourceCatalog};
use crate::types::{ResourceId, ResourceKind};

/// Outcome of a pin request
#[derive(Debug, Clone, PartialEq)]
pub struct PinOutcome {
    pub view: PinnedResourcesView,
    /// True when this request created the caller's pinned set
    pub created: bool,
}

/// Pinned resource operations, always scoped to a single owner
pub struct PinnedResourceService {
    pins: Arc<dyn PinStore>,
    catalog: Arc<dyn ResourceCatalog>,
}

impl PinnedResourceService {
    pub fn new(pins: Arc<dyn PinStore>, catalog: Arc<dyn ResourceCatalog>) -> Self {
        Self { pins, catalog }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.pins.clone(), state.catalog.clone())
    }

    /// The owner's pinned resources, expanded. Users without a set get empty lists.
    pub async fn list(&self, owner: Uuid) -> Result<PinnedResourcesView, ApiError> {
        let Some(set) = self.pins.find(owner).await? else {
            debug!("No pinned resources yet for user {}", owner);
            return Ok(PinnedResourcesView::default());
        };

        let view = format::expand(&set, self.catalog.as_ref()).await?;
        debug!("Loaded {} pinned resource(s) for user {}", view.len(), owner);
        Ok(view)
    }

    /// Union the requested ids into the owner's set, creating it on first use
    pub async fn pin(&self, owner: Uuid, request: &PinRequest) -> Result<PinOutcome, ApiError> {
        let additions = format::resolve(request, self.catalog.as_ref()).await?;
        let AddOutcome { set, created } = self.pins.add(owner, &additions).await?;
        info!(
            "Pinned {} document(s), {} link(s), {} file(s) for user {}",
            additions.documents.len(),
            additions.links.len(),
            additions.files.len(),
            owner
        );

        let view = format::expand(&set, self.catalog.as_ref()).await?;
        Ok(PinOutcome { view, created })
    }

    /// Remove one reference from the owner's set. Fails if the owner has no set.
    pub async fn unpin(&self, owner: Uuid, kind: ResourceKind, id: ResourceId) -> Result<(), ApiError> {
        self.pins.remove(owner, kind, id).await?;
        info!("Unpinned {} {} for user {}", kind, id, owner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::seeded_state;

    #[tokio::test]
    async fn list_without_set_is_empty() {
        let (state, _) = seeded_state().await;
        let service = PinnedResourceService::from_state(&state);
        assert!(service.list(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pin_reports_creation_once() {
        let (state, fixtures) = seeded_state().await;
        let service = PinnedResourceService::from_state(&state);
        let owner = Uuid::new_v4();

        let request = PinRequest {
            link: Some(vec![fixtures.link_1]),
            ..Default::default()
        };
        assert!(service.pin(owner, &request).await.unwrap().created);

        let request = PinRequest {
            file: Some(vec![fixtures.file_1]),
            ..Default::default()
        };
        let outcome = service.pin(owner, &request).await.unwrap();
        assert!(!outcome.created);
        assert_eq!(outcome.view.link.len(), 1);
        assert_eq!(outcome.view.file.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_first_pins_report_creation_once() {
        let (state, fixtures) = seeded_state().await;
        let service = PinnedResourceService::from_state(&state);
        let owner = Uuid::new_v4();

        let links = PinRequest {
            link: Some(vec![fixtures.link_1]),
            ..Default::default()
        };
        let files = PinRequest {
            file: Some(vec![fixtures.file_1]),
            ..Default::default()
        };
        let (a, b) = tokio::join!(service.pin(owner, &links), service.pin(owner, &files));
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!([a.created, b.created].iter().filter(|c| **c).count(), 1);

        let view = service.list(owner).await.unwrap();
        assert_eq!(view.link.len(), 1);
        assert_eq!(view.file.len(), 1);
    }

    #[tokio::test]
    async fn failed_pin_writes_nothing() {
        let (state, fixtures) = seeded_state().await;
        let service = PinnedResourceService::from_state(&state);
        let owner = Uuid::new_v4();

        let request = PinRequest {
            document: Some(vec![fixtures.document_1]),
            link: Some(vec![9999]),
            ..Default::default()
        };
        assert!(service.pin(owner, &request).await.is_err());
        assert!(state.pins.find(owner).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unpin_without_set_is_not_found() {
        let (state, _) = seeded_state().await;
        let service = PinnedResourceService::from_state(&state);
        let err = service.unpin(Uuid::new_v4(), ResourceKind::File, 1).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }
}
