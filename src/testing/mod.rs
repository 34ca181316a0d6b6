use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::database::models::{DocumentSummary, FileSummary, LinkSummary};
use crate::state::AppState;
use crate::store::{MemoryCatalog, MemoryPinStore};
use crate::types::ResourceId;

pub const TEST_SECRET: &str = "test-secret";

/// Ids of the resources seeded into the test catalog
#[derive(Debug, Clone, Copy)]
pub struct SeededIds {
    pub document_1: ResourceId,
    pub link_1: ResourceId,
    pub link_2: ResourceId,
    pub file_1: ResourceId,
}

/// Memory-backed state with one document, two links and one file in the catalog
pub async fn seeded_state() -> (AppState, SeededIds) {
    let (state, _, ids) = seeded_state_with_catalog().await;
    (state, ids)
}

/// Same as `seeded_state`, also handing back the catalog so tests can delete resources
pub async fn seeded_state_with_catalog() -> (AppState, MemoryCatalog, SeededIds) {
    let catalog = MemoryCatalog::new();
    let ids = SeededIds {
        document_1: 1,
        link_1: 10,
        link_2: 11,
        file_1: 20,
    };

    catalog
        .insert_document(DocumentSummary {
            id: ids.document_1,
            title: "hello world".to_string(),
            resource_type: "Document".to_string(),
            updated_at: None,
        })
        .await;
    catalog
        .insert_link(LinkSummary {
            id: ids.link_1,
            title: "Cultural Studies Lecture".to_string(),
            link: "https://www.youtube.com/watch?v=-W89X9GsKyE".to_string(),
            resource_type: "Link".to_string(),
        })
        .await;
    catalog
        .insert_link(LinkSummary {
            id: ids.link_2,
            title: "Science lab lecture".to_string(),
            link: "https://www.youtube.com/watch?v=-W89X9GsyE".to_string(),
            resource_type: "Link".to_string(),
        })
        .await;
    catalog
        .insert_file(FileSummary {
            id: ids.file_1,
            file_name: "Hey Notes".to_string(),
            file_upload: "/media/uploads/calc-notes.pdf".to_string(),
            resource_type: "PDF".to_string(),
        })
        .await;

    let state = AppState::new(Arc::new(MemoryPinStore::new()), Arc::new(catalog.clone()), TEST_SECRET);
    (state, catalog, ids)
}

/// Bearer token for `user_id`, signed with the test secret
pub fn token_for(user_id: Uuid, access: &str) -> String {
    let claims = Claims::new("test@gmail.com".to_string(), user_id, access.to_string(), 1);
    generate_jwt(&claims, TEST_SECRET).expect("test token")
}
