pub mod pinned;
pub mod resource;

pub use pinned::{PinnedIds, PinnedResourceSet};
pub use resource::{DocumentSummary, FileSummary, LinkSummary};
