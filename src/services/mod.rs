pub mod pinned_service;

pub use pinned_service::{PinOutcome, PinnedResourceService};
