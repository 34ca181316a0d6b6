pub mod format;

pub use format::{MessageResponse, PinRequest, PinnedResourcesView};
