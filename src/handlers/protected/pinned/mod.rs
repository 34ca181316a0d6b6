pub mod collection;
pub mod resource;

// Re-export handler functions for use in routing
pub use collection::get as pinned_get;
pub use collection::post as pinned_post;
pub use resource::delete as pinned_delete;
