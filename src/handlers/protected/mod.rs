// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Route Prefix: /pinned-resources
// Middleware: JWT validation, AuthUser injected as a request extension
pub mod pinned;

pub use pinned::*;
