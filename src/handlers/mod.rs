// handlers/mod.rs
//
// Public (no auth) routes live in routes.rs; everything under protected
// runs behind the JWT middleware and is scoped to the authenticated user.
pub mod protected;

pub use protected::*;
