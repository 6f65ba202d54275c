//! Authentication and authorization
//!
//! - [`jwt`] — bearer token verification (HS256, issuer/audience pinned)
//! - [`identity`] — identity adapter with role resolution and reload
//! - [`middleware`] — `require_auth` / `require_role` axum layers
//! - [`extractor`] — `CurrentUser` as a handler argument

mod extractor;
mod identity;
mod jwt;
mod middleware;

pub use identity::{CurrentUser, IdentityService};
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{CurrentUserExt, require_auth, require_role};
