//! Database models split into domain-specific modules.

pub mod emargement;
pub mod session;
pub mod user;

pub use emargement::*;
pub use session::*;
pub use user::*;
