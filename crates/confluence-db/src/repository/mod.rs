//! SurrealDB repository implementations.

mod application;
mod identity;
mod session;

pub use application::SurrealApplicationRepository;
pub use identity::SurrealIdentityRepository;
pub use session::SurrealSessionRepository;
