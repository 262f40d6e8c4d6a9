pub mod entity;
mod identity;
mod repository;
mod session;

pub use entity::{Entity, Shared};
pub use identity::IdentityMap;
pub use repository::Repository;
pub use session::Session;
