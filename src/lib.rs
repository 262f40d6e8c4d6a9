pub mod app;
pub mod cli;
pub mod commands;
pub mod configuration;
pub mod context;
pub mod model;
pub mod orm;
pub mod seed;
pub mod storage;
pub mod tracing;

pub use model::{Department, Employee};
pub use orm::{Entity, IdentityMap, Repository, Session, Shared};
pub use storage::{SqliteStorage, StoreError};
