//! Repository structs, one per table, plus the [`PgStore`] adapter.

pub mod store;
pub mod tree_node_repo;
pub mod tree_repo;

pub use store::PgStore;
pub use tree_node_repo::TreeNodeRepo;
pub use tree_repo::TreeRepo;
