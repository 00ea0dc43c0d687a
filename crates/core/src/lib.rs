//! Domain core for managing trees of nodes.
//!
//! - [`tree`] / [`node`]: entities, input DTOs and field validation
//! - [`repository`]: persistence traits implemented by the storage layer
//! - [`forest`]: flat node listing to parent/child forest
//! - [`cascade`]: recursive subtree deletion
//! - [`sort`]: sibling swaps and sort-order assignment
//! - [`service`]: tree- and node-level operations used by the HTTP layer

pub mod cascade;
pub mod error;
pub mod forest;
pub mod node;
pub mod repository;
pub mod service;
pub mod sort;
pub mod tree;
pub mod types;

#[cfg(test)]
mod test_support;
