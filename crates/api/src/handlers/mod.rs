pub mod node;
pub mod pages;
pub mod tree;
