pub mod graph;
pub mod instance;
pub mod sparse_set;
pub mod union_find;
