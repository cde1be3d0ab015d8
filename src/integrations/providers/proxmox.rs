mod cluster_api;
mod interface;

pub use interface::*;
