pub mod cluster_interface;
pub mod data_transfer_objects;
pub mod providers;

pub use cluster_interface::*;
