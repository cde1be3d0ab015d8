mod cluster_resource;
mod ha_resource;
mod node_list_item;
mod vm_action;
mod vm_config;

pub use cluster_resource::*;
pub use ha_resource::*;
pub use node_list_item::*;
pub use vm_action::*;
pub use vm_config::*;
