pub mod dns_name;
pub mod network_adapter;
pub mod node;
pub mod virtual_machine;
pub mod vm_status;

pub use dns_name::*;
pub use node::*;
pub use virtual_machine::*;
pub use vm_status::*;
