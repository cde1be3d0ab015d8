pub mod node;
pub mod vm;
