pub mod proxmox;

#[cfg(test)]
pub mod mock;
