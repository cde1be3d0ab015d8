use crate::errors::{ProxmoxError, ProxmoxResult};
use crate::integrations::ClusterInterface;
use crate::integrations::data_transfer_objects::ClusterResource;
use crate::models::{VmStatus, sanitize_dns_name};

use tracing::{info, warn};

mod high_availability;
mod lifecycle;
mod network;

pub use lifecycle::{Migration, PowerTransition};

/// Maximum memory of a VM, tagged with the unit it was obtained in.
///
/// The cluster resource list reports bytes while the VM config takes MiB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemorySize {
    Bytes(u64),
    Mebibytes(u64),
}

impl MemorySize {
    pub fn as_bytes(&self) -> u64 {
        match *self {
            MemorySize::Bytes(bytes) => bytes,
            MemorySize::Mebibytes(mib) => mib.saturating_mul(1024 * 1024),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceUsage {
    pub cpu: Option<f64>,
    pub disk: Option<u64>,
    pub memory: Option<u64>,
    pub uptime: Option<u64>,
}

/// Handle to one QEMU VM of the cluster.
///
/// Attributes are cached from the cluster resource list when the handle is
/// created. Mutators push the change to the API and then update the cache
/// without reading it back, which marks the handle stale until [`refresh`].
///
/// [`refresh`]: VirtualMachine::refresh
pub struct VirtualMachine<'a, C: ClusterInterface> {
    api: &'a C,
    vmid: u32,
    node: String,
    pool: Option<String>,
    name: Option<String>,
    tags: Vec<String>,
    cpu: Option<f64>,
    disk: Option<u64>,
    mem: Option<u64>,
    maxcpu: Option<f64>,
    maxdisk: Option<u64>,
    maxmem: Option<MemorySize>,
    status: VmStatus,
    storage: Option<String>,
    uptime: Option<u64>,
    stale: bool,
}

impl<'a, C: ClusterInterface> VirtualMachine<'a, C> {
    /// Resolves `vmid` against the cluster resource list.
    pub async fn fetch(api: &'a C, vmid: u32) -> ProxmoxResult<Self> {
        let resource = Self::find_resource(api, vmid).await?;
        Self::from_resource(api, vmid, resource)
    }

    async fn find_resource(api: &C, vmid: u32) -> ProxmoxResult<ClusterResource> {
        let resources = api.fetch_vm_resources().await?;
        match resources
            .into_iter()
            .find(|resource| resource.vmid == Some(vmid) && resource.is_qemu())
        {
            Some(resource) => Ok(resource),
            None => {
                warn!("VM {} not found in the cluster resource list", vmid);
                Err(ProxmoxError::VmNotFound { vmid })
            }
        }
    }

    fn from_resource(api: &'a C, vmid: u32, resource: ClusterResource) -> ProxmoxResult<Self> {
        let node = match &resource.node {
            Some(node) => node.clone(),
            None => {
                return Err(ProxmoxError::Response(format!(
                    "Cluster resource '{}' has no node",
                    resource.id
                )));
            }
        };
        let status = match resource.status.as_deref() {
            Some(status) => VmStatus::from(status),
            None => VmStatus::Unknown,
        };

        Ok(Self {
            api,
            vmid,
            node,
            tags: resource.tag_list(),
            pool: resource.pool,
            name: resource.name,
            cpu: resource.cpu,
            disk: resource.disk,
            mem: resource.mem,
            maxcpu: resource.maxcpu,
            maxdisk: resource.maxdisk,
            maxmem: resource.maxmem.map(MemorySize::Bytes),
            status,
            storage: resource.storage,
            uptime: resource.uptime,
            stale: false,
        })
    }

    /// Re-reads every cached attribute from the cluster.
    pub async fn refresh(&mut self) -> ProxmoxResult<()> {
        let resource = Self::find_resource(self.api, self.vmid).await?;
        *self = Self::from_resource(self.api, self.vmid, resource)?;
        Ok(())
    }

    /// Re-confirms which node currently hosts the VM.
    pub async fn locate(&mut self) -> ProxmoxResult<&str> {
        let resource = Self::find_resource(self.api, self.vmid).await?;
        if let Some(node) = resource.node {
            self.node = node;
        }
        Ok(&self.node)
    }

    /// Node to address a write to. A stale handle may have moved, so its node
    /// is re-confirmed first.
    async fn current_node(&mut self) -> ProxmoxResult<String> {
        if self.stale {
            self.locate().await?;
        }
        Ok(self.node.clone())
    }

    pub fn vmid(&self) -> u32 {
        self.vmid
    }

    pub fn node(&self) -> &str {
        &self.node
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn status(&self) -> VmStatus {
        self.status
    }

    pub fn storage(&self) -> Option<&str> {
        self.storage.as_deref()
    }

    pub fn uptime(&self) -> Option<u64> {
        self.uptime
    }

    pub fn max_cpu(&self) -> Option<f64> {
        self.maxcpu
    }

    pub fn max_disk(&self) -> Option<u64> {
        self.maxdisk
    }

    pub fn max_memory(&self) -> Option<MemorySize> {
        self.maxmem
    }

    /// True once a mutator has written to the cache without reading it back.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn resource_usage(&self) -> ResourceUsage {
        ResourceUsage {
            cpu: self.cpu,
            disk: self.disk,
            memory: self.mem,
            uptime: self.uptime,
        }
    }

    /// Returns the resource pool, reading the VM config when it is not cached.
    pub async fn pool(&mut self) -> ProxmoxResult<Option<String>> {
        if self.pool.is_none() {
            let config = self.api.fetch_vm_config(&self.node, self.vmid).await?;
            self.pool = config.get_str("pool").map(String::from);
        }
        Ok(self.pool.clone())
    }

    /// Renames the VM to the DNS-safe form of `new_name` and returns that form.
    pub async fn set_name(&mut self, new_name: &str) -> ProxmoxResult<String> {
        let sanitized_name = sanitize_dns_name(new_name);
        if sanitized_name.is_empty() {
            return Err(ProxmoxError::validation(
                "name",
                format!("'{}' has no characters usable in a DNS name", new_name),
            ));
        }

        let node = self.current_node().await?;
        self.api
            .update_vm_config(&node, self.vmid, &[("name", sanitized_name.clone())])
            .await?;
        info!("VM {} renamed to '{}'", self.vmid, sanitized_name);

        self.name = Some(sanitized_name.clone());
        self.stale = true;
        Ok(sanitized_name)
    }

    pub async fn set_pool(&mut self, resource_pool_name: &str) -> ProxmoxResult<()> {
        if resource_pool_name.trim().is_empty() {
            return Err(ProxmoxError::validation("pool", "name must not be empty"));
        }

        self.api
            .update_pool_members(resource_pool_name, self.vmid, true)
            .await?;
        info!("VM {} moved to pool '{}'", self.vmid, resource_pool_name);

        self.pool = Some(resource_pool_name.to_string());
        self.stale = true;
        Ok(())
    }

    pub async fn set_cpu(&mut self, cores: u32, sockets: u32) -> ProxmoxResult<()> {
        if cores == 0 || sockets == 0 {
            return Err(ProxmoxError::validation(
                "cpu",
                "cores and sockets must be at least 1",
            ));
        }
        let total = match cores.checked_mul(sockets) {
            Some(total) => total,
            None => {
                return Err(ProxmoxError::validation("cpu", "core count overflows"));
            }
        };

        let node = self.current_node().await?;
        self.api
            .update_vm_config(
                &node,
                self.vmid,
                &[("sockets", sockets.to_string()), ("cores", cores.to_string())],
            )
            .await?;
        info!(
            "CPU configuration of VM {} set to {} socket(s) with {} core(s) each",
            self.vmid, sockets, cores
        );

        self.maxcpu = Some(f64::from(total));
        self.stale = true;
        Ok(())
    }

    /// Sets the VM memory in GB; the API takes the value in MiB.
    pub async fn set_memory(&mut self, memory_gb: u64) -> ProxmoxResult<()> {
        if memory_gb == 0 {
            return Err(ProxmoxError::validation("memory", "must be at least 1 GB"));
        }
        let memory_mb = match memory_gb.checked_mul(1024) {
            Some(memory_mb) => memory_mb,
            None => {
                return Err(ProxmoxError::validation(
                    "memory",
                    format!("{} GB is out of range", memory_gb),
                ));
            }
        };

        let node = self.current_node().await?;
        self.api
            .update_vm_config(&node, self.vmid, &[("memory", memory_mb.to_string())])
            .await?;
        info!("Memory of VM {} set to {} GB", self.vmid, memory_gb);

        self.maxmem = Some(MemorySize::Mebibytes(memory_mb));
        self.stale = true;
        Ok(())
    }

    /// Total vCPUs (`sockets * cores`) from the current VM config.
    pub async fn num_cpus(&self) -> ProxmoxResult<u64> {
        let config = self.api.fetch_vm_config(&self.node, self.vmid).await?;
        let sockets = config.get_u64("sockets").unwrap_or(1);
        let cores = config.get_u64("cores").unwrap_or(1);
        Ok(sockets * cores)
    }

    /// Configured memory in whole GB from the current VM config.
    pub async fn memory_gb(&self) -> ProxmoxResult<u64> {
        let config = self.api.fetch_vm_config(&self.node, self.vmid).await?;
        let memory_mb = config.get_u64("memory").unwrap_or(0);
        Ok(memory_mb / 1024)
    }
}
