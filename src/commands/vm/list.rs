use crate::integrations::ClusterInterface;
use crate::models::VmStatus;
use crate::utils;

use anyhow::{Result, bail};
use colored::Colorize;
use tabled::{Table, Tabled, settings::Style};
use tracing::error;

#[derive(Tabled)]
struct VmDisplay {
    #[tabled(rename = "VMID")]
    vmid: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Pool")]
    pool: String,
    #[tabled(rename = "vCPUs")]
    vcpus: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Uptime")]
    uptime: String,
}

pub fn colored_status(status: VmStatus) -> String {
    match status {
        VmStatus::Running => status.to_string().green().to_string(),
        VmStatus::Stopped => status.to_string().red().to_string(),
        VmStatus::Paused => status.to_string().yellow().to_string(),
        VmStatus::Unknown => status.to_string().dimmed().to_string(),
    }
}

pub async fn list(api: &impl ClusterInterface, node: Option<&str>) -> Result<()> {
    let resources = match api.fetch_vm_resources().await {
        Ok(resources) => resources,
        Err(e) => {
            error!("{:?}", e);
            bail!("Failed to list cluster resources: {}", e);
        }
    };

    let mut vms: Vec<_> = resources
        .into_iter()
        .filter(|resource| resource.is_qemu())
        .filter(|resource| match node {
            Some(node) => resource.node.as_deref() == Some(node),
            None => true,
        })
        .collect();
    vms.sort_by_key(|resource| resource.vmid);
    let total = vms.len();

    if vms.is_empty() {
        println!("\nNo VMs found.");
        return Ok(());
    }

    let table_rows: Vec<VmDisplay> = vms
        .into_iter()
        .map(|resource| VmDisplay {
            vmid: resource.vmid.unwrap_or_default(),
            status: colored_status(VmStatus::from(resource.status.as_deref().unwrap_or(""))),
            vcpus: match resource.maxcpu {
                Some(maxcpu) => maxcpu.to_string(),
                None => "-".to_string(),
            },
            memory: match resource.maxmem {
                Some(maxmem) => utils::format_bytes(maxmem),
                None => "-".to_string(),
            },
            uptime: utils::format_uptime(resource.uptime),
            name: resource.name.unwrap_or_default(),
            node: resource.node.unwrap_or_default(),
            pool: resource.pool.unwrap_or_default(),
        })
        .collect();

    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("\nVirtual Machines:");
    println!("{}", table);
    println!("Found {} VMs.", total);

    Ok(())
}
