use crate::integrations::ClusterInterface;
use crate::utils;

use anyhow::{Result, bail};
use colored::Colorize;
use tabled::{Table, Tabled, settings::Style};
use tracing::error;

#[derive(Tabled)]
struct NodeDisplay {
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Uptime")]
    uptime: String,
}

pub async fn list(api: &impl ClusterInterface) -> Result<()> {
    let mut nodes = match api.fetch_nodes().await {
        Ok(nodes) => nodes,
        Err(e) => {
            error!("{:?}", e);
            bail!("Failed to list cluster nodes: {}", e);
        }
    };
    nodes.sort_by(|a, b| a.node.cmp(&b.node));
    let total = nodes.len();

    if nodes.is_empty() {
        println!("\nNo Nodes found.");
        return Ok(());
    }

    let table_rows: Vec<NodeDisplay> = nodes
        .into_iter()
        .map(|node| {
            let status = node.status.clone().unwrap_or_else(|| "unknown".to_string());
            NodeDisplay {
                status: if node.is_online() {
                    status.green().to_string()
                } else {
                    status.red().to_string()
                },
                cpu: match node.maxcpu {
                    Some(maxcpu) => format!("{} x {}", utils::format_cpu_usage(node.cpu), maxcpu),
                    None => utils::format_cpu_usage(node.cpu),
                },
                memory: match (node.mem, node.maxmem) {
                    (Some(mem), Some(maxmem)) => format!(
                        "{} / {}",
                        utils::format_bytes(mem),
                        utils::format_bytes(maxmem)
                    ),
                    _ => "-".to_string(),
                },
                uptime: utils::format_uptime(node.uptime),
                node: node.node,
            }
        })
        .collect();

    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("\nNodes:");
    println!("{}", table);
    println!("Found {} Nodes.", total);

    Ok(())
}
