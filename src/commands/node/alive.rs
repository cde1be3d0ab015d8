use crate::integrations::ClusterInterface;
use crate::models::{NodeReachability, probe_node};

use anyhow::{Result, bail};
use colored::Colorize;
use tracing::error;

pub async fn alive(api: &impl ClusterInterface, node: &str) -> Result<()> {
    let reachability = match probe_node(api, node).await {
        Ok(reachability) => reachability,
        Err(e) => {
            error!("{:?}", e);
            bail!("Failed to probe node '{}': {}", node, e);
        }
    };

    let label = match reachability {
        NodeReachability::Online => reachability.to_string().green(),
        NodeReachability::Unreachable => reachability.to_string().red(),
        NodeReachability::NotInCluster => reachability.to_string().yellow(),
    };
    println!("{:<20}: {}", node, label);

    if reachability != NodeReachability::Online {
        bail!("Node '{}' is not alive", node);
    }
    Ok(())
}
