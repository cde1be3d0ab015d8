use crate::errors::{ProxmoxError, ProxmoxResult};
use crate::integrations::ClusterInterface;

use std::fmt;
use tracing::{error, info, warn};

/// HTTP status Proxmox uses when the contacted node cannot reach the target node.
const NODE_UNREACHABLE_STATUS: u16 = 595;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeReachability {
    Online,
    Unreachable,
    NotInCluster,
}

impl fmt::Display for NodeReachability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reachability_str = match self {
            NodeReachability::Online => "online",
            NodeReachability::Unreachable => "unreachable",
            NodeReachability::NotInCluster => "not in cluster",
        };
        write!(f, "{}", reachability_str)
    }
}

/// Checks cluster membership first, then probes the node's own status endpoint.
pub async fn probe_node(api: &impl ClusterInterface, node: &str) -> ProxmoxResult<NodeReachability> {
    let nodes = api.fetch_nodes().await?;
    if !nodes.iter().any(|n| n.node == node) {
        info!("Node '{}' is not a member of the cluster", node);
        return Ok(NodeReachability::NotInCluster);
    }

    match api.fetch_node_status(node).await {
        Ok(_) => Ok(NodeReachability::Online),
        Err(e) if e.is_connection() => {
            warn!("Node '{}' unreachable: {}", node, e);
            Ok(NodeReachability::Unreachable)
        }
        Err(ProxmoxError::Api { status, message }) if status == NODE_UNREACHABLE_STATUS => {
            warn!("Node '{}' unreachable: {}", node, message);
            Ok(NodeReachability::Unreachable)
        }
        Err(e) => Err(e),
    }
}

/// Useful for stopping automation against nodes that are down. Any failure,
/// including failing to list the cluster nodes, counts as not alive.
pub async fn is_node_alive(api: &impl ClusterInterface, node: &str) -> bool {
    match probe_node(api, node).await {
        Ok(reachability) => reachability == NodeReachability::Online,
        Err(e) => {
            error!("Failed probing node '{}': {}", node, e);
            false
        }
    }
}
