use super::Drillbit;
use crate::context::Context;
use crate::error::ClientError;

use async_trait::async_trait;
use std::collections::HashMap;


/// Resolves the drillbits of a cluster from a ZooKeeper quorum.
///
/// The ZooKeeper protocol itself lives outside this crate; a locator is the
/// seam where an implementation plugs in.
#[async_trait]
pub trait DrillbitLocator: Send + Sync {
    async fn locate(
        &self,
        ctx: &Context,
        zk_nodes: &[String],
        cluster: &str,
    ) -> Result<Vec<Drillbit>, ClientError>;
}


/// A locator backed by a fixed cluster → drillbits table.
///
/// Handy when drillbit addresses are already known, and in tests.
#[derive(Clone, Debug, Default)]
pub struct StaticLocator {
    clusters: HashMap<String, Vec<Drillbit>>,
}

impl StaticLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cluster(mut self, cluster: impl Into<String>, drillbits: Vec<Drillbit>) -> Self {
        self.clusters.insert(cluster.into(), drillbits);
        self
    }
}

#[async_trait]
impl DrillbitLocator for StaticLocator {
    async fn locate(
        &self,
        _ctx: &Context,
        zk_nodes: &[String],
        cluster: &str,
    ) -> Result<Vec<Drillbit>, ClientError> {
        let drillbits = self.clusters.get(cluster).cloned().unwrap_or_default();
        tracing::debug!(
            "Located {} drillbit(s) for cluster '{}' via {:?}",
            drillbits.len(), cluster, zk_nodes
        );
        Ok(drillbits)
    }
}
