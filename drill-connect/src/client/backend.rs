use super::{DrillClient, Drillbit, DrillbitLocator, PreparedHandle, QueryType, ResultHandle};
use crate::connstr::{self, Descriptor};
use crate::context::Context;
use crate::error::{ClientError, ClientErrorKind, ParseError};
use crate::options::Options;

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;


/// Cluster looked up in ZooKeeper when the descriptor has no `cluster` key.
pub const DEFAULT_CLUSTER_NAME: &str = "drillbits1";


/// The TCP client backing both descriptor forms.
///
/// With `zk_nodes` set, [`connect`](DrillClient::connect) discovers drillbits
/// through the configured [`DrillbitLocator`]; otherwise it dials the fixed endpoint.
/// The RPC handshake and query protocol run on top of the stream and are not
/// provided here.
pub struct Client {
    pub opts: Options,
    pub zk_nodes: Vec<String>,
    endpoint: Drillbit,
    locator: Option<Arc<dyn DrillbitLocator>>,
    stream: Mutex<Option<TcpStream>>,
}

impl Client {
    /// A direct client for `opts`, dialing `localhost:31010` unless told otherwise.
    pub fn new(opts: Options) -> Self {
        Self {
            opts,
            zk_nodes: Vec::new(),
            endpoint: Drillbit::default(),
            locator: None,
            stream: Mutex::new(None),
        }
    }

    /// A client discovering drillbits through the given ZooKeeper quorum.
    pub fn with_zk(zk_nodes: Vec<String>) -> Self {
        Self { zk_nodes, ..Self::new(Options::default()) }
    }

    pub fn with_endpoint(mut self, endpoint: Drillbit) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_locator(mut self, locator: Arc<dyn DrillbitLocator>) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn endpoint(&self) -> &Drillbit {
        &self.endpoint
    }

    pub async fn is_connected(&self) -> bool {
        self.stream.lock().await.is_some()
    }

    fn cluster_name(&self) -> &str {
        match self.opts.cluster_name.as_str() {
            "" => DEFAULT_CLUSTER_NAME,
            name => name,
        }
    }

    /// Same configuration, no connection.
    fn unconnected_copy(&self) -> Self {
        Self {
            opts: self.opts.clone(),
            zk_nodes: self.zk_nodes.clone(),
            endpoint: self.endpoint.clone(),
            locator: self.locator.clone(),
            stream: Mutex::new(None),
        }
    }
}

impl FromStr for Client {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match connstr::parse_descriptor(s)? {
            Descriptor::ZooKeeper(nodes) => Client::with_zk(nodes),
            Descriptor::Direct(opts) => Client::new(opts),
        })
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("opts", &self.opts)
            .field("zk_nodes", &self.zk_nodes)
            .field("endpoint", &self.endpoint)
            .field("locator", &self.locator.as_ref().map(|_| "<locator>"))
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DrillClient for Client {
    async fn new_connection(&self, ctx: &Context) -> Result<Arc<dyn DrillClient>, ClientError> {
        let client = self.unconnected_copy();
        client.connect(ctx).await?;
        Ok(Arc::new(client))
    }

    async fn connect(&self, ctx: &Context) -> Result<(), ClientError> {
        tracing::debug!(
            "Connecting as '{}' (heartbeat: {:?})",
            self.opts.user, self.opts.heartbeat_interval()
        );

        if self.zk_nodes.is_empty() {
            self.connect_endpoint(ctx, &self.endpoint).await
        } else {
            self.connect_with_zk(ctx, &self.zk_nodes).await
        }
    }

    async fn connect_endpoint(&self, ctx: &Context, endpoint: &Drillbit) -> Result<(), ClientError> {
        let address = endpoint.to_string();

        let stream = ctx.run(async {
            TcpStream::connect(address.as_str()).await.map_err(|e| ClientError::new(
                ClientErrorKind::Io { endpoint: address.clone(), source: Arc::new(e) }
            ))
        }).await?;

        if let Err(e) = stream.set_nodelay(true) {
            tracing::warn!("Failed to set TCP_NODELAY on {address}: {e}");
        }

        tracing::info!("Connected to drillbit {address}");
        *self.stream.lock().await = Some(stream);

        Ok(())
    }

    async fn connect_with_zk(&self, ctx: &Context, nodes: &[String]) -> Result<(), ClientError> {
        let locator = self.locator.as_ref()
            .ok_or_else(|| ClientError::new(ClientErrorKind::NoLocator))?;
        let cluster = self.cluster_name();

        let drillbits = locator.locate(ctx, nodes, cluster).await?;
        let mut result = Err(ClientError::new(ClientErrorKind::NoDrillbits(cluster.to_string())));

        for drillbit in &drillbits {
            result = self.connect_endpoint(ctx, drillbit).await;
            match &result {
                Ok(()) => break,
                Err(e) if matches!(e.kind, ClientErrorKind::Cancelled | ClientErrorKind::DeadlineExceeded) => break,
                Err(e) => tracing::warn!("Skipping drillbit {drillbit}: {e}"),
            }
        }

        result
    }

    async fn ping(&self, ctx: &Context) -> Result<(), ClientError> {
        let guard = self.stream.lock().await;
        let stream = guard.as_ref().ok_or_else(|| ClientError::new(ClientErrorKind::NotConnected))?;

        ctx.run(async {
            stream.writable().await.map_err(|e| ClientError::new(ClientErrorKind::Io {
                endpoint: self.endpoint.to_string(),
                source: Arc::new(e),
            }))
        }).await
    }

    async fn close(&self) -> Result<(), ClientError> {
        let Some(mut stream) = self.stream.lock().await.take() else {
            return Ok(());
        };

        tracing::debug!("Closing connection to {:?}", stream.peer_addr().ok());
        stream.shutdown().await.map_err(|e| ClientError::new(ClientErrorKind::Io {
            endpoint: self.endpoint.to_string(),
            source: Arc::new(e),
        }))
    }

    async fn execute_stmt(&self, _handle: &PreparedHandle) -> Result<ResultHandle, ClientError> {
        Err(ClientError::new(ClientErrorKind::Unimplemented(
            "executing prepared statements requires the Drill RPC layer".to_string()
        )))
    }

    async fn submit_query(&self, _query_type: QueryType, _query: &str) -> Result<ResultHandle, ClientError> {
        Err(ClientError::new(ClientErrorKind::Unimplemented(
            "submitting queries requires the Drill RPC layer".to_string()
        )))
    }

    async fn prepare_query(&self, _query: &str) -> Result<PreparedHandle, ClientError> {
        Err(ClientError::new(ClientErrorKind::Unimplemented(
            "preparing queries requires the Drill RPC layer".to_string()
        )))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::StaticLocator;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio_util::sync::CancellationToken;

    async fn local_drillbit() -> (TcpListener, Drillbit) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, Drillbit::new("127.0.0.1", port))
    }

    #[test]
    fn parses_into_zk_client() {
        let client: Client = "zk=node1,node2,node3".parse().unwrap();
        assert_eq!(client.zk_nodes, vec!["node1", "node2", "node3"]);
        assert_eq!(client.opts, Options::default());
    }

    #[test]
    fn parses_into_direct_client() {
        let client: Client = "user=driller;cluster=supercluster".parse().unwrap();
        assert!(client.zk_nodes.is_empty());
        assert_eq!(client.opts.user, "driller");
        assert_eq!(client.cluster_name(), "supercluster");
        assert_eq!(client.endpoint(), &Drillbit::default());
    }

    #[tokio::test]
    async fn new_connection_dials_endpoint() {
        let (listener, drillbit) = local_drillbit().await;
        let client = Client::new(Options::default()).with_endpoint(drillbit);

        let accept = tokio::spawn(async move { listener.accept().await.map(|_| ()) });
        let conn = client.new_connection(&Context::background()).await.unwrap();
        accept.await.unwrap().unwrap();

        conn.ping(&Context::background()).await.unwrap();
        assert!(!client.is_connected().await, "the template client stays unconnected");

        conn.close().await.unwrap();
        conn.close().await.unwrap();
        let err = conn.ping(&Context::background()).await.unwrap_err();
        assert!(matches!(err.kind, ClientErrorKind::NotConnected));
    }

    #[tokio::test]
    async fn refused_endpoint_is_an_io_error() {
        let (listener, drillbit) = local_drillbit().await;
        drop(listener);

        let client = Client::new(Options::default()).with_endpoint(drillbit.clone());
        let err = client.connect(&Context::background()).await.unwrap_err();
        match err.kind {
            ClientErrorKind::Io { endpoint, .. } => assert_eq!(endpoint, drillbit.to_string()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancelled_context_prevents_dialing() {
        let (_listener, drillbit) = local_drillbit().await;
        let token = CancellationToken::new();
        token.cancel();
        let ctx = Context::background().with_cancellation(token);

        let client = Client::new(Options::default()).with_endpoint(drillbit);
        let err = client.connect(&ctx).await.unwrap_err();
        assert!(matches!(err.kind, ClientErrorKind::Cancelled));
        assert!(!client.is_connected().await);
    }

    #[tokio::test]
    async fn zk_without_locator_fails() {
        let client = Client::with_zk(vec!["zk1:2181".into()]);
        let err = client.connect(&Context::background()).await.unwrap_err();
        assert!(matches!(err.kind, ClientErrorKind::NoLocator));
    }

    #[tokio::test]
    async fn zk_with_unknown_cluster_has_no_drillbits() {
        let client = Client::with_zk(vec!["zk1:2181".into()])
            .with_locator(Arc::new(StaticLocator::new()));
        let err = client.connect(&Context::background()).await.unwrap_err();
        match err.kind {
            ClientErrorKind::NoDrillbits(cluster) => assert_eq!(cluster, DEFAULT_CLUSTER_NAME),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn zk_skips_dead_drillbits() {
        let (dead, dead_bit) = local_drillbit().await;
        drop(dead);
        let (listener, live_bit) = local_drillbit().await;

        let locator = StaticLocator::new().with_cluster(DEFAULT_CLUSTER_NAME, vec![dead_bit, live_bit]);
        let client = Client::with_zk(vec!["zk1:2181".into()]).with_locator(Arc::new(locator));

        let accept = tokio::spawn(async move { listener.accept().await.map(|_| ()) });
        let ctx = Context::background().with_timeout(Duration::from_secs(5));
        client.connect(&ctx).await.unwrap();
        accept.await.unwrap().unwrap();

        assert!(client.is_connected().await);
    }

    #[tokio::test]
    async fn query_surface_is_not_provided() {
        let client = Client::new(Options::default());

        let err = client.submit_query(QueryType::Sql, "SELECT 1").await.unwrap_err();
        assert!(matches!(err.kind, ClientErrorKind::Unimplemented(_)));
        let err = client.prepare_query("SELECT 1").await.unwrap_err();
        assert!(matches!(err.kind, ClientErrorKind::Unimplemented(_)));
    }
}
