mod backend;
mod locator;

pub use self::backend::{Client, DEFAULT_CLUSTER_NAME};
pub use self::locator::{DrillbitLocator, StaticLocator};
use crate::context::Context;
use crate::error::ClientError;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;


/// Default user port of a drillbit.
pub const DEFAULT_USER_PORT: u16 = 31010;


/// The capability set every transport backend provides.
///
/// [`Connector`](crate::Connector) only ever calls [`new_connection`](Self::new_connection);
/// the remaining methods are used by [`Conn`](crate::Conn) and by backends bootstrapping themselves.
#[async_trait]
pub trait DrillClient: Send + Sync {
    /// Produce an independent, connected client for a new session.
    async fn new_connection(&self, ctx: &Context) -> Result<Arc<dyn DrillClient>, ClientError>;

    /// Connect using whichever bootstrap strategy the backend was configured with.
    async fn connect(&self, ctx: &Context) -> Result<(), ClientError>;
    async fn connect_endpoint(&self, ctx: &Context, endpoint: &Drillbit) -> Result<(), ClientError>;
    async fn connect_with_zk(&self, ctx: &Context, nodes: &[String]) -> Result<(), ClientError>;

    async fn ping(&self, ctx: &Context) -> Result<(), ClientError>;
    async fn close(&self) -> Result<(), ClientError>;

    async fn execute_stmt(&self, handle: &PreparedHandle) -> Result<ResultHandle, ClientError>;
    async fn submit_query(&self, query_type: QueryType, query: &str) -> Result<ResultHandle, ClientError>;
    async fn prepare_query(&self, query: &str) -> Result<PreparedHandle, ClientError>;
}


/// Address of a single drillbit's user port.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Drillbit {
    pub address: String,
    pub user_port: u16,
}

impl Drillbit {
    pub fn new(address: impl Into<String>, user_port: u16) -> Self {
        Self { address: address.into(), user_port }
    }
}

impl Default for Drillbit {
    fn default() -> Self {
        Self::new("localhost", DEFAULT_USER_PORT)
    }
}

impl fmt::Display for Drillbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.user_port)
    }
}


/// Kind of query text submitted to a drillbit. Values match Drill's wire enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryType {
    Sql = 1,
    Logical = 2,
    Physical = 3,
    Execution = 4,
    PreparedStatement = 5,
}

/// Server-side handle of a prepared statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedHandle {
    pub query: String,
    pub server_handle: Vec<u8>,
}

/// Handle of a submitted query, used to pull its results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultHandle {
    pub query_type: QueryType,
    pub query_id: String,
}
