use crate::client::DrillClient;
use crate::connstr;
use crate::context::Context;
use crate::driver::Driver;
use crate::error::{ClientError, ParseError};
use crate::session::Conn;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;


/// Reusable factory of [`Conn`] sessions for one parsed descriptor.
///
/// The connector does not know whether its client discovers drillbits through
/// ZooKeeper or dials a fixed endpoint. It holds no per-call state, so clones
/// and concurrent `connect` calls need no coordination.
#[derive(Clone)]
pub struct Connector {
    base: Arc<dyn DrillClient>,
}

impl Connector {
    pub fn new(base: Arc<dyn DrillClient>) -> Self {
        Self { base }
    }

    /// The driver this connector belongs to.
    pub fn driver(&self) -> Driver {
        Driver
    }

    pub fn base(&self) -> &Arc<dyn DrillClient> {
        &self.base
    }

    /// Open a new session.
    ///
    /// `ctx` is passed to the client untouched, and any error the client
    /// reports is returned as is.
    pub async fn connect(&self, ctx: &Context) -> Result<Conn, ClientError> {
        let client = self.base.new_connection(ctx).await?;
        Ok(Conn::new(client))
    }
}

impl FromStr for Connector {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Connector::new(Arc::new(connstr::parse_client(s)?)))
    }
}

impl fmt::Debug for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connector")
            .field("driver", &self.driver())
            .finish_non_exhaustive()
    }
}
