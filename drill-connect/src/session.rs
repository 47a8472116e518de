//! A live session handed out by [`Connector::connect`](crate::Connector::connect).
//!
//! [`Conn`] owns the client returned by
//! [`DrillClient::new_connection`](crate::DrillClient::new_connection) and forwards
//! lifecycle and query calls to it. Closing the session closes that client.

use crate::client::{DrillClient, PreparedHandle, QueryType, ResultHandle};
use crate::context::Context;
use crate::error::ClientError;

use std::fmt;
use std::sync::Arc;
use uuid::Uuid;


/// One session on a Drill cluster.
pub struct Conn {
    client: Arc<dyn DrillClient>,
    session_id: Uuid,
}

impl Conn {
    /// Wrap a freshly connected client.
    ///
    /// Usually invoked by [`Connector::connect`](crate::Connector::connect).
    pub fn new(client: Arc<dyn DrillClient>) -> Self {
        let session_id = Uuid::new_v4();
        tracing::debug!("Opened session {session_id}");
        Self { client, session_id }
    }

    /// Client-side identifier of this session, for logs and tracing.
    pub fn session_id(&self) -> String {
        self.session_id.to_string()
    }

    /// The client this session owns.
    pub fn client(&self) -> &Arc<dyn DrillClient> {
        &self.client
    }

    pub async fn ping(&self, ctx: &Context) -> Result<(), ClientError> {
        self.client.ping(ctx).await
    }

    pub async fn query(&self, query: &str) -> Result<ResultHandle, ClientError> {
        tracing::debug!("Session {} submitting query", self.session_id);
        self.client.submit_query(QueryType::Sql, query).await
    }

    pub async fn prepare(&self, query: &str) -> Result<PreparedHandle, ClientError> {
        self.client.prepare_query(query).await
    }

    pub async fn execute(&self, handle: &PreparedHandle) -> Result<ResultHandle, ClientError> {
        self.client.execute_stmt(handle).await
    }

    /// Close the underlying client and end the session.
    pub async fn close(self) -> Result<(), ClientError> {
        tracing::debug!("Closing session {}", self.session_id);
        self.client.close().await
    }
}

impl fmt::Debug for Conn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conn")
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientErrorKind;
    use crate::test_utils::test_utils::MockClient;

    #[tokio::test]
    async fn lifecycle_calls_are_forwarded() {
        let mut mock = MockClient::new();
        mock.expect_ping().times(1).returning(|_| Ok(()));
        mock.expect_close().times(1).returning(|| Ok(()));
        mock.expect_submit_query()
            .withf(|query_type, query| *query_type == QueryType::Sql && query == "SELECT 1")
            .times(1)
            .returning(|query_type, _| Ok(ResultHandle { query_type, query_id: "q-1".into() }));

        let conn = Conn::new(Arc::new(mock));
        conn.ping(&Context::background()).await.unwrap();
        let handle = conn.query("SELECT 1").await.unwrap();
        assert_eq!(handle.query_id, "q-1");
        conn.close().await.unwrap();
    }

    #[tokio::test]
    async fn prepared_statements_are_forwarded() {
        let prepared = PreparedHandle { query: "SELECT ?".into(), server_handle: vec![1, 2, 3] };

        let mut mock = MockClient::new();
        let returned = prepared.clone();
        mock.expect_prepare_query().times(1).returning(move |_| Ok(returned.clone()));
        mock.expect_execute_stmt()
            .withf(|handle| handle.server_handle == vec![1, 2, 3])
            .times(1)
            .returning(|_| Err(ClientError::new(ClientErrorKind::NotConnected)));

        let conn = Conn::new(Arc::new(mock));
        let handle = conn.prepare("SELECT ?").await.unwrap();
        assert_eq!(handle, prepared);

        let err = conn.execute(&handle).await.unwrap_err();
        assert!(matches!(err.kind, ClientErrorKind::NotConnected));
    }

    #[test]
    fn sessions_get_distinct_ids() {
        let a = Conn::new(Arc::new(MockClient::new()));
        let b = Conn::new(Arc::new(MockClient::new()));
        assert_ne!(a.session_id(), b.session_id());
        assert_eq!(a.session_id().len(), 36);
    }
}
