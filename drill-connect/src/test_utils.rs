#[cfg(test)]
pub mod test_utils {
    use crate::client::{DrillClient, Drillbit, PreparedHandle, QueryType, ResultHandle};
    use crate::context::Context;
    use crate::error::ClientError;

    use async_trait::async_trait;
    use mockall::mock;
    use std::sync::Arc;

    // Scriptable stand-in for a transport backend.
    mock! {
        pub Client {}

        #[async_trait]
        impl DrillClient for Client {
            async fn new_connection(&self, ctx: &Context) -> Result<Arc<dyn DrillClient>, ClientError>;
            async fn connect(&self, ctx: &Context) -> Result<(), ClientError>;
            async fn connect_endpoint(&self, ctx: &Context, endpoint: &Drillbit) -> Result<(), ClientError>;
            async fn connect_with_zk(&self, ctx: &Context, nodes: &[String]) -> Result<(), ClientError>;
            async fn ping(&self, ctx: &Context) -> Result<(), ClientError>;
            async fn close(&self) -> Result<(), ClientError>;
            async fn execute_stmt(&self, handle: &PreparedHandle) -> Result<ResultHandle, ClientError>;
            async fn submit_query(&self, query_type: QueryType, query: &str) -> Result<ResultHandle, ClientError>;
            async fn prepare_query(&self, query: &str) -> Result<PreparedHandle, ClientError>;
        }
    }
}
