use clap::Args;

use docvault_service::http_server::api::admin::stats::StatsRequest;
use docvault_service::http_server::api::client::ApiError;

#[derive(Args, Debug, Clone)]
pub struct Stats;

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("a bearer token is required, pass --token or set DOCVAULT_TOKEN")]
    MissingToken,
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Stats {
    type Error = StatsError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        if !ctx.client.has_token() {
            return Err(StatsError::MissingToken);
        }

        let stats = ctx.client.call(StatsRequest).await?;

        Ok(format!(
            "users:     {}\ndocuments: {}\nstorage:   {} B",
            stats.total_users, stats.total_documents, stats.total_storage
        ))
    }
}
