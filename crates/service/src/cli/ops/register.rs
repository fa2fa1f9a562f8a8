use clap::Args;

use docvault_service::http_server::api::auth::register::RegisterRequest;
use docvault_service::http_server::api::client::ApiError;

#[derive(Args, Debug, Clone)]
pub struct Register {
    #[command(flatten)]
    pub request: RegisterRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Register {
    type Error = RegisterError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let resp = ctx.client.call(self.request.clone()).await?;

        Ok(format!(
            "registered {} (id {})\ntoken: {}",
            resp.email, resp.id, resp.token
        ))
    }
}
