use clap::Args;

use docvault_service::http_server::api::auth::login::LoginRequest;
use docvault_service::http_server::api::client::ApiError;

#[derive(Args, Debug, Clone)]
pub struct Login {
    #[command(flatten)]
    pub request: LoginRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Login {
    type Error = LoginError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let resp = ctx.client.call(self.request.clone()).await?;

        let role = if resp.is_admin { "admin" } else { "user" };
        Ok(format!(
            "logged in as {} ({})\ntoken: {}",
            resp.email, role, resp.token
        ))
    }
}
