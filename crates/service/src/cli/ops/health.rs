use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct Health;

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("Health check failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Health {
    type Error = HealthError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let base = ctx.client.base_url();
        let client = ctx.client.http_client();

        let health_url = format!("{}/health", base.as_str().trim_end_matches('/'));
        match client.get(&health_url).send().await {
            Ok(resp) if resp.status().is_success() => Ok(format!("Server ({}): OK", base)),
            // A reachable but degraded server still prints a report; only a
            // server we cannot talk to at all is an error.
            Ok(resp) => Ok(format!("Server ({}): UNHEALTHY ({})", base, resp.status())),
            Err(e) => Err(HealthError::Failed(e.to_string())),
        }
    }
}
