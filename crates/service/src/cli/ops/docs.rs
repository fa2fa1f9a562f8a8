use clap::Args;

use docvault_service::http_server::api::client::ApiError;
use docvault_service::http_server::api::documents::list::ListRequest;
use docvault_service::http_server::api::documents::list_mine::ListMineRequest;
use docvault_service::http_server::api::documents::DocumentView;

#[derive(Args, Debug, Clone)]
pub struct Docs {
    /// Only list the caller's own documents
    #[arg(long)]
    pub mine: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    #[error("a bearer token is required, pass --token or set DOCVAULT_TOKEN")]
    MissingToken,
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Docs {
    type Error = DocsError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        if !ctx.client.has_token() {
            return Err(DocsError::MissingToken);
        }

        let docs: Vec<DocumentView> = if self.mine {
            ctx.client.call(ListMineRequest).await?
        } else {
            ctx.client.call(ListRequest).await?
        };

        if docs.is_empty() {
            return Ok("no documents".to_string());
        }

        let lines: Vec<String> = docs
            .iter()
            .map(|d| {
                let starred = if d.starred { "*" } else { " " };
                format!(
                    "{} {}  {:>8} B  {} star(s)  by {}  [{}]",
                    starred, d.id, d.size, d.star_count, d.uploaded_by.username, d.title
                )
            })
            .collect();

        Ok(lines.join("\n"))
    }
}
