use std::path::PathBuf;

use base64::Engine as _;
use clap::Args;

use docvault_service::http_server::api::client::ApiError;
use docvault_service::http_server::api::documents::upload::UploadRequest;

#[derive(Args, Debug, Clone)]
pub struct Upload {
    /// Path to the file to upload
    #[arg(long)]
    pub path: PathBuf,

    /// Title for the document (defaults to the file name)
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("a bearer token is required, pass --token or set DOCVAULT_TOKEN")]
    MissingToken,
    #[error("failed to read {0}: {1}")]
    ReadFile(PathBuf, std::io::Error),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Upload {
    type Error = UploadError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        if !ctx.client.has_token() {
            return Err(UploadError::MissingToken);
        }

        let bytes = std::fs::read(&self.path)
            .map_err(|e| UploadError::ReadFile(self.path.clone(), e))?;

        let mime = mime_guess::from_path(&self.path).first_or_octet_stream();
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);

        let title = match &self.title {
            Some(title) => title.clone(),
            None => self
                .path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "untitled".to_string()),
        };

        let request = UploadRequest {
            title,
            file_type: mime.to_string(),
            file_data: format!("data:{};base64,{}", mime, encoded),
            size: bytes.len() as i64,
        };

        let doc = ctx.client.call(request).await?;

        Ok(format!(
            "uploaded {} ({} bytes) as document {}",
            doc.title, doc.size, doc.id
        ))
    }
}
