pub use clap::Parser;

use url::Url;

#[derive(Parser, Debug)]
#[command(name = "docvault")]
#[command(about = "Document storage and sharing service")]
pub struct Args {
    /// Base URL of the docvault server
    #[arg(long, global = true, default_value = "http://localhost:5000")]
    pub remote: Url,

    /// Bearer token for authenticated operations (from register/login)
    #[arg(long, global = true, env = "DOCVAULT_TOKEN")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: crate::Command,
}
