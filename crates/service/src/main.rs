// CLI modules
mod cli;

use clap::{Parser, Subcommand};
use cli::{
    args::Args, op::Op, Docs, GrantAdmin, Health, Login, Register, Serve, Stats, Upload, Version,
};

command_enum! {
    (Docs, Docs),
    (GrantAdmin, GrantAdmin),
    (Health, Health),
    (Login, Login),
    (Register, Register),
    (Serve, Serve),
    (Stats, Stats),
    (Upload, Upload),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let ctx = match cli::op::OpContext::new(args.remote, args.token) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: Failed to create API client: {}", e);
            std::process::exit(1);
        }
    };

    match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
