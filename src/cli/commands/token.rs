use anyhow::Context;
use clap::Args;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_json;
use crate::cli::OutputFormat;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(long, help = "User name placed in the token")]
    pub user: String,
    #[arg(long, help = "User id (UUID) that owns the pinned set")]
    pub user_id: Uuid,
    #[arg(long, default_value = "full", help = "Access level; 'deny' produces a token the API rejects")]
    pub access: String,
    #[arg(long, default_value_t = 24, help = "Token lifetime in hours")]
    pub expiry_hours: u64,
    #[arg(long, env = "JWT_SECRET", hide_env_values = true, help = "Signing secret shared with the API")]
    pub secret: String,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let token = mint(&args)?;
    match output_format {
        OutputFormat::Json => output_json(&json!({ "token": token, "user_id": args.user_id })),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}

fn mint(args: &TokenArgs) -> anyhow::Result<String> {
    if args.secret.is_empty() {
        anyhow::bail!("JWT_SECRET must not be empty");
    }
    let claims = Claims::new(args.user.clone(), args.user_id, args.access.clone(), args.expiry_hours);
    generate_jwt(&claims, &args.secret).context("failed to sign token")
}
