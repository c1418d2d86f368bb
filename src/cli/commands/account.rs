use clap::Subcommand;
use serde_json::json;

use crate::auth;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::{AccountRepository, AccountSummary, DatabaseManager};

#[derive(Subcommand)]
pub enum AccountCommands {
    #[command(about = "Create a login account directly in storage")]
    Create {
        #[arg(long, help = "Login email")]
        email: String,
        #[arg(long, help = "Display name")]
        name: String,
        #[arg(long, help = "Password (at least 8 characters)")]
        password: String,
    },
}

pub async fn handle(cmd: AccountCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AccountCommands::Create { email, name, password } => {
            let config = config::config();
            let pool = DatabaseManager::connect(&config.database).await?;
            let store = AccountRepository::new(pool);

            // Same validation and hashing as POST /users.
            let body = json!({ "name": name, "email": email, "password": password });
            let account = auth::register(&store, config.security.bcrypt_cost, &body).await?;
            let summary = AccountSummary::from(account);

            output_success(
                output_format,
                &format!("Created account {} ({})", summary.email, summary.id),
                Some(json!({ "data": summary })),
            )
        }
    }
}
