use serde_json::json;

use crate::auth::password::hash_password;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;

pub fn handle(password: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let hash = hash_password(password, config::config().security.bcrypt_cost)?;
    match output_format {
        OutputFormat::Json => output_success(output_format, "Password hashed", Some(json!({ "hash": hash }))),
        OutputFormat::Text => {
            println!("{}", hash);
            Ok(())
        }
    }
}
