use clap::Parser;
use cm_api::cli::{utils::output_error, Cli, OutputFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    cm_api::server::init_tracing();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = cm_api::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => output_error(output_format, &format!("{e:?}")),
            _ => output_error(output_format, &e.to_string()),
        }
        std::process::exit(1);
    }

    Ok(())
}
