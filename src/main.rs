use askpipe::utils::{logger, validation::Validate};
use askpipe::{server, AiPipeClient, CliConfig};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = CliConfig::parse();

    logger::init_server_logger(config.verbose);

    tracing::info!("Starting askpipe server");
    if config.verbose {
        tracing::debug!("Server config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let llm = match AiPipeClient::from_config(&config) {
        Ok(llm) => llm,
        Err(e) => {
            tracing::error!("❌ Could not build the AI Pipe client: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    tracing::info!("🌐 Listening on http://{}", config.bind);
    tracing::info!("📁 Workspaces under: {}", config.upload_dir);

    server::run_server(config, llm).await?;

    Ok(())
}
