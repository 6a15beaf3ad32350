use askpipe::config::toml_config::TomlConfig;
use askpipe::config::resolve_token;
use askpipe::core::{ConfigProvider, Pipeline};
use askpipe::utils::error::ErrorSeverity;
use askpipe::utils::{logger, validation, validation::Validate};
use askpipe::{
    AgentEngine, AgentPipeline, AiPipeClient, CliConfig, LocalStorage, QuestionRequest,
    RunOutcome, Workspace,
};
use clap::Parser;

/// One-shot run of the scrape-and-answer pipeline, without the HTTP server.
#[derive(Parser)]
#[command(name = "ask")]
#[command(about = "Run the scrape-and-answer pipeline once for a question")]
struct Args {
    /// The question to answer
    question: String,

    /// Path to a TOML configuration file; flags are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Local files to copy into the workspace before planning
    #[arg(long, value_delimiter = ',')]
    files: Vec<String>,

    /// Source URLs to pass to the model
    #[arg(long, value_delimiter = ',')]
    urls: Vec<String>,

    /// Reuse an existing workspace folder instead of creating a new one
    #[arg(long)]
    workspace: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting one-shot askpipe run");

    let result = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let config = match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };
            let token = config.token().map(str::to_string);
            run_once(config, token.as_deref(), &args).await
        }
        None => {
            // No config file: the server binary's flag defaults apply.
            let config = CliConfig::parse_from(["askpipe"]);
            run_once(config, None, &args).await
        }
    };

    match result {
        Ok(outcome) => {
            tracing::info!("✅ Pipeline completed successfully!");
            tracing::info!("📁 Workspace folder: {}", outcome.folder);
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Err(e) => {
            tracing::error!(
                "❌ Pipeline failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run_once<C>(config: C, token: Option<&str>, args: &Args) -> askpipe::Result<RunOutcome>
where
    C: ConfigProvider + Validate,
{
    config.validate()?;

    let token = resolve_token(token)?;
    let llm = AiPipeClient::new(
        config.base_url(),
        config.model(),
        &token,
        config.timeout_seconds(),
    )?;

    for url in &args.urls {
        validation::validate_url("urls", url)?;
    }

    let storage = LocalStorage::new(config.upload_dir().to_string());
    let workspace = match &args.workspace {
        Some(id) => {
            validation::validate_workspace_id("workspace", id)?;
            Workspace::open(id.clone())
        }
        None => Workspace::create(),
    };

    let mut uploaded_files = Vec::new();
    for path in &args.files {
        let bytes = std::fs::read(path)?;
        let saved = workspace.save_upload(&storage, path, &bytes).await?;
        uploaded_files.push(saved);
    }

    let request = QuestionRequest {
        question: args.question.clone(),
        uploaded_files,
        urls: args.urls.clone(),
    };

    let pipeline = AgentPipeline::new(storage, config, llm, workspace);
    tracing::info!("🗂️  Workspace folder: {}", pipeline.workspace_folder());

    AgentEngine::new(pipeline).run(&request).await
}
