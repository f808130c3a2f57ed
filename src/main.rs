use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use log::info;

use predicate_audit::{
    logging,
    utils::{normalize_repo_relative_path, normalize_user_input_path},
    AuditError, Auditor, Config, Credentials, GroqClient, Location, Result,
};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Analyze Python and TypeScript code for vulnerable predicate functions, prioritizing TypeGuard and type predicates",
    long_about = None
)]
struct Cli {
    /// URL of the git repository to analyze (e.g. https://github.com/user/repo.git)
    #[arg(long)]
    repo_url: Option<String>,

    /// File to analyze: relative to the repository root with --repo-url, otherwise a local file or directory
    #[arg(long)]
    file_path: Option<String>,

    /// TOML config file (defaults to <config dir>/predicate-audit/config.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model name, overriding config and GROQ_MODEL
    #[arg(long)]
    model: Option<String>,

    /// Regex of root-relative paths to skip while walking; may be repeated
    #[arg(long = "exclude", value_name = "REGEX")]
    exclude: Vec<String>,

    /// Also write the JSON report to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level for diagnostics on stderr
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        println!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    logging::init(&cli.log_level)?;

    let (location, single_path) = match (cli.repo_url, cli.file_path) {
        (Some(url), file) => (
            Location::Remote(url.trim().to_string()),
            file.map(|f| normalize_repo_relative_path(&f)),
        ),
        (None, Some(file)) => (Location::Local(normalize_user_input_path(&file)), None),
        (None, None) => {
            return Err(AuditError::MissingInput(
                "At least one of --repo-url or --file-path must be provided".to_string(),
            ))
        }
    };

    let credentials = Credentials::load()?;

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env_overrides();
    if let Some(model) = cli.model {
        config.llm.model = model;
    }
    config.acquisition.exclude_patterns.extend(cli.exclude);

    let client = GroqClient::new(&credentials, &config.llm)?;
    let auditor = Auditor::new(Arc::new(client), &config)?;

    info!("Analyzing {} with {}", location, config.llm.model);
    let report = auditor.run(&location, single_path.as_deref()).await?;

    let rendered = serde_json::to_string_pretty(&report)?;
    println!("{}", rendered);

    if let Some(output) = cli.output {
        tokio::fs::write(&output, &rendered).await?;
        info!("Report written to {}", output.display());
    }

    Ok(())
}
