use std::{path::PathBuf, sync::Arc};

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    darkroom_categorize::{
        AnalysisRequest, CategorySuggester,
        builtin::{BUILTIN_CATEGORIES, BUILTIN_TABLE_VERSION},
    },
    darkroom_config::DarkroomConfig,
    darkroom_store::{SqliteCategorySource, SqliteSettingsStore},
    secrecy::Secret,
    tracing::{debug, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "darkroom", about = "Darkroom: image category suggestions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./darkroom.toml or ~/.config/darkroom/).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an image and print suggested categories as JSON.
    Analyze {
        /// Image file.
        file: PathBuf,
        /// Vision provider id (google, clarifai, azure).
        #[arg(long)]
        provider: Option<String>,
        /// Provider credential; azure takes `endpoint|key`.
        #[arg(long, env = "DARKROOM_CREDENTIAL", hide_env_values = true)]
        credential: Option<String>,
        /// MIME type, inferred from the extension when omitted.
        #[arg(long)]
        mime: Option<String>,
    },
    /// List the custom categories found in the content store.
    Categories {
        /// List the built-in categories and their keywords instead.
        #[arg(long)]
        builtin: bool,
    },
    /// List registered vision providers.
    Providers,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    // Logs go to stderr so stdout stays clean JSON.
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<DarkroomConfig> {
    match &cli.config {
        Some(path) => darkroom_config::load_config(path),
        None => Ok(darkroom_config::discover_and_load()),
    }
}

/// MIME type from a file extension; unknown extensions are octet-stream.
fn guess_mime(path: &std::path::Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

async fn build_suggester(config: &DarkroomConfig) -> anyhow::Result<CategorySuggester> {
    // Lazy so an unreachable store degrades to empty reads instead of
    // aborting the command.
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .connect_lazy(&config.database.url)
        .with_context(|| format!("invalid database url: {}", config.database.url))?;

    Ok(CategorySuggester::from_config(
        config,
        Arc::new(SqliteCategorySource::new(pool.clone())),
        Arc::new(SqliteSettingsStore::new(pool)),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    debug!(version = env!("CARGO_PKG_VERSION"), "darkroom starting");
    let config = load_config(&cli)?;
    let suggester = build_suggester(&config).await?;

    match cli.command {
        Commands::Analyze {
            file,
            provider,
            credential,
            mime,
        } => {
            let image = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let mime = mime.unwrap_or_else(|| guess_mime(&file).to_string());
            info!(file = %file.display(), bytes = image.len(), mime = %mime, "analyzing image");

            let mut request = AnalysisRequest::new(image, mime);
            if let Some(provider) = provider {
                request = request.with_provider(provider);
            }
            if let Some(credential) = credential {
                request = request.with_credential(Secret::new(credential));
            }

            let result = suggester.analyze(request).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        },
        Commands::Categories { builtin: true } => {
            println!("# built-in table v{BUILTIN_TABLE_VERSION}");
            for category in BUILTIN_CATEGORIES {
                println!("{:<14} {}", category.name, category.keywords.join(", "));
            }
            Ok(())
        },
        Commands::Categories { builtin: false } => {
            for name in suggester.vocabulary().fetch_custom_categories().await {
                println!("{name}");
            }
            Ok(())
        },
        Commands::Providers => {
            for (id, name) in suggester.registry().list() {
                println!("{id:<10} {name}");
            }
            Ok(())
        },
    }
}

#[cfg(test)]
mod tests {
    use {super::*, clap::CommandFactory, std::path::Path};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_analyze() {
        let cli = Cli::parse_from([
            "darkroom",
            "analyze",
            "shoot/IMG_0042.JPG",
            "--provider",
            "azure",
        ]);
        match cli.command {
            Commands::Analyze { file, provider, .. } => {
                assert_eq!(file, PathBuf::from("shoot/IMG_0042.JPG"));
                assert_eq!(provider.as_deref(), Some("azure"));
            },
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn parses_builtin_categories_flag() {
        let cli = Cli::parse_from(["darkroom", "categories", "--builtin"]);
        assert!(matches!(cli.command, Commands::Categories { builtin: true }));

        let cli = Cli::parse_from(["darkroom", "categories"]);
        assert!(matches!(cli.command, Commands::Categories { builtin: false }));
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(guess_mime(Path::new("a/IMG_0042.JPG")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("b.webp")), "image/webp");
        assert_eq!(guess_mime(Path::new("notes")), "application/octet-stream");
    }
}
