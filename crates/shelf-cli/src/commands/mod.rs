use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use shelf_config::ConfigLoader;
use shelf_core::ArtifactKind;
use shelf_store::Store;

mod copy;
mod init;
mod serve;

/// shelf — personal snippet manager with a download-and-run workflow
#[derive(Parser)]
#[command(name = "shelf", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to shelf.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server in the foreground
    Serve,
    /// Initialize a new shelf.toml in the current or home directory
    Init {
        /// Create in current directory instead of ~/.shelf/
        #[arg(long)]
        local: bool,
    },
    /// List stored artifacts (scripts and compose files)
    List {
        /// Collection to list: script, compose (default: both)
        kind: Option<String>,
    },
    /// Print a stored artifact's content
    Show {
        /// Collection: script or compose
        kind: String,
        /// Artifact filename
        name: String,
    },
    /// Build the fetch command for a stored artifact, collecting variable
    /// values when the content contains {{NAME}} placeholders
    Copy {
        /// Artifact filename
        filename: String,
        /// Target the compose collection instead of scripts
        #[arg(long)]
        compose: bool,
        /// Provide a variable value up front (repeatable)
        #[arg(long = "var", value_parser = parse_key_val)]
        vars: Vec<(String, String)>,
        /// Skip variable collection — the command fetches the artifact with
        /// placeholders left unresolved
        #[arg(long)]
        raw: bool,
    },
    /// Show current configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a config value in shelf.toml (dot-notation key)
    Set {
        /// Config key in dot notation (e.g. server.listen, logging.level)
        key: String,
        /// Value to set
        value: String,
    },
    /// Check whether a running server is reachable
    Status,
    /// Audit configuration for issues
    Doctor,
    /// Generate shell completions for bash, zsh, or fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Show version and build info
    Version,
}

/// Parse "key=value" CLI arguments.
fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{s}`"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

impl Cli {
    pub async fn run(self) -> shelf_core::Result<()> {
        // Load config first so we can use it for log format
        let config_loader = ConfigLoader::load(self.config.as_deref())?;
        let config = config_loader.get();

        // Resolve log level: --verbose > --quiet > --log-level > config default
        let log_level = if self.verbose {
            "debug".to_string()
        } else if self.quiet {
            "error".to_string()
        } else {
            self.log_level
                .clone()
                .unwrap_or_else(|| config.logging.level.clone())
        };

        // Initialize tracing with appropriate format
        if config.logging.format == "json" {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
                )
                .json()
                .with_target(true)
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
                )
                .with_target(false)
                .init();
        }

        match self.command {
            Commands::Serve => serve::cmd_serve(config, config_loader).await,
            Commands::Init { local } => init::cmd_init(local),
            Commands::List { kind } => Self::cmd_list(config, kind),
            Commands::Show { kind, name } => Self::cmd_show(config, kind, name),
            Commands::Copy {
                filename,
                compose,
                vars,
                raw,
            } => copy::cmd_copy(config, filename, compose, vars, raw),
            Commands::Config { json } => Self::cmd_config(config, json),
            Commands::Set { key, value } => {
                Self::cmd_config_set(Some(config_loader.path().to_path_buf()), key, value)
            }
            Commands::Status => Self::cmd_status(config).await,
            Commands::Doctor => Self::cmd_doctor(config),
            Commands::Completions { shell } => Self::cmd_completions(shell),
            Commands::Version => Self::cmd_version(),
        }
    }

    fn cmd_list(config: shelf_config::ShelfConfig, kind: Option<String>) -> shelf_core::Result<()> {
        let store = Store::open(&config.storage.data_dir)?;
        let kinds: Vec<ArtifactKind> = match kind {
            Some(k) => vec![k.parse()?],
            None => vec![ArtifactKind::Script, ArtifactKind::Compose],
        };

        for kind in kinds {
            let listed = store.list_artifacts(kind)?;
            println!("{}", console::style(format!("{kind} ({})", listed.len())).bold());
            for meta in listed {
                let tags = if meta.tags.is_empty() {
                    String::new()
                } else {
                    format!("  [{}]", meta.tags.join(", "))
                };
                println!(
                    "  {}  {}{}",
                    console::style(meta.last_modified.format("%Y-%m-%d %H:%M")).dim(),
                    meta.filename,
                    console::style(tags).cyan(),
                );
            }
        }
        Ok(())
    }

    fn cmd_show(
        config: shelf_config::ShelfConfig,
        kind: String,
        name: String,
    ) -> shelf_core::Result<()> {
        let store = Store::open(&config.storage.data_dir)?;
        let artifact = store.read_artifact(kind.parse()?, &name)?;
        // Metadata on stderr so stdout stays pipeable.
        eprintln!(
            "{}",
            console::style(format!(
                "{} — modified {}, tags: {}",
                artifact.filename,
                artifact.last_modified.format("%Y-%m-%d %H:%M"),
                if artifact.tags.is_empty() {
                    "none".to_string()
                } else {
                    artifact.tags.join(", ")
                }
            ))
            .dim()
        );
        print!("{}", artifact.content);
        if !artifact.content.ends_with('\n') {
            println!();
        }
        Ok(())
    }

    async fn cmd_status(config: shelf_config::ShelfConfig) -> shelf_core::Result<()> {
        let listen = &config.server.listen;
        println!("Checking status at http://{listen}...");

        match reqwest::get(format!("http://{listen}/health")).await {
            Ok(resp) => {
                let data: serde_json::Value = resp
                    .json()
                    .await
                    .map_err(|e| shelf_core::ShelfError::Server(e.to_string()))?;
                println!("{}", serde_json::to_string_pretty(&data).unwrap_or_default());
            }
            Err(_) => {
                println!("❌ shelf is not running at {listen}");
            }
        }
        Ok(())
    }

    fn cmd_config(config: shelf_config::ShelfConfig, json: bool) -> shelf_core::Result<()> {
        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&config)
                    .map_err(|e| shelf_core::ShelfError::Config(e.to_string()))?
            );
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&config)
                    .map_err(|e| shelf_core::ShelfError::Config(e.to_string()))?
            );
        }
        Ok(())
    }

    fn cmd_config_set(
        config_path: Option<PathBuf>,
        key: String,
        value: String,
    ) -> shelf_core::Result<()> {
        let path = config_path.ok_or_else(|| {
            shelf_core::ShelfError::Config("No config file found. Run 'shelf init' first.".into())
        })?;

        let content = std::fs::read_to_string(&path).map_err(|e| {
            shelf_core::ShelfError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;

        let mut doc = content.parse::<toml_edit::DocumentMut>().map_err(|e| {
            shelf_core::ShelfError::Config(format!("Invalid TOML in {}: {}", path.display(), e))
        })?;

        // Parse dot-notation key into table path, e.g. "server.listen" → ["server", "listen"]
        let parts: Vec<&str> = key.split('.').collect();
        if parts.is_empty() {
            return Err(shelf_core::ShelfError::Config("Empty key".into()));
        }

        // Navigate to the correct table, creating intermediate tables as needed
        let table_parts = &parts[..parts.len() - 1];
        let leaf_key = parts[parts.len() - 1];

        let mut table: &mut toml_edit::Item = doc.as_item_mut();
        for part in table_parts {
            if table.get(part).is_none() {
                table[part] = toml_edit::Item::Table(toml_edit::Table::new());
            }
            table = &mut table[part];
        }

        // Infer the value type: bool, integer, float, or string
        let toml_value = if value == "true" {
            toml_edit::value(true)
        } else if value == "false" {
            toml_edit::value(false)
        } else if let Ok(i) = value.parse::<i64>() {
            toml_edit::value(i)
        } else if let Ok(f) = value.parse::<f64>() {
            toml_edit::value(f)
        } else {
            toml_edit::value(&value)
        };

        let old_value = table.get(leaf_key).map(|v| v.to_string());
        table[leaf_key] = toml_value;

        std::fs::write(&path, doc.to_string()).map_err(|e| {
            shelf_core::ShelfError::Config(format!("Cannot write {}: {}", path.display(), e))
        })?;

        match old_value {
            Some(old) => println!("✅ {} = {} (was {})", key, value, old.trim()),
            None => println!("✅ {key} = {value} (new)"),
        }

        Ok(())
    }

    fn cmd_doctor(config: shelf_config::ShelfConfig) -> shelf_core::Result<()> {
        println!("🩺 shelf doctor — configuration audit");
        println!();

        let warnings = match config.validate() {
            Ok(w) => w,
            Err(e) => {
                println!("{e}");
                return Ok(());
            }
        };

        for w in &warnings {
            println!("  {w}");
        }

        // Beyond validation: does the data dir exist yet?
        if !config.storage.data_dir.exists() {
            println!(
                "  💡 storage.data_dir: {} does not exist yet — it is created on first use",
                config.storage.data_dir.display()
            );
        }

        println!();
        if warnings.is_empty() {
            println!("  ✅ configuration looks good");
        } else {
            println!("  ⚠️  {} issue(s) found", warnings.len());
        }

        Ok(())
    }

    fn cmd_completions(shell: Shell) -> shelf_core::Result<()> {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "shelf", &mut std::io::stdout());
        Ok(())
    }

    fn cmd_version() -> shelf_core::Result<()> {
        println!("shelf v{}", env!("CARGO_PKG_VERSION"));
        println!("   Rust edition: 2024");
        println!("   Target: {}", std::env::consts::ARCH);
        println!("   OS: {}", std::env::consts::OS);
        #[cfg(debug_assertions)]
        println!("   Profile: debug");
        #[cfg(not(debug_assertions))]
        println!("   Profile: release");
        Ok(())
    }
}
