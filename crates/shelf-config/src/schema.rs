use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration — maps to `shelf.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

// ── Server ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP listen address.
    pub listen: String,
    /// Public base URL used in synthesized fetch commands, e.g.
    /// "https://shelf.example.com". When unset, commands point at the
    /// listen address.
    pub public_url: Option<String>,
    /// Serve the web UI from a `web/` directory when one is found.
    pub web_ui: bool,
    /// Enable permissive CORS. On by default — the web UI is commonly served
    /// from a different origin during development.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:7700".into(),
            public_url: None,
            web_ui: true,
            cors: true,
        }
    }
}

impl ServerConfig {
    /// Base URL of the HTTP API, as it appears in synthesized commands:
    /// the public URL when configured, otherwise the listen address.
    pub fn api_base(&self) -> String {
        match &self.public_url {
            Some(url) => format!("{}/api", url.trim_end_matches('/')),
            None => format!("http://{}/api", self.listen),
        }
    }
}

// ── Storage ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root of all persistence: the four collection documents plus the
    /// `scripts/` and `compose/` body directories.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".shelf")
                .join("data"),
        }
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty", "json", "compact".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

// ── Default for root ───────────────────────────────────────────

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ── Validation ─────────────────────────────────────────────────

/// A single config validation issue.
#[derive(Debug)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let icon = match self.severity {
            WarningSeverity::Error => "❌",
            WarningSeverity::Warning => "⚠️ ",
            WarningSeverity::Info => "💡",
        };
        write!(f, "{} {}: {}", icon, self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, "\n   ↳ {}", h)?;
        }
        Ok(())
    }
}

impl ShelfConfig {
    /// Validate the config and return a list of warnings/errors.
    /// Returns `Err` with all messages joined if any severity is Error.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, String> {
        let mut warnings = Vec::new();

        // ── Listen address ───
        if self.server.listen.is_empty() {
            warnings.push(ConfigWarning {
                field: "server.listen".into(),
                message: "listen address is empty".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. '127.0.0.1:7700'".into()),
            });
        } else if self.server.listen.starts_with("0.0.0.0") {
            warnings.push(ConfigWarning {
                field: "server.listen".into(),
                message: "binding to 0.0.0.0 — the API is accessible from all interfaces".into(),
                severity: WarningSeverity::Warning,
                hint: Some(
                    "shelf has no authentication; anyone who can reach it can read and edit your snippets"
                        .into(),
                ),
            });
        }

        // ── Public URL ───
        if let Some(ref public_url) = self.server.public_url {
            match url::Url::parse(public_url) {
                Ok(parsed) => {
                    if parsed.scheme() != "http" && parsed.scheme() != "https" {
                        warnings.push(ConfigWarning {
                            field: "server.public_url".into(),
                            message: format!("unexpected scheme '{}'", parsed.scheme()),
                            severity: WarningSeverity::Warning,
                            hint: Some("Synthesized curl commands expect http or https".into()),
                        });
                    }
                    if parsed.scheme() == "http" && !public_url.contains("localhost")
                        && !public_url.contains("127.0.0.1")
                    {
                        warnings.push(ConfigWarning {
                            field: "server.public_url".into(),
                            message: "plain http on a non-local URL — piped scripts travel unencrypted".into(),
                            severity: WarningSeverity::Info,
                            hint: Some("Consider putting shelf behind TLS".into()),
                        });
                    }
                }
                Err(e) => {
                    warnings.push(ConfigWarning {
                        field: "server.public_url".into(),
                        message: format!("not a valid URL: {e}"),
                        severity: WarningSeverity::Error,
                        hint: Some("Set to e.g. 'https://shelf.example.com'".into()),
                    });
                }
            }
        }

        // ── Data dir ───
        if self.storage.data_dir.as_os_str().is_empty() {
            warnings.push(ConfigWarning {
                field: "storage.data_dir".into(),
                message: "data_dir is empty".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. '~/.shelf/data'".into()),
            });
        }

        // ── Logging level ───
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.level".into(),
                message: format!("unknown log level '{}'", self.logging.level),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_levels.join(", "))),
            });
        }

        // ── Logging format ───
        let valid_formats = ["pretty", "json", "compact"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}'", self.logging.format),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_formats.join(", "))),
            });
        }

        // Check for hard errors
        let errors: Vec<String> = warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::Error)
            .map(|w| format!("{}: {}", w.field, w.message))
            .collect();

        if !errors.is_empty() {
            return Err(format!("Configuration errors:\n  • {}", errors.join("\n  • ")));
        }

        Ok(warnings)
    }
}
