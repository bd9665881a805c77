use std::path::PathBuf;

/// Initialize a new shelf configuration with sensible defaults.
pub(super) fn cmd_init(local: bool) -> shelf_core::Result<()> {
    let dir = if local {
        std::env::current_dir()?
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".shelf")
    };

    std::fs::create_dir_all(&dir)?;
    let config_path = dir.join("shelf.toml");

    if config_path.exists() {
        println!("⚠️  {} already exists", config_path.display());
        println!("   Edit it directly, or change single keys with 'shelf set'.");
        return Ok(());
    }

    // Write a minimal config
    let minimal = r#"# 🗄️ shelf configuration

[server]
listen = "127.0.0.1:7700"
# public_url = "https://shelf.example.com"   # base URL used in copy commands
# web_ui = true
# cors = true

[storage]
# data_dir = "~/.shelf/data"

[logging]
level = "info"
# format = "pretty"   # pretty | json | compact
"#;

    std::fs::write(&config_path, minimal)?;
    println!("✅ Created {}", config_path.display());
    println!("   Edit it to taste, then run: shelf serve");

    Ok(())
}
