use dialoguer::{Input, theme::ColorfulTheme};

use shelf_config::ShelfConfig;
use shelf_core::ArtifactKind;
use shelf_store::Store;
use shelf_template::{fetch_command, scan};

/// Build the one-liner that fetches a stored artifact, prompting for any
/// `{{NAME}}` placeholder values not supplied with `--var`.
pub(super) fn cmd_copy(
    config: ShelfConfig,
    filename: String,
    compose: bool,
    vars: Vec<(String, String)>,
    raw: bool,
) -> shelf_core::Result<()> {
    let kind = if compose {
        ArtifactKind::Compose
    } else {
        ArtifactKind::Script
    };

    let store = Store::open(&config.storage.data_dir)?;
    let artifact = store.read_artifact(kind, &filename)?;
    let names = scan(&artifact.content);

    let api_base = config.server.api_base();

    if raw || names.is_empty() {
        if raw && !names.is_empty() {
            eprintln!(
                "{}",
                console::style(format!(
                    "note: leaving {} placeholder(s) unresolved",
                    names.len()
                ))
                .dim()
            );
        }
        println!("{}", fetch_command(&api_base, kind, &filename, &[]));
        return Ok(());
    }

    // Values provided up front, keyed for lookup. Unknown names are kept in
    // the command anyway — the endpoint ignores extras — but worth flagging.
    for (key, _) in &vars {
        if !names.iter().any(|n| n == key) {
            eprintln!(
                "{}",
                console::style(format!("warning: '{key}' is not a placeholder in {filename}"))
                    .yellow()
            );
        }
    }

    let theme = ColorfulTheme::default();
    let mut values: Vec<(String, String)> = vars;

    // Prompt for the rest, in the order they first appear in the content
    for name in &names {
        if values.iter().any(|(k, _)| k == name) {
            continue;
        }
        let value: String = Input::with_theme(&theme)
            .with_prompt(format!("{name}"))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| shelf_core::ShelfError::Other(e.into()))?;
        values.push((name.clone(), value));
    }

    println!("{}", fetch_command(&api_base, kind, &filename, &values));
    Ok(())
}
