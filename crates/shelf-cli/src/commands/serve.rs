use std::sync::Arc;

use shelf_config::{ConfigLoader, ShelfConfig};
use shelf_store::Store;

pub(super) async fn cmd_serve(
    config: ShelfConfig,
    config_loader: ConfigLoader,
) -> shelf_core::Result<()> {
    println!("🗄️  shelf v{}", env!("CARGO_PKG_VERSION"));
    println!("   Listening: http://{}", config.server.listen);
    println!("   Data dir:  {}", config.storage.data_dir.display());
    if let Some(ref url) = config.server.public_url {
        println!("   Public:    {url}");
    }
    println!();

    // Config hot-reload watcher (kept alive for the lifetime of the server)
    let _watcher = match config_loader.watch() {
        Ok(w) => {
            println!("   Config hot-reload: enabled");
            Some(w)
        }
        Err(e) => {
            tracing::warn!(error = %e, "config hot-reload disabled");
            None
        }
    };

    let store = Arc::new(Store::open(&config.storage.data_dir)?);
    shelf_server::start_server(config.server, store).await
}
