//! Dev entry point: a Madcap server over the in-memory store.

use madcap_server::{MadcapServer, MemoryStore, ServerError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let server = MadcapServer::<MemoryStore>::builder()
        .bind("0.0.0.0:3000")
        .build(MemoryStore::new())
        .await?;

    tracing::info!(addr = %server.local_addr()?, "madcap lobby listening");
    server.run().await
}
