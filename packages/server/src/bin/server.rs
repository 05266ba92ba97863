//! WebSocket chat server with broadcast and asynchronous persistence.
//!
//! Receives messages from clients, fans them out to all other connected
//! clients, and queues them for best-effort storage.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin ecrire-server
//! cargo run --bin ecrire-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use ecrire_server::{
    infrastructure::{
        ConnectionRegistry, PersistenceConfig, PersistenceWorker, StaticTokenResolver,
        store::InMemoryMessageStore,
    },
    ui::Server,
    usecase::{
        ConnectSessionUseCase, DisconnectSessionUseCase, GetHistoryUseCase, SendMessageUseCase,
    },
};
use ecrire_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "ecrire-server")]
#[command(about = "WebSocket chat server with asynchronous message persistence", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Capacity of the persistence queue; messages beyond it are dropped
    #[arg(long, default_value = "1000")]
    persist_queue_capacity: usize,

    /// Upper bound for a single store write, in seconds
    #[arg(long, default_value = "3")]
    store_write_timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. External collaborators (message store, identity resolver)
    // 2. Connection registry
    // 3. Persistence worker
    // 4. UseCases
    // 5. Server

    // 1. In-memory stand-ins; a production deployment substitutes its
    //    own store and credential system behind the same traits. With an
    //    empty token table every session is anonymous.
    let store = Arc::new(InMemoryMessageStore::new());
    let resolver = Arc::new(StaticTokenResolver::new());

    // 2. Connection registry (the broadcast domain)
    let registry = Arc::new(ConnectionRegistry::new());

    // 3. Persistence worker, started exactly once for the process
    let persistence = Arc::new(PersistenceWorker::start(
        store.clone(),
        PersistenceConfig {
            queue_capacity: args.persist_queue_capacity,
            write_timeout: Duration::from_secs(args.store_write_timeout_secs),
        },
    ));

    // 4. UseCases
    let clock = Arc::new(SystemClock);
    let connect_session = Arc::new(ConnectSessionUseCase::new(registry.clone(), clock.clone()));
    let disconnect_session = Arc::new(DisconnectSessionUseCase::new(
        registry.clone(),
        clock.clone(),
    ));
    let send_message = Arc::new(SendMessageUseCase::new(
        registry.clone(),
        persistence.clone(),
        clock.clone(),
    ));
    let get_history = Arc::new(GetHistoryUseCase::new(store.clone()));

    // 5. Create and run the server
    let server = Server::new(
        connect_session,
        disconnect_session,
        send_message,
        get_history,
        resolver,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
