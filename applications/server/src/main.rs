/// Hepzify Server - music streaming API
use clap::{Parser, Subcommand};
use hepzify_core::{Catalog, CreateTrack, UserStore};
use hepzify_server::{
    config::ServerConfig,
    create_router,
    services::{AuthService, LocalObjectStore},
    state::AppState,
};
use hepzify_storage::Database;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hepzify-server")]
#[command(about = "Hepzify music streaming server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "HEPZIFY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    AddUser {
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// List all users
    ListUsers,
    /// Load tracks from a JSON file (an array of track objects)
    Seed {
        /// Path to the JSON file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hepzify_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load_from(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::AddUser { email, password } => add_user(config, &email, &password).await?,
        Commands::ListUsers => list_users(config).await?,
        Commands::Seed { path } => seed(config, &path).await?,
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Hepzify Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let db = open_database(&config).await?;
    tracing::info!("Database connected");

    let object_store = LocalObjectStore::new(
        config.uploads.path.clone(),
        config.uploads.public_url.clone(),
    );
    object_store.initialize().await?;
    tracing::info!(path = %config.uploads.path.display(), "Upload storage initialized");

    let app_state = AppState::new(db, Arc::new(auth_service(&config)), Arc::new(object_store));
    let app = create_router(app_state, &config)?;

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn add_user(config: ServerConfig, email: &str, password: &str) -> anyhow::Result<()> {
    config.validate()?;
    let db = open_database(&config).await?;

    let session = auth_service(&config).register(&db, email, password).await?;
    println!("Created user {} ({})", session.user.email, session.user.id);

    Ok(())
}

async fn list_users(config: ServerConfig) -> anyhow::Result<()> {
    let db = open_database(&config).await?;
    let users = db.list_users().await?;

    println!("Users:");
    for user in users {
        println!("  {} - {} <{}>", user.id, user.name, user.email);
    }

    Ok(())
}

async fn seed(config: ServerConfig, path: &std::path::Path) -> anyhow::Result<()> {
    let db = open_database(&config).await?;

    let contents = tokio::fs::read_to_string(path).await?;
    let tracks: Vec<CreateTrack> = serde_json::from_str(&contents)?;

    let mut created = 0usize;
    for input in tracks {
        let title = input.title.clone();
        match db.create_track(input).await {
            Ok(_) => created += 1,
            Err(e) => tracing::warn!(title = %title, "skipping track: {}", e),
        }
    }

    println!("Seeded {} tracks", created);
    Ok(())
}

async fn open_database(config: &ServerConfig) -> anyhow::Result<Database> {
    // SQLite creates the file but not its directory
    if let Some(dir) = sqlite_parent_dir(&config.storage.database_url) {
        tokio::fs::create_dir_all(dir).await?;
    }
    Ok(Database::connect(&config.storage.database_url).await?)
}

fn sqlite_parent_dir(database_url: &str) -> Option<PathBuf> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path == ":memory:" {
        return None;
    }
    PathBuf::from(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
}

fn auth_service(config: &ServerConfig) -> AuthService {
    AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
        config.auth.jwt_refresh_expiration_days,
    )
    .with_bcrypt_cost(config.auth.bcrypt_cost)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
