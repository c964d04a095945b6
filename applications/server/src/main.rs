/// Roster Server - user query service over HTTP
use chrono::{Duration, Local};
use clap::{Parser, Subcommand};
use roster_core::types::{NewUser, MALE};
use roster_server::{api, config::ServerConfig, services::UserQueryService, state::AppState};
use roster_storage::LocalStorageContext;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "roster-server")]
#[command(about = "Roster user query service", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "ROSTER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Print name and mail of every active user
    ListActive,
    /// Look up a user by external id
    Find {
        /// External user id
        #[arg(short, long)]
        user_id: i64,
    },
    /// Insert generated demo users in one batch
    Seed {
        /// Number of users to create
        #[arg(short, long, default_value_t = 100)]
        count: usize,
        /// First external id to assign
        #[arg(long, default_value_t = 1)]
        start_id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "roster_server=info,roster_storage=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = ServerConfig::load_from(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Serve => {
            serve(&config).await?;
        }
        Commands::ListActive => {
            list_active(&config).await?;
        }
        Commands::Find { user_id } => {
            find(&config, user_id).await?;
        }
        Commands::Seed { count, start_id } => {
            seed(&config, count, start_id).await?;
        }
    }

    Ok(())
}

async fn open_service(config: &ServerConfig) -> anyhow::Result<UserQueryService> {
    let pool = roster_storage::create_pool_with(
        &config.storage.database_url,
        config.storage.pool_settings(),
    )
    .await?;
    roster_storage::run_migrations(&pool).await?;

    let store = Arc::new(LocalStorageContext::new(pool));
    Ok(UserQueryService::new(store))
}

async fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Roster Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let users = open_service(config).await?;
    tracing::info!("Database connected");

    let app = api::router(AppState::new(Arc::new(users)))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive());

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

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn list_active(config: &ServerConfig) -> anyhow::Result<()> {
    let users = open_service(config).await?;

    println!("Active users:");
    for contact in users.list_active_users().await? {
        println!("  {} <{}>", contact.name, contact.mail);
    }

    Ok(())
}

async fn find(config: &ServerConfig, user_id: i64) -> anyhow::Result<()> {
    let users = open_service(config).await?;

    match users.find_user_by_external_id(user_id).await? {
        Some(user) => println!("{}", serde_json::to_string_pretty(&user)?),
        None => println!("No user with external id {}", user_id),
    }

    Ok(())
}

async fn seed(config: &ServerConfig, count: usize, start_id: i64) -> anyhow::Result<()> {
    const CITIES: [&str; 5] = ["Berlin", "Lisbon", "Osaka", "Toronto", "Nairobi"];

    let users = open_service(config).await?;
    let now = Local::now().naive_local();

    let batch: Vec<NewUser> = (0..count)
        .map(|i| {
            let user_id = start_id + i as i64;
            NewUser {
                user_id,
                name: format!("Demo User {}", user_id),
                mail: format!("demo{}@example.com", user_id),
                city: CITIES[i % CITIES.len()].to_string(),
                gender: if i % 2 == 0 { MALE } else { 2 },
                is_active: i % 3 != 0,
                registered_at: now - Duration::hours(i as i64 * 7),
            }
        })
        .collect();

    let created = users.create_users(batch).await?;
    println!("Created {} users", created);

    Ok(())
}
