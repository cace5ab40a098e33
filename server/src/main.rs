use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use racing::config;
use racing::persistence::sqlite::{Database, SqliteRacesRepository};
use racing::persistence::RacesRepository;
use racing::service::{RacesEndpoints, RacingServiceImpl};
use racing_proto::racing_server::RacingServer;
use racing_proto::{ListRacesRequest, ListRacesRequestFilter, Visibility};
use tonic::transport::Server;
use tonic::Request;

/// Race listing over a SQLite store.
///
/// With no subcommand the gRPC server is started on the default address.
#[derive(Parser)]
#[command(name = "racing-server", about = "Race listing over a SQLite store")]
struct Cli {
    /// Database file. Defaults to RACING_DB_PATH or ~/.config/racing/races.db.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the Racing gRPC service.
    Serve {
        /// Address to listen on.
        #[arg(long, default_value = "[::1]:50051")]
        addr: SocketAddr,
    },
    /// Print races from the database and exit.
    List {
        /// Only include races from this meeting. May be repeated.
        #[arg(long = "meeting-id")]
        meeting_ids: Vec<i64>,

        /// Which races to include by visibility.
        #[arg(long, value_enum, default_value_t = VisibilityArg::Unspecified)]
        visibility: VisibilityArg,

        /// Sort expression, e.g. "advertised_start_time DESC".
        #[arg(long, default_value = "")]
        order_by: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum VisibilityArg {
    Unspecified,
    Hidden,
    Visible,
    ShowAll,
}

impl From<VisibilityArg> for Visibility {
    fn from(arg: VisibilityArg) -> Self {
        match arg {
            VisibilityArg::Unspecified => Visibility::Unspecified,
            VisibilityArg::Hidden => Visibility::Hidden,
            VisibilityArg::Visible => Visibility::Visible,
            VisibilityArg::ShowAll => Visibility::ShowAll,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with span durations
    use tracing_subscriber::fmt::format::FmtSpan;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = cli.db.unwrap_or_else(config::get_db_path);
    tracing::info!("Using database: {}", db_path.display());

    let db = Database::open(&db_path).await?;
    let repo = Arc::new(SqliteRacesRepository::new(db.pool().clone()));
    repo.init().await?;

    match cli.command {
        None => serve(repo, default_addr()?).await,
        Some(Commands::Serve { addr }) => serve(repo, addr).await,
        Some(Commands::List {
            meeting_ids,
            visibility,
            order_by,
        }) => {
            let request = ListRacesRequest {
                filter: Some(ListRacesRequestFilter {
                    meeting_ids,
                    visibility: Visibility::from(visibility) as i32,
                }),
                order_by,
            };
            list(repo, request).await
        }
    }
}

fn default_addr() -> anyhow::Result<SocketAddr> {
    Ok("[::1]:50051".parse()?)
}

async fn serve(repo: Arc<SqliteRacesRepository>, addr: SocketAddr) -> anyhow::Result<()> {
    let service = RacingServiceImpl::new(repo);
    tracing::info!("Server listening on {}", addr);

    Server::builder()
        .add_service(RacingServer::new(service))
        .serve(addr)
        .await?;

    Ok(())
}

async fn list(repo: Arc<SqliteRacesRepository>, request: ListRacesRequest) -> anyhow::Result<()> {
    let endpoints = RacesEndpoints::new(repo);
    let response = endpoints.list_races(Request::new(request)).await?.into_inner();

    for race in &response.races {
        let start = race
            .advertised_start_time
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        println!(
            "{:>4}  meeting {:>3}  #{:<2}  {:<8}  {}  {}",
            race.id,
            race.meeting_id,
            race.number,
            if race.visible { "visible" } else { "hidden" },
            start,
            race.name
        );
    }
    tracing::info!(count = response.races.len(), "Listed races");

    Ok(())
}
