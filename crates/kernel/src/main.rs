//! stock-shell
//!
//! Serves resolved navigation and named paths to the stock-app UI shell, and
//! checks navigation configs in CI.
//!
//! Usage:
//!   stock-shell serve
//!   stock-shell check --config navigation.yml
//!   stock-shell resolve --path /dashboard/users --flag is_superadmin

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use stock_shell::menu::{LoadMode, NavConfig, Severity};
use stock_shell::user::UserContext;
use stock_shell::{AppState, Config, routes};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Validate a navigation config and list every issue found.
    Check {
        /// Config document (.yml, .yaml or .json). Defaults to NAV_CONFIG or the built-in navigation.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Resolve navigation for a path and print the render tree as JSON.
    Resolve {
        /// Current request path.
        #[arg(long)]
        path: String,

        /// Role flag that is set for the user (repeatable).
        #[arg(long = "flag")]
        flags: Vec<String>,

        /// Treat the user as signed in.
        #[arg(long)]
        authenticated: bool,

        /// Config document. Defaults to NAV_CONFIG or the built-in navigation.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing();

    let mut config = Config::from_env().context("failed to load configuration")?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            serve(config)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { config: path } => {
            if path.is_some() {
                config.nav_config = path;
            }
            check(&config)
        }
        Command::Resolve {
            path,
            flags,
            authenticated,
            config: nav_path,
        } => {
            if nav_path.is_some() {
                config.nav_config = nav_path;
            }
            let nav = config.load_navigation()?;
            let user = UserContext::from_flags(authenticated, flags);
            let resolution = nav.resolve(&user, &path);
            println!("{}", serde_json::to_string_pretty(&resolution)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn serve(config: Config) -> Result<()> {
    info!("Starting stock-shell");
    info!(port = config.port, "Configuration loaded");

    let state = AppState::new(&config).context("failed to initialize application state")?;
    let app = routes::app(state, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Validate leniently so every issue is listed, then fail on errors.
fn check(config: &Config) -> Result<ExitCode> {
    let nav = match &config.nav_config {
        Some(path) => NavConfig::load(path, LoadMode::Lenient)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => NavConfig::builtin().context("built-in navigation is invalid")?,
    };

    let report = nav.report();
    for issue in &report.issues {
        let label = match issue.severity() {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!("{label}: {issue}");
    }

    let errors = report.errors().count();
    let warnings = report.warnings().count();
    println!(
        "{} items, {} routes: {errors} error(s), {warnings} warning(s)",
        nav.tree().len(),
        nav.paths().len()
    );

    Ok(if errors > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
