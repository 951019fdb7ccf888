mod config;
mod error;
mod helpers;

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use clap::{Parser, Subcommand};
use gate::FilePermissionsLayer;
use grants::{Decision, DenyReason};
use http::{HeaderName, Method};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use config::Config;
use error::{Error, Result};
use helpers::HeaderHelpers;

const CONFIG_FILE: &str = "pathgate.toml";
const DEFAULT_LOG_FILTER: &str = "pathgate=info,gate=info,tower_http=info";

/// Exit code of `check` when the request is denied.
const EXIT_DENIED: i32 = 2;

#[derive(Parser)]
#[command(name = "pathgate")]
#[command(about = "Path-scoped authorization gate for a file server", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the config file holding the grant table
    #[arg(short, long, visible_alias = "grants", global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Log filter (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve a directory behind the gate
    Serve {
        /// Address to listen on (overrides server.listen)
        #[arg(short, long)]
        listen: Option<SocketAddr>,
        /// Directory to serve (overrides server.root)
        #[arg(short, long)]
        root: Option<PathBuf>,
        /// Header carrying the caller's user name (overrides server.user_header)
        #[arg(long)]
        user_header: Option<String>,
    },
    /// Evaluate a single request against the grant table
    Check {
        /// User whose grants are evaluated
        #[arg(short, long)]
        user: String,
        /// HTTP method of the request
        #[arg(short, long, default_value = "GET")]
        method: String,
        /// Requested path
        path: String,
    },
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Run the selected command and return the process exit code.
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Serve {
            listen,
            root,
            user_header,
        } => {
            cmd_serve(config, listen, root, user_header).await?;
            Ok(0)
        }
        Commands::Check { user, method, path } => {
            let outcome = cmd_check(&config, &user, &method, &path)?;
            println!("{outcome}");
            Ok(outcome.exit_code())
        }
    }
}

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).map_err(|e| Error::Config(e.to_string()))?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Config(e.to_string()))
}

async fn cmd_serve(
    config: Config,
    listen: Option<SocketAddr>,
    root: Option<PathBuf>,
    user_header: Option<String>,
) -> Result<()> {
    let addr = listen.unwrap_or(config.server.listen);
    let root = root.unwrap_or(config.server.root);
    if !root.is_dir() {
        return Err(Error::Config(format!("{} is not a directory", root.display())));
    }

    let user_header = user_header.unwrap_or(config.server.user_header);
    let header = HeaderName::try_from(user_header.as_str())
        .map_err(|e| Error::Config(format!("invalid user_header: {e}")))?;
    let prefix_match = config.grants.prefix_match;

    info!(
        users = config.grants.users.len(),
        ?prefix_match,
        "loaded grant table"
    );

    let files = ServiceBuilder::new()
        .layer(
            FilePermissionsLayer::new(HeaderHelpers::new(config.grants, header))
                .with_prefix_match(prefix_match),
        )
        .service(ServeDir::new(&root));

    let app = Router::new()
        .fallback_service(files)
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| Error::Bind { addr, source })?;
    info!(%addr, root = %root.display(), "serving");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        // Without a signal handler, run until the process is killed.
        std::future::pending::<()>().await;
    }
}

/// Result of `pathgate check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckOutcome {
    Allow,
    UnknownUser,
    Deny(DenyReason),
}

impl CheckOutcome {
    fn exit_code(self) -> i32 {
        match self {
            CheckOutcome::Allow => 0,
            CheckOutcome::UnknownUser | CheckOutcome::Deny(_) => EXIT_DENIED,
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Allow => f.write_str("allow"),
            CheckOutcome::UnknownUser => f.write_str("deny (user not found)"),
            CheckOutcome::Deny(reason) => write!(f, "deny ({reason})"),
        }
    }
}

fn cmd_check(config: &Config, user: &str, method: &str, path: &str) -> Result<CheckOutcome> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| Error::InvalidMethod(method.to_string()))?;

    let Some(grants) = config.grants.grants_for(user) else {
        return Ok(CheckOutcome::UnknownUser);
    };

    Ok(match config.grants.evaluator().evaluate(path, &method, grants) {
        Decision::Allow => CheckOutcome::Allow,
        Decision::Deny { reason } => CheckOutcome::Deny(reason),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[users.manager]
grants = [
  { access = "read", path = "/managers/" },
  { access = "read_write", path = "/hr/shipping/" },
]
"#;

    fn check(user: &str, method: &str, path: &str) -> CheckOutcome {
        let config = Config::parse(CONFIG).unwrap();
        cmd_check(&config, user, method, path).unwrap()
    }

    #[test]
    fn test_check_allow() {
        let outcome = check("manager", "delete", "/hr/shipping/x");
        assert_eq!(outcome, CheckOutcome::Allow);
        assert_eq!(outcome.to_string(), "allow");
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn test_check_deny() {
        let outcome = check("manager", "POST", "/managers/instructions.pdf");
        assert_eq!(outcome, CheckOutcome::Deny(DenyReason::InsufficientAccess));
        assert_eq!(outcome.to_string(), "deny (insufficient access)");
        assert_eq!(outcome.exit_code(), EXIT_DENIED);

        let outcome = check("manager", "GET", "/admin/x");
        assert_eq!(outcome.to_string(), "deny (no matching grant)");
        assert_eq!(outcome.exit_code(), EXIT_DENIED);
    }

    #[test]
    fn test_check_unknown_user() {
        let outcome = check("stranger", "GET", "/managers/instructions.pdf");
        assert_eq!(outcome, CheckOutcome::UnknownUser);
        assert_eq!(outcome.to_string(), "deny (user not found)");
        assert_eq!(outcome.exit_code(), EXIT_DENIED);
    }

    #[test]
    fn test_check_invalid_method() {
        let config = Config::parse(CONFIG).unwrap();
        let err = cmd_check(&config, "manager", "GE T", "/").unwrap_err();
        assert!(matches!(err, Error::InvalidMethod(_)));
    }

    #[test]
    fn test_grants_flag_aliases_config() {
        let cli = Cli::try_parse_from([
            "pathgate",
            "check",
            "--grants",
            "grants.toml",
            "--user",
            "manager",
            "/x",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("grants.toml"));
    }

    #[test]
    fn test_serve_user_header_flag() {
        let cli = Cli::try_parse_from([
            "pathgate",
            "serve",
            "--user-header",
            "x-forwarded-user",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve { user_header: Some(ref h), .. } if h == "x-forwarded-user"
        ));
    }
}
