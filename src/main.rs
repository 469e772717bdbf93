//! Route Host Webhook - assigns OpenShift Routes to IngressControllers

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use kube::Client;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use route_host_webhook::cluster::{KubeClusterSource, INGRESS_OPERATOR_NAMESPACE};
use route_host_webhook::config::{Config, ConfigArgs};
use route_host_webhook::hostname::HostnameVars;
use route_host_webhook::webhook::{webhook_router, WebhookState};
use route_host_webhook::DEFAULT_LISTEN_ADDR;

/// Route Host Webhook - mutating admission webhook for OpenShift Routes
#[derive(Parser, Debug)]
#[command(name = "route-host-webhook", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the admission webhook over HTTPS (default mode)
    Serve(ServeArgs),

    /// Validate configuration and print the host a sample route would get
    CheckConfig(CheckArgs),
}

/// Serve mode arguments
#[derive(Parser, Debug)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    listen: SocketAddr,

    /// PEM certificate served to the API server
    #[arg(long, env = "TLS_CERT_FILE", default_value = "/etc/webhook/certs/tls.crt")]
    tls_cert: PathBuf,

    /// PEM private key for the certificate
    #[arg(long, env = "TLS_KEY_FILE", default_value = "/etc/webhook/certs/tls.key")]
    tls_key: PathBuf,

    /// Namespace IngressControllers are listed from
    #[arg(long, env = "INGRESS_OPERATOR_NAMESPACE", default_value = INGRESS_OPERATOR_NAMESPACE)]
    ingress_operator_namespace: String,
}

/// check-config arguments
#[derive(Parser, Debug)]
struct CheckArgs {
    /// Sample route name
    #[arg(long, default_value = "my-route")]
    route_name: String,

    /// Sample route namespace
    #[arg(long, default_value = "my-namespace")]
    route_namespace: String,

    /// Sample controller name
    #[arg(long, default_value = "default")]
    router_name: String,

    /// Sample controller domain
    #[arg(long, default_value = "apps.example.com")]
    router_domain: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
        eprintln!("CRITICAL: Failed to install crypto provider: {:?}", e);
        std::process::exit(1);
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Configuration errors are fatal before anything is served
    let config = Config::try_from(&cli.config)
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    match cli.command {
        Some(Commands::CheckConfig(args)) => check_config(&config, &args),
        Some(Commands::Serve(args)) => run_serve(config, args).await,
        None => run_serve(config, ServeArgs::parse_from(["route-host-webhook"])).await,
    }
}

/// Print the effective configuration and a sample rendered host
fn check_config(config: &Config, args: &CheckArgs) -> anyhow::Result<()> {
    let host = config.hostname_template().render(&HostnameVars {
        route_name: &args.route_name,
        route_namespace: &args.route_namespace,
        router_name: &args.router_name,
        router_domain: &args.router_domain,
    });

    println!("Default router:       {}", config.default_router());
    println!("Owned hosts:          {}", config.owned_hosts());
    println!("Hostname template:    {}", config.hostname_template());
    println!("Mutate system routes: {}", config.mutate_system_routes());
    println!("Sample host:          {}", host);
    Ok(())
}

/// Run the HTTPS admission webhook until interrupted
async fn run_serve(config: Config, args: ServeArgs) -> anyhow::Result<()> {
    tracing::info!(
        default_router = %config.default_router(),
        owned_hosts = %config.owned_hosts(),
        template = %config.hostname_template(),
        mutate_system_routes = config.mutate_system_routes(),
        "Route host webhook starting..."
    );

    let client = Client::try_default()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Kubernetes client: {}", e))?;

    let source = KubeClusterSource::new(client, args.ingress_operator_namespace);
    let state = Arc::new(WebhookState::new(Arc::new(source), Arc::new(config)));
    let app = webhook_router(state);

    let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&args.tls_cert, &args.tls_key)
        .await
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load TLS certificate {:?} / key {:?}: {}",
                args.tls_cert,
                args.tls_key,
                e
            )
        })?;

    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received, draining connections");
            shutdown_handle.graceful_shutdown(Some(Duration::from_secs(10)));
        }
    });

    tracing::info!(addr = %args.listen, "Starting HTTPS webhook server");
    axum_server::bind_rustls(args.listen, tls_config)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(|e| anyhow::anyhow!("HTTPS server error: {}", e))
}
