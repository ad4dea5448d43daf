use clap::Parser;
use cos_deployer::config::{config_help, load_config, ConfigError, ConfigOverrides};
use cos_deployer::reconciliation::{execute_deploy, DeployOptions};
use cos_deployer::utils::{CONFIG_FILE, DEPLOYER_VERSION};
use cos_deployer::{CancelHandle, CosStorage, TracingReporter};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Cos Deployer - mirror a local publish directory into a COS bucket prefix
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long, env = "COS_DEPLOYER_CONFIG", default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Local directory to publish
    #[arg(long, env = "COS_PUBLIC_DIR")]
    public_dir: Option<PathBuf>,

    #[arg(long, env = "COS_SECRET_ID")]
    secret_id: Option<String>,

    #[arg(long, env = "COS_SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    #[arg(long, env = "COS_BUCKET")]
    bucket: Option<String>,

    #[arg(long, env = "COS_REGION")]
    region: Option<String>,

    /// Key prefix the publish directory is mirrored under
    #[arg(long, env = "COS_PATH_PREFIX")]
    path_prefix: Option<String>,

    /// S3-compatible endpoint override (defaults to the regional COS endpoint)
    #[arg(long, env = "COS_ENDPOINT")]
    endpoint: Option<String>,

    /// Maximum number of uploads in flight
    #[arg(long, env = "COS_CONCURRENCY")]
    concurrency: Option<usize>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            secret_id: self.secret_id.clone(),
            secret_key: self.secret_key.clone(),
            bucket: self.bucket.clone(),
            region: self.region.clone(),
            path_prefix: self.path_prefix.clone(),
            public_dir: self.public_dir.clone(),
            concurrency: self.concurrency,
            endpoint: self.endpoint.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging; RUST_LOG takes precedence over --verbose
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match load_config(&args.config, args.overrides()).await {
        Ok(config) => config,
        Err(e) => {
            error!("cos-deployer: config error: {}", e);
            if matches!(e, ConfigError::MissingFields(_)) {
                eprintln!("{}", config_help());
            }
            std::process::exit(2);
        }
    };

    info!(
        version = DEPLOYER_VERSION,
        bucket = %config.bucket,
        region = %config.region,
        prefix = %config.path_prefix,
        "Starting deploy"
    );

    let storage = CosStorage::new(&config);
    let options = DeployOptions::from_config(&config);

    let (cancel_handle, cancel_signal) = CancelHandle::new();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received interrupt, waiting for in-flight operations...");
            cancel_handle.cancel();
        }
    });

    let summary = execute_deploy(&storage, &options, &TracingReporter, &cancel_signal).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    if summary.has_failures() || summary.cancelled {
        std::process::exit(1);
    }

    Ok(())
}
