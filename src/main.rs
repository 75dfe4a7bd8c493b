use anyhow::Context;
use clap::Parser;
use simrec_api::{ApiSettings, RestApi};
use simrec_storage::{MatrixFormat, ModelConfig, ModelStore};
use simrec_core::Recommender;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Serve similar-product recommendations from a precomputed similarity matrix
#[derive(Parser, Debug)]
#[command(name = "simrec")]
#[command(about = "Similar-product recommendations over a product catalog", long_about = None)]
struct Args {
    /// Product catalog (CSV with product_id, product_name, brand_name, price_usd, primary_category)
    #[arg(long, default_value = "metadata/products.csv")]
    catalog: PathBuf,

    /// Precomputed similarity matrix (.json, .json.gz or .bin)
    #[arg(long, default_value = "metadata/hybrid_similarity.json")]
    matrix: PathBuf,

    /// Matrix encoding, overrides the file extension (json, gzip, bincode)
    #[arg(long)]
    matrix_format: Option<MatrixFormat>,

    /// Expected SHA-256 of the matrix file, hex
    #[arg(long)]
    matrix_checksum: Option<String>,

    /// Catalog field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// HTTP API port
    #[arg(long, default_value_t = 8080)]
    http_port: u16,

    /// Upper bound on recommendations per request
    #[arg(long, default_value_t = 10)]
    max_count: usize,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting simrec v{}", env!("CARGO_PKG_VERSION"));
    info!("Catalog: {:?}", args.catalog);
    info!("Similarity matrix: {:?}", args.matrix);

    let delimiter = u8::try_from(args.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("delimiter {:?} must be a single ASCII character", args.delimiter))?;

    let config = ModelConfig {
        catalog_path: args.catalog.clone(),
        matrix_path: args.matrix.clone(),
        matrix_format: args.matrix_format,
        matrix_checksum: args.matrix_checksum.clone(),
        delimiter,
    };

    let store = ModelStore::load(&config).with_context(|| {
        format!(
            "failed to load model from {} and {}",
            args.catalog.display(),
            args.matrix.display()
        )
    })?;
    let report = store.report();
    info!(
        "Model loaded: {} products, {} similarity rows in {:?}",
        report.products, report.matrix_rows, report.elapsed
    );

    let recommender = store.recommender();
    let settings = ApiSettings {
        max_count: args.max_count.max(1),
        ..ApiSettings::default()
    };
    let http_handle = spawn_http_server(recommender, settings, args.http_port);

    info!("simrec started successfully");
    info!("HTTP API: http://localhost:{}/", args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        joined = tokio::task::spawn_blocking(move || http_handle.join()) => {
            server_exit(joined.context("failed to wait for HTTP server")?)?;
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}

/// Run the REST API on its own actix system thread
fn spawn_http_server(
    recommender: Arc<Recommender>,
    settings: ApiSettings,
    port: u16,
) -> JoinHandle<std::io::Result<()>> {
    std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", port);
        let sys = actix_web::rt::System::new();
        sys.block_on(RestApi::start(recommender, settings, port))
    })
}

fn server_exit(joined: std::thread::Result<std::io::Result<()>>) -> anyhow::Result<()> {
    match joined {
        Ok(result) => result.context("HTTP server failed"),
        Err(_) => anyhow::bail!("HTTP server thread panicked"),
    }
}
