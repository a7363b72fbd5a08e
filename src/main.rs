use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use clearview::api;
use clearview::models::AppConfig;
use clearview::server;
use clearview::services::{decode_image, restore_buffer};
use photo_restore::{Mode, Restorer};

#[derive(Parser)]
#[command(name = "clearview")]
#[command(about = "Clearview - restore low-light, foggy and smoky photographs")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Restore a single image file to PNG
    Enhance {
        /// Input image (PNG, JPEG, BMP, GIF, TIFF or WebP)
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Mode: "low_light", "fog" or "smoke" (anything else copies the image)
        #[arg(short, long, default_value = "low_light")]
        mode: String,
    },
    /// List supported restoration modes
    Modes,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clearview API",
        description = "Restore low-light, foggy and smoky photographs",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(api::handle_enhance_api, api::handle_modes),
    components(schemas(api::EnhanceUpload, api::ModeInfo, api::ModesResponse)),
    tags(
        (name = "Enhance", description = "Image restoration")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Enhance {
            input,
            output,
            mode,
        }) => run_enhance_command(&input, &output, &mode),
        Some(Commands::Modes) => {
            run_modes_command();
            Ok(())
        }
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Restore one image file (no server needed)
fn run_enhance_command(input: &PathBuf, output: &PathBuf, mode: &str) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clearview=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    if Mode::from_tag(mode).is_none() {
        tracing::warn!(mode, "Unknown mode, image will be copied unchanged");
    }

    let config = AppConfig::from_env();
    let options = config
        .restore_options()
        .map_err(|e| anyhow::anyhow!("Invalid tuning configuration: {e}"))?;
    let restorer = Restorer::with_options(options)?;

    let bytes = std::fs::read(input)?;
    let buffer = decode_image(&bytes)
        .map_err(|e| anyhow::anyhow!("{}: {e}", input.display()))?;
    let restored = restore_buffer(&restorer, &buffer, mode)?;

    std::fs::write(output, &restored.png)?;
    println!(
        "Enhanced {} -> {} ({}x{}, {} bytes)",
        input.display(),
        output.display(),
        restored.width,
        restored.height,
        restored.png.len()
    );

    Ok(())
}

/// Print the supported modes
fn run_modes_command() {
    println!("Modes:");
    for mode in Mode::ALL {
        println!("  {:<10} {}", mode.as_str(), mode.label());
    }
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    // Read environment variables
    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let static_dir = std::env::var("STATIC_DIR").ok();

    // Header
    println!("Clearview v{VERSION}");
    println!("Photo restoration for low light, fog and smoke\n");

    // Environment variables section
    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:5000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  STATIC_DIR  = {}",
        static_dir.as_deref().unwrap_or("(not set)")
    );

    // Config source
    let config_source = match config_file {
        Some(ref path) if PathBuf::from(path).exists() => path.to_string(),
        Some(_) => "defaults (file not found)".to_string(),
        None => "defaults".to_string(),
    };

    let config = AppConfig::load(config_file.as_deref().map(std::path::Path::new))
        .with_static_dir(static_dir.map(PathBuf::from));

    println!("\nStorage:");
    println!("  Config:  {config_source}");
    println!("  Uploads: {}", config.upload_path().display());
    println!("  Results: {}", config.result_path().display());
    println!("  Limit:   {} bytes per upload", config.max_upload_bytes);

    // Commands section
    println!("\nCommands:");
    println!("  clearview serve     Start the HTTP server");
    println!("  clearview enhance   Restore one image to a PNG file");
    println!("  clearview modes     List restoration modes");
    println!("\nRun 'clearview --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clearview=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
    let config = AppConfig::from_env();

    tracing::info!(
        static_dir = %config.static_dir.display(),
        uploads = %config.upload_path().display(),
        results = %config.result_path().display(),
        "Storage configured"
    );

    // Create application state using shared server module
    let state = server::create_app_state(config)?;

    // Build router: shared routes plus OpenAPI documentation
    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Clearview server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
