use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pixnum::api;
use pixnum::assets::{AssetCategory, AssetLoader};
use pixnum::models::AppConfig;
use pixnum::server;
use pixnum::services::{decode_png, FileStore};
use pixnum_engine::{Palette, ProgressCodec, Quantizer, TargetGrid, BUILTIN_NAMES};

#[derive(Parser)]
#[command(name = "pixnum")]
#[command(about = "Pixnum - paint-by-numbers puzzle server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Convert a PNG image into a numbered grid and print it
    Convert {
        /// PNG image to convert
        image: PathBuf,

        /// Built-in palette name (defaults to the configured palette)
        #[arg(short, long)]
        palette: Option<String>,
    },
    /// Delete stored progress of every configured puzzle
    Reset,
    /// List built-in palettes
    Palettes,
    /// Extract embedded assets to filesystem for customization
    Init {
        /// Extract puzzle images
        #[arg(long)]
        puzzles: bool,

        /// Extract config.yaml
        #[arg(long)]
        config: bool,

        /// Extract all assets
        #[arg(long)]
        all: bool,

        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pixnum API",
        description = "Paint-by-numbers puzzles: open, paint, track progress",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_palette,
        api::handle_list_puzzles,
        api::handle_open,
        api::handle_state,
        api::handle_grid,
        api::handle_reset_puzzle,
        api::handle_close,
        api::handle_paint,
        api::handle_brush,
        api::handle_select,
        api::handle_advance,
        api::handle_color_progress,
        api::handle_reset_all,
    ),
    components(schemas(
        api::PaletteColor,
        api::PaletteResponse,
        api::PuzzleSummary,
        api::PuzzleListResponse,
        api::ProgressView,
        api::SessionResponse,
        api::GridResponse,
        api::StatusResponse,
        api::CloseResponse,
        api::PaintRequest,
        api::BrushRequest,
        api::PaintResponse,
        api::SelectionRequest,
        api::SelectionResponse,
        api::AdvanceResponse,
        api::ColorProgressResponse,
        api::ResetAllResponse,
    )),
    tags(
        (name = "Palette", description = "Active palette"),
        (name = "Puzzles", description = "Puzzle catalog and sessions"),
        (name = "Painting", description = "Painting and color selection"),
        (name = "Progress", description = "Stored progress management")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => run_server().await,
        Some(Commands::Convert { image, palette }) => run_convert_command(&image, palette),
        Some(Commands::Reset) => run_reset_command(),
        Some(Commands::Palettes) => {
            run_palettes_command();
            Ok(())
        }
        Some(Commands::Init {
            puzzles,
            config,
            all,
            force,
            list,
        }) => run_init_command(puzzles, config, all, force, list),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Minimal logging for CLI commands
fn init_cli_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixnum=warn,pixnum_engine=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Quantize a PNG and print the numbered grid (no server needed)
fn run_convert_command(image: &Path, palette_name: Option<String>) -> anyhow::Result<()> {
    init_cli_logging();

    let config = AppConfig::load_from_assets(&AssetLoader::from_env());
    let palette = match palette_name {
        Some(name) => Palette::builtin(&name)?,
        None => config.build_palette()?,
    };

    let bytes = std::fs::read(image)?;
    let buffer = decode_png(&bytes)?;
    let grid = Quantizer::new(palette.clone())
        .options(config.quantize_options())
        .convert(&buffer)?;

    print!("{}", format_grid(&grid));
    println!();
    println!("{}x{} cells, {} paintable", grid.width(), grid.height(), grid.paintable_count());
    for entry in palette.entries() {
        let count = grid.count_of(entry.index);
        if count > 0 {
            println!("  {:>3}  {}  {count}", entry.index, entry.display.to_hex());
        }
    }

    Ok(())
}

/// One row per line, right-aligned indices, `.` for cells outside the artwork
fn format_grid(grid: &TargetGrid) -> String {
    let mut out = String::new();
    for row in grid.cells().chunks(grid.width().max(1)) {
        for &cell in row {
            if cell == 0 {
                out.push_str("  .");
            } else {
                out.push_str(&format!("{cell:>3}"));
            }
        }
        out.push('\n');
    }
    out
}

/// Delete stored progress for every configured puzzle
fn run_reset_command() -> anyhow::Result<()> {
    init_cli_logging();

    let config = AppConfig::load_from_assets(&AssetLoader::from_env());
    let store = FileStore::from_env()?;
    let count = ProgressCodec::new(&store).reset_all(config.puzzle_ids())?;

    println!(
        "Cleared progress of {count} puzzles in {}",
        store.dir().display()
    );
    Ok(())
}

fn run_palettes_command() {
    for name in BUILTIN_NAMES {
        // Built-in names always resolve
        let Ok(palette) = Palette::builtin(name) else {
            continue;
        };
        println!("{name} ({} colors)", palette.len());
        for entry in palette.entries() {
            println!(
                "  {:>3}  {}  {}",
                entry.index,
                entry.reference.to_hex(),
                entry.display.to_hex()
            );
        }
    }
}

/// Extract embedded assets to filesystem
fn run_init_command(
    puzzles: bool,
    config: bool,
    all: bool,
    force: bool,
    list: bool,
) -> anyhow::Result<()> {
    if list {
        println!("Embedded assets:\n");
        println!("Puzzles:");
        for f in AssetLoader::list_embedded(AssetCategory::Puzzles) {
            println!("  {f}");
        }
        println!("\nConfig:");
        for f in AssetLoader::list_embedded(AssetCategory::Config) {
            println!("  {f}");
        }
        return Ok(());
    }

    let mut categories = Vec::new();
    if all || puzzles {
        categories.push(AssetCategory::Puzzles);
    }
    if all || config {
        categories.push(AssetCategory::Config);
    }

    if categories.is_empty() {
        eprintln!("No categories specified. Use --all, --puzzles, or --config");
        eprintln!("\nRun 'pixnum init --list' to see embedded assets.");
        std::process::exit(1);
    }

    let report = AssetLoader::from_env().init(&categories, force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    if report.written.is_empty() && report.skipped.is_empty() {
        println!("No files to extract.");
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let puzzles_dir = std::env::var("PUZZLES_DIR").ok();
    let store_dir = std::env::var("STORE_DIR").ok();

    println!("Pixnum v{VERSION}");
    println!("Paint-by-numbers puzzle server\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  PUZZLES_DIR = {}",
        puzzles_dir.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  STORE_DIR   = {}",
        store_dir.as_deref().unwrap_or("./progress (default)")
    );

    println!("\nAsset Sources:");
    let loader = AssetLoader::from_env();

    let config_source = match config_file {
        Some(ref path) if Path::new(path).exists() => path.to_string(),
        Some(_) => "embedded (file not found)".to_string(),
        None => "embedded".to_string(),
    };
    println!("  Config:  {config_source}");

    let available = loader.list_puzzles().len();
    let embedded = AssetLoader::list_embedded(AssetCategory::Puzzles).len();
    match puzzles_dir {
        Some(ref path) if Path::new(path).exists() => {
            println!("  Puzzles: {path} ({available} images, {embedded} embedded)")
        }
        _ => println!("  Puzzles: embedded ({embedded} images)"),
    }

    let config = AppConfig::load_from_assets(&loader);
    println!("\nPuzzles:");
    for (id, puzzle) in &config.puzzles {
        println!("  {id:<12} {}", puzzle.title_or(id));
    }

    println!("\nCommands:");
    println!("  pixnum serve      Start the HTTP server");
    println!("  pixnum convert    Convert a PNG into a numbered grid");
    println!("  pixnum reset      Delete all stored progress");
    println!("  pixnum palettes   List built-in palettes");
    println!("  pixnum init       Extract embedded assets");
    println!("\nRun 'pixnum --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixnum=debug,pixnum_engine=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let asset_loader = Arc::new(AssetLoader::from_env());

    tracing::info!(
        puzzles = ?asset_loader.puzzles_dir().map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
        config = ?asset_loader.config_file().map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
        "Asset sources configured"
    );

    match asset_loader.seed_if_configured() {
        Ok(report) if !report.is_empty() => {
            tracing::info!(
                puzzles = report.puzzles_seeded.len(),
                config = report.config_seeded,
                "Seeded empty directories with embedded assets"
            );
        }
        Err(e) => {
            tracing::warn!(%e, "Failed to seed assets");
        }
        _ => {}
    }

    let store = FileStore::from_env()?;
    tracing::info!(dir = %store.dir().display(), "Progress store ready");

    let state = server::create_app_state(asset_loader, Arc::new(store))?;
    let sessions = state.sessions.clone();

    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Pixnum server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let flushed = sessions.flush_all().await;
    tracing::info!(sessions = flushed, "Flushed open sessions, shutting down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(%e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
