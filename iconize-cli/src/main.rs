//! Iconize CLI Tool
//!
//! Command-line interface for generating Xcode asset catalogs from source images.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use iconize_builder::{png_codec, CatalogBuilder, ExportConfig, ExportReport, SourceImages};
use iconize_core::{AspectMode, AssetKind, AssetSpecLoader, ImageOrientation, Platform};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "iconize")]
#[command(about = "Iconize - Generate Xcode asset catalogs from a source image")]
#[command(version)]
struct Cli {
    /// Log every generated variant
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file holding the default export settings
    #[arg(long, global = true)]
    preferences: Option<PathBuf>,

    /// Write the effective export settings back to the preferences file
    #[arg(long, global = true, requires = "preferences")]
    remember: bool,

    /// Directory with variant resources overriding the bundled ones
    #[arg(long, global = true)]
    resources: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// Directory the asset catalog folder is created in
    #[arg(short, long)]
    output: PathBuf,

    /// Name of the generated set
    #[arg(short, long)]
    name: Option<String>,

    /// How the source is mapped onto differently shaped targets (fit, fill, none)
    #[arg(long)]
    aspect: Option<AspectMode>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an app icon set
    AppIcon {
        /// Source image
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        /// Target platform (watch, iphone, ipad, mac, car); repeatable
        #[arg(short, long = "platform")]
        platforms: Vec<Platform>,

        /// Write all platforms into one icon set
        #[arg(long, conflicts_with = "per_platform")]
        combined: bool,

        /// Write one icon set per platform
        #[arg(long)]
        per_platform: bool,
    },

    /// Generate an image set whose 3x image is the source itself
    ImageSet {
        /// Source image
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate launch images from portrait and landscape sources
    LaunchImage {
        /// Portrait source image
        #[arg(long, required_unless_present = "landscape")]
        portrait: Option<PathBuf>,

        /// Landscape source image
        #[arg(long)]
        landscape: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,

        /// Target platform (iphone, ipad); repeatable
        #[arg(short, long = "platform")]
        platforms: Vec<Platform>,
    },

    /// Generate an iMessage app icon set
    MessagesIcon {
        /// Source image
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List the variants of a selection without generating anything
    Variants {
        /// Asset kind (app-icon, image-set, launch-image, messages-icon)
        #[arg(short, long)]
        kind: AssetKind,

        /// Target platform; repeatable
        #[arg(short, long = "platform")]
        platforms: Vec<Platform>,

        /// Launch image orientation (portrait, landscape); repeatable
        #[arg(long = "orientation")]
        orientations: Vec<ImageOrientation>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let loader = match &cli.resources {
        Some(dir) => AssetSpecLoader::from_dir(dir),
        None => AssetSpecLoader::embedded(),
    };
    let mut config = load_preferences(cli.preferences.as_deref())?;

    match cli.command {
        Commands::AppIcon {
            input,
            output,
            platforms,
            combined,
            per_platform,
        } => {
            if combined {
                config.combined = true;
            } else if per_platform {
                config.combined = false;
            }
            let effective = apply_overrides(&mut config, AssetKind::AppIcon, &output, platforms);
            let sources = SourceImages::single(open_source(&input)?);
            export(AssetKind::AppIcon, &effective, loader, &sources, &output, "AppIcon")?;
        }

        Commands::ImageSet { input, output } => {
            let effective = apply_overrides(&mut config, AssetKind::ImageSet, &output, Vec::new());
            let sources = SourceImages::single(open_source(&input)?);
            export(AssetKind::ImageSet, &effective, loader, &sources, &output, "Image")?;
        }

        Commands::LaunchImage {
            portrait,
            landscape,
            output,
            platforms,
        } => {
            let effective = apply_overrides(&mut config, AssetKind::LaunchImage, &output, platforms);
            let mut sources = SourceImages::new();
            if let Some(path) = &portrait {
                sources.insert(ImageOrientation::Portrait, open_source(path)?);
            }
            if let Some(path) = &landscape {
                sources.insert(ImageOrientation::Landscape, open_source(path)?);
            }
            export(AssetKind::LaunchImage, &effective, loader, &sources, &output, "LaunchImage")?;
        }

        Commands::MessagesIcon { input, output } => {
            let effective = apply_overrides(&mut config, AssetKind::MessagesIcon, &output, Vec::new());
            let sources = SourceImages::single(open_source(&input)?);
            export(
                AssetKind::MessagesIcon,
                &effective,
                loader,
                &sources,
                &output,
                "iMessage App Icon",
            )?;
        }

        Commands::Variants {
            kind,
            platforms,
            orientations,
        } => {
            let platforms = if platforms.is_empty() {
                config
                    .platforms
                    .into_iter()
                    .filter(|platform| kind.supports(*platform))
                    .collect()
            } else {
                platforms
            };
            list_variants(&loader, kind, &platforms, &orientations)?;
            return Ok(());
        }
    }

    if cli.remember {
        if let Some(path) = &cli.preferences {
            save_preferences(path, &config)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn load_preferences(path: Option<&Path>) -> Result<ExportConfig> {
    let Some(path) = path else {
        return Ok(ExportConfig::default());
    };
    if !path.exists() {
        log::info!("No preferences at {}, using defaults", path.display());
        return Ok(ExportConfig::default());
    }

    let data = std::fs::read_to_string(path).context("Failed to read preferences file")?;
    serde_json::from_str(&data).context("Failed to parse preferences file")
}

fn save_preferences(path: &Path, config: &ExportConfig) -> Result<()> {
    let data = serde_json::to_string_pretty(config).context("Failed to serialize preferences")?;
    std::fs::write(path, data + "\n").context("Failed to write preferences file")?;
    println!("Saved preferences to {}", path.display());
    Ok(())
}

/// Explicit flags take precedence over stored preferences.
///
/// Returns the configuration for this export: stored platforms that do not
/// apply to `kind` are left out of it but stay in `config`, explicit ones are
/// passed on as given.
fn apply_overrides(
    config: &mut ExportConfig,
    kind: AssetKind,
    output: &OutputArgs,
    platforms: Vec<Platform>,
) -> ExportConfig {
    if let Some(aspect) = output.aspect {
        config.aspect_mode = aspect;
    }
    if !platforms.is_empty() {
        config.platforms = platforms;
        return config.clone();
    }

    let mut effective = config.clone();
    effective.platforms.retain(|platform| {
        let supported = kind.supports(*platform);
        if !supported {
            log::info!("Ignoring stored platform {} for {}", platform, kind);
        }
        supported
    });
    effective
}

fn open_source(path: &Path) -> Result<image::RgbaImage> {
    png_codec::decode_image(path)
        .with_context(|| format!("Failed to open source image {}", path.display()))
}

fn export(
    kind: AssetKind,
    config: &ExportConfig,
    loader: AssetSpecLoader,
    sources: &SourceImages,
    output: &OutputArgs,
    default_name: &str,
) -> Result<()> {
    let name = output.name.as_deref().unwrap_or(default_name);
    println!("Generating {} \"{}\"", kind, name);
    println!("Output: {}", output.output.display());

    let mut builder = CatalogBuilder::new(kind, config.clone()).with_loader(loader);
    let report = builder
        .generate(sources, &output.output, name)
        .context("Failed to generate asset catalog")?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &ExportReport) {
    println!(
        "Wrote {} images ({} already present)",
        report.written.len(),
        report.skipped.len()
    );
    for dir in &report.directories {
        println!("  {}", dir.display());
    }

    if !report.failures.is_empty() {
        println!("\n{} images could not be generated:", report.failures.len());
        for failure in &report.failures {
            println!("  {}: {}", failure.filename, failure.reason);
        }
    }
}

fn list_variants(
    loader: &AssetSpecLoader,
    kind: AssetKind,
    platforms: &[Platform],
    orientations: &[ImageOrientation],
) -> Result<()> {
    let orientations = if orientations.is_empty() {
        vec![ImageOrientation::Portrait, ImageOrientation::Landscape]
    } else {
        orientations.to_vec()
    };
    let variants = loader
        .resolve(kind, platforms, &orientations)
        .context("Failed to resolve variants")?;

    println!("\n=== {} variants ({}) ===", kind, variants.len());
    for variant in &variants {
        let size = variant
            .size
            .as_ref()
            .map_or_else(|| "source".to_string(), |size| size.to_string());
        let pixels = variant
            .pixel_size()
            .map_or_else(|| "-".to_string(), |(width, height)| format!("{}x{}", width, height));
        println!(
            "  {:<32} {:<16} {:>9} @{}  {:>9} px",
            variant.filename(),
            variant.idiom,
            size,
            variant.scale,
            pixels
        );
    }
    Ok(())
}
