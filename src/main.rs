use clap::{Parser, Subcommand};
use showreel::{config, generate, output, scan};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "showreel")]
#[command(about = "Static site generator for media portfolios")]
#[command(long_about = "\
Static site generator for media portfolios

The asset directories are the data source. Images, memes and videos are
scanned into media-manifest.json, and every page of the site is rendered
from that manifest.

Site structure:

  site/
  ├── config.toml                  # Site config (optional, overrides stock defaults)
  ├── media-manifest.json          # Written by 'scan', read by 'build'
  ├── assets/
  │   ├── images/                  # Gallery images (keyword in name picks category)
  │   ├── videos/                  # Videos (thumbnail borrowed from an image)
  │   └── memes/                   # Memes page
  └── stickers/                    # Images for the falling sticker layer

Titles come from filenames: By_charlie-sunset.webp → \"Charlie Sunset\".

Run 'showreel gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the asset directories into media-manifest.json
    Scan,
    /// Generate the site from the manifest
    Build,
    /// Report gallery pages and broken entries without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "showreel=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let site_config = config::load_config(&cli.root)?;
            let mut rng = config::build_rng(&site_config.build);
            let result = scan::scan(&cli.root, &site_config, &mut rng)?;
            let manifest_path = scan::write_manifest(&cli.root, &site_config, &result.items)?;
            output::print_scan_output(&result, &site_config.categories.meme, &manifest_path);
        }
        Command::Build => {
            let site_config = config::load_config(&cli.root)?;
            let mut rng = config::build_rng(&site_config.build);
            println!("==> Generating {} → {}", cli.root.display(), cli.output.display());
            let report = generate::generate(&cli.root, &cli.output, &site_config, &mut rng)?;
            output::print_build_output(&report, &cli.output);
        }
        Command::Check => {
            let site_config = config::load_config(&cli.root)?;
            println!("==> Checking {}", cli.root.display());
            let summary = generate::check(&cli.root, &site_config);
            output::print_check_output(&summary);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
