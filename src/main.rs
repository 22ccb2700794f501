use clap::{Parser, Subcommand};
use nsarchive::{config, generate, output, scan, store::FsStore};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "nsarchive")]
#[command(about = "Build and publish the NSArchive catalog page")]
#[command(long_about = "\
Build and publish the NSArchive catalog page

The store is a bucket mirrored to a local directory. Every daily dump lives
under its category prefix, named after the day it was taken:

  archive/
  ├── index.html                        # Published catalog (output)
  ├── nations/
  │   └── 2024-01-05-nations.xml.gz
  ├── regions/
  │   └── 2024-01-05-regions.xml.gz
  └── foundings/
      └── 2024-01-04-foundings.json

Every object under a category prefix must follow that naming; a single
malformed name aborts the run and nothing is published.

Run 'nsarchive gen-config' to generate a documented nsarchive.toml.")]
#[command(version)]
struct Cli {
    /// Root directory of the archive store
    #[arg(long, default_value = "archive", global = true)]
    store: PathBuf,

    /// Directory containing nsarchive.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Directory for intermediate files (catalog.json)
    #[arg(long, default_value = ".nsarchive-temp", global = true)]
    temp_dir: PathBuf,

    /// Where the rendered page is written
    #[arg(long, default_value = "dist/index.html", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the store and save the sorted catalog
    Scan,
    /// Render the saved catalog to HTML
    Generate,
    /// Upload the rendered page to the store
    Publish,
    /// Run the full pipeline: scan → generate → publish
    Build,
    /// Validate every stored object name without writing anything
    Check,
    /// Print a stock nsarchive.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Runs without loading nsarchive.toml.
    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::load_config(&cli.config_dir)?;
    let store = FsStore::new(&cli.store).with_checksums(config.storage.checksums);
    let catalog_path = cli.temp_dir.join("catalog.json");

    match cli.command {
        Command::Scan => {
            clear_stale(&[catalog_path.as_path(), cli.output.as_path()])?;
            let result = scan::scan(&store, &config.storage)?;
            save_catalog(&result.catalog, &catalog_path)?;
            output::print_scan_output(&result);
        }
        Command::Generate => {
            let catalog = generate::generate(&catalog_path, &cli.output, &config.site)?;
            let bytes = std::fs::metadata(&cli.output)?.len() as usize;
            output::print_generate_output(&catalog, &cli.output, bytes);
        }
        Command::Publish => {
            let html = std::fs::read(&cli.output)?;
            generate::publish(&store, &config.site, &html)?;
            output::print_publish_output(
                &config.site.index_object,
                generate::CONTENT_TYPE,
                html.len(),
            );
        }
        Command::Build => {
            println!("==> Stage 1: Scanning {}", store.root().display());
            clear_stale(&[catalog_path.as_path(), cli.output.as_path()])?;
            let result = scan::scan(&store, &config.storage)?;
            save_catalog(&result.catalog, &catalog_path)?;
            output::print_scan_output(&result);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let html = generate::render(&result.catalog, &config.site);
            generate::write_page(&cli.output, &html)?;
            output::print_generate_output(&result.catalog, &cli.output, html.len());

            println!("==> Stage 3: Publishing to {}", store.root().display());
            generate::publish(&store, &config.site, &html)?;
            output::print_publish_output(
                &config.site.index_object,
                generate::CONTENT_TYPE,
                html.len(),
            );

            println!("==> Build complete");
        }
        Command::Check => {
            println!("==> Checking {}", store.root().display());
            let result = scan::scan(&store, &config.storage)?;
            output::print_scan_output(&result);
            println!("==> Archive is valid");
        }
        Command::GenConfig => unreachable!("handled before config loading"),
    }

    Ok(())
}

/// Remove the catalog and page of an earlier run. A failed scan must leave
/// nothing to generate or publish.
fn clear_stale(paths: &[&Path]) -> std::io::Result<()> {
    for path in paths {
        match std::fs::remove_file(path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e),
            _ => {}
        }
    }
    Ok(())
}

/// Write the catalog as pretty JSON for the generate stage.
fn save_catalog(catalog: &nsarchive::catalog::Catalog, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(catalog)?;
    std::fs::write(path, json)
}
