use clap::{Parser, Subcommand};
use palimpsestus::navigation::{Manifest, build_navigation_with_report};
use palimpsestus::{SiteError, config, glyphs, load_site, naming, output, toc};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "palimpsestus")]
#[command(about = "Navigation engine for a serialized novel site")]
#[command(long_about = "\
Navigation engine for a serialized novel site

Every content file's id decides its place in the table of contents and the
reading order. The id is the file path under the content root without its
extension:

  src/content/novel/
  ├── 01/                          # volume 01
  │   ├── 00.mdx                   # 01/00        chapter     → /01/00/
  │   ├── 01.mdx                   # 01/01        chapter     → /01/01/
  │   ├── 01-00.mdx                # 01/01-00     section     → /01/01/00/
  │   └── 01-00-05.md              # 01/01-00-05  sub-section → /01/01/00/05/
  └── 02/                          # volume 02

Each file opens with YAML frontmatter; `title` is required, `draft: true`
hides the entry, `isChapter` and `breadcrumb` feed the renderers.

Run 'palimpsestus gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site directory (holds config.toml)
    #[arg(long, default_value = ".", global = true)]
    site: PathBuf,

    /// Increase log detail (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the navigation tree
    Nav {
        /// Print the navigation manifest as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the previous and next entries for an id
    Order {
        /// Entry id, e.g. 01/02-00
        id: String,
    },
    /// Print the URL for an id
    Url {
        /// Entry id, e.g. 01/02-00
        id: String,
    },
    /// Print the table of contents as HTML
    Toc {
        /// Mark this entry as the current page
        #[arg(long)]
        current: Option<String>,
        /// Wrap the table of contents in a full HTML document
        #[arg(long)]
        page: bool,
    },
    /// Report orphans, duplicate ids, and skipped drafts
    Check,
    /// Find rare glyphs that need local font subsets
    Glyphs {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Nav { json } => {
            let (_, entries) = load_site(&cli.site)?;
            let (nav, report) = build_navigation_with_report(entries);
            if json {
                let manifest = Manifest::new(&nav, &report);
                println!("{}", serde_json::to_string_pretty(&manifest)?);
            } else {
                output::print_navigation_output(&nav);
            }
        }
        Command::Order { id } => {
            let (_, entries) = load_site(&cli.site)?;
            let (nav, _) = build_navigation_with_report(entries);
            let order = nav
                .reading_order(&id)
                .ok_or_else(|| SiteError::UnknownId(id.clone()))?;
            output::print_reading_order(&order);
        }
        Command::Url { id } => {
            println!("{}", naming::id_to_url(&id));
        }
        Command::Toc { current, page } => {
            let (config, entries) = load_site(&cli.site)?;
            let (nav, _) = build_navigation_with_report(entries);
            if let Some(id) = &current
                && nav.find(id).is_none()
            {
                return Err(SiteError::UnknownId(id.clone()).into());
            }
            let markup = if page {
                toc::render_toc_page(
                    &config.site,
                    &nav.chapters,
                    current.as_deref(),
                    config.toc.max_depth,
                )
            } else {
                toc::render_toc(&nav.chapters, current.as_deref(), config.toc.max_depth)
            };
            println!("{}", markup.into_string());
        }
        Command::Check => {
            println!("==> Checking {}", cli.site.display());
            let (_, entries) = load_site(&cli.site)?;
            let (nav, report) = build_navigation_with_report(entries);
            output::print_check_output(&nav, &report);
        }
        Command::Glyphs { json } => {
            let config = config::load_config(&cli.site)?;
            init_thread_pool(&config.processing);
            let report = glyphs::scan_glyphs(
                &config.content_dir(&cli.site),
                &config.content,
                &config.glyphs,
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_glyph_report(&report);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for JSON and HTML.
///
/// `RUST_LOG` wins over `-v` when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("palimpsestus={}", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    debug!(threads, "initializing thread pool");
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
