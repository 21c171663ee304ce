use clap::{Parser, Subcommand};
use site_controls::{config, output, script};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "site-controls")]
#[command(about = "Presentation-state controller for marketing pages")]
#[command(long_about = "\
Presentation-state controller for marketing pages

Drives the interactive state of a single-page site: the hero carousel
(auto-advance, buttons, indicators, keyboard, swipe), the hamburger menu
with nested submenus, viewport-aware dropdowns, header scroll state,
reveal-on-scroll and deferred images.

The CLI replays interaction scripts against a simulated page and prints
the resulting state after every step:

  [layout]
  slides = 3

  [[step]]
  action = \"click\"              # click | hover | unhover | key | resize
  selector = \".carousel-btn.next\" # scroll | swipe | intersect | advance

  [[step]]
  action = \"advance\"
  ms = 12000

Run 'site-controls gen-config' to generate a documented site-controls.toml.")]
#[command(version)]
struct Cli {
    /// Log controller decisions (same as RUST_LOG=debug)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay an interaction script and print the state trace
    Replay {
        /// Script file (TOML)
        script: PathBuf,
        /// Directory containing site-controls.toml
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the trace as JSON instead of text
        #[arg(long)]
        json: bool,
        /// Also write an HTML report to this file
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Validate site-controls.toml and print the resolved values
    Check {
        /// Directory containing site-controls.toml
        #[arg(long, default_value = ".")]
        config: PathBuf,
    },
    /// Print a stock site-controls.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Replay {
            script: script_path,
            config,
            json,
            html,
        } => {
            let trace = script::replay_file(&script_path, config.as_deref())?;
            if json {
                println!("{}", script::trace_to_json(&trace)?);
            } else {
                output::print_trace(&trace);
            }
            if let Some(html_path) = html {
                let title = format!("Replay: {}", script_path.display());
                let report = output::render_trace_html(&title, &trace);
                std::fs::write(&html_path, report.into_string())?;
                if !json {
                    println!("==> Report written to {}", html_path.display());
                }
            }
        }
        Command::Check { config: dir } => {
            println!("==> Checking {}", dir.join(config::CONFIG_FILENAME).display());
            let resolved = config::load_config(&dir)?;
            output::print_config(&resolved);
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `RUST_LOG` wins when set; otherwise warnings only, or debug with `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
