use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};

use hostmgmt::commands::{self, hosts, save, show};
use hostmgmt::config::AppConfig;
use hostmgmt::models::Protocol;
use hostmgmt::{logging, tui, HostManagement, Result};

#[derive(Parser)]
#[command(name = "hostmgmt")]
#[command(version)]
#[command(about = "Serve one shop under several hostnames by patching its config.php files", long_about = None)]
struct Cli {
    /// Path to config.toml (default: <config dir>/hostmgmt/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the host table and read the default host from the admin config
    Install,
    /// Restore the config files when enabled, then drop the table and settings
    Uninstall,
    /// Show hosts, directories and status
    #[clap(visible_alias = "ls")]
    Show {
        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save a hosts form (JSON) and apply the requested status
    Save {
        /// JSON body file, or `-` for stdin; defaults to the stored hosts
        #[arg(short, long)]
        body: Option<String>,
        /// Request the enabled status
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        /// Request the disabled status
        #[arg(long)]
        disable: bool,
    },
    /// Add, remove or mark a host as default, then save
    Host {
        #[command(subcommand)]
        action: HostAction,
    },
    /// Interactive host editor
    Tui,
}

#[derive(Subcommand)]
enum HostAction {
    /// Add a host (prompts for missing values)
    Add {
        /// http or https
        #[arg(short, long)]
        protocol: Option<Protocol>,
        /// Fully qualified domain name
        hostname: Option<String>,
        /// Make it the default host
        #[arg(short, long)]
        default: bool,
    },
    /// Remove a host by hostname or base URL
    #[clap(visible_alias = "rm")]
    Remove {
        host: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Mark a host as the default one
    Default { host: Option<String> },
}

/// Runs the command; `Ok(true)` means the response carried errors.
fn run(cli: Cli) -> Result<bool> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let mut controller = HostManagement::new(&config)?;

    match cli.command {
        Commands::Install => commands::print_response(&controller.install()),
        Commands::Uninstall => commands::print_response(&controller.uninstall()),
        Commands::Show { json } => {
            let page = controller.index();
            if json {
                commands::print_json(&page)?;
            } else {
                show::print_page(&page, controller.language());
            }
            Ok(false)
        }
        Commands::Save { body, enable, disable } => {
            let mut request = match body {
                Some(source) => save::read_body(&source)?,
                None => save::request_from_page(&controller.index()),
            };
            save::apply_status_flags(&mut request, enable, disable);
            commands::print_response(&controller.save(&request))
        }
        Commands::Host { action } => {
            let mut request = save::request_from_page(&controller.index());
            match action {
                HostAction::Add { protocol, hostname, default } => {
                    hosts::add(&mut request, protocol, hostname, default)?
                }
                HostAction::Remove { host, yes } => hosts::remove(&mut request, host.as_deref(), yes)?,
                HostAction::Default { host } => hosts::make_default(&mut request, host.as_deref())?,
            }
            commands::print_response(&controller.save(&request))
        }
        Commands::Tui => {
            tui::run_tui(&mut controller)?;
            Ok(false)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(false) => {}
        Ok(true) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
