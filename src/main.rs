use anyhow::Result;
use clap::Parser;

use tagger::config::{split_assets, Config};
use tagger::process::{self, Outcome, ProcessOptions};
use tagger::provider::{GitProvider, GithubProvider};
use tagger::ui;

#[derive(clap::Parser)]
#[command(
    name = "tagger",
    about = "Create semantic version tags and releases from conventional commits"
)]
struct Args {
    #[arg(long, help = "Use the local git repository instead of the hosting API")]
    local: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "API host URL (default: https://api.github.com)")]
    host: Option<String>,

    #[arg(long, help = "Repository as owner/repo")]
    repository: Option<String>,

    #[arg(long, help = "Bearer token for the hosting API")]
    token: Option<String>,

    #[arg(long, help = "Newline-separated release asset glob patterns")]
    assets: Option<String>,

    #[arg(short = 'y', long, help = "Skip the confirmation prompt")]
    yes: bool,

    #[arg(long, help = "Preview the version bump without tagging")]
    dry_run: bool,
}

fn main() {
    if let Err(e) = run(Args::parse()) {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let options = ProcessOptions {
        assume_yes: args.yes,
        dry_run: args.dry_run,
    };

    let outcome = if args.local {
        let provider = GitProvider::discover(".")?;
        process::run(&provider, &options)?
    } else {
        let mut config = Config::load(args.config.as_deref())?;
        config.apply_env();

        // CLI flags win over file and environment
        if let Some(host) = args.host {
            config.host = Some(host);
        }
        if let Some(repository) = args.repository {
            config.repository = Some(repository);
        }
        if let Some(token) = args.token {
            config.token = Some(token);
        }
        if let Some(assets) = args.assets.as_deref() {
            config.assets = split_assets(assets);
        }

        let settings = config.github()?;
        let provider = GithubProvider::new(
            settings.host,
            settings.owner,
            settings.repo,
            settings.token,
            settings.assets,
        )?;
        process::run(&provider, &options)?
    };

    match outcome {
        Outcome::Pushed(version) => {
            ui::display_success(&format!("published {}", version));
        }
        Outcome::NoChange | Outcome::DryRun(_) | Outcome::Cancelled => {}
    }

    Ok(())
}
