use anyhow::bail;
use clap::Parser;
use std::path::PathBuf;

use argue_negotiators::factory::{
    create_session, MediatorConfig, NegotiatorConfig, PreferencesSource, SessionConfig,
    StarterMode,
};
use argue_negotiators::SessionOutcome;

/// Two engineers choosing items by argumentation based negotiation.
#[derive(clap::Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Session description in yaml. Other options are ignored when set.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Items catalog: one `Name;Description` record per line.
    #[clap(long)]
    items: Option<PathBuf>,

    /// Preferences of the first engineer. Random when not set.
    #[clap(long)]
    preferences1: Option<PathBuf>,

    /// Preferences of the second engineer. Random when not set.
    #[clap(long)]
    preferences2: Option<PathBuf>,

    /// Seed for random preferences and the mediator's choice of starting engineer.
    #[clap(long)]
    seed: Option<u64>,
}

impl Args {
    fn session_config(self) -> anyhow::Result<SessionConfig> {
        if let Some(path) = self.config {
            return SessionConfig::load(path);
        }

        let items = match self.items {
            Some(items) => items,
            None => bail!("Either --config or --items must be provided."),
        };

        let seed = self.seed;
        let source = |path: Option<PathBuf>, offset: u64| match path {
            Some(path) => PreferencesSource::File { path },
            None => PreferencesSource::Random {
                seed: seed.map(|seed| seed.wrapping_add(offset)),
            },
        };

        Ok(SessionConfig {
            items,
            negotiators: vec![
                NegotiatorConfig {
                    name: "engineer1".to_string(),
                    preferences: source(self.preferences1, 1),
                },
                NegotiatorConfig {
                    name: "engineer2".to_string(),
                    preferences: source(self.preferences2, 2),
                },
            ],
            mediator: MediatorConfig {
                starter: StarterMode::Random,
                seed,
            },
        })
    }
}

fn names(selected: &[argue_negotiators::argumentation::Item]) -> String {
    selected
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join("\n  ")
}

#[actix_rt::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse().session_config()?;
    let session = create_session(config)?;

    match session.run().await? {
        SessionOutcome::Finished { selected } => {
            log::info!("Negotiation finished.");
            println!("Selected items:\n  {}", names(&selected));
        }
        SessionOutcome::Cancelled { selected } => {
            log::info!("Negotiation cancelled.");
            println!("Negotiation cancelled. Items selected before:\n  {}", names(&selected));
        }
    }

    Ok(())
}
