use anyhow::{bail, Context};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use argue_argumentation::{load_catalog, load_preferences, Item, Preferences};

use crate::mediator::Starter;
use crate::session::{EngineerSetup, Session};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "source", rename_all = "kebab-case")]
pub enum PreferencesSource {
    File { path: PathBuf },
    /// Random preferences. Missing seed means, that each run will be different.
    Random { seed: Option<u64> },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NegotiatorConfig {
    pub name: String,
    pub preferences: PreferencesSource,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StarterMode {
    #[default]
    RoundRobin,
    Random,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MediatorConfig {
    #[serde(default)]
    pub starter: StarterMode,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    pub items: PathBuf,
    pub negotiators: Vec<NegotiatorConfig>,
    #[serde(default)]
    pub mediator: MediatorConfig,
}

impl SessionConfig {
    /// Loads config from yaml file. Relative paths inside are resolved
    /// against the directory containing the file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<SessionConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Reading session config: {}", path.display()))?;
        let config: SessionConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Parsing session config: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolve_paths(base))
    }

    pub fn resolve_paths(mut self, base: &Path) -> SessionConfig {
        self.items = base.join(&self.items);
        for negotiator in self.negotiators.iter_mut() {
            if let PreferencesSource::File { path } = &mut negotiator.preferences {
                *path = base.join(&*path);
            }
        }
        self
    }
}

pub fn create_preferences(
    source: &PreferencesSource,
    items: &[Item],
) -> anyhow::Result<Preferences> {
    let preferences = match source {
        PreferencesSource::File { path } => load_preferences(path, items)
            .with_context(|| format!("Loading preferences: {}", path.display()))?,
        PreferencesSource::Random { seed } => Preferences::random(items, &mut rng(*seed)),
    };
    Ok(preferences)
}

pub fn create_starter(config: &MediatorConfig) -> Starter {
    match config.starter {
        StarterMode::RoundRobin => Starter::RoundRobin,
        StarterMode::Random => Starter::Random(rng(config.seed)),
    }
}

fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Loads catalog and preferences and starts all session actors.
pub fn create_session(config: SessionConfig) -> anyhow::Result<Session> {
    let items = load_catalog(&config.items)
        .with_context(|| format!("Loading items catalog: {}", config.items.display()))?;

    let engineers = match &config.negotiators[..] {
        [first, second] => [
            engineer(first, &items)?,
            engineer(second, &items)?,
        ],
        negotiators => bail!(
            "Session needs exactly 2 negotiators, {} configured.",
            negotiators.len()
        ),
    };

    Ok(Session::start(
        items,
        engineers,
        create_starter(&config.mediator),
    ))
}

fn engineer(config: &NegotiatorConfig, items: &[Item]) -> anyhow::Result<EngineerSetup> {
    let preferences = create_preferences(&config.preferences, items)
        .with_context(|| format!("Negotiator {}", config.name))?;

    log::debug!("{}: {}", config.name, preferences);
    Ok(EngineerSetup {
        name: config.name.clone(),
        preferences,
    })
}
