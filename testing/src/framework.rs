use anyhow::{anyhow, Context};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::broadcast::Receiver;
use tokio::time::timeout;

use argue_negotiators::factory::*;
use argue_negotiators::Outgoing;

use crate::error::FrameworkError;
use crate::negotiation_record::{NegotiationRecord, NegotiationRecordSync};
use crate::{prepare_test_dir, test_assets_dir};

/// Runs whole negotiation session in-process: mediator, both negotiators
/// and the router. Must be used inside actix system.
pub struct Framework {
    pub test_dir: PathBuf,
    pub test_timeout: Duration,
}

impl Framework {
    pub fn new(test_name: &str) -> anyhow::Result<Framework> {
        let _ = env_logger::builder().try_init();

        Ok(Framework {
            test_dir: prepare_test_dir(test_name)?,
            test_timeout: Duration::from_secs(10),
        })
    }

    pub fn test_timeout(mut self, timeout: Duration) -> Self {
        self.test_timeout = timeout;
        self
    }

    /// Creates file in the test directory.
    pub fn write_file(&self, name: &str, content: &str) -> anyhow::Result<PathBuf> {
        let path = self.test_dir.join(name);
        fs::write(&path, content)
            .with_context(|| format!("Writing test file: {}", path.display()))?;
        Ok(path)
    }

    /// Path of file from tests assets directory.
    pub fn asset(&self, name: &str) -> PathBuf {
        test_assets_dir().join(name)
    }

    /// Session config with default mediator.
    pub fn config(
        &self,
        items: &Path,
        first: PreferencesSource,
        second: PreferencesSource,
    ) -> SessionConfig {
        SessionConfig {
            items: items.to_path_buf(),
            negotiators: vec![
                NegotiatorConfig {
                    name: "engineer1".to_string(),
                    preferences: first,
                },
                NegotiatorConfig {
                    name: "engineer2".to_string(),
                    preferences: second,
                },
            ],
            mediator: MediatorConfig::default(),
        }
    }

    pub async fn run(&self, config: SessionConfig) -> Result<NegotiationRecord, FrameworkError> {
        let record = NegotiationRecordSync::new();

        let session = create_session(config).map_err(|e| FrameworkError::from(e, &record))?;
        let mut routed = session.subscribe();

        let result = timeout(self.test_timeout, session.run()).await;
        drain(&mut routed, &record);

        let outcome = result
            .map_err(|_| anyhow!("Session didn't finish in {:?}.", self.test_timeout))
            .and_then(|outcome| outcome)
            .map_err(|e| {
                log::error!("Session failed: {:#}", e);
                record.error(&e);
                FrameworkError::from(e, &record)
            })?;

        log::info!("Session finished with outcome: {:?}", outcome);
        record.outcome(outcome);
        Ok(record.snapshot())
    }
}

fn drain(routed: &mut Receiver<Outgoing>, record: &NegotiationRecordSync) {
    loop {
        match routed.try_recv() {
            Ok(message) => record.message(message),
            Err(TryRecvError::Lagged(count)) => {
                log::warn!("Negotiation record lost {} routed messages.", count);
                record.lost(count)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}
