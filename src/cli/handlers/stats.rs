//! Stats command handler

use serde::Serialize;

use crate::cache::NamespaceStats;
use crate::config::Settings;
use crate::error::{AppError, AppResult};

/// Size of one namespace as reported by `stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceReport {
    pub namespace: String,
    pub directory: String,
    #[serde(flatten)]
    pub stats: NamespaceStats,
}

/// Handler for the stats command
pub struct StatsCommandHandler {
    config: Settings,
}

impl StatsCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(&self, namespace: Option<&str>, json: bool) -> AppResult<()> {
        let reports = self.collect(namespace).await?;

        if json {
            let rendered = serde_json::to_string_pretty(&reports)
                .map_err(|e| AppError::from(anyhow::Error::from(e)))?;
            println!("{}", rendered);
            return Ok(());
        }

        println!("{:<12} {:>8} {:>12}  DIRECTORY", "NAMESPACE", "ENTRIES", "BYTES");
        for report in &reports {
            println!(
                "{:<12} {:>8} {:>12}  {}",
                report.namespace, report.stats.entries, report.stats.total_bytes, report.directory
            );
        }
        Ok(())
    }

    /// Gather stats for every namespace, or only `namespace` when given.
    pub async fn collect(&self, namespace: Option<&str>) -> AppResult<Vec<NamespaceReport>> {
        let caches = super::open_caches(&self.config)?;

        let stores = match namespace {
            Some(name) => vec![caches.store(name).ok_or_else(|| AppError::UnknownNamespace {
                name: name.to_string(),
                known: self.config.cache.namespaces().join(", "),
            })?],
            None => caches.stores().to_vec(),
        };

        let mut reports = Vec::with_capacity(stores.len());
        for store in stores {
            reports.push(NamespaceReport {
                namespace: store.namespace().to_string(),
                directory: store.dir().display().to_string(),
                stats: store.stats().await,
            });
        }
        Ok(reports)
    }
}
