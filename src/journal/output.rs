//! YAML sink for finished crawl reports.
//!
//! Layout mirrors the fixture tree the records are consumed from:
//! `<out>/<expansion>/dungeons.yml`, `<out>/<expansion>/raids.yml`, plus a
//! run-level `<out>/unmatched.yml` for curation.

use anyhow::Context;
use serde::Serialize;
use std::path::Path;

use crate::journal::crawler::CrawlReport;

pub async fn write_report(report: &CrawlReport, out_dir: &Path) -> anyhow::Result<()> {
    for expansion in &report.expansions {
        let dir = out_dir.join(&expansion.name);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("creating output directory {}", dir.display()))?;
        write_yaml(&dir.join("dungeons.yml"), &expansion.dungeons).await?;
        write_yaml(&dir.join("raids.yml"), &expansion.raids).await?;
        tracing::info!(
            "[{}] wrote {} dungeons and {} raids",
            expansion.name,
            expansion.dungeons.len(),
            expansion.raids.len()
        );
    }

    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    write_yaml(&out_dir.join("unmatched.yml"), &report.unmatched).await?;
    Ok(())
}

async fn write_yaml<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let yaml = serde_yaml::to_string(value)
        .with_context(|| format!("serializing {}", path.display()))?;
    tokio::fs::write(path, yaml)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
