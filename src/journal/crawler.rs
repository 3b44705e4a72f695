//! Crawl orchestration.
//!
//! One run fetches the journal instance index once, classifies it against
//! every configured expansion, fans instance processing out over a bounded
//! worker pool, and assembles per-expansion dungeon/raid lists. Workers
//! never touch shared output state; they hand finished records back and the
//! orchestrator stamps local ids after sorting by original index position,
//! so ids are reproducible run to run.

use anyhow::Context;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::blizzard::{ApiClient, Fetched, MediaCache};
use crate::config::{Config, Expansion as ExpansionConfig};
use crate::journal::classify::Classifier;
use crate::journal::model::{ExpansionOutput, IndexEntry, InstanceRecord, Kind, UnmatchedRecord};
use crate::journal::processor::{InstanceProcessor, Processed};

pub struct Crawler {
    client: Arc<ApiClient>,
    media: Arc<MediaCache>,
    namespace: String,
    workers: usize,
    expansions: Vec<ExpansionConfig>,
}

/// Fully assembled output of one run.
#[derive(Debug)]
pub struct CrawlReport {
    pub expansions: Vec<ExpansionOutput>,
    /// Index entries no expansion claimed, in index order.
    pub unmatched: Vec<UnmatchedRecord>,
}

impl Crawler {
    pub fn new(client: Arc<ApiClient>, config: &Config) -> Self {
        Self {
            client,
            media: Arc::new(MediaCache::new()),
            namespace: config.blizzard.static_namespace(),
            workers: config.crawler.workers.max(1),
            expansions: config.expansions.clone(),
        }
    }

    /// Runs the whole crawl. An index fetch failure aborts the run before
    /// any output exists; per-instance failures only thin the output.
    pub async fn run(&self) -> anyhow::Result<CrawlReport> {
        let index = self.fetch_index().await?;
        tracing::info!("fetched {} instances from the journal index", index.len());

        let mut claimed = vec![false; index.len()];
        let mut conflicted = vec![false; index.len()];
        let mut expansions = Vec::with_capacity(self.expansions.len());

        for expansion in &self.expansions {
            let classifier = Classifier::new(expansion);
            let mut jobs = Vec::new();
            for (position, entry) in index.iter().enumerate() {
                if let Some(kind) = classifier.classify(&entry.name).kind() {
                    claimed[position] = true;
                    jobs.push((position, entry.clone(), kind));
                }
            }

            let (dungeons, raids, conflicts) = self.process_jobs(jobs).await;
            for position in conflicts {
                conflicted[position] = true;
            }
            tracing::info!(
                "[{}] assembled {} dungeons and {} raids",
                expansion.name,
                dungeons.len(),
                raids.len()
            );
            expansions.push(ExpansionOutput {
                name: expansion.name.clone(),
                dungeons,
                raids,
            });
        }

        // Unmatched: entries no list claimed, plus entries whose remote
        // category contradicted the list that claimed them.
        let unmatched: Vec<UnmatchedRecord> = index
            .iter()
            .enumerate()
            .filter(|&(position, _)| !claimed[position] || conflicted[position])
            .map(|(_, entry)| UnmatchedRecord {
                blizzard_id: entry.id,
                name: entry.name.clone(),
            })
            .collect();
        if !unmatched.is_empty() {
            tracing::warn!(
                "{} index entries left unmatched after classification",
                unmatched.len()
            );
        }

        Ok(CrawlReport {
            expansions,
            unmatched,
        })
    }

    async fn fetch_index(&self) -> anyhow::Result<Vec<IndexEntry>> {
        let fetched = self
            .client
            .get("/data/wow/journal-instance/index", &self.namespace, &[])
            .await
            .context("fetching journal instance index")?;
        let body = match fetched {
            Fetched::Json(body) => body,
            Fetched::NotFound => anyhow::bail!("journal instance index not found"),
        };

        let instances = body
            .get("instances")
            .and_then(Value::as_array)
            .context("journal index has no instances list")?;

        let mut index = Vec::with_capacity(instances.len());
        for instance in instances {
            let (Some(id), Some(name)) = (
                instance.get("id").and_then(Value::as_u64),
                instance.get("name").and_then(Value::as_str),
            ) else {
                continue;
            };
            index.push(IndexEntry {
                id,
                name: name.to_string(),
            });
        }
        Ok(index)
    }

    /// Dispatches classified jobs over the worker pool and collects the
    /// completed records. Completion order is nondeterministic; ids are
    /// assigned afterwards from index order. Also returns the index
    /// positions whose remote category contradicted the classification.
    async fn process_jobs(
        &self,
        jobs: Vec<(usize, IndexEntry, Kind)>,
    ) -> (Vec<InstanceRecord>, Vec<InstanceRecord>, Vec<usize>) {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        for (position, entry, kind) in jobs {
            let semaphore = Arc::clone(&semaphore);
            let client = Arc::clone(&self.client);
            let media = Arc::clone(&self.media);
            let namespace = self.namespace.clone();
            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return (position, kind, Processed::Skipped),
                };
                let processor = InstanceProcessor::new(&client, &media, &namespace);
                let outcome = processor.process(&entry, kind).await;
                (position, kind, outcome)
            });
        }

        let mut completed = Vec::new();
        let mut conflicts = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((position, kind, Processed::Record(record))) => {
                    completed.push((position, kind, record))
                }
                Ok((position, _, Processed::CategoryConflict)) => conflicts.push(position),
                Ok((_, _, Processed::Skipped)) => {}
                Err(e) => tracing::error!("instance task failed to join: {}", e),
            }
        }

        let (dungeons, raids) = stamp_local_ids(completed);
        (dungeons, raids, conflicts)
    }
}

/// Sorts completed records back into index order and assigns contiguous
/// 1-based local ids per category.
fn stamp_local_ids(
    mut completed: Vec<(usize, Kind, InstanceRecord)>,
) -> (Vec<InstanceRecord>, Vec<InstanceRecord>) {
    completed.sort_by_key(|(position, _, _)| *position);

    let mut dungeons = Vec::new();
    let mut raids = Vec::new();
    for (_, kind, mut record) in completed {
        let list = match kind {
            Kind::Dungeon => &mut dungeons,
            Kind::Raid => &mut raids,
        };
        record.id = list.len() as u32 + 1;
        list.push(record);
    }
    (dungeons, raids)
}
