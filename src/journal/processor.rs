//! Per-instance fan-out: detail, tile image, and (for raids) the encounter
//! and creature sub-tree.
//!
//! Failure containment is strict: an error while processing one instance is
//! logged and turns into a skip, a failed encounter fetch drops only that
//! encounter, and a failed creature media lookup leaves the image absent.
//! Remote iteration order is preserved; sub-ids are 1-based in that order.

use anyhow::Context;
use serde_json::Value;

use crate::blizzard::media::asset_value;
use crate::blizzard::{ApiClient, Fetched, MediaCache};
use crate::journal::model::{CreatureRecord, EncounterRecord, IndexEntry, InstanceRecord, Kind};

/// What became of one classified index entry.
#[derive(Debug)]
pub enum Processed {
    Record(InstanceRecord),
    /// The journal detail carries a category that contradicts the name-list
    /// classification; the entry goes to unmatched instead of being guessed.
    CategoryConflict,
    /// Failed or absent; logged and dropped from the output.
    Skipped,
}

pub struct InstanceProcessor<'a> {
    client: &'a ApiClient,
    media: &'a MediaCache,
    namespace: &'a str,
}

impl<'a> InstanceProcessor<'a> {
    pub fn new(client: &'a ApiClient, media: &'a MediaCache, namespace: &'a str) -> Self {
        Self {
            client,
            media,
            namespace,
        }
    }

    /// Processes one classified index entry. Any failure is logged and
    /// becomes [`Processed::Skipped`]; the crawl carries on without it. The
    /// record's own local id is stamped later by the orchestrator.
    pub async fn process(&self, entry: &IndexEntry, kind: Kind) -> Processed {
        match self.try_process(entry, kind).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    "skipping {} \"{}\" ({}): {:#}",
                    kind.as_str(),
                    entry.name,
                    entry.id,
                    e
                );
                Processed::Skipped
            }
        }
    }

    async fn try_process(&self, entry: &IndexEntry, kind: Kind) -> anyhow::Result<Processed> {
        let path = format!("/data/wow/journal-instance/{}", entry.id);
        let detail = match self
            .client
            .get(&path, self.namespace, &[])
            .await
            .with_context(|| format!("fetching detail for \"{}\"", entry.name))?
        {
            Fetched::Json(detail) => detail,
            Fetched::NotFound => {
                tracing::warn!("no journal detail for \"{}\" ({})", entry.name, entry.id);
                return Ok(Processed::Skipped);
            }
        };

        if let Some(remote_category) = detail.pointer("/category/type").and_then(Value::as_str) {
            let expected = match kind {
                Kind::Dungeon => "DUNGEON",
                Kind::Raid => "RAID",
            };
            if !remote_category.eq_ignore_ascii_case(expected) {
                tracing::warn!(
                    "\"{}\" ({}) is listed as a {} but the journal says {}, moving to unmatched",
                    entry.name,
                    entry.id,
                    kind.as_str(),
                    remote_category
                );
                return Ok(Processed::CategoryConflict);
            }
        }

        let description = detail
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_owned);

        let media_path = format!("/data/wow/media/journal-instance/{}", entry.id);
        let img = self
            .media
            .fetch(self.client, &media_path, self.namespace)
            .await
            .and_then(|doc| asset_value(&doc, "tile"));

        let encounters = match kind {
            Kind::Raid => self.process_encounters(&entry.name, &detail).await,
            Kind::Dungeon => Vec::new(),
        };

        Ok(Processed::Record(InstanceRecord {
            id: 0,
            blizzard_id: entry.id,
            name: entry.name.clone(),
            description,
            img,
            encounters,
        }))
    }

    async fn process_encounters(&self, instance_name: &str, detail: &Value) -> Vec<EncounterRecord> {
        let listed = detail
            .get("encounters")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut encounters = Vec::new();
        for listed_encounter in listed {
            let Some(blizzard_id) = listed_encounter.get("id").and_then(Value::as_u64) else {
                continue;
            };
            let listed_name = listed_encounter
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_owned);

            match self.process_encounter(blizzard_id, listed_name).await {
                Ok(Some(mut encounter)) => {
                    encounter.id = encounters.len() as u32 + 1;
                    encounters.push(encounter);
                }
                Ok(None) => {
                    tracing::warn!(
                        "encounter {} of \"{}\" has no journal detail, skipped",
                        blizzard_id,
                        instance_name
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "skipping encounter {} of \"{}\": {:#}",
                        blizzard_id,
                        instance_name,
                        e
                    );
                }
            }
        }
        encounters
    }

    async fn process_encounter(
        &self,
        blizzard_id: u64,
        listed_name: Option<String>,
    ) -> anyhow::Result<Option<EncounterRecord>> {
        let path = format!("/data/wow/journal-encounter/{}", blizzard_id);
        let detail = match self.client.get(&path, self.namespace, &[]).await? {
            Fetched::Json(detail) => detail,
            Fetched::NotFound => return Ok(None),
        };

        let name = detail
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .or(listed_name);
        let description = detail
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_owned);

        let listed_creatures = detail
            .get("creatures")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut creatures = Vec::new();
        for creature in listed_creatures {
            let Some(creature_id) = creature.get("id").and_then(Value::as_u64) else {
                continue;
            };
            let Some(display_id) = creature
                .get("creature_display")
                .and_then(|d| d.get("id"))
                .and_then(Value::as_u64)
            else {
                continue;
            };
            let creature_name = creature
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_owned);

            // Display ids repeat between bosses; the cache keeps this from
            // refetching the same document.
            let media_path = format!("/data/wow/media/creature-display/{}", display_id);
            let img = self
                .media
                .fetch(self.client, &media_path, self.namespace)
                .await
                .and_then(|doc| asset_value(&doc, "zoom"));

            creatures.push(CreatureRecord {
                id: creatures.len() as u32 + 1,
                blizzard_id: creature_id,
                creature_display_id: display_id,
                name: creature_name,
                img,
            });
        }

        Ok(Some(EncounterRecord {
            id: 0,
            blizzard_id,
            name,
            description,
            creatures,
        }))
    }
}
