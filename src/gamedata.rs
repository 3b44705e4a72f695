//! Game Data lookups outside the journal: WoW-token price, playable class
//! and race indices, and the guild summary/roster.

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::blizzard::media::asset_value_with_suffix;
use crate::blizzard::{ApiClient, Fetched};
use crate::config::{Blizzard as BlizzardConfig, Guild as GuildConfig};

#[derive(Debug, Clone, Serialize)]
pub struct PlayableClass {
    pub id: u64,
    pub name: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayableRace {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuildSummary {
    pub name: String,
    pub realm: String,
    pub faction: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuildMember {
    pub character_id: Option<u64>,
    pub name: Option<String>,
    pub realm: Option<String>,
    pub level: u64,
    #[serde(rename = "class")]
    pub class_name: String,
    pub race: String,
    pub faction: Option<String>,
    pub rank: Option<u64>,
}

/// Current WoW-token price in copper.
pub async fn token_price(client: &ApiClient, config: &BlizzardConfig) -> anyhow::Result<u64> {
    let body = require_json(
        client
            .get("/data/wow/token/index", &config.dynamic_namespace(), &[])
            .await?,
        "token index",
    )?;
    body.get("price")
        .and_then(Value::as_u64)
        .context("token index has no price")
}

/// Playable class index, each entry enriched with its icon asset.
pub async fn classes_index(
    client: &ApiClient,
    config: &BlizzardConfig,
) -> anyhow::Result<Vec<PlayableClass>> {
    let namespace = config.static_namespace();
    let body = require_json(
        client
            .get("/data/wow/playable-class/index", &namespace, &[])
            .await?,
        "playable class index",
    )?;

    let mut classes = Vec::new();
    for class in body.get("classes").and_then(Value::as_array).into_iter().flatten() {
        let (Some(id), Some(name)) = (
            class.get("id").and_then(Value::as_u64),
            class.get("name").and_then(Value::as_str),
        ) else {
            continue;
        };

        let media_path = format!("/data/wow/media/playable-class/{}", id);
        let icon = match client.get(&media_path, &namespace, &[]).await {
            Ok(Fetched::Json(doc)) => asset_value_with_suffix(&doc, "icon"),
            Ok(Fetched::NotFound) => None,
            Err(e) => {
                tracing::warn!("no icon media for class {} ({}): {:#}", name, id, e);
                None
            }
        };

        classes.push(PlayableClass {
            id,
            name: name.to_string(),
            icon,
        });
    }
    Ok(classes)
}

pub async fn races_index(
    client: &ApiClient,
    config: &BlizzardConfig,
) -> anyhow::Result<Vec<PlayableRace>> {
    let body = require_json(
        client
            .get("/data/wow/playable-race/index", &config.static_namespace(), &[])
            .await?,
        "playable race index",
    )?;

    let races = body
        .get("races")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|race| {
            Some(PlayableRace {
                id: race.get("id").and_then(Value::as_u64)?,
                name: race.get("name").and_then(Value::as_str)?.to_string(),
            })
        })
        .collect();
    Ok(races)
}

pub async fn guild_summary(
    client: &ApiClient,
    config: &BlizzardConfig,
    guild: &GuildConfig,
) -> anyhow::Result<GuildSummary> {
    let path = format!("/data/wow/guild/{}/{}", guild.realm_slug, guild.name_slug);
    let body = require_json(
        client.get(&path, &config.profile_namespace(), &[]).await?,
        "guild summary",
    )?;

    Ok(GuildSummary {
        name: body
            .get("name")
            .and_then(Value::as_str)
            .context("guild summary has no name")?
            .to_string(),
        realm: body
            .pointer("/realm/name")
            .and_then(Value::as_str)
            .context("guild summary has no realm name")?
            .to_string(),
        faction: body
            .pointer("/faction/name")
            .and_then(Value::as_str)
            .context("guild summary has no faction name")?
            .to_string(),
    })
}

/// Guild roster filtered to the level cap, with class and race ids resolved
/// to names through the index lookups.
pub async fn guild_roster(
    client: &ApiClient,
    config: &BlizzardConfig,
    guild: &GuildConfig,
) -> anyhow::Result<Vec<GuildMember>> {
    let classes: HashMap<u64, String> = classes_index(client, config)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let races: HashMap<u64, String> = races_index(client, config)
        .await?
        .into_iter()
        .map(|r| (r.id, r.name))
        .collect();

    let path = format!(
        "/data/wow/guild/{}/{}/roster",
        guild.realm_slug, guild.name_slug
    );
    let body = require_json(
        client.get(&path, &config.profile_namespace(), &[]).await?,
        "guild roster",
    )?;

    let mut roster = Vec::new();
    for member in body.get("members").and_then(Value::as_array).into_iter().flatten() {
        let character = member.get("character").cloned().unwrap_or(Value::Null);
        let level = character.get("level").and_then(Value::as_u64).unwrap_or(0);
        if level < u64::from(guild.level_cap) {
            continue;
        }

        let class_id = character.pointer("/playable_class/id").and_then(Value::as_u64);
        let race_id = character.pointer("/playable_race/id").and_then(Value::as_u64);

        roster.push(GuildMember {
            character_id: character.get("id").and_then(Value::as_u64),
            name: character
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_owned),
            realm: character
                .pointer("/realm/slug")
                .and_then(Value::as_str)
                .map(str::to_owned),
            level,
            class_name: class_id
                .and_then(|id| classes.get(&id).cloned())
                .unwrap_or_else(|| "Unknown".to_string()),
            race: race_id
                .and_then(|id| races.get(&id).cloned())
                .unwrap_or_else(|| "Unknown".to_string()),
            faction: character
                .pointer("/faction/type")
                .and_then(Value::as_str)
                .map(str::to_owned),
            rank: member.get("rank").and_then(Value::as_u64),
        });
    }
    Ok(roster)
}

fn require_json(fetched: Fetched, what: &str) -> anyhow::Result<Value> {
    fetched
        .into_json()
        .with_context(|| format!("{} not found", what))
}
