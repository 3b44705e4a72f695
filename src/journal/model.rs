//! Output records for the journal crawl.
//!
//! Field order matches the YAML the fixtures are consumed in: local `id`
//! first, then the remote `blizzard_id`. Local ids are 1-based and assigned
//! by the orchestrator (instances) or the processor (encounters/creatures).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Dungeon,
    Raid,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Dungeon => "dungeon",
            Kind::Raid => "raid",
        }
    }
}

/// One entry of the journal instance index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InstanceRecord {
    pub id: u32,
    pub blizzard_id: u64,
    pub name: String,
    pub description: Option<String>,
    pub img: Option<String>,
    pub encounters: Vec<EncounterRecord>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EncounterRecord {
    pub id: u32,
    pub blizzard_id: u64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub creatures: Vec<CreatureRecord>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreatureRecord {
    pub id: u32,
    pub blizzard_id: u64,
    pub creature_display_id: u64,
    pub name: Option<String>,
    pub img: Option<String>,
}

/// Index entry no expansion claimed; kept so list drift is visible instead
/// of silently dropped.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UnmatchedRecord {
    pub blizzard_id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExpansionOutput {
    pub name: String,
    pub dungeons: Vec<InstanceRecord>,
    pub raids: Vec<InstanceRecord>,
}
