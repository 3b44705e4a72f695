pub mod classify;
pub mod crawler;
pub mod model;
pub mod output;
pub mod processor;

pub use crawler::{CrawlReport, Crawler};
pub use model::{
    CreatureRecord, EncounterRecord, ExpansionOutput, IndexEntry, InstanceRecord, Kind,
    UnmatchedRecord,
};
