pub mod blizzard;
pub mod config;
pub mod gamedata;
pub mod journal;
