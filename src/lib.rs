//! Announces new articles and videos from a fixed set of feeds to a Telegram
//! channel.
//!
//! A run fetches every source in [`catalog::SOURCES`], picks the newest
//! entries not yet announced ([`select`]), renders each one ([`compose`]),
//! sends it ([`publish`]), and records the links in a plain text file
//! ([`storage`]). [`orchestrator::Orchestrator`] ties these together.

pub mod catalog;
pub mod compose;
pub mod config;
pub mod feed;
pub mod orchestrator;
pub mod publish;
pub mod select;
pub mod storage;
pub mod util;
