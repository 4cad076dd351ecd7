//! Taskbridge task tracker adapter for Notion.
//!
//! Implements the [`workflow::TaskTracker`] trait over the Notion REST API
//! (`Notion-Version: 2022-06-28` by default): page fetch and patch, database
//! schema fetch, database query, and the bot-user credential check.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Request formatting, header handling, pagination, and
//! JSON mapping live here. The [`workflow`] crate sees only
//! [`workflow::TaskTracker`] and its value types.
//!
//! Schema properties are returned in the order the API lists them; the
//! workspace enables `serde_json/preserve_order` so that order survives
//! deserialisation.

pub mod client;
mod wire;

pub use client::{
    NotionClient, NotionClientError, NotionConfig, DEFAULT_API_URL, DEFAULT_NOTION_VERSION,
};
