//! Library surface for the filings lookup bot.
//!
//! The crate is organized around two pipelines:
//!
//! 1. free-text message -> normalized text -> structured [`query::Query`]
//!    -> registry lookup (with name-variant fan-out) -> deduplicated
//!    entries -> paginated block-kit pages, and
//! 2. a selection on a rendered page -> filings lookup for the chosen
//!    identifier -> chronologically ordered document relay.
//!
//! The chat platform is abstracted behind [`chat::ChatGateway`]; the
//! registry API behind [`sources::registry::RegistryClient`].

pub mod bot;
pub mod chat;
pub mod cli;
pub mod config;
pub mod entities;
pub mod error;
pub mod query;
pub mod render;
pub mod sources;
pub mod transform;
