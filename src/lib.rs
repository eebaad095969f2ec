#![deny(missing_docs)]
//! Bot Gallery
//!
//! A terminal chat client for PullString conversational agents. A fixed
//! "ConfigBot" supplies the list of available bots; the user picks one and
//! converses with it over the PullString Conversation REST API.

/// Interactive chat loop and transcript rendering
pub mod chat;
/// Configuration management
pub mod config;
/// Bot list fetching via the ConfigBot convention
pub mod gallery;
/// PullString Conversation API client and per-bot session state
pub mod pullstring;
