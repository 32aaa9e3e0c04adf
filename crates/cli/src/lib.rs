//! MagrayArts operator commands.
//!
//! `ma-cli` is a thin clap front end over [`commands`]; the integration tests
//! call the same functions against a live database.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod commands;
