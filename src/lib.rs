//! harskill - Turn a browser HAR capture into a reusable API skill
//!
//! Loads a captured browsing session, reconstructs its authentication state,
//! keeps the requests that look like API calls, and emits a Python client plus
//! a skill bundle (`SKILL.md`, `auth.json`, `endpoints.json`) describing them.

pub mod auth;
pub mod capture;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod util;
