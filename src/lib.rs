//! FitSense Library
//!
//! Diet and workout recommendations computed from a user profile, with an
//! optional generative backend and a deterministic rule-based fallback.

pub mod ai;
pub mod build_info;
pub mod config;
pub mod db;
pub mod engine;
pub mod mcp;
pub mod models;
pub mod recommend;
pub mod tools;
