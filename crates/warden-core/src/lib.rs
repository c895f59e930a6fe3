//! Warden Core — shared types, errors and repository traits.

pub mod error;
pub mod models;
pub mod repository;
