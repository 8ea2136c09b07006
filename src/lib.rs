//! Support ticket triage: suggests a category and priority for a ticket
//! description using a generative language model, and falls back to "no
//! suggestion" whenever the model is unavailable or answers badly.

pub mod cmd;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod infra;
pub mod services;
pub mod workflow;
