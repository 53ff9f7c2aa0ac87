//! External service adapters
//!
//! This module contains adapters for external APIs including:
//! - LLM (Large Language Model) services
//! - Push notification services

pub mod llm;
pub mod notify;
