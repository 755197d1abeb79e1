//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate pure transitions and slot persistence into use-case APIs.
//! - Keep front ends decoupled from storage details.

pub mod day_service;
