//! Deterministic, pure logic over requirements documents.
//!
//! Core modules must be free of I/O side effects. They take parsed
//! `serde_json::Value` input or typed entries and return deterministic outputs
//! suitable for tests.

pub mod extract;
pub mod merge;
pub mod recovery;
pub mod summary;
pub mod template;
pub mod validator;
pub mod vocabulary;
