//! Shared test utilities for labelsort integration tests.

pub mod harness;

pub use harness::{list_files, ScriptedRecognizer, TestHarness};
