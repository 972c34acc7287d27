#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;
use waypoint_core::{FlowManager, FlowManagerBuilder, ScriptedInput};

/// Helper function to create a test manager writing to a temporary log
pub fn create_test_manager() -> (TempDir, FlowManager) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_path = temp_dir.path().join("flows.txt");
    let manager = FlowManagerBuilder::new()
        .with_audit_log_path(Some(&log_path))
        .build()
        .expect("Failed to create manager");
    (temp_dir, manager)
}

/// Helper function to write a fixture file and return its path
pub fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write fixture");
    path
}

/// Scripted answers plus a captured output buffer
pub fn script(answers: &[&str]) -> (ScriptedInput, Vec<u8>) {
    (ScriptedInput::new(answers.iter().copied()), Vec::new())
}
