#![allow(dead_code)]

use std::{fs, path::PathBuf};

use pow_log::{FileLog, LogFormat};
use tempfile::{tempdir, TempDir};

pub fn create_temp_dir() -> (TempDir, PathBuf) {
    // Create a temporary directory for the log file
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let log_path = temp_dir.path().join("mining_log.txt");
    (temp_dir, log_path)
}

pub fn create_temp_log(format: LogFormat) -> (TempDir, FileLog) {
    let (temp_dir, log_path) = create_temp_dir();
    (
        temp_dir,
        FileLog::create(&log_path, format).expect("Failed to create FileLog"),
    )
}

pub fn read_log(log: &FileLog) -> String {
    fs::read_to_string(log.path()).expect("Failed to read log")
}

pub fn remove_temp_dir(temp_dir: TempDir) {
    let dir_path = temp_dir.path().to_path_buf();
    temp_dir.close().expect("Failed to delete temp dir");
    // Verify the directory is removed
    assert!(!dir_path.exists(), "Log directory should be removed");
}
