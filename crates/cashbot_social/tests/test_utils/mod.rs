//! Test utilities for cashbot_social tests.
//!
//! This module provides an in-memory platform and a scratch database.

pub mod mock_platform;

#[allow(unused_imports)]
pub use mock_platform::RecordingPlatform;

use cashbot_database::Database;
use tempfile::TempDir;

/// A migrated database in a temporary directory.
///
/// Keep the returned `TempDir` alive for the duration of the test.
#[allow(dead_code)]
pub async fn scratch_database() -> (TempDir, Database) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("cashbot.db");
    let db = Database::new(path.to_string_lossy().to_string());
    db.initialize().await.expect("Failed to initialize database");
    (dir, db)
}
