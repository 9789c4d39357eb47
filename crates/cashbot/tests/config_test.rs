//! Tests for the layered configuration.

use cashbot::{CashbotConfig, DEFAULT_CONFIG, ObservabilityConfig};
use std::io::Write;

#[test]
fn test_bundled_defaults() {
    let config = CashbotConfig::from_toml_str("").unwrap();

    assert_eq!(config.bot.command_prefix, "!");
    assert_eq!(config.bot.welcome_channel, "general");
    assert_eq!(config.database.path, "cashbot.db");
    assert_eq!(config.database.busy_timeout_ms, 5_000);
    assert_eq!(config.rewards.message_xp, 10);
    assert_eq!(config.rewards.message_coins, 5);
    assert_eq!(config.rewards.invite_coins, 50);
    assert_eq!(config.giveaway.entry_cost, 100);
    assert_eq!(config.leaderboard.limit, 10);
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.json_logs);
}

#[test]
fn test_bundled_file_matches_serde_defaults() {
    assert_eq!(
        CashbotConfig::from_toml_str(DEFAULT_CONFIG).unwrap(),
        CashbotConfig::default()
    );
}

#[test]
fn test_partial_override_keeps_other_defaults() {
    let config = CashbotConfig::from_toml_str(
        r#"
        [giveaway]
        entry_cost = 250

        [bot]
        command_prefix = "$"
        "#,
    )
    .unwrap();

    assert_eq!(config.giveaway.entry_cost, 250);
    assert_eq!(config.bot.command_prefix, "$");
    assert_eq!(config.bot.welcome_channel, "general");
    assert_eq!(config.rewards.invite_coins, 50);
}

#[test]
fn test_settings_conversion() {
    let config = CashbotConfig::from_toml_str(
        r#"
        [rewards]
        invite_coins = 75

        [leaderboard]
        limit = 3
        "#,
    )
    .unwrap();

    let settings = config.bot_settings();
    assert_eq!(settings.invite_coins, 75);
    assert_eq!(settings.leaderboard_limit, 3);
    assert_eq!(settings.entry_cost, 100);
    assert_eq!(config.database().path(), "cashbot.db");
}

#[test]
fn test_validation_rejects_bad_values() {
    for toml in [
        "[bot]\ncommand_prefix = \"\"",
        "[bot]\ncommand_prefix = \"! \"",
        "[giveaway]\nentry_cost = -1",
        "[leaderboard]\nlimit = 0",
        "[database]\npath = \"  \"",
    ] {
        assert!(
            CashbotConfig::from_toml_str(toml).is_err(),
            "accepted invalid config: {}",
            toml
        );
    }
}

#[test]
fn test_free_entry_is_allowed() {
    let config = CashbotConfig::from_toml_str("[giveaway]\nentry_cost = 0").unwrap();
    assert_eq!(config.giveaway.entry_cost, 0);
}

#[test]
fn test_load_explicit_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[database]\npath = \"elsewhere.db\"").unwrap();

    let config = CashbotConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.database.path, "elsewhere.db");
}

#[test]
fn test_load_missing_explicit_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(CashbotConfig::load(Some(&missing)).is_err());
}

#[test]
fn test_render_round_trips() {
    let config = CashbotConfig::from_toml_str("[leaderboard]\nlimit = 5").unwrap();
    let rendered = config.to_toml().unwrap();
    assert_eq!(CashbotConfig::from_toml_str(&rendered).unwrap(), config);
}

#[test]
fn test_verbose_raises_log_level() {
    let config = ObservabilityConfig::new("warn").with_verbose(true);
    assert_eq!(config.log_level, "debug");
    let quiet = ObservabilityConfig::new("warn").with_verbose(false);
    assert_eq!(quiet.log_level, "warn");
}
