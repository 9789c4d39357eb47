//! Tests for event handling through the bot context.

mod test_utils;

use cashbot_social::{BotContext, BotSettings, IncomingMessage, InviteSnapshot, Notice};
use std::sync::Arc;
use test_utils::{RecordingPlatform, scratch_database};

const CHANNEL: u64 = 300;
const NOW: i64 = 1_700_000_000;

fn message(author_id: u64, content: &str) -> IncomingMessage {
    IncomingMessage {
        author_id,
        author_is_bot: false,
        channel_id: CHANNEL,
        content: content.to_string(),
        sent_at: NOW,
    }
}

async fn setup() -> (tempfile::TempDir, BotContext, Arc<RecordingPlatform>) {
    let (dir, db) = scratch_database().await;
    let context = BotContext::new(db, BotSettings::default());
    (dir, context, Arc::new(RecordingPlatform::new()))
}

#[test]
fn test_default_settings() {
    let settings = BotSettings::default();
    assert_eq!(settings.command_prefix, "!");
    assert_eq!(settings.welcome_channel, "general");
    assert_eq!((settings.message_xp, settings.message_coins), (10, 5));
    assert_eq!(settings.invite_coins, 50);
    assert_eq!(settings.entry_cost, 100);
    assert_eq!(settings.leaderboard_limit, 10);
}

#[tokio::test]
async fn test_messages_are_rewarded() {
    let (_dir, context, platform) = setup().await;
    for _ in 0..3 {
        context
            .on_message(platform.clone(), &message(1, "hello"))
            .await
            .unwrap();
    }
    let record = context.ledger().read(1).await.unwrap().expect("record");
    assert_eq!((record.xp, record.coins), (30, 15));
    assert!(platform.announcements().is_empty());
}

#[tokio::test]
async fn test_bot_messages_are_ignored() {
    let (_dir, context, platform) = setup().await;
    let mut bot_message = message(1, "!balance");
    bot_message.author_is_bot = true;

    context.on_message(platform.clone(), &bot_message).await.unwrap();

    assert!(context.ledger().read(1).await.unwrap().is_none());
    assert!(platform.announcements().is_empty());
}

#[tokio::test]
async fn test_balance_counts_the_command_itself() {
    let (_dir, context, platform) = setup().await;
    context
        .on_message(platform.clone(), &message(1, "!balance"))
        .await
        .unwrap();
    assert_eq!(
        platform.announcements(),
        vec![(CHANNEL, Notice::balance(1, 5, 10))]
    );
}

#[tokio::test]
async fn test_malformed_command_gets_usage() {
    let (_dir, context, platform) = setup().await;
    context
        .on_message(platform.clone(), &message(1, "!start_giveaway 1h"))
        .await
        .unwrap();
    assert_eq!(
        platform.announcements(),
        vec![(
            CHANNEL,
            Notice::usage("!start_giveaway <duration> <num_winners> <prize>")
        )]
    );
}

#[tokio::test]
async fn test_invalid_giveaway_is_rejected_without_state() {
    let (_dir, context, platform) = setup().await;
    context
        .on_message(platform.clone(), &message(1, "!start_giveaway 10 1 Nitro"))
        .await
        .unwrap();
    context
        .on_message(platform.clone(), &message(1, "!start_giveaway 10m 0 Nitro"))
        .await
        .unwrap();

    assert_eq!(
        platform.announced_titles(),
        vec!["Invalid Time Format", "Invalid Winner Count"]
    );
    assert!(context.giveaways().repository().active().await.unwrap().is_none());
}

#[tokio::test]
async fn test_giveaway_flow_through_commands() {
    let (_dir, context, platform) = setup().await;
    context
        .on_message(platform.clone(), &message(1, "!start_giveaway 1h 1 Nitro"))
        .await
        .unwrap();
    let giveaway = context
        .giveaways()
        .repository()
        .active()
        .await
        .unwrap()
        .expect("giveaway running");
    assert_eq!(giveaway.prize, "Nitro");
    assert_eq!(giveaway.ends_at, NOW + 3_600);

    // Five coins from this message are not enough.
    context
        .on_message(platform.clone(), &message(2, "!enter_giveaway"))
        .await
        .unwrap();
    context.ledger().credit(2, 100, 0).await.unwrap();
    context
        .on_message(platform.clone(), &message(2, "!enter_giveaway"))
        .await
        .unwrap();

    assert_eq!(
        platform.announced_titles(),
        vec![
            "🎉 Giveaway Started",
            "Not Enough Coins",
            "Giveaway Entry Confirmed"
        ]
    );
    // 5 + 100 + 5 - 100
    assert_eq!(context.ledger().read(2).await.unwrap().unwrap().coins, 10);
}

#[tokio::test]
async fn test_leaderboard_notices() {
    let (_dir, context, platform) = setup().await;
    assert_eq!(
        context
            .leaderboard_notice(platform.as_ref(), None)
            .await
            .unwrap()
            .title,
        "No Data Found"
    );

    context.ledger().ensure(1).await.unwrap();
    context.ledger().credit(1, 20, 5).await.unwrap();
    context.ledger().ensure(2).await.unwrap();
    context.ledger().credit(2, 80, 1).await.unwrap();
    platform.set_name(2, "bob");

    let coins = context
        .leaderboard_notice(platform.as_ref(), None)
        .await
        .unwrap();
    assert_eq!(coins.title, "Top 10 users by coins");
    assert_eq!(coins.description, "1. bob - 80 coins\n2. <@1> - 20 coins\n");

    let xp = context
        .leaderboard_notice(platform.as_ref(), Some("xp"))
        .await
        .unwrap();
    assert_eq!(xp.description, "1. <@1> - 5 xp\n2. bob - 1 xp\n");

    let invalid = context
        .leaderboard_notice(platform.as_ref(), Some("coins; DROP TABLE users"))
        .await
        .unwrap();
    assert_eq!(invalid, Notice::invalid_category());
}

#[tokio::test]
async fn test_ready_and_join_events() {
    let (_dir, context, platform) = setup().await;
    platform.add_channel(7, "general", 70);
    platform.set_invites(7, vec![InviteSnapshot::new("A", 3, Some(5))]);

    let timers = context
        .on_ready(platform.clone(), &[7], NOW)
        .await
        .unwrap();
    assert!(timers.is_empty());

    platform.set_invites(7, vec![InviteSnapshot::new("A", 4, Some(5))]);
    let attribution = context
        .on_member_join(platform.as_ref(), 7, 6)
        .await
        .unwrap()
        .expect("attributed");
    assert_eq!(attribution.inviter_id, 5);
    assert_eq!(context.ledger().read(5).await.unwrap().unwrap().coins, 50);

    context.on_guild_removed(7, false).await;
    assert_eq!(context.invites().cache().guild_count().await, 0);
}

#[tokio::test]
async fn test_join_after_guild_outage_is_attributed() {
    let (_dir, context, platform) = setup().await;
    platform.set_invites(7, vec![InviteSnapshot::new("A", 3, Some(5))]);
    context.on_ready(platform.clone(), &[7], NOW).await.unwrap();

    context.on_guild_removed(7, true).await;
    assert_eq!(context.invites().cache().guild_count().await, 1);
    context
        .on_guild_available(platform.as_ref(), 7)
        .await
        .unwrap();

    platform.set_invites(7, vec![InviteSnapshot::new("A", 4, Some(5))]);
    let attribution = context.on_member_join(platform.as_ref(), 7, 6).await.unwrap();
    assert_eq!(attribution.map(|a| a.inviter_id), Some(5));
    assert_eq!(context.ledger().read(5).await.unwrap().unwrap().coins, 50);
}

#[tokio::test]
async fn test_guild_joined_after_ready_is_tracked() {
    let (_dir, context, platform) = setup().await;
    context.on_ready(platform.clone(), &[], NOW).await.unwrap();

    platform.set_invites(8, vec![InviteSnapshot::new("B", 0, Some(5))]);
    context
        .on_guild_available(platform.as_ref(), 8)
        .await
        .unwrap();

    platform.set_invites(8, vec![InviteSnapshot::new("B", 1, Some(5))]);
    let attribution = context.on_member_join(platform.as_ref(), 8, 6).await.unwrap();
    assert_eq!(attribution.map(|a| a.code), Some("B".to_string()));
}

#[tokio::test]
async fn test_invite_created_after_ready_is_attributable() {
    let (_dir, context, platform) = setup().await;
    context.on_ready(platform.clone(), &[7], NOW).await.unwrap();

    platform.set_invites(7, vec![InviteSnapshot::new("fresh", 0, Some(5))]);
    context
        .on_invites_changed(platform.as_ref(), 7)
        .await
        .unwrap();

    platform.set_invites(7, vec![InviteSnapshot::new("fresh", 1, Some(5))]);
    let attribution = context.on_member_join(platform.as_ref(), 7, 6).await.unwrap();
    assert_eq!(attribution.map(|a| a.code), Some("fresh".to_string()));
}
