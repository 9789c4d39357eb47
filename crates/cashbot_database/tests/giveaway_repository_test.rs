//! Tests for giveaway instances, entries and resolution.

use cashbot_database::{
    Database, EntryOutcome, GiveawayDraft, GiveawayRepository, GiveawayStatus, LedgerRepository,
    ResolveOutcome, draw_winners,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use tempfile::TempDir;

const COST: i64 = 100;

struct Fixture {
    _dir: TempDir,
    ledger: LedgerRepository,
    giveaways: GiveawayRepository,
}

async fn setup() -> Result<Fixture, Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let db = Database::new(dir.path().join("giveaways.db").to_string_lossy().into_owned());
    db.initialize().await?;
    Ok(Fixture {
        _dir: dir,
        ledger: LedgerRepository::new(db.clone()),
        giveaways: GiveawayRepository::new(db),
    })
}

fn draft(num_winners: u32) -> GiveawayDraft {
    GiveawayDraft {
        channel_id: 555,
        prize: "Nitro".to_string(),
        num_winners,
        started_at: 1_000,
        ends_at: 1_030,
    }
}

async fn fund(fx: &Fixture, user: u64, coins: i64) -> Result<(), Box<dyn std::error::Error>> {
    fx.ledger.ensure(user).await?;
    fx.ledger.credit(user, coins, 0).await?;
    Ok(())
}

#[tokio::test]
async fn test_start_creates_open_giveaway() -> Result<(), Box<dyn std::error::Error>> {
    let fx = setup().await?;

    let row = fx.giveaways.start(draft(2)).await?;
    assert_eq!(row.status, GiveawayStatus::Open);
    assert_eq!(row.channel(), 555);
    assert_eq!(row.num_winners, 2);

    let active = fx.giveaways.active().await?.ok_or("no active giveaway")?;
    assert_eq!(active.id, row.id);
    assert_eq!(row.remaining_secs(1_010), 20);
    assert_eq!(row.remaining_secs(2_000), 0);
    Ok(())
}

#[tokio::test]
async fn test_entry_requires_active_giveaway() -> Result<(), Box<dyn std::error::Error>> {
    let fx = setup().await?;
    fund(&fx, 1, 500).await?;

    let outcome = fx.giveaways.enter(1, COST).await?;
    assert_eq!(outcome, EntryOutcome::NoActiveGiveaway);

    let record = fx.ledger.read(1).await?.ok_or("missing record")?;
    assert_eq!(record.coins, 500);
    Ok(())
}

#[tokio::test]
async fn test_entry_gating() -> Result<(), Box<dyn std::error::Error>> {
    let fx = setup().await?;
    let giveaway = fx.giveaways.start(draft(1)).await?;
    fund(&fx, 10, 99).await?;
    fund(&fx, 20, 100).await?;

    let poor = fx.giveaways.enter(10, COST).await?;
    assert_eq!(poor, EntryOutcome::InsufficientFunds { balance: 99, cost: COST });
    assert_eq!(fx.ledger.read(10).await?.ok_or("missing")?.coins, 99);

    let entered = fx.giveaways.enter(20, COST).await?;
    assert_eq!(
        entered,
        EntryOutcome::Entered {
            giveaway_id: giveaway.id,
            remaining_coins: 0
        }
    );
    assert_eq!(fx.ledger.read(20).await?.ok_or("missing")?.coins, 0);
    assert_eq!(fx.giveaways.entrants(giveaway.id).await?, vec![20]);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_entry_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let fx = setup().await?;
    let giveaway = fx.giveaways.start(draft(1)).await?;
    fund(&fx, 30, 250).await?;

    fx.giveaways.enter(30, COST).await?;
    let again = fx.giveaways.enter(30, COST).await?;

    assert_eq!(again, EntryOutcome::AlreadyEntered);
    assert_eq!(fx.ledger.read(30).await?.ok_or("missing")?.coins, 150);
    assert_eq!(fx.giveaways.entrants(giveaway.id).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_entry_creates_ledger_record() -> Result<(), Box<dyn std::error::Error>> {
    let fx = setup().await?;
    fx.giveaways.start(draft(1)).await?;

    let outcome = fx.giveaways.enter(77, COST).await?;
    assert_eq!(outcome, EntryOutcome::InsufficientFunds { balance: 0, cost: COST });
    assert!(fx.ledger.read(77).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_concurrent_entries_never_overdraw() -> Result<(), Box<dyn std::error::Error>> {
    let fx = setup().await?;
    let giveaway = fx.giveaways.start(draft(1)).await?;
    fund(&fx, 40, 100).await?;

    let a = fx.giveaways.clone();
    let b = fx.giveaways.clone();
    let (first, second) = tokio::join!(a.enter(40, COST), b.enter(40, COST));
    let outcomes = [first?, second?];

    let entered = outcomes
        .iter()
        .filter(|o| matches!(o, EntryOutcome::Entered { .. }))
        .count();
    assert_eq!(entered, 1);
    assert_eq!(fx.ledger.read(40).await?.ok_or("missing")?.coins, 0);
    assert_eq!(fx.giveaways.entrants(giveaway.id).await?, vec![40]);
    Ok(())
}

#[tokio::test]
async fn test_resolve_with_too_few_entrants_keeps_entries() -> Result<(), Box<dyn std::error::Error>> {
    let fx = setup().await?;
    let giveaway = fx.giveaways.start(draft(3)).await?;
    for user in [1, 2] {
        fund(&fx, user, COST).await?;
        fx.giveaways.enter(user, COST).await?;
    }

    let outcome = fx
        .giveaways
        .resolve_with(giveaway.id, StdRng::seed_from_u64(7))
        .await?;

    match outcome {
        ResolveOutcome::Undersubscribed { giveaway, entrants } => {
            assert_eq!(entrants, 2);
            assert_eq!(giveaway.status, GiveawayStatus::Undersubscribed);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(fx.giveaways.entrants(giveaway.id).await?, vec![1, 2]);
    assert!(fx.giveaways.active().await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_resolve_draws_distinct_winners() -> Result<(), Box<dyn std::error::Error>> {
    let fx = setup().await?;
    let giveaway = fx.giveaways.start(draft(2)).await?;
    let pool: Vec<u64> = (101..=105).collect();
    for &user in &pool {
        fund(&fx, user, COST).await?;
        fx.giveaways.enter(user, COST).await?;
    }

    let outcome = fx
        .giveaways
        .resolve_with(giveaway.id, StdRng::seed_from_u64(42))
        .await?;

    let ResolveOutcome::Resolved { giveaway: resolved, winners } = outcome else {
        panic!("expected a resolved giveaway");
    };
    assert_eq!(resolved.status, GiveawayStatus::Resolved);
    assert_eq!(winners.len(), 2);
    let distinct: HashSet<_> = winners.iter().collect();
    assert_eq!(distinct.len(), 2);
    assert!(winners.iter().all(|w| pool.contains(w)));
    assert!(fx.giveaways.entrants(giveaway.id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_new_start_supersedes_and_purges() -> Result<(), Box<dyn std::error::Error>> {
    let fx = setup().await?;
    let first = fx.giveaways.start(draft(1)).await?;
    fund(&fx, 8, 300).await?;
    fx.giveaways.enter(8, COST).await?;

    let second = fx.giveaways.start(draft(1)).await?;
    assert_ne!(first.id, second.id);
    assert!(fx.giveaways.entrants(first.id).await?.is_empty());

    let stale = fx.giveaways.resolve(first.id).await?;
    match stale {
        ResolveOutcome::Closed { giveaway } => {
            assert_eq!(giveaway.status, GiveawayStatus::Superseded)
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    // The stale timer must not disturb the running giveaway.
    fx.giveaways.enter(8, COST).await?;
    assert_eq!(fx.giveaways.entrants(second.id).await?, vec![8]);
    let open = fx.giveaways.open_giveaways().await?;
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, second.id);
    Ok(())
}

#[tokio::test]
async fn test_resolve_unknown_giveaway() -> Result<(), Box<dyn std::error::Error>> {
    let fx = setup().await?;
    assert_eq!(fx.giveaways.resolve(12345).await?, ResolveOutcome::NotFound);
    assert!(fx.giveaways.get(12345).await?.is_none());
    Ok(())
}

#[test]
fn test_draw_winners_without_replacement() {
    let mut rng = StdRng::seed_from_u64(1);
    let entrants = [1, 2, 3, 4, 5];

    for _ in 0..50 {
        let winners = draw_winners(&entrants, 3, &mut rng);
        let distinct: HashSet<_> = winners.iter().collect();
        assert_eq!(distinct.len(), 3);
    }
    assert_eq!(draw_winners(&entrants, 5, &mut rng).len(), 5);
    assert_eq!(draw_winners(&entrants, 9, &mut rng).len(), 5);
}
