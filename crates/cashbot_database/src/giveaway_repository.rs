//! Giveaway instances and their entries.
//!
//! Every entry row is tagged with the id of the giveaway it belongs to, so a
//! resolution only ever touches its own entrants. Starting a giveaway still
//! clears all earlier entries and supersedes any giveaway that is open, which
//! keeps at most one giveaway accepting entries per deployment.

use crate::models::{GiveawayEntryRow, GiveawayRow, GiveawayStatus, NewGiveaway};
use crate::schema::{giveaway_entries, giveaways, users};
use crate::{Database, DatabaseResult, from_db_id, to_db_id};
use cashbot_error::DatabaseError;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument};

/// Parameters of a giveaway about to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiveawayDraft {
    /// Channel the giveaway is announced in
    pub channel_id: u64,
    /// Free-text prize
    pub prize: String,
    /// Number of winners to draw, at least one
    pub num_winners: u32,
    /// Unix timestamp (seconds) of the start
    pub started_at: i64,
    /// Unix timestamp (seconds) at which it resolves
    pub ends_at: i64,
}

/// Result of an entry attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// The entry was recorded and the cost debited.
    Entered {
        /// Giveaway the entry belongs to
        giveaway_id: i64,
        /// Balance after the debit
        remaining_coins: i64,
    },
    /// The balance is below the entry cost; nothing changed.
    InsufficientFunds {
        /// Balance at the time of the attempt
        balance: i64,
        /// Required cost
        cost: i64,
    },
    /// The user already holds an entry; nothing changed.
    AlreadyEntered,
    /// No giveaway is accepting entries.
    NoActiveGiveaway,
}

/// Result of resolving a giveaway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Winners were drawn and the instance's entries cleared.
    Resolved {
        /// The resolved giveaway
        giveaway: GiveawayRow,
        /// Distinct winners, in draw order
        winners: Vec<u64>,
    },
    /// Fewer entrants than winners; entries were left in place.
    Undersubscribed {
        /// The giveaway that could not be filled
        giveaway: GiveawayRow,
        /// Number of entrants found
        entrants: usize,
    },
    /// The giveaway was no longer open (superseded or already resolved).
    Closed {
        /// The giveaway as found
        giveaway: GiveawayRow,
    },
    /// No giveaway with that id exists.
    NotFound,
}

/// Draw `count` distinct entrants uniformly at random.
///
/// Returns fewer than `count` ids only when there are not enough entrants.
pub fn draw_winners<R: Rng + ?Sized>(entrants: &[u64], count: usize, rng: &mut R) -> Vec<u64> {
    entrants.choose_multiple(rng, count).copied().collect()
}

/// Repository for the `giveaways` and `giveaway_entries` tables.
#[derive(Debug, Clone)]
pub struct GiveawayRepository {
    db: Database,
}

impl GiveawayRepository {
    /// Create a repository over the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Start a giveaway, purging entries of every earlier one.
    ///
    /// Any giveaway still open is marked superseded so that its pending timer
    /// resolves to nothing.
    #[instrument(skip(self, draft), fields(prize = %draft.prize, num_winners = draft.num_winners))]
    pub async fn start(&self, draft: GiveawayDraft) -> DatabaseResult<GiveawayRow> {
        let row = self
            .db
            .run(move |conn| {
                conn.immediate_transaction::<_, DatabaseError, _>(|conn| {
                    let superseded = diesel::update(
                        giveaways::table.filter(giveaways::status.eq(GiveawayStatus::Open)),
                    )
                    .set(giveaways::status.eq(GiveawayStatus::Superseded))
                    .execute(conn)?;

                    let purged = diesel::delete(giveaway_entries::table).execute(conn)?;
                    debug!(superseded, purged, "Cleared previous giveaway state");

                    diesel::insert_into(giveaways::table)
                        .values(NewGiveaway {
                            channel_id: to_db_id(draft.channel_id),
                            prize: draft.prize,
                            num_winners: i64::from(draft.num_winners),
                            status: GiveawayStatus::Open,
                            started_at: draft.started_at,
                            ends_at: draft.ends_at,
                        })
                        .execute(conn)?;

                    giveaways::table
                        .order(giveaways::id.desc())
                        .select(GiveawayRow::as_select())
                        .first(conn)
                        .map_err(Into::into)
                })
            })
            .await?;

        info!(giveaway_id = row.id, ends_at = row.ends_at, "Giveaway started");
        Ok(row)
    }

    /// The giveaway currently accepting entries, if any.
    #[instrument(skip(self))]
    pub async fn active(&self) -> DatabaseResult<Option<GiveawayRow>> {
        self.db.run(|conn| active_giveaway(conn)).await
    }

    /// Look up a giveaway by id.
    #[instrument(skip(self))]
    pub async fn get(&self, giveaway_id: i64) -> DatabaseResult<Option<GiveawayRow>> {
        self.db
            .run(move |conn| {
                giveaways::table
                    .find(giveaway_id)
                    .select(GiveawayRow::as_select())
                    .first(conn)
                    .optional()
                    .map_err(Into::into)
            })
            .await
    }

    /// Every giveaway still open, oldest first.
    #[instrument(skip(self))]
    pub async fn open_giveaways(&self) -> DatabaseResult<Vec<GiveawayRow>> {
        self.db
            .run(|conn| {
                giveaways::table
                    .filter(giveaways::status.eq(GiveawayStatus::Open))
                    .order(giveaways::id.asc())
                    .select(GiveawayRow::as_select())
                    .load(conn)
                    .map_err(Into::into)
            })
            .await
    }

    /// Entrants of a giveaway, ordered by user id.
    #[instrument(skip(self))]
    pub async fn entrants(&self, giveaway_id: i64) -> DatabaseResult<Vec<u64>> {
        self.db
            .run(move |conn| load_entrants(conn, giveaway_id))
            .await
    }

    /// Enter `user_id` into the open giveaway, debiting `cost` coins.
    ///
    /// All checks and writes share one immediate transaction, and the debit
    /// only applies while the balance still covers the cost, so concurrent
    /// entries cannot drive a balance below zero.
    #[instrument(skip(self))]
    pub async fn enter(&self, user_id: u64, cost: i64) -> DatabaseResult<EntryOutcome> {
        let outcome = self
            .db
            .run(move |conn| {
                conn.immediate_transaction::<_, DatabaseError, _>(|conn| {
                    let db_user = to_db_id(user_id);

                    diesel::insert_or_ignore_into(users::table)
                        .values(users::user_id.eq(db_user))
                        .execute(conn)?;

                    let Some(giveaway) = active_giveaway(conn)? else {
                        return Ok(EntryOutcome::NoActiveGiveaway);
                    };

                    let balance: i64 = users::table
                        .find(db_user)
                        .select(users::coins)
                        .first(conn)?;
                    if balance < cost {
                        return Ok(EntryOutcome::InsufficientFunds { balance, cost });
                    }

                    let existing = giveaway_entries::table
                        .find((giveaway.id, db_user))
                        .select(GiveawayEntryRow::as_select())
                        .first(conn)
                        .optional()?;
                    if existing.is_some() {
                        return Ok(EntryOutcome::AlreadyEntered);
                    }

                    let debited = diesel::update(
                        users::table
                            .find(db_user)
                            .filter(users::coins.ge(cost)),
                    )
                    .set(users::coins.eq(users::coins - cost))
                    .execute(conn)?;
                    if debited == 0 {
                        return Ok(EntryOutcome::InsufficientFunds { balance, cost });
                    }

                    diesel::insert_into(giveaway_entries::table)
                        .values(GiveawayEntryRow {
                            giveaway_id: giveaway.id,
                            user_id: db_user,
                        })
                        .execute(conn)?;

                    Ok(EntryOutcome::Entered {
                        giveaway_id: giveaway.id,
                        remaining_coins: balance - cost,
                    })
                })
            })
            .await?;

        debug!(?outcome, "Processed giveaway entry");
        Ok(outcome)
    }

    /// Resolve a giveaway with an entropy-seeded generator.
    pub async fn resolve(&self, giveaway_id: i64) -> DatabaseResult<ResolveOutcome> {
        self.resolve_with(giveaway_id, StdRng::from_entropy()).await
    }

    /// Resolve a giveaway, drawing winners with `rng`.
    ///
    /// Only the instance's own entries are read or removed. An open giveaway
    /// with too few entrants becomes undersubscribed and keeps its entries.
    #[instrument(skip(self, rng))]
    pub async fn resolve_with<R>(&self, giveaway_id: i64, mut rng: R) -> DatabaseResult<ResolveOutcome>
    where
        R: Rng + Send + 'static,
    {
        let outcome = self
            .db
            .run(move |conn| {
                conn.immediate_transaction::<_, DatabaseError, _>(|conn| {
                    let Some(giveaway) = giveaways::table
                        .find(giveaway_id)
                        .select(GiveawayRow::as_select())
                        .first(conn)
                        .optional()?
                    else {
                        return Ok(ResolveOutcome::NotFound);
                    };

                    if giveaway.status != GiveawayStatus::Open {
                        return Ok(ResolveOutcome::Closed { giveaway });
                    }

                    let entrants = load_entrants(conn, giveaway_id)?;
                    let wanted = usize::try_from(giveaway.num_winners).unwrap_or(usize::MAX);

                    if entrants.len() < wanted {
                        let giveaway = set_status(conn, giveaway, GiveawayStatus::Undersubscribed)?;
                        return Ok(ResolveOutcome::Undersubscribed {
                            giveaway,
                            entrants: entrants.len(),
                        });
                    }

                    let winners = draw_winners(&entrants, wanted, &mut rng);

                    diesel::delete(
                        giveaway_entries::table.filter(giveaway_entries::giveaway_id.eq(giveaway_id)),
                    )
                    .execute(conn)?;
                    let giveaway = set_status(conn, giveaway, GiveawayStatus::Resolved)?;

                    Ok(ResolveOutcome::Resolved { giveaway, winners })
                })
            })
            .await?;

        match &outcome {
            ResolveOutcome::Resolved { winners, .. } => {
                info!(giveaway_id, winners = winners.len(), "Giveaway resolved")
            }
            ResolveOutcome::Undersubscribed { entrants, .. } => {
                info!(giveaway_id, entrants, "Giveaway undersubscribed")
            }
            ResolveOutcome::Closed { giveaway } => {
                debug!(giveaway_id, status = %giveaway.status, "Giveaway already closed")
            }
            ResolveOutcome::NotFound => debug!(giveaway_id, "Giveaway not found"),
        }
        Ok(outcome)
    }
}

fn active_giveaway(conn: &mut SqliteConnection) -> DatabaseResult<Option<GiveawayRow>> {
    giveaways::table
        .filter(giveaways::status.eq(GiveawayStatus::Open))
        .order(giveaways::id.desc())
        .select(GiveawayRow::as_select())
        .first(conn)
        .optional()
        .map_err(Into::into)
}

fn load_entrants(conn: &mut SqliteConnection, giveaway_id: i64) -> DatabaseResult<Vec<u64>> {
    let ids: Vec<i64> = giveaway_entries::table
        .filter(giveaway_entries::giveaway_id.eq(giveaway_id))
        .order(giveaway_entries::user_id.asc())
        .select(giveaway_entries::user_id)
        .load(conn)?;
    Ok(ids.into_iter().map(from_db_id).collect())
}

fn set_status(
    conn: &mut SqliteConnection,
    mut giveaway: GiveawayRow,
    status: GiveawayStatus,
) -> DatabaseResult<GiveawayRow> {
    diesel::update(giveaways::table.find(giveaway.id))
        .set(giveaways::status.eq(status))
        .execute(conn)?;
    giveaway.status = status;
    Ok(giveaway)
}
