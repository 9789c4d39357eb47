//! User ledger: experience and currency per platform user.

use crate::models::{LedgerRecord, UserRow};
use crate::schema::users;
use crate::{Database, DatabaseResult, from_db_id, to_db_id};
use diesel::prelude::*;
use tracing::{debug, instrument};

/// Numeric column a leaderboard can be ranked by.
///
/// Parsing accepts only the lowercase names, so a category can never carry
/// arbitrary text into a query.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum LeaderboardCategory {
    /// Currency balance
    #[default]
    Coins,
    /// Experience points
    Xp,
}

/// One ranked leaderboard row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// Platform user id
    pub user_id: u64,
    /// Value of the ranked column
    pub value: i64,
}

/// Repository for the `users` table.
///
/// Each method opens and closes its own connection; there is no atomicity
/// across calls.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: Database,
}

impl LedgerRepository {
    /// Create a repository over the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a zeroed record for `user_id` unless one already exists.
    #[instrument(skip(self))]
    pub async fn ensure(&self, user_id: u64) -> DatabaseResult<()> {
        let inserted = self
            .db
            .run(move |conn| {
                diesel::insert_or_ignore_into(users::table)
                    .values(users::user_id.eq(to_db_id(user_id)))
                    .execute(conn)
                    .map_err(Into::into)
            })
            .await?;
        if inserted > 0 {
            debug!(user_id, "Created ledger record");
        }
        Ok(())
    }

    /// Add `coins_delta` and `xp_delta` to an existing record.
    ///
    /// No clamping is applied. Returns the number of rows updated, which is
    /// zero when the user has no record.
    #[instrument(skip(self))]
    pub async fn credit(&self, user_id: u64, coins_delta: i64, xp_delta: i64) -> DatabaseResult<usize> {
        self.db
            .run(move |conn| {
                diesel::update(users::table.find(to_db_id(user_id)))
                    .set((
                        users::coins.eq(users::coins + coins_delta),
                        users::xp.eq(users::xp + xp_delta),
                    ))
                    .execute(conn)
                    .map_err(Into::into)
            })
            .await
    }

    /// Current record for `user_id`, if any.
    #[instrument(skip(self))]
    pub async fn read(&self, user_id: u64) -> DatabaseResult<Option<LedgerRecord>> {
        let row: Option<UserRow> = self
            .db
            .run(move |conn| {
                users::table
                    .find(to_db_id(user_id))
                    .select(UserRow::as_select())
                    .first(conn)
                    .optional()
                    .map_err(Into::into)
            })
            .await?;
        Ok(row.map(LedgerRecord::from))
    }

    /// Top `limit` users ordered by `category`, highest first.
    #[instrument(skip(self))]
    pub async fn top(
        &self,
        category: LeaderboardCategory,
        limit: i64,
    ) -> DatabaseResult<Vec<LeaderboardEntry>> {
        let rows: Vec<(i64, i64)> = self
            .db
            .run(move |conn| {
                let query = match category {
                    LeaderboardCategory::Coins => users::table
                        .select((users::user_id, users::coins))
                        .order((users::coins.desc(), users::user_id.asc()))
                        .limit(limit)
                        .load(conn),
                    LeaderboardCategory::Xp => users::table
                        .select((users::user_id, users::xp))
                        .order((users::xp.desc(), users::user_id.asc()))
                        .limit(limit)
                        .load(conn),
                };
                query.map_err(Into::into)
            })
            .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, value)| LeaderboardEntry {
                user_id: from_db_id(user_id),
                value,
            })
            .collect())
    }
}
