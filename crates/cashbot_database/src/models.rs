//! Diesel models for the ledger and giveaway tables.

use crate::from_db_id;
use crate::schema::{giveaway_entries, giveaways, users};
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
    /// Platform user id (stored form)
    pub user_id: i64,
    /// Experience points
    pub xp: i64,
    /// Currency balance
    pub coins: i64,
}

/// A user's experience and balance, keyed by platform id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerRecord {
    /// Platform user id
    pub user_id: u64,
    /// Experience points
    pub xp: i64,
    /// Currency balance
    pub coins: i64,
}

impl From<UserRow> for LedgerRecord {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: from_db_id(row.user_id),
            xp: row.xp,
            coins: row.coins,
        }
    }
}

/// Lifecycle state of a giveaway instance.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[diesel(sql_type = Text)]
#[strum(serialize_all = "snake_case")]
pub enum GiveawayStatus {
    /// Accepting entries until its timer fires.
    Open,
    /// Winners were drawn and the entries cleared.
    Resolved,
    /// Fewer entrants than winners when the timer fired; entries kept.
    Undersubscribed,
    /// A later giveaway started before this one resolved.
    Superseded,
}

impl ToSql<Text, Sqlite> for GiveawayStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        let value: &'static str = self.into();
        out.set_value(value);
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for GiveawayStatus {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let value = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        value
            .parse()
            .map_err(|_| format!("Unknown giveaway status: {}", value).into())
    }
}

/// A row of the `giveaways` table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = giveaways)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GiveawayRow {
    /// Instance id
    pub id: i64,
    /// Channel the giveaway was announced in (stored form)
    pub channel_id: i64,
    /// Free-text prize
    pub prize: String,
    /// Number of winners to draw
    pub num_winners: i64,
    /// Lifecycle state
    pub status: GiveawayStatus,
    /// Unix timestamp (seconds) of the start
    pub started_at: i64,
    /// Unix timestamp (seconds) at which the giveaway resolves
    pub ends_at: i64,
}

impl GiveawayRow {
    /// Channel the giveaway was announced in.
    pub fn channel(&self) -> u64 {
        from_db_id(self.channel_id)
    }

    /// Seconds left until resolution, zero once `ends_at` has passed.
    pub fn remaining_secs(&self, now: i64) -> u64 {
        u64::try_from(self.ends_at.saturating_sub(now)).unwrap_or(0)
    }
}

/// Insertable giveaway instance.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = giveaways)]
pub struct NewGiveaway {
    /// Channel the giveaway is announced in (stored form)
    pub channel_id: i64,
    /// Free-text prize
    pub prize: String,
    /// Number of winners to draw
    pub num_winners: i64,
    /// Initial state, always open
    pub status: GiveawayStatus,
    /// Unix timestamp (seconds) of the start
    pub started_at: i64,
    /// Unix timestamp (seconds) at which the giveaway resolves
    pub ends_at: i64,
}

/// A row of the `giveaway_entries` table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = giveaway_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GiveawayEntryRow {
    /// Giveaway instance the entry belongs to
    pub giveaway_id: i64,
    /// Entrant (stored form)
    pub user_id: i64,
}
