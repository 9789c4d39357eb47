//! Per-message activity rewards.

use crate::SocialResult;
use cashbot_database::LedgerRepository;
use tracing::instrument;

/// Credits experience and coins for every message a user posts.
#[derive(Debug, Clone)]
pub struct MessageRewards {
    ledger: LedgerRepository,
    xp: i64,
    coins: i64,
}

impl MessageRewards {
    /// Reward each message with `xp` experience and `coins` currency.
    pub fn new(ledger: LedgerRepository, xp: i64, coins: i64) -> Self {
        Self { ledger, xp, coins }
    }

    /// Record one message by `user_id`, creating the ledger record if needed.
    ///
    /// Runs before any command handling, so commands are rewarded too.
    #[instrument(skip(self))]
    pub async fn record_message(&self, user_id: u64) -> SocialResult<()> {
        self.ledger.ensure(user_id).await?;
        self.ledger.credit(user_id, self.coins, self.xp).await?;
        Ok(())
    }
}
