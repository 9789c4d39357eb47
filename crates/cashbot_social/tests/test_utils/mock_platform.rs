//! Recording chat platform.

use async_trait::async_trait;
use cashbot_social::{
    ChatPlatform, InviteSnapshot, Notice, SocialError, SocialErrorKind, SocialResult,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    announcements: Vec<(u64, Notice)>,
    direct_messages: Vec<(u64, Notice)>,
    invites: HashMap<u64, Vec<InviteSnapshot>>,
    channels: HashMap<(u64, String), u64>,
    names: HashMap<u64, String>,
    unreachable: HashSet<u64>,
    broken_guilds: HashSet<u64>,
    dm_outage: bool,
}

/// Platform double that records every outbound notice.
#[derive(Default)]
pub struct RecordingPlatform {
    state: Mutex<State>,
}

#[allow(dead_code)]
impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_invites(&self, guild_id: u64, invites: Vec<InviteSnapshot>) {
        self.state.lock().unwrap().invites.insert(guild_id, invites);
    }

    pub fn add_channel(&self, guild_id: u64, name: &str, channel_id: u64) {
        self.state
            .lock()
            .unwrap()
            .channels
            .insert((guild_id, name.to_string()), channel_id);
    }

    pub fn set_name(&self, user_id: u64, name: &str) {
        self.state
            .lock()
            .unwrap()
            .names
            .insert(user_id, name.to_string());
    }

    /// Make direct messages to `user_id` bounce as if the user blocked the bot.
    pub fn block_direct_messages(&self, user_id: u64) {
        self.state.lock().unwrap().unreachable.insert(user_id);
    }

    /// Make every direct message fail with a platform error.
    pub fn break_direct_messages(&self) {
        self.state.lock().unwrap().dm_outage = true;
    }

    /// Make invite listing fail for a guild.
    pub fn break_guild(&self, guild_id: u64) {
        self.state.lock().unwrap().broken_guilds.insert(guild_id);
    }

    pub fn announcements(&self) -> Vec<(u64, Notice)> {
        self.state.lock().unwrap().announcements.clone()
    }

    pub fn direct_messages(&self) -> Vec<(u64, Notice)> {
        self.state.lock().unwrap().direct_messages.clone()
    }

    pub fn announced_titles(&self) -> Vec<String> {
        self.announcements()
            .into_iter()
            .map(|(_, notice)| notice.title)
            .collect()
    }
}

#[async_trait]
impl ChatPlatform for RecordingPlatform {
    async fn announce(&self, channel_id: u64, notice: &Notice) -> SocialResult<()> {
        self.state
            .lock()
            .unwrap()
            .announcements
            .push((channel_id, notice.clone()));
        Ok(())
    }

    async fn direct_message(&self, user_id: u64, notice: &Notice) -> SocialResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.dm_outage {
            return Err(SocialError::new(SocialErrorKind::Platform(
                "gateway unavailable".to_string(),
            )));
        }
        if state.unreachable.contains(&user_id) {
            return Err(SocialError::new(SocialErrorKind::RecipientUnreachable(
                user_id,
            )));
        }
        state.direct_messages.push((user_id, notice.clone()));
        Ok(())
    }

    async fn find_text_channel(&self, guild_id: u64, name: &str) -> SocialResult<Option<u64>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .channels
            .get(&(guild_id, name.to_string()))
            .copied())
    }

    async fn guild_invites(&self, guild_id: u64) -> SocialResult<Vec<InviteSnapshot>> {
        let state = self.state.lock().unwrap();
        if state.broken_guilds.contains(&guild_id) {
            return Err(SocialError::new(SocialErrorKind::Platform(format!(
                "missing permissions in guild {}",
                guild_id
            ))));
        }
        Ok(state.invites.get(&guild_id).cloned().unwrap_or_default())
    }

    async fn display_name(&self, user_id: u64) -> SocialResult<String> {
        self.state
            .lock()
            .unwrap()
            .names
            .get(&user_id)
            .cloned()
            .ok_or_else(|| SocialError::new(SocialErrorKind::Platform("unknown user".to_string())))
    }
}
