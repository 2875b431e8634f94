// Starboard service - decides what should happen for a message or reaction.
//
// The service never talks to Discord. It answers "react? thread? promote?"
// and remembers which messages already made it to the Hall of Fame.

use super::starboard_models::{
    MessagePlan, MessageSnapshot, PostedMessage, Promotion, ReactionPlan, ReactionSnapshot,
    StarboardConfig,
};
use super::starboard_store::{StarboardStore, StoreError};
use dashmap::DashSet;

// Discord caps thread names at 100 characters.
const MAX_THREAD_NAME_LEN: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum StarboardError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub struct StarboardService<S: StarboardStore> {
    store: S,
    // Message ids already reposted to a Hall of Fame channel
    posted: DashSet<u64>,
}

impl<S: StarboardStore> StarboardService<S> {
    /// Create the service and restore the posted-set from the store.
    pub async fn new(store: S) -> Result<Self, StarboardError> {
        let posted = DashSet::new();
        for entry in store.load_posted().await? {
            posted.insert(entry.message_id);
        }
        tracing::info!(posted = posted.len(), "Starboard posted-set restored");

        Ok(Self { store, posted })
    }

    /// Save settings for a guild, replacing any existing record.
    pub async fn configure(&self, config: StarboardConfig) -> Result<(), StarboardError> {
        if config.channel_ids.is_empty() {
            return Err(StarboardError::InvalidConfig(
                "at least one channel is required".to_string(),
            ));
        }
        if config.guild_id == 0
            || config.channel_ids.contains(&0)
            || config.hall_of_fame_channel_id == Some(0)
        {
            return Err(StarboardError::InvalidConfig(
                "ids must be non-zero".to_string(),
            ));
        }
        if config.emoji.trim().is_empty() {
            return Err(StarboardError::InvalidConfig(
                "emoji must not be empty".to_string(),
            ));
        }
        if config.threshold == Some(0) {
            return Err(StarboardError::InvalidConfig(
                "threshold must be at least 1".to_string(),
            ));
        }

        self.store.save_config(config).await?;
        Ok(())
    }

    pub async fn config_for(&self, guild_id: u64) -> Result<Option<StarboardConfig>, StarboardError> {
        let configs = self.store.load_configs().await?;
        Ok(configs.into_iter().find(|c| c.guild_id == guild_id))
    }

    /// Decide whether a new message gets the starboard reaction and a thread.
    pub async fn plan_for_message(
        &self,
        message: &MessageSnapshot,
    ) -> Result<MessagePlan, StarboardError> {
        if message.author_is_bot {
            return Ok(MessagePlan::default());
        }
        let Some(guild_id) = message.guild_id else {
            return Ok(MessagePlan::default());
        };
        let Some(config) = self.config_for(guild_id).await? else {
            return Ok(MessagePlan::default());
        };

        if !config.monitors(message.channel_id) {
            return Ok(MessagePlan::default());
        }
        if config.only_attachments && !message.has_attachments {
            return Ok(MessagePlan::default());
        }

        Ok(MessagePlan {
            react_with: Some(config.emoji),
            create_thread: config.auto_thread,
        })
    }

    /// Cheap check on the ids a reaction event carries, so the Discord layer
    /// only fetches messages for reactions the starboard could care about.
    pub async fn watches_reaction(
        &self,
        guild_id: u64,
        channel_id: u64,
        emoji: &str,
    ) -> Result<bool, StarboardError> {
        Ok(self
            .config_for(guild_id)
            .await?
            .map_or(false, |config| config.emoji == emoji && config.monitors(channel_id)))
    }

    /// Decide what a reaction-add should trigger.
    ///
    /// A promotion is only planned for messages not yet in the posted-set.
    /// The caller still has to [`claim_promotion`] before sending.
    ///
    /// [`claim_promotion`]: StarboardService::claim_promotion
    pub async fn plan_for_reaction(
        &self,
        reaction: &ReactionSnapshot,
    ) -> Result<ReactionPlan, StarboardError> {
        if reaction.reactor_is_bot {
            return Ok(ReactionPlan::default());
        }
        let Some(guild_id) = reaction.guild_id else {
            return Ok(ReactionPlan::default());
        };
        let Some(config) = self.config_for(guild_id).await? else {
            return Ok(ReactionPlan::default());
        };

        if reaction.emoji != config.emoji || !config.monitors(reaction.channel_id) {
            return Ok(ReactionPlan::default());
        }
        if config.only_attachments && !reaction.has_attachments {
            return Ok(ReactionPlan::default());
        }

        let create_thread = config.auto_thread && !reaction.has_thread;

        let promote = config
            .hall_of_fame()
            .filter(|(_, threshold)| reaction.reaction_count >= *threshold)
            .filter(|_| !self.is_posted(reaction.message_id))
            .map(|(hall_of_fame_channel_id, _)| Promotion {
                hall_of_fame_channel_id,
                emoji: config.emoji.clone(),
                reaction_count: reaction.reaction_count,
            });

        Ok(ReactionPlan {
            create_thread,
            promote,
        })
    }

    pub fn is_posted(&self, message_id: u64) -> bool {
        self.posted.contains(&message_id)
    }

    /// Reserve a promotion before sending the repost. Returns `false` when the
    /// message was already posted or another event holds the claim.
    pub fn claim_promotion(&self, message_id: u64) -> bool {
        self.posted.insert(message_id)
    }

    /// Persist a claimed promotion once the repost went out.
    pub async fn confirm_promotion(&self, posted: PostedMessage) -> Result<(), StarboardError> {
        self.store.save_posted(posted).await?;
        Ok(())
    }

    /// Drop a claim whose repost failed so a later reaction can retry.
    pub fn release_promotion(&self, message_id: u64) {
        self.posted.remove(&message_id);
    }

    /// Forget promoted messages that were deleted at the source. Returns the
    /// entries whose reposts should go too. Deletions of messages that never
    /// reached the Hall of Fame touch no storage.
    pub async fn forget_deleted(
        &self,
        message_ids: &[u64],
    ) -> Result<Vec<PostedMessage>, StarboardError> {
        let tracked: Vec<u64> = message_ids
            .iter()
            .copied()
            .filter(|id| self.posted.remove(id).is_some())
            .collect();
        if tracked.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self.store.remove_posted(&tracked).await?)
    }
}

/// Title for a discussion thread anchored to a starred message.
pub fn thread_name(author_name: &str, content: &str) -> String {
    let first_line = content.lines().map(str::trim).find(|l| !l.is_empty());

    let name = match first_line {
        Some(line) => line.to_string(),
        None => format!("Discussion with {}", author_name),
    };

    name.chars().take(MAX_THREAD_NAME_LEN).collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dashmap::DashMap;
    use std::sync::Mutex;

    const GUILD: u64 = 900000000000000001;
    const CHANNEL: u64 = 111111111111111111;
    const OTHER_CHANNEL: u64 = 333333333333333333;
    const HALL: u64 = 444444444444444444;

    /// In-memory store for testing
    #[derive(Default)]
    struct MockStarboardStore {
        configs: DashMap<u64, StarboardConfig>,
        posted: Mutex<Vec<PostedMessage>>,
        removals: Mutex<usize>,
    }

    #[async_trait]
    impl StarboardStore for MockStarboardStore {
        async fn load_configs(&self) -> Result<Vec<StarboardConfig>, StoreError> {
            Ok(self.configs.iter().map(|c| c.value().clone()).collect())
        }

        async fn save_config(&self, config: StarboardConfig) -> Result<(), StoreError> {
            self.configs.insert(config.guild_id, config);
            Ok(())
        }

        async fn load_posted(&self) -> Result<Vec<PostedMessage>, StoreError> {
            Ok(self.posted.lock().unwrap().clone())
        }

        async fn save_posted(&self, posted: PostedMessage) -> Result<(), StoreError> {
            let mut entries = self.posted.lock().unwrap();
            entries.retain(|p| p.message_id != posted.message_id);
            entries.push(posted);
            Ok(())
        }

        async fn remove_posted(
            &self,
            message_ids: &[u64],
        ) -> Result<Vec<PostedMessage>, StoreError> {
            *self.removals.lock().unwrap() += 1;
            let mut entries = self.posted.lock().unwrap();
            let (removed, kept): (Vec<_>, Vec<_>) = entries
                .drain(..)
                .partition(|p| message_ids.contains(&p.message_id));
            *entries = kept;
            Ok(removed)
        }
    }

    fn config() -> StarboardConfig {
        StarboardConfig {
            guild_id: GUILD,
            channel_ids: vec![CHANNEL],
            emoji: "⭐".to_string(),
            only_attachments: false,
            auto_thread: false,
            hall_of_fame_channel_id: Some(HALL),
            threshold: Some(3),
        }
    }

    fn reposted(message_id: u64) -> PostedMessage {
        PostedMessage {
            message_id,
            repost_channel_id: Some(HALL),
            repost_id: Some(message_id + 1000),
        }
    }

    fn message(has_attachments: bool) -> MessageSnapshot {
        MessageSnapshot {
            guild_id: Some(GUILD),
            channel_id: CHANNEL,
            message_id: 1,
            author_is_bot: false,
            has_attachments,
        }
    }

    fn reaction(count: u64) -> ReactionSnapshot {
        ReactionSnapshot {
            guild_id: Some(GUILD),
            channel_id: CHANNEL,
            message_id: 42,
            emoji: "⭐".to_string(),
            reactor_is_bot: false,
            reaction_count: count,
            has_attachments: false,
            has_thread: false,
        }
    }

    async fn service_with(config: StarboardConfig) -> StarboardService<MockStarboardStore> {
        let service = StarboardService::new(MockStarboardStore::default())
            .await
            .unwrap();
        service.configure(config).await.unwrap();
        service
    }

    #[tokio::test]
    async fn monitored_message_gets_reaction() {
        let service = service_with(config()).await;

        let plan = service.plan_for_message(&message(false)).await.unwrap();

        assert_eq!(plan.react_with.as_deref(), Some("⭐"));
        assert!(!plan.create_thread);
    }

    #[tokio::test]
    async fn attachments_only_skips_plain_messages() {
        let service = service_with(StarboardConfig {
            only_attachments: true,
            ..config()
        })
        .await;

        let plan = service.plan_for_message(&message(false)).await.unwrap();
        assert!(plan.is_empty());

        let plan = service.plan_for_message(&message(true)).await.unwrap();
        assert_eq!(plan.react_with.as_deref(), Some("⭐"));
    }

    #[tokio::test]
    async fn unmonitored_channel_and_unknown_guild_are_ignored() {
        let service = service_with(config()).await;

        let mut elsewhere = message(false);
        elsewhere.channel_id = OTHER_CHANNEL;
        assert!(service.plan_for_message(&elsewhere).await.unwrap().is_empty());

        let mut other_guild = message(false);
        other_guild.guild_id = Some(5);
        assert!(service.plan_for_message(&other_guild).await.unwrap().is_empty());

        let mut dm = message(false);
        dm.guild_id = None;
        assert!(service.plan_for_message(&dm).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bot_messages_are_ignored() {
        let service = service_with(config()).await;
        let mut from_bot = message(false);
        from_bot.author_is_bot = true;

        assert!(service.plan_for_message(&from_bot).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn auto_thread_is_planned_for_messages() {
        let service = service_with(StarboardConfig {
            auto_thread: true,
            ..config()
        })
        .await;

        let plan = service.plan_for_message(&message(false)).await.unwrap();
        assert!(plan.create_thread);
    }

    #[tokio::test]
    async fn threshold_reached_promotes_once() {
        let service = service_with(config()).await;

        let plan = service.plan_for_reaction(&reaction(2)).await.unwrap();
        assert_eq!(plan.promote, None);

        let plan = service.plan_for_reaction(&reaction(3)).await.unwrap();
        assert_eq!(
            plan.promote,
            Some(Promotion {
                hall_of_fame_channel_id: HALL,
                emoji: "⭐".to_string(),
                reaction_count: 3,
            })
        );

        assert!(service.claim_promotion(42));
        service.confirm_promotion(reposted(42)).await.unwrap();

        // Further reactions never promote the same message again
        for count in [3, 4, 10] {
            let plan = service.plan_for_reaction(&reaction(count)).await.unwrap();
            assert_eq!(plan.promote, None);
        }
        assert!(!service.claim_promotion(42));
        assert_eq!(*service.store.posted.lock().unwrap(), vec![reposted(42)]);
    }

    #[tokio::test]
    async fn concurrent_claims_only_succeed_once() {
        let service = service_with(config()).await;

        assert!(service.claim_promotion(42));
        assert!(!service.claim_promotion(42));
    }

    #[tokio::test]
    async fn released_claim_can_be_retried() {
        let service = service_with(config()).await;

        assert!(service.claim_promotion(42));
        service.release_promotion(42);

        let plan = service.plan_for_reaction(&reaction(3)).await.unwrap();
        assert!(plan.promote.is_some());
        assert!(service.claim_promotion(42));
        // Nothing persisted until confirmed
        assert!(service.store.posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn posted_set_survives_restart() {
        let store = MockStarboardStore::default();
        store.save_config(config()).await.unwrap();
        store.save_posted(PostedMessage::untracked(42)).await.unwrap();

        let service = StarboardService::new(store).await.unwrap();

        assert!(service.is_posted(42));
        let plan = service.plan_for_reaction(&reaction(5)).await.unwrap();
        assert_eq!(plan.promote, None);
    }

    #[tokio::test]
    async fn deleting_a_promoted_message_frees_it() {
        let service = service_with(config()).await;
        assert!(service.claim_promotion(42));
        service.confirm_promotion(reposted(42)).await.unwrap();

        let removed = service.forget_deleted(&[7, 42]).await.unwrap();

        assert_eq!(removed, vec![reposted(42)]);
        assert!(!service.is_posted(42));
        assert!(service.store.posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_unpromoted_messages_skips_storage() {
        let service = service_with(config()).await;

        let removed = service.forget_deleted(&[1, 2, 3]).await.unwrap();

        assert!(removed.is_empty());
        assert_eq!(*service.store.removals.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn watched_reactions_need_matching_emoji_and_channel() {
        let service = service_with(config()).await;

        assert!(service.watches_reaction(GUILD, CHANNEL, "⭐").await.unwrap());
        assert!(!service.watches_reaction(GUILD, CHANNEL, "🔥").await.unwrap());
        assert!(!service.watches_reaction(GUILD, OTHER_CHANNEL, "⭐").await.unwrap());
        assert!(!service.watches_reaction(5, CHANNEL, "⭐").await.unwrap());
    }

    #[tokio::test]
    async fn no_promotion_without_hall_of_fame_or_threshold() {
        let service = service_with(StarboardConfig {
            threshold: None,
            ..config()
        })
        .await;
        assert_eq!(service.plan_for_reaction(&reaction(50)).await.unwrap().promote, None);

        let service = service_with(StarboardConfig {
            hall_of_fame_channel_id: None,
            ..config()
        })
        .await;
        assert_eq!(service.plan_for_reaction(&reaction(50)).await.unwrap().promote, None);
    }

    #[tokio::test]
    async fn mismatched_reactions_are_rejected() {
        let service = service_with(StarboardConfig {
            auto_thread: true,
            ..config()
        })
        .await;

        let mut wrong_emoji = reaction(10);
        wrong_emoji.emoji = "🔥".to_string();
        assert_eq!(
            service.plan_for_reaction(&wrong_emoji).await.unwrap(),
            ReactionPlan::default()
        );

        let mut wrong_channel = reaction(10);
        wrong_channel.channel_id = OTHER_CHANNEL;
        assert_eq!(
            service.plan_for_reaction(&wrong_channel).await.unwrap(),
            ReactionPlan::default()
        );

        let mut from_bot = reaction(10);
        from_bot.reactor_is_bot = true;
        assert_eq!(
            service.plan_for_reaction(&from_bot).await.unwrap(),
            ReactionPlan::default()
        );
    }

    #[tokio::test]
    async fn reaction_thread_only_when_missing() {
        let service = service_with(StarboardConfig {
            auto_thread: true,
            ..config()
        })
        .await;

        assert!(service.plan_for_reaction(&reaction(1)).await.unwrap().create_thread);

        let mut threaded = reaction(1);
        threaded.has_thread = true;
        assert!(!service.plan_for_reaction(&threaded).await.unwrap().create_thread);
    }

    #[tokio::test]
    async fn attachments_only_blocks_reactions_too() {
        let service = service_with(StarboardConfig {
            only_attachments: true,
            ..config()
        })
        .await;

        let plan = service.plan_for_reaction(&reaction(10)).await.unwrap();
        assert_eq!(plan, ReactionPlan::default());
    }

    #[tokio::test]
    async fn configure_replaces_existing_guild_record() {
        let service = service_with(config()).await;
        service
            .configure(StarboardConfig {
                emoji: "🔥".to_string(),
                ..config()
            })
            .await
            .unwrap();

        let stored = service.config_for(GUILD).await.unwrap().unwrap();
        assert_eq!(stored.emoji, "🔥");
    }

    #[tokio::test]
    async fn configure_rejects_empty_channels_and_zero_threshold() {
        let service = StarboardService::new(MockStarboardStore::default())
            .await
            .unwrap();

        let no_channels = StarboardConfig {
            channel_ids: vec![],
            ..config()
        };
        assert!(matches!(
            service.configure(no_channels).await,
            Err(StarboardError::InvalidConfig(_))
        ));

        let zero = StarboardConfig {
            threshold: Some(0),
            ..config()
        };
        assert!(matches!(
            service.configure(zero).await,
            Err(StarboardError::InvalidConfig(_))
        ));

        let zero_channel = StarboardConfig {
            channel_ids: vec![CHANNEL, 0],
            ..config()
        };
        assert!(matches!(
            service.configure(zero_channel).await,
            Err(StarboardError::InvalidConfig(_))
        ));

        let zero_hall = StarboardConfig {
            hall_of_fame_channel_id: Some(0),
            ..config()
        };
        assert!(matches!(
            service.configure(zero_hall).await,
            Err(StarboardError::InvalidConfig(_))
        ));
    }

    #[test]
    fn thread_name_uses_first_content_line() {
        assert_eq!(thread_name("ann", "\n  look at this  \nsecond"), "look at this");
        assert_eq!(thread_name("ann", "   "), "Discussion with ann");
        assert_eq!(thread_name("ann", &"x".repeat(300)).chars().count(), 100);
    }
}
