//! Acquaintances and queued conversations

use std::collections::VecDeque;

use ahash::AHashMap;

use crate::core::config::SocialConfig;
use crate::core::types::{EntityId, SimTime};
use crate::entity::thoughts::CognitionEvent;

/// Who an agent knows, when it last talked with them, and who it is
/// waiting to talk to
#[derive(Debug, Clone)]
pub struct SocialLedger {
    owner: EntityId,
    config: SocialConfig,
    /// Peer -> time of meeting or of the last conversation
    known: AHashMap<EntityId, SimTime>,
    pending: VecDeque<EntityId>,
    discussion_timer: f32,
}

impl SocialLedger {
    pub fn new(owner: EntityId, config: SocialConfig) -> Self {
        let discussion_timer = config.discussion_duration;
        Self {
            owner,
            config,
            known: AHashMap::new(),
            pending: VecDeque::new(),
            discussion_timer,
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn knows(&self, peer: EntityId) -> bool {
        self.known.contains_key(&peer)
    }

    pub fn known_peers(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.known.keys().copied()
    }

    /// Strangers are always approachable; acquaintances once the cooldown
    /// since the last contact has passed
    pub fn can_talk_to(&self, peer: EntityId, now: SimTime) -> bool {
        if peer == self.owner {
            return false;
        }
        match self.known.get(&peer) {
            None => true,
            Some(&last) => last < now - self.config.discussion_cooldown,
        }
    }

    pub fn has_pending_conversation(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Queue a conversation with every peer given. First contacts are
    /// reported as [`CognitionEvent::MetPeer`].
    pub fn start_group_conversation(&mut self, peers: &[EntityId], now: SimTime) -> Vec<CognitionEvent> {
        let mut events = Vec::new();
        for &peer in peers {
            if peer == self.owner || self.pending.contains(&peer) {
                continue;
            }
            self.pending.push_back(peer);
            if !self.known.contains_key(&peer) {
                self.known.insert(peer, now);
                events.push(CognitionEvent::MetPeer { peer });
            }
        }
        if self.has_pending_conversation() {
            tracing::debug!(agent = %self.owner, partners = self.pending.len(), "conversation started");
        }
        events
    }

    /// Advance the conversation clock.
    ///
    /// Returns the partner whose turn just finished; the caller imports that
    /// partner's memories. The conversation ends once the queue is empty.
    pub fn advance(&mut self, dt: f32, now: SimTime) -> Option<EntityId> {
        if self.pending.is_empty() {
            return None;
        }
        self.discussion_timer -= dt;
        if self.discussion_timer > 0.0 {
            return None;
        }
        self.discussion_timer = self.config.discussion_duration;
        let partner = self.pending.pop_front()?;
        self.known.insert(partner, now);
        if self.pending.is_empty() {
            self.stop_conversation();
        }
        Some(partner)
    }

    /// Abandon any queued partners
    pub fn stop_conversation(&mut self) {
        self.pending.clear();
        self.discussion_timer = self.config.discussion_duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> SocialLedger {
        SocialLedger::new(EntityId::new(), SocialConfig::default())
    }

    #[test]
    fn test_strangers_are_approachable() {
        let ledger = ledger();
        assert!(ledger.can_talk_to(EntityId::new(), 0.0));
        assert!(!ledger.can_talk_to(ledger.owner(), 0.0));
    }

    #[test]
    fn test_meeting_starts_cooldown() {
        let mut ledger = ledger();
        let peer = EntityId::new();
        let events = ledger.start_group_conversation(&[peer], 10.0);

        assert_eq!(events, vec![CognitionEvent::MetPeer { peer }]);
        assert!(!ledger.can_talk_to(peer, 15.0));
        assert!(ledger.can_talk_to(peer, 31.0));
    }

    #[test]
    fn test_conversation_engages_each_partner_in_turn() {
        let mut ledger = ledger();
        let a = EntityId::new();
        let b = EntityId::new();
        ledger.start_group_conversation(&[a, b, a], 0.0);

        assert_eq!(ledger.advance(4.0, 4.0), None);
        assert_eq!(ledger.advance(1.0, 5.0), Some(a));
        assert!(ledger.has_pending_conversation());
        assert_eq!(ledger.advance(5.0, 10.0), Some(b));
        assert!(!ledger.has_pending_conversation());
        assert_eq!(ledger.advance(5.0, 15.0), None);
    }

    #[test]
    fn test_known_peer_is_not_met_twice() {
        let mut ledger = ledger();
        let peer = EntityId::new();
        ledger.start_group_conversation(&[peer], 0.0);
        ledger.stop_conversation();

        let events = ledger.start_group_conversation(&[peer], 50.0);
        assert!(events.is_empty());
        assert!(ledger.has_pending_conversation());
    }
}
