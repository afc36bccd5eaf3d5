//! In-process [`Backend`] used by tests and local demos.

use std::sync::{Mutex, MutexGuard};

use amora_types::models::{MatchDecision, Message, PhotoPost, Profile, UserId};

use crate::backend::{Backend, BackendError, BackendResult};
use crate::conversation::Conversation;

#[derive(Default)]
struct MemoryState {
    messages: Vec<Message>,
    decisions: Vec<(UserId, MatchDecision)>,
    profiles: Vec<Profile>,
    posts: Vec<PhotoPost>,
}

#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> BackendResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|e| BackendError::Unavailable(format!("state lock poisoned: {}", e)))
    }
}

impl Backend for MemoryBackend {
    fn get_conversation(&self, viewer: &UserId, partner: &UserId) -> BackendResult<Conversation> {
        let state = self.lock()?;
        let between = |from: &UserId, to: &UserId| -> Vec<Message> {
            state
                .messages
                .iter()
                .filter(|m| &m.sender == from && &m.recipient == to)
                .cloned()
                .collect()
        };
        Ok(Conversation::new(between(viewer, partner), between(partner, viewer)))
    }

    fn send_message(
        &self,
        sender: &UserId,
        recipient: &UserId,
        content: &str,
        image: Option<&str>,
        timestamp: i64,
    ) -> BackendResult<()> {
        self.lock()?.messages.push(Message {
            sender: sender.clone(),
            recipient: recipient.clone(),
            content: content.to_string(),
            image: image.map(str::to_string),
            timestamp,
            read: false,
        });
        Ok(())
    }

    fn mark_as_read(&self, viewer: &UserId, partner: &UserId) -> BackendResult<()> {
        let mut state = self.lock()?;
        for m in state
            .messages
            .iter_mut()
            .filter(|m| &m.sender == partner && &m.recipient == viewer)
        {
            m.read = true;
        }
        Ok(())
    }

    fn get_user_matches(&self, user: &UserId) -> BackendResult<Vec<MatchDecision>> {
        Ok(self
            .lock()?
            .decisions
            .iter()
            .filter(|(viewer, _)| viewer == user)
            .map(|(_, d)| d.clone())
            .collect())
    }

    fn get_user_profile(&self, user: &UserId) -> BackendResult<Option<Profile>> {
        Ok(self.lock()?.profiles.iter().find(|p| &p.id == user).cloned())
    }

    fn add_match_decision(&self, viewer: &UserId, decision: &MatchDecision) -> BackendResult<()> {
        if &decision.id == viewer {
            return Err(BackendError::Invalid("cannot decide on your own profile".into()));
        }
        let mut state = self.lock()?;
        match state
            .decisions
            .iter_mut()
            .find(|(v, d)| v == viewer && d.id == decision.id)
        {
            Some((_, existing)) => existing.decision = decision.decision,
            None => state.decisions.push((viewer.clone(), decision.clone())),
        }
        Ok(())
    }

    fn get_profiles(&self) -> BackendResult<Vec<Profile>> {
        Ok(self.lock()?.profiles.clone())
    }

    fn save_profile(&self, profile: &Profile) -> BackendResult<()> {
        let mut state = self.lock()?;
        match state.profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => *existing = profile.clone(),
            None => state.profiles.push(profile.clone()),
        }
        Ok(())
    }

    fn create_photo_post(
        &self,
        owner: &UserId,
        photo: &str,
        caption: &str,
        timestamp: i64,
    ) -> BackendResult<i64> {
        let mut state = self.lock()?;
        let id = state.posts.len() as i64 + 1;
        state.posts.push(PhotoPost {
            id,
            owner: owner.clone(),
            caption: caption.to_string(),
            photo: photo.to_string(),
            timestamp,
        });
        Ok(id)
    }

    fn get_feed(&self, users: &[UserId], limit: usize) -> BackendResult<Vec<PhotoPost>> {
        let state = self.lock()?;
        let mut posts: Vec<PhotoPost> = state
            .posts
            .iter()
            .filter(|p| users.contains(&p.owner))
            .cloned()
            .collect();
        posts.sort_by_key(|p| std::cmp::Reverse(p.timestamp));
        posts.truncate(limit);
        Ok(posts)
    }

    fn get_user_posts(&self, user: &UserId) -> BackendResult<Vec<PhotoPost>> {
        Ok(self
            .lock()?
            .posts
            .iter()
            .filter(|p| &p.owner == user)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amora_types::models::Decision;

    #[test]
    fn decision_on_self_is_invalid() {
        let backend = MemoryBackend::new();
        let me = UserId::from("me");
        let result = backend.add_match_decision(
            &me,
            &MatchDecision {
                id: "me".into(),
                decision: Decision::Like,
            },
        );
        assert!(matches!(result, Err(BackendError::Invalid(_))));
        assert!(backend.get_user_matches(&me).unwrap().is_empty());
    }

    #[test]
    fn later_decision_replaces_earlier() {
        let backend = MemoryBackend::new();
        let me = UserId::from("me");
        let like = MatchDecision {
            id: "zoe".into(),
            decision: Decision::Like,
        };
        backend.add_match_decision(&me, &like).unwrap();
        backend
            .add_match_decision(
                &me,
                &MatchDecision {
                    id: "zoe".into(),
                    decision: Decision::Pass,
                },
            )
            .unwrap();

        let matches = backend.get_user_matches(&me).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].decision, Decision::Pass);
        assert!(backend.get_user_matches(&"zoe".into()).unwrap().is_empty());
    }

    #[test]
    fn conversation_is_scoped_to_the_pair() {
        let backend = MemoryBackend::new();
        let (a, b, c) = (UserId::from("a"), UserId::from("b"), UserId::from("c"));
        backend.send_message(&a, &b, "a->b", None, 1).unwrap();
        backend.send_message(&b, &a, "b->a", None, 2).unwrap();
        backend.send_message(&c, &a, "c->a", None, 3).unwrap();

        let conv = backend.get_conversation(&a, &b).unwrap();
        assert_eq!(conv.sent.len(), 1);
        assert_eq!(conv.received.len(), 1);
        assert_eq!(conv.received[0].content, "b->a");
        assert_eq!(conv.unread_count, 1);
    }
}
