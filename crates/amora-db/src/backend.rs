//! [`Backend`] and [`SettingsStore`] on top of the SQLite tables.

use tracing::{debug, warn};

use amora_core::backend::{Backend, BackendError, BackendResult};
use amora_core::conversation::Conversation;
use amora_core::theme::{SettingsStore, StoreError};
use amora_types::models::{Decision, MatchDecision, Message, PhotoPost, Profile, UserId};

use crate::Database;
use crate::models::{MessageRow, PhotoPostRow, ProfileRow};

fn message_from_row(row: MessageRow) -> Message {
    Message {
        sender: row.sender_id.into(),
        recipient: row.recipient_id.into(),
        content: row.content,
        image: row.image,
        timestamp: row.timestamp,
        read: row.read,
    }
}

fn profile_from_row(row: ProfileRow) -> Profile {
    let interests = serde_json::from_str(&row.interests).unwrap_or_else(|e| {
        warn!("Corrupt interests on profile '{}': {}", row.id, e);
        Vec::new()
    });
    let age = u32::try_from(row.age).unwrap_or_else(|_| {
        warn!("Corrupt age {} on profile '{}'", row.age, row.id);
        0
    });
    Profile {
        id: row.id.into(),
        display_name: row.display_name,
        age,
        bio: row.bio,
        interests,
    }
}

fn post_from_row(row: PhotoPostRow) -> PhotoPost {
    PhotoPost {
        id: row.id,
        owner: row.owner_id.into(),
        caption: row.caption,
        photo: row.photo,
        timestamp: row.timestamp,
    }
}

impl Backend for Database {
    fn get_conversation(&self, viewer: &UserId, partner: &UserId) -> BackendResult<Conversation> {
        let sent = self.get_messages_between(viewer.as_str(), partner.as_str())?;
        let received = self.get_messages_between(partner.as_str(), viewer.as_str())?;
        Ok(Conversation::new(
            sent.into_iter().map(message_from_row).collect(),
            received.into_iter().map(message_from_row).collect(),
        ))
    }

    fn send_message(
        &self,
        sender: &UserId,
        recipient: &UserId,
        content: &str,
        image: Option<&str>,
        timestamp: i64,
    ) -> BackendResult<()> {
        let id = self.insert_message(sender.as_str(), recipient.as_str(), content, image, timestamp)?;
        debug!("Stored message {} from {} to {}", id, sender, recipient);
        Ok(())
    }

    fn mark_as_read(&self, viewer: &UserId, partner: &UserId) -> BackendResult<()> {
        let changed = self.mark_messages_read(partner.as_str(), viewer.as_str())?;
        debug!("Marked {} messages read for {} from {}", changed, viewer, partner);
        Ok(())
    }

    fn get_user_matches(&self, user: &UserId) -> BackendResult<Vec<MatchDecision>> {
        let rows = self.get_decisions(user.as_str())?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match Decision::parse(&row.decision) {
                Some(decision) => Some(MatchDecision {
                    id: row.target_id.into(),
                    decision,
                }),
                None => {
                    warn!("Skipping corrupt decision '{}' on target '{}'", row.decision, row.target_id);
                    None
                }
            })
            .collect())
    }

    fn get_user_profile(&self, user: &UserId) -> BackendResult<Option<Profile>> {
        Ok(self.get_profile(user.as_str())?.map(profile_from_row))
    }

    fn add_match_decision(&self, viewer: &UserId, decision: &MatchDecision) -> BackendResult<()> {
        if &decision.id == viewer {
            return Err(BackendError::Invalid("cannot decide on your own profile".into()));
        }
        self.upsert_decision(viewer.as_str(), decision.id.as_str(), decision.decision.as_str())?;
        Ok(())
    }

    fn get_profiles(&self) -> BackendResult<Vec<Profile>> {
        Ok(self.list_profiles()?.into_iter().map(profile_from_row).collect())
    }

    fn save_profile(&self, profile: &Profile) -> BackendResult<()> {
        let interests = serde_json::to_string(&profile.interests).map_err(anyhow::Error::from)?;
        self.upsert_profile(&ProfileRow {
            id: profile.id.to_string(),
            display_name: profile.display_name.clone(),
            age: i64::from(profile.age),
            bio: profile.bio.clone(),
            interests,
        })?;
        Ok(())
    }

    fn create_photo_post(
        &self,
        owner: &UserId,
        photo: &str,
        caption: &str,
        timestamp: i64,
    ) -> BackendResult<i64> {
        Ok(self.insert_post(owner.as_str(), photo, caption, timestamp)?)
    }

    fn get_feed(&self, users: &[UserId], limit: usize) -> BackendResult<Vec<PhotoPost>> {
        let owners: Vec<String> = users.iter().map(|u| u.to_string()).collect();
        let limit = u32::try_from(limit).unwrap_or(u32::MAX);
        Ok(self
            .get_posts_by_owners(&owners, limit)?
            .into_iter()
            .map(post_from_row)
            .collect())
    }

    fn get_user_posts(&self, user: &UserId) -> BackendResult<Vec<PhotoPost>> {
        Ok(self
            .get_posts_by_owner(user.as_str())?
            .into_iter()
            .map(post_from_row)
            .collect())
    }
}

impl SettingsStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get_preference(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Ok(self.set_preference(key, value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amora_core::conversation::{MarkRead, derive_mutual_matches, mark_conversation_read};
    use amora_core::theme::{ThemeResolver, default_settings};
    use amora_types::theme::FontSize;

    fn seed_profile(db: &Database, id: &str, interests: &[&str]) {
        db.save_profile(&Profile {
            id: id.into(),
            display_name: id.to_uppercase(),
            age: 29,
            bio: "hi".into(),
            interests: interests.iter().map(|s| s.to_string()).collect(),
        })
        .unwrap();
    }

    #[test]
    fn conversation_roundtrip_through_sqlite() {
        let db = Database::open_in_memory().unwrap();
        let (me, you) = (UserId::from("me"), UserId::from("you"));
        db.send_message(&me, &you, "hello", None, 100).unwrap();
        db.send_message(&you, &me, "hey", Some("data:image/png;base64,AA=="), 100).unwrap();
        db.send_message(&you, &me, "earlier?", None, 50).unwrap();

        let conv = db.get_conversation(&me, &you).unwrap();
        assert_eq!(conv.sent.len(), 1);
        assert_eq!(conv.received.len(), 2);
        assert_eq!(conv.unread_count, 2);

        let timeline = conv.timeline();
        let contents: Vec<_> = timeline.iter().map(|e| e.message.content.as_str()).collect();
        assert_eq!(contents, vec!["earlier?", "hello", "hey"]);
        assert_eq!(timeline[2].message.image.as_deref(), Some("data:image/png;base64,AA=="));

        assert_eq!(mark_conversation_read(&db, &me, &you, &conv).unwrap(), MarkRead::Cleared);
        let after = db.get_conversation(&me, &you).unwrap();
        assert_eq!(after.unread_count, 0);
        // The partner's view of their own sent messages is unchanged.
        assert_eq!(db.get_conversation(&you, &me).unwrap().unread_count, 1);
    }

    #[test]
    fn matches_and_profiles() {
        let db = Database::open_in_memory().unwrap();
        seed_profile(&db, "ann", &["hiking", "jazz"]);
        seed_profile(&db, "ben", &[]);
        let me = UserId::from("me");

        db.add_match_decision(&me, &MatchDecision { id: "ann".into(), decision: Decision::Like })
            .unwrap();
        db.add_match_decision(&me, &MatchDecision { id: "ben".into(), decision: Decision::Pass })
            .unwrap();
        assert!(matches!(
            db.add_match_decision(&me, &MatchDecision { id: "me".into(), decision: Decision::Like }),
            Err(BackendError::Invalid(_))
        ));

        let liked = derive_mutual_matches(&db.get_user_matches(&me).unwrap());
        assert_eq!(liked.into_iter().collect::<Vec<_>>(), vec![UserId::from("ann")]);

        let ann = db.get_user_profile(&"ann".into()).unwrap().unwrap();
        assert_eq!(ann.interests, vec!["hiking", "jazz"]);
        assert!(db.get_user_profile(&"nobody".into()).unwrap().is_none());
        assert_eq!(db.get_profiles().unwrap().len(), 2);
    }

    #[test]
    fn theme_settings_persist_in_preferences() {
        let db = Database::open_in_memory().unwrap();
        {
            let mut resolver = ThemeResolver::load(&db, Some("me"));
            resolver.select_preset("sunset-glow").unwrap();
            resolver.set_font_size(FontSize::Small).unwrap();
        }

        let reloaded = ThemeResolver::load(&db, Some("me"));
        assert_eq!(reloaded.settings().theme.id, "sunset-glow");
        assert_eq!(reloaded.settings().font_size, FontSize::Small);
        assert_eq!(ThemeResolver::load(&db, None).settings(), &default_settings());
    }
}
