use crate::models::{DecisionRow, MessageRow, PhotoPostRow, ProfileRow};
use crate::Database;
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Profiles --

    pub fn upsert_profile(&self, row: &ProfileRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO profiles (id, display_name, age, bio, interests) VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                    display_name = excluded.display_name,
                    age = excluded.age,
                    bio = excluded.bio,
                    interests = excluded.interests",
                rusqlite::params![row.id, row.display_name, row.age, row.bio, row.interests],
            )?;
            Ok(())
        })
    }

    pub fn get_profile(&self, id: &str) -> Result<Option<ProfileRow>> {
        self.with_conn(|conn| query_profile(conn, id))
    }

    pub fn list_profiles(&self) -> Result<Vec<ProfileRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, display_name, age, bio, interests FROM profiles ORDER BY created_at, id",
            )?;
            let rows = stmt
                .query_map([], map_profile)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Match decisions --

    /// Insert or replace the viewer's decision on a target.
    pub fn upsert_decision(&self, viewer_id: &str, target_id: &str, decision: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO match_decisions (viewer_id, target_id, decision) VALUES (?1, ?2, ?3)
                 ON CONFLICT(viewer_id, target_id) DO UPDATE SET decision = excluded.decision",
                (viewer_id, target_id, decision),
            )?;
            Ok(())
        })
    }

    pub fn get_decisions(&self, viewer_id: &str) -> Result<Vec<DecisionRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT target_id, decision FROM match_decisions WHERE viewer_id = ?1 ORDER BY created_at, target_id",
            )?;
            let rows = stmt
                .query_map([viewer_id], |row| {
                    Ok(DecisionRow {
                        target_id: row.get(0)?,
                        decision: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Messages --

    pub fn insert_message(
        &self,
        sender_id: &str,
        recipient_id: &str,
        content: &str,
        image: Option<&str>,
        timestamp: i64,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (sender_id, recipient_id, content, image, timestamp) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![sender_id, recipient_id, content, image, timestamp],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Messages from `sender_id` to `recipient_id` in insertion order.
    pub fn get_messages_between(&self, sender_id: &str, recipient_id: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| query_messages(conn, sender_id, recipient_id))
    }

    /// Returns the number of rows that changed.
    pub fn mark_messages_read(&self, sender_id: &str, recipient_id: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE messages SET read = 1 WHERE sender_id = ?1 AND recipient_id = ?2 AND read = 0",
                (sender_id, recipient_id),
            )?;
            Ok(changed)
        })
    }

    // -- Photo posts --

    pub fn insert_post(&self, owner_id: &str, photo: &str, caption: &str, timestamp: i64) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO photo_posts (owner_id, caption, photo, timestamp) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![owner_id, caption, photo, timestamp],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Newest posts by any of `owner_ids`.
    pub fn get_posts_by_owners(&self, owner_ids: &[String], limit: u32) -> Result<Vec<PhotoPostRow>> {
        if owner_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let placeholders: Vec<String> = (1..=owner_ids.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "SELECT id, owner_id, caption, photo, timestamp FROM photo_posts
                 WHERE owner_id IN ({})
                 ORDER BY timestamp DESC, id DESC
                 LIMIT {}",
                placeholders.join(", "),
                limit
            );

            let mut stmt = conn.prepare(&sql)?;
            let params: Vec<&dyn rusqlite::types::ToSql> = owner_ids
                .iter()
                .map(|id| id as &dyn rusqlite::types::ToSql)
                .collect();

            let rows = stmt
                .query_map(params.as_slice(), map_post)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn get_posts_by_owner(&self, owner_id: &str) -> Result<Vec<PhotoPostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, owner_id, caption, photo, timestamp FROM photo_posts
                 WHERE owner_id = ?1 ORDER BY timestamp DESC, id DESC",
            )?;
            let rows = stmt
                .query_map([owner_id], map_post)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Preferences --

    pub fn get_preference(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT value FROM preferences WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
        })
    }

    pub fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO preferences (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
                (key, value),
            )?;
            Ok(())
        })
    }
}

fn map_profile(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProfileRow> {
    Ok(ProfileRow {
        id: row.get(0)?,
        display_name: row.get(1)?,
        age: row.get(2)?,
        bio: row.get(3)?,
        interests: row.get(4)?,
    })
}

fn map_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<PhotoPostRow> {
    Ok(PhotoPostRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        caption: row.get(2)?,
        photo: row.get(3)?,
        timestamp: row.get(4)?,
    })
}

fn query_profile(conn: &Connection, id: &str) -> Result<Option<ProfileRow>> {
    let mut stmt =
        conn.prepare("SELECT id, display_name, age, bio, interests FROM profiles WHERE id = ?1")?;

    let row = stmt.query_row([id], map_profile).optional()?;

    Ok(row)
}

fn query_messages(conn: &Connection, sender_id: &str, recipient_id: &str) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, sender_id, recipient_id, content, image, timestamp, read
         FROM messages
         WHERE sender_id = ?1 AND recipient_id = ?2
         ORDER BY id",
    )?;

    let rows = stmt
        .query_map((sender_id, recipient_id), |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                sender_id: row.get(1)?,
                recipient_id: row.get(2)?,
                content: row.get(3)?,
                image: row.get(4)?,
                timestamp: row.get(5)?,
                read: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decisions_upsert() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_decision("me", "ann", "like").unwrap();
        db.upsert_decision("me", "ann", "pass").unwrap();
        db.upsert_decision("me", "ben", "like").unwrap();

        let rows = db.get_decisions("me").unwrap();
        assert_eq!(rows.len(), 2);
        let ann = rows.iter().find(|r| r.target_id == "ann").unwrap();
        assert_eq!(ann.decision, "pass");
    }

    #[test]
    fn invalid_decision_rejected_by_schema() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.upsert_decision("me", "ann", "maybe").is_err());
    }

    #[test]
    fn mark_read_only_touches_unread() {
        let db = Database::open_in_memory().unwrap();
        db.insert_message("you", "me", "one", None, 1).unwrap();
        db.insert_message("you", "me", "two", None, 2).unwrap();
        db.insert_message("me", "you", "reply", None, 3).unwrap();

        assert_eq!(db.mark_messages_read("you", "me").unwrap(), 2);
        assert_eq!(db.mark_messages_read("you", "me").unwrap(), 0);
        let mine = db.get_messages_between("me", "you").unwrap();
        assert!(!mine[0].read);
    }

    #[test]
    fn preferences_overwrite() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_preference("k").unwrap(), None);
        db.set_preference("k", "a").unwrap();
        db.set_preference("k", "b").unwrap();
        assert_eq!(db.get_preference("k").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn feed_query_filters_and_limits() {
        let db = Database::open_in_memory().unwrap();
        db.insert_post("ann", "p1", "first", 10).unwrap();
        db.insert_post("ben", "p2", "second", 20).unwrap();
        db.insert_post("cat", "p3", "third", 30).unwrap();
        db.insert_post("ann", "p4", "fourth", 40).unwrap();

        let owners = vec!["ann".to_string(), "ben".to_string()];
        let rows = db.get_posts_by_owners(&owners, 2).unwrap();
        let captions: Vec<_> = rows.iter().map(|r| r.caption.as_str()).collect();
        assert_eq!(captions, vec!["fourth", "second"]);
        assert!(db.get_posts_by_owners(&[], 10).unwrap().is_empty());
    }
}
