/// Row types as read from SQLite, before conversion to domain models.
/// Distinct from amora-types models to keep the DB layer independent.

pub struct ProfileRow {
    pub id: String,
    pub display_name: String,
    pub age: i64,
    pub bio: String,
    /// JSON array of strings.
    pub interests: String,
}

pub struct MessageRow {
    pub id: i64,
    pub sender_id: String,
    pub recipient_id: String,
    pub content: String,
    pub image: Option<String>,
    pub timestamp: i64,
    pub read: bool,
}

pub struct DecisionRow {
    pub target_id: String,
    pub decision: String,
}

pub struct PhotoPostRow {
    pub id: i64,
    pub owner_id: String,
    pub caption: String,
    pub photo: String,
    pub timestamp: i64,
}
