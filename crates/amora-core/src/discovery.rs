//! Browsing, feed ordering and profile validation.

use std::cmp::Reverse;
use std::collections::HashSet;

use amora_types::models::{MatchDecision, PhotoPost, Profile, UserId};

pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 120;
pub const MAX_BIO_CHARS: usize = 500;
pub const EMPTY_BIO: &str = "No bio yet";
pub const MAX_CAPTION_CHARS: usize = 500;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("display name is required")]
    MissingName,
    #[error("age out of range: {0}")]
    AgeOutOfRange(u32),
    #[error("bio too long: {0} characters")]
    BioTooLong(usize),
    #[error("caption too long: {0} characters")]
    CaptionTooLong(usize),
}

/// Profiles still to be swiped: everyone except the viewer and anyone the
/// viewer already liked or passed. Input order is kept.
pub fn browse_queue(profiles: &[Profile], viewer: &UserId, decisions: &[MatchDecision]) -> Vec<Profile> {
    let decided: HashSet<&UserId> = decisions.iter().map(|d| &d.id).collect();
    profiles
        .iter()
        .filter(|p| &p.id != viewer && !decided.contains(&p.id))
        .cloned()
        .collect()
}

/// Newest post first.
pub fn order_feed(mut posts: Vec<PhotoPost>) -> Vec<PhotoPost> {
    posts.sort_by_key(|p| Reverse(p.timestamp));
    posts
}

/// Normalize and validate a profile edit.
pub fn validate_profile(
    id: UserId,
    display_name: &str,
    age: u32,
    bio: &str,
    interests: &[String],
) -> Result<Profile, ValidationError> {
    let display_name = display_name.trim();
    if display_name.is_empty() {
        return Err(ValidationError::MissingName);
    }
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(ValidationError::AgeOutOfRange(age));
    }

    let bio = bio.trim();
    let bio_len = bio.chars().count();
    if bio_len > MAX_BIO_CHARS {
        return Err(ValidationError::BioTooLong(bio_len));
    }

    let mut seen = HashSet::new();
    let interests = interests
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty() && seen.insert(i.to_string()))
        .map(str::to_string)
        .collect();

    Ok(Profile {
        id,
        display_name: display_name.to_string(),
        age,
        bio: if bio.is_empty() { EMPTY_BIO.to_string() } else { bio.to_string() },
        interests,
    })
}

/// Trim a post caption and enforce its length limit. Captions are optional.
pub fn validate_caption(caption: &str) -> Result<String, ValidationError> {
    let caption = caption.trim();
    let len = caption.chars().count();
    if len > MAX_CAPTION_CHARS {
        return Err(ValidationError::CaptionTooLong(len));
    }
    Ok(caption.to_string())
}
