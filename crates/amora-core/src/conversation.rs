use std::cmp::Reverse;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use amora_types::models::{Decision, Direction, MatchDecision, Message, UserId};

use crate::backend::{Backend, BackendResult};

/// A message placed in the merged timeline, tagged with its direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub direction: Direction,
    pub message: Message,
}

/// Both halves of a conversation between the viewer and one partner, as
/// returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// viewer -> partner
    pub sent: Vec<Message>,
    /// partner -> viewer
    pub received: Vec<Message>,
    pub unread_count: u64,
}

impl Conversation {
    /// Builds a conversation and counts unread received messages.
    pub fn new(sent: Vec<Message>, received: Vec<Message>) -> Self {
        let unread_count = count_unread(&received);
        Self {
            sent,
            received,
            unread_count,
        }
    }

    pub fn timeline(&self) -> Vec<TimelineEntry> {
        merge_timeline(&self.sent, &self.received)
    }

    /// The most recent message in either direction.
    pub fn last_message(&self) -> Option<TimelineEntry> {
        self.timeline().pop()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty() && self.received.is_empty()
    }

    pub fn has_unread(&self) -> bool {
        self.unread_count > 0
    }
}

pub fn count_unread(received: &[Message]) -> u64 {
    received.iter().filter(|m| !m.read).count() as u64
}

/// Merge sent and received messages into one chronological timeline.
///
/// Sent messages are concatenated before received ones and then stably sorted
/// by timestamp, so at equal timestamps outbound entries always come first.
pub fn merge_timeline(sent: &[Message], received: &[Message]) -> Vec<TimelineEntry> {
    let mut timeline: Vec<TimelineEntry> = sent
        .iter()
        .map(|m| TimelineEntry {
            direction: Direction::Outbound,
            message: m.clone(),
        })
        .chain(received.iter().map(|m| TimelineEntry {
            direction: Direction::Inbound,
            message: m.clone(),
        }))
        .collect();

    // sort_by_key is stable
    timeline.sort_by_key(|entry| entry.message.timestamp);
    timeline
}

/// Ids of every user the viewer has liked.
///
/// This is one-sided: the backend does not expose the other user's decision,
/// so a "mutual match" here only means the viewer said like.
pub fn derive_mutual_matches(decisions: &[MatchDecision]) -> BTreeSet<UserId> {
    decisions
        .iter()
        .filter(|d| d.decision == Decision::Like)
        .map(|d| d.id.clone())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkRead {
    /// A mark-as-read request was sent to the backend.
    Cleared,
    /// Nothing was unread, no request was made.
    AlreadyRead,
}

/// Clear the whole conversation's unread state in one request.
///
/// Only talks to the backend when `conversation` has unread messages.
pub fn mark_conversation_read<B: Backend + ?Sized>(
    backend: &B,
    viewer: &UserId,
    partner: &UserId,
    conversation: &Conversation,
) -> BackendResult<MarkRead> {
    if !conversation.has_unread() {
        return Ok(MarkRead::AlreadyRead);
    }

    backend.mark_as_read(viewer, partner)?;
    debug!(
        "Marked {} messages from {} as read for {}",
        conversation.unread_count, partner, viewer
    );
    Ok(MarkRead::Cleared)
}

/// One row of the conversation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub partner: UserId,
    pub last_message: Option<TimelineEntry>,
    pub unread_count: u64,
}

impl ConversationSummary {
    pub fn from_conversation(partner: UserId, conversation: &Conversation) -> Self {
        Self {
            partner,
            last_message: conversation.last_message(),
            unread_count: conversation.unread_count,
        }
    }

    fn last_activity(&self) -> Option<i64> {
        self.last_message.as_ref().map(|e| e.message.timestamp)
    }
}

/// Most recent activity first; partners without messages keep their
/// relative order at the end.
pub fn sort_summaries(summaries: &mut [ConversationSummary]) {
    summaries.sort_by_key(|s| match s.last_activity() {
        Some(ts) => (false, Reverse(ts)),
        None => (true, Reverse(i64::MIN)),
    });
}
