use serde::{Deserialize, Serialize};

use crate::plugins::communication::blog::models::VoteType;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    /// Assigned by the store on first save.
    pub id: Option<i64>,
    pub user_id: i64,
    pub blog_id: i64,
    pub vote_type: VoteType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteCounts {
    pub vote_count: i64,
    pub upvote_count: i64,
    pub downvote_count: i64,
}

/// What `VoteLedger::record_vote` did to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerChange {
    Unchanged,
    Replaced { previous: VoteType },
    Added,
}

impl LedgerChange {
    pub fn changed(&self) -> bool {
        !matches!(self, LedgerChange::Unchanged)
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            LedgerChange::Unchanged => "unchanged",
            LedgerChange::Replaced { .. } => "replaced",
            LedgerChange::Added => "added",
        }
    }
}

/// One vote per user for a single blog.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct VoteLedger {
    votes: Vec<Vote>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from persisted rows. Later rows for an already seen user win,
    /// so a ledger never holds two entries for the same voter.
    pub fn from_votes(votes: Vec<Vote>) -> Self {
        let mut ledger = Self::new();
        for v in votes {
            match ledger.votes.iter_mut().find(|e| e.user_id == v.user_id) {
                Some(existing) => *existing = v,
                None => ledger.votes.push(v),
            }
        }
        ledger
    }

    pub fn record_vote(&mut self, blog_id: i64, user_id: i64, vote_type: VoteType) -> LedgerChange {
        if let Some(existing) = self.votes.iter_mut().find(|v| v.user_id == user_id) {
            if existing.vote_type == vote_type {
                return LedgerChange::Unchanged;
            }
            let previous = existing.vote_type;
            existing.vote_type = vote_type;
            return LedgerChange::Replaced { previous };
        }

        self.votes.push(Vote { id: None, user_id, blog_id, vote_type });
        LedgerChange::Added
    }

    pub fn counts(&self) -> VoteCounts {
        let upvote_count = self.votes.iter().filter(|v| v.vote_type == VoteType::Upvote).count() as i64;
        let downvote_count = self.votes.iter().filter(|v| v.vote_type == VoteType::Downvote).count() as i64;
        VoteCounts {
            vote_count: upvote_count - downvote_count,
            upvote_count,
            downvote_count,
        }
    }

    pub fn vote_of(&self, user_id: i64) -> Option<&Vote> {
        self.votes.iter().find(|v| v.user_id == user_id)
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn votes_mut(&mut self) -> &mut [Vote] {
        &mut self.votes
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}
