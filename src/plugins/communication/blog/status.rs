use crate::plugins::communication::blog::models::BlogStatus;

pub const CLOSED_BELOW: i64 = -2;
pub const FAMOUS_MIN_VOTES: i64 = 3;
pub const FAMOUS_MIN_COMMENTS: usize = 3;
pub const ACTIVE_MIN_VOTES: i64 = 2;
pub const ACTIVE_MIN_COMMENTS: usize = 2;

/// Derives a blog's lifecycle status from its net score and comment count.
/// Rules are checked in priority order; the first match wins.
pub fn derive_status(vote_count: i64, comment_count: usize) -> BlogStatus {
    if vote_count < CLOSED_BELOW {
        BlogStatus::Closed
    } else if vote_count >= FAMOUS_MIN_VOTES && comment_count >= FAMOUS_MIN_COMMENTS {
        BlogStatus::Famous
    } else if vote_count >= ACTIVE_MIN_VOTES && comment_count >= ACTIVE_MIN_COMMENTS {
        BlogStatus::Active
    } else {
        BlogStatus::Published
    }
}
