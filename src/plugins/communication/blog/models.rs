use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BlogError, BlogResult};
use crate::plugins::communication::blog::ledger::{LedgerChange, VoteLedger};
use crate::plugins::communication::blog::status::derive_status;
use crate::plugins::communication::comments::models::Comment;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    Draft,
    Published,
    Active,
    Famous,
    Closed,
}

impl BlogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogStatus::Draft => "draft",
            BlogStatus::Published => "published",
            BlogStatus::Active => "active",
            BlogStatus::Famous => "famous",
            BlogStatus::Closed => "closed",
        }
    }
}

impl FromStr for BlogStatus {
    type Err = BlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(BlogStatus::Draft),
            "published" => Ok(BlogStatus::Published),
            "active" => Ok(BlogStatus::Active),
            "famous" => Ok(BlogStatus::Famous),
            "closed" => Ok(BlogStatus::Closed),
            other => Err(BlogError::validation(format!("invalid blog status: {}", other))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl FromStr for Visibility {
    type Err = BlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            other => Err(BlogError::validation(format!("invalid visibility: {}", other))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlogTopic {
    Biking,
    Hiking,
    Camping,
    Backpacking,
    Roadtrip,
    Cruise,
    Citybreak,
    Beach,
    Food,
    Culture,
}

impl BlogTopic {
    pub const ALL: [BlogTopic; 10] = [
        BlogTopic::Biking,
        BlogTopic::Hiking,
        BlogTopic::Camping,
        BlogTopic::Backpacking,
        BlogTopic::Roadtrip,
        BlogTopic::Cruise,
        BlogTopic::Citybreak,
        BlogTopic::Beach,
        BlogTopic::Food,
        BlogTopic::Culture,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlogTopic::Biking => "biking",
            BlogTopic::Hiking => "hiking",
            BlogTopic::Camping => "camping",
            BlogTopic::Backpacking => "backpacking",
            BlogTopic::Roadtrip => "roadtrip",
            BlogTopic::Cruise => "cruise",
            BlogTopic::Citybreak => "citybreak",
            BlogTopic::Beach => "beach",
            BlogTopic::Food => "food",
            BlogTopic::Culture => "culture",
        }
    }
}

impl FromStr for BlogTopic {
    type Err = BlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlogTopic::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| BlogError::validation(format!("invalid blog topic: {}", s)))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteType {
    #[serde(rename = "UPVOTE")]
    Upvote,
    #[serde(rename = "DOWNVOTE")]
    Downvote,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Upvote => "UPVOTE",
            VoteType::Downvote => "DOWNVOTE",
        }
    }
}

impl FromStr for VoteType {
    type Err = BlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UPVOTE" => Ok(VoteType::Upvote),
            "DOWNVOTE" => Ok(VoteType::Downvote),
            other => Err(BlogError::validation(format!(
                "invalid vote type: {}, allowed values are 'DOWNVOTE' or 'UPVOTE'",
                other
            ))),
        }
    }
}

macro_rules! display_as_str {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(BlogStatus, Visibility, BlogTopic, VoteType);

/// Validated input for a blog that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub description: String,
    pub author_id: i64,
    pub topic: BlogTopic,
}

impl NewBlog {
    pub fn new(title: &str, description: &str, author_id: i64, topic: BlogTopic) -> BlogResult<Self> {
        if title.trim().is_empty() {
            return Err(BlogError::validation("title cannot be empty"));
        }
        let new = NewBlog {
            title: title.to_string(),
            description: description.to_string(),
            author_id,
            topic,
        };
        new.validate()?;
        Ok(new)
    }

    fn validate(&self) -> BlogResult<()> {
        validate_text_fields(&self.title, &self.description)?;
        if self.author_id < 0 {
            return Err(BlogError::validation("authorId can't be less than 0"));
        }
        Ok(())
    }
}

fn validate_text_fields(title: &str, description: &str) -> BlogResult<()> {
    if title.trim().is_empty() {
        return Err(BlogError::validation("title can't be empty"));
    }
    if description.trim().is_empty() {
        return Err(BlogError::validation("description can't be empty"));
    }
    Ok(())
}

/// The blog aggregate: a post together with its vote ledger and comments.
///
/// `status` and the three counters are derived from `votes` and `comments`;
/// nothing outside this type assigns them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub author_id: i64,
    pub status: BlogStatus,
    pub visibility: Visibility,
    pub topic: BlogTopic,
    pub vote_count: i64,
    pub upvote_count: i64,
    pub downvote_count: i64,
    pub comments: Vec<Comment>,
    pub votes: VoteLedger,
    pub version: i64,
}

impl Blog {
    /// A freshly created blog. Always published and public, regardless of the status table.
    pub fn from_new(id: i64, date: DateTime<Utc>, new: NewBlog) -> Self {
        Blog {
            id,
            title: new.title,
            description: new.description,
            date,
            author_id: new.author_id,
            status: BlogStatus::Published,
            visibility: Visibility::Public,
            topic: new.topic,
            vote_count: 0,
            upvote_count: 0,
            downvote_count: 0,
            comments: Vec::new(),
            votes: VoteLedger::new(),
            version: 1,
        }
    }

    pub fn validate(&self) -> BlogResult<()> {
        validate_text_fields(&self.title, &self.description)?;
        if self.author_id < 0 {
            return Err(BlogError::validation("authorId can't be less than 0"));
        }
        Ok(())
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Records `user_id`'s vote. Counts and status are recomputed only when the
    /// ledger actually changed.
    pub fn set_vote(&mut self, user_id: i64, vote_type: VoteType) -> BlogResult<LedgerChange> {
        if user_id <= 0 {
            return Err(BlogError::validation("user ID must be a positive integer"));
        }
        let change = self.votes.record_vote(self.id, user_id, vote_type);
        if change.changed() {
            self.refresh_counts();
            self.refresh_status();
        }
        Ok(change)
    }

    pub fn refresh_counts(&mut self) {
        let counts = self.votes.counts();
        self.vote_count = counts.vote_count;
        self.upvote_count = counts.upvote_count;
        self.downvote_count = counts.downvote_count;
    }

    /// Re-evaluates the status table; returns whether the status moved.
    pub fn refresh_status(&mut self) -> bool {
        self.refresh_status_with(self.comment_count())
    }

    /// Same as `refresh_status`, for a comment count the blog is about to have.
    pub fn refresh_status_with(&mut self, comment_count: usize) -> bool {
        let next = derive_status(self.vote_count, comment_count);
        let moved = next != self.status;
        self.status = next;
        moved
    }

    pub fn rename(&mut self, title: &str, description: &str) -> BlogResult<()> {
        validate_text_fields(title, description)?;
        self.title = title.to_string();
        self.description = description.to_string();
        Ok(())
    }

    /// One-way: there is no unblock.
    pub fn block(&mut self) {
        self.visibility = Visibility::Private;
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BlogCreate {
    pub title: String,
    pub description: String,
    pub author_id: i64,
    pub topic: String,
}

#[derive(Deserialize, Debug)]
pub struct BlogUpdate {
    pub title: String,
    pub description: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub user_id: i64,
    pub blog_id: i64,
    pub vote_type: String,
}

/// Filters accepted by blog listings. All present fields must match.
#[derive(Debug, Clone, Default)]
pub struct BlogFilter {
    pub author_id: Option<i64>,
    pub topic: Option<BlogTopic>,
    pub status: Option<BlogStatus>,
    pub visibility: Option<Visibility>,
}

impl BlogFilter {
    pub fn matches(&self, blog: &Blog) -> bool {
        self.author_id.map_or(true, |a| blog.author_id == a)
            && self.topic.map_or(true, |t| blog.topic == t)
            && self.status.map_or(true, |s| blog.status == s)
            && self.visibility.map_or(true, |v| blog.visibility == v)
    }
}
