// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! A "thing" in the Reddit sense.
//!
//! Historically in the Reddit API and its old source code, a "Thing" was
//! any element of the Reddit system: users, posts, comments, etc. Every
//! thing in a JSON response is wrapped in an object with a `kind` (such as
//! `t1` for comments and `t3` for submissions) and a `data` payload. This
//! module parses those responses into submissions and comment trees.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// The name Reddit puts in the author field of deleted accounts.
const DELETED: &str = "[deleted]";

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", content = "data")]
enum Thing {
    #[serde(rename = "Listing")]
    Listing(ListingData),

    #[serde(rename = "t1")]
    Comment(CommentData),

    #[serde(rename = "t3")]
    Link(LinkData),

    #[serde(rename = "more")]
    More(MoreData),
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    after: Option<String>,
    children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct CommentData {
    id: String,
    name: String,
    parent_id: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default, deserialize_with = "replies")]
    replies: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct LinkData {
    id: String,
    name: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    num_comments: u64,
}

#[derive(Debug, Deserialize)]
struct MoreData {
    id: String,
    name: String,
    parent_id: String,
    #[serde(default)]
    count: u64,
    #[serde(default)]
    children: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MoreChildrenResponse {
    json: MoreChildrenJson,
}

#[derive(Debug, Deserialize)]
struct MoreChildrenJson {
    #[serde(default)]
    errors: Vec<serde_json::Value>,
    #[serde(default)]
    data: Option<MoreChildrenData>,
}

#[derive(Debug, Deserialize)]
struct MoreChildrenData {
    things: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct Account {
    name: String,
}

// Reddit sends an empty string instead of a listing when a comment has no
// replies.
fn replies<'de, D>(deserializer: D) -> Result<Vec<Thing>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Replies {
        Listing(Box<Thing>),
        Empty(String),
    }

    match Option::<Replies>::deserialize(deserializer)? {
        Some(Replies::Listing(thing)) => match *thing {
            Thing::Listing(listing) => Ok(listing.children),
            other => Err(serde::de::Error::custom(format!(
                "expected a listing of replies, found {other:?}"
            ))),
        },
        Some(Replies::Empty(s)) if s.is_empty() => Ok(vec![]),
        Some(Replies::Empty(s)) => Err(serde::de::Error::custom(format!(
            "expected a listing of replies or an empty string, found {s:?}"
        ))),
        None => Ok(vec![]),
    }
}

fn present_author(author: Option<String>) -> Option<String> {
    author.filter(|name| !name.is_empty() && name != DELETED)
}

/// A page of a listing, along with the cursor for the next page.
#[derive(Debug)]
pub struct Page<T> {
    items: Vec<T>,
    after: Option<String>,
}

impl<T> Page<T> {
    /// Items on this page.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Cursor to pass as `after` to retrieve the next page, if there is one.
    pub fn after(&self) -> Option<&str> {
        self.after.as_deref()
    }

    /// Splits the page into its items and the cursor for the next page.
    pub fn into_parts(self) -> (Vec<T>, Option<String>) {
        (self.items, self.after)
    }
}

/// A Reddit post.
#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    id: String,
    fullname: String,
    title: String,
    author: Option<String>,
    num_comments: u64,
}

impl Submission {
    /// Parses a page of a submission listing, such as the result of a call
    /// to `/r/<subreddit>/top`.
    ///
    /// Things other than submissions in the listing are ignored.
    pub fn parse_listing(data: &str) -> Result<Page<Self>, Error> {
        let listing = match serde_json::from_str(data)? {
            Thing::Listing(listing) => listing,
            other => return Err(Error::unexpected("a listing", &other)),
        };

        let items = listing
            .children
            .into_iter()
            .filter_map(|thing| match thing {
                Thing::Link(link) => Some(Submission::from(link)),
                _ => None,
            })
            .collect();
        let after = listing.after.filter(|after| !after.is_empty());
        Ok(Page { items, after })
    }

    /// The submission's ID, without the `t3_` prefix.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The submission's fullname, such as `t3_1abcde`.
    pub fn fullname(&self) -> &str {
        &self.fullname
    }

    /// The submission's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The username of the submitter, if the account still exists.
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Number of comments Reddit reports for the submission.
    pub fn num_comments(&self) -> u64 {
        self.num_comments
    }
}

impl From<LinkData> for Submission {
    fn from(link: LinkData) -> Self {
        Self {
            id: link.id,
            fullname: link.name,
            title: link.title,
            author: present_author(link.author),
            num_comments: link.num_comments,
        }
    }
}

/// A node in a comment tree.
///
/// A node is either a real comment or a placeholder standing in for
/// replies that have not been loaded yet.
#[derive(Clone, Debug, PartialEq)]
pub enum CommentNode {
    /// A comment.
    Comment(Comment),

    /// A "load more comments" placeholder.
    More(MoreComments),
}

impl CommentNode {
    /// Parses the comment tree from the result of a call to `/comments/<id>`.
    ///
    /// Reddit responds with an array of two listings: the first holds the
    /// submission itself, and the second holds the top-level comments.
    pub fn parse_thread(data: &str) -> Result<Vec<Self>, Error> {
        let mut listings: Vec<Thing> = serde_json::from_str(data)?;
        if listings.len() != 2 {
            return Err(Error::Unexpected(format!(
                "expected a submission and its comments, found {} listings",
                listings.len()
            )));
        }
        match listings.remove(1) {
            Thing::Listing(listing) => Ok(Self::from_things(listing.children)),
            other => Err(Error::unexpected("a listing of comments", &other)),
        }
    }

    /// Parses the result of a call to `/api/morechildren`.
    ///
    /// The comments come back as a flat list; each one has to be placed
    /// into the tree according to its [`CommentNode::parent_id()`].
    pub fn parse_more_children(data: &str) -> Result<Vec<Self>, Error> {
        let response: MoreChildrenResponse = serde_json::from_str(data)?;
        if !response.json.errors.is_empty() {
            let errors = response
                .json
                .errors
                .iter()
                .map(|err| err.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(Error::Api(errors));
        }
        let things = response.json.data.map(|data| data.things).unwrap_or_default();
        Ok(Self::from_things(things))
    }

    fn from_things(things: Vec<Thing>) -> Vec<Self> {
        things.into_iter().filter_map(CommentNode::from_thing).collect()
    }

    fn from_thing(thing: Thing) -> Option<Self> {
        match thing {
            Thing::Comment(data) => Some(CommentNode::Comment(Comment {
                id: data.id,
                fullname: data.name,
                parent_id: data.parent_id,
                author: present_author(data.author),
                replies: Self::from_things(data.replies),
            })),
            Thing::More(data) => Some(CommentNode::More(MoreComments {
                id: data.id,
                fullname: data.name,
                parent_id: data.parent_id,
                count: data.count,
                children: data.children,
            })),
            Thing::Listing(_) | Thing::Link(_) => None,
        }
    }

    /// The author of this node, if it is a real comment whose author's
    /// account still exists.
    ///
    /// Placeholders never have an author.
    pub fn author(&self) -> Option<&str> {
        match self {
            CommentNode::Comment(comment) => comment.author(),
            CommentNode::More(_) => None,
        }
    }

    /// The node's fullname.
    pub fn fullname(&self) -> &str {
        match self {
            CommentNode::Comment(comment) => comment.fullname(),
            CommentNode::More(more) => more.fullname(),
        }
    }

    /// Fullname of the comment or submission this node is a reply to.
    pub fn parent_id(&self) -> &str {
        match self {
            CommentNode::Comment(comment) => comment.parent_id(),
            CommentNode::More(more) => more.parent_id(),
        }
    }

    /// True if this node is a placeholder for unloaded replies.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, CommentNode::More(_))
    }
}

/// A Reddit comment.
#[derive(Clone, Debug, PartialEq)]
pub struct Comment {
    id: String,
    fullname: String,
    parent_id: String,
    author: Option<String>,
    replies: Vec<CommentNode>,
}

impl Comment {
    /// The comment's ID, without the `t1_` prefix.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The comment's fullname, such as `t1_abcdef`.
    pub fn fullname(&self) -> &str {
        &self.fullname
    }

    /// Fullname of the comment or submission this comment replies to.
    pub fn parent_id(&self) -> &str {
        &self.parent_id
    }

    /// The username of the commenter, if the account still exists.
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Direct replies to this comment.
    pub fn replies(&self) -> &[CommentNode] {
        &self.replies
    }

    pub(crate) fn replies_mut(&mut self) -> &mut Vec<CommentNode> {
        &mut self.replies
    }
}

/// A placeholder for replies that were left out of a response.
///
/// Reddit uses the same kind of placeholder for two different things.
/// Usually it carries the IDs of the missing comments, which can be loaded
/// with `/api/morechildren`. When a thread is nested too deeply to be
/// returned at all, the placeholder has no IDs ("continue this thread") and
/// the replies have to be loaded by fetching the thread again, rooted at
/// the parent comment.
#[derive(Clone, Debug, PartialEq)]
pub struct MoreComments {
    id: String,
    fullname: String,
    parent_id: String,
    count: u64,
    children: Vec<String>,
}

impl MoreComments {
    /// The placeholder's ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The placeholder's fullname.
    pub fn fullname(&self) -> &str {
        &self.fullname
    }

    /// Fullname of the comment or submission the missing replies belong to.
    pub fn parent_id(&self) -> &str {
        &self.parent_id
    }

    /// Number of comments Reddit says are hidden behind this placeholder.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// IDs of the missing comments.
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// True if this is a "continue this thread" placeholder.
    pub fn is_continue_thread(&self) -> bool {
        self.children.is_empty()
    }

    /// Removes and returns up to `n` of the missing comment IDs.
    ///
    /// The count is reduced accordingly, so a placeholder that still has
    /// IDs left can go back into the queue of placeholders to resolve.
    pub fn take_batch(&mut self, n: usize) -> Vec<String> {
        let n = n.min(self.children.len());
        let batch: Vec<String> = self.children.drain(..n).collect();
        self.count = self.count.saturating_sub(batch.len() as u64);
        batch
    }
}

/// Returns the name of the account a call to `/api/v1/me` belongs to.
pub fn parse_account_name(data: &str) -> Result<String, Error> {
    let account: Account = serde_json::from_str(data)?;
    Ok(account.name)
}

/// An error parsing a response from the Reddit API.
#[derive(Debug, Error)]
pub enum Error {
    /// The response was not valid JSON or did not have the expected fields.
    #[error("Could not parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The response was valid JSON with an unexpected structure.
    #[error("Unexpected response: {0}")]
    Unexpected(String),

    /// Reddit returned errors in an otherwise successful response.
    #[error("Reddit API error: {0}")]
    Api(String),
}

impl Error {
    fn unexpected(expected: &str, found: &Thing) -> Self {
        let found = match found {
            Thing::Listing(_) => "a listing",
            Thing::Comment(_) => "a comment",
            Thing::Link(_) => "a submission",
            Thing::More(_) => "a placeholder",
        };
        Error::Unexpected(format!("expected {expected}, found {found}"))
    }
}

#[cfg(test)]
pub(crate) mod test_builders {
    use super::*;

    pub fn comment(id: &str, parent_id: &str, author: Option<&str>) -> Comment {
        Comment {
            id: id.to_string(),
            fullname: format!("t1_{id}"),
            parent_id: parent_id.to_string(),
            author: author.map(String::from),
            replies: vec![],
        }
    }

    pub fn reply(parent: Comment, child: CommentNode) -> Comment {
        let mut replies = parent.replies;
        replies.push(child);
        Comment { replies, ..parent }
    }

    pub fn more(id: &str, parent_id: &str, children: &[&str]) -> MoreComments {
        MoreComments {
            id: id.to_string(),
            fullname: format!("t1_{id}"),
            parent_id: parent_id.to_string(),
            count: children.len() as u64,
            children: children.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn submission(id: &str, author: Option<&str>) -> Submission {
        Submission {
            id: id.to_string(),
            fullname: format!("t3_{id}"),
            title: format!("Submission {id}"),
            author: author.map(String::from),
            num_comments: 0,
        }
    }
}
