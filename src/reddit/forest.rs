// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Comment trees.

use crate::reddit::thing::{Comment, CommentNode, MoreComments};

/// All of the comments on a single submission.
#[derive(Clone, Debug, PartialEq)]
pub struct CommentForest {
    link_id: String,
    nodes: Vec<CommentNode>,
}

impl CommentForest {
    /// Creates a new forest for the submission whose fullname is `link_id`,
    /// with `nodes` as its top-level comments.
    pub fn new(link_id: impl Into<String>, nodes: Vec<CommentNode>) -> Self {
        let link_id = link_id.into();
        Self { link_id, nodes }
    }

    /// Fullname of the submission the comments belong to.
    pub fn link_id(&self) -> &str {
        &self.link_id
    }

    /// Top-level nodes.
    pub fn nodes(&self) -> &[CommentNode] {
        &self.nodes
    }

    /// Iterates over every node in the forest, depth first, with each
    /// comment visited before its replies.
    ///
    /// Placeholders are included.
    pub fn iter(&self) -> Flatten<'_> {
        Flatten::new(&self.nodes)
    }

    /// Number of placeholders anywhere in the forest.
    pub fn placeholders(&self) -> usize {
        self.iter().filter(|node| node.is_placeholder()).count()
    }

    pub(crate) fn into_nodes(self) -> Vec<CommentNode> {
        self.nodes
    }

    /// Removes every placeholder from the forest and returns them.
    pub(crate) fn take_placeholders(&mut self) -> Vec<MoreComments> {
        let mut placeholders = vec![];
        drain_placeholders(&mut self.nodes, &mut placeholders);
        placeholders
    }

    /// Removes and returns the replies of the comment named `fullname`.
    pub(crate) fn take_replies(&mut self, fullname: &str) -> Vec<CommentNode> {
        find_mut(&mut self.nodes, fullname)
            .map(|comment| std::mem::take(comment.replies_mut()))
            .unwrap_or_default()
    }

    /// Places each node under its parent.
    ///
    /// Nodes may arrive in any order, so a node whose parent is not in the
    /// forest yet is retried once more nodes have been placed. Nodes whose
    /// parent never shows up become top-level nodes.
    pub(crate) fn insert(&mut self, nodes: impl IntoIterator<Item = CommentNode>) {
        let mut pending: Vec<CommentNode> = nodes.into_iter().collect();

        while !pending.is_empty() {
            let before = pending.len();
            let mut orphans = vec![];

            for node in pending {
                if let Err(node) = self.attach(node) {
                    orphans.push(node);
                }
            }

            if orphans.len() == before {
                self.nodes.append(&mut orphans);
            }
            pending = orphans;
        }
    }

    fn attach(&mut self, node: CommentNode) -> Result<(), CommentNode> {
        if node.parent_id() == self.link_id {
            self.nodes.push(node);
            return Ok(());
        }
        match find_mut(&mut self.nodes, node.parent_id()) {
            Some(parent) => {
                parent.replies_mut().push(node);
                Ok(())
            }
            None => Err(node),
        }
    }
}

fn drain_placeholders(nodes: &mut Vec<CommentNode>, placeholders: &mut Vec<MoreComments>) {
    let mut kept = Vec::with_capacity(nodes.len());
    for node in nodes.drain(..) {
        match node {
            CommentNode::More(more) => placeholders.push(more),
            CommentNode::Comment(mut comment) => {
                drain_placeholders(comment.replies_mut(), placeholders);
                kept.push(CommentNode::Comment(comment));
            }
        }
    }
    *nodes = kept;
}

fn find_mut<'a>(nodes: &'a mut [CommentNode], fullname: &str) -> Option<&'a mut Comment> {
    for node in nodes.iter_mut() {
        if let CommentNode::Comment(comment) = node {
            if comment.fullname() == fullname {
                return Some(comment);
            }
            if let Some(found) = find_mut(comment.replies_mut(), fullname) {
                return Some(found);
            }
        }
    }
    None
}

impl<'a> IntoIterator for &'a CommentForest {
    type Item = &'a CommentNode;
    type IntoIter = Flatten<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Depth-first iterator over a [`CommentForest`].
#[derive(Debug)]
pub struct Flatten<'a> {
    stack: Vec<&'a CommentNode>,
}

impl<'a> Flatten<'a> {
    fn new(nodes: &'a [CommentNode]) -> Self {
        let stack = nodes.iter().rev().collect();
        Self { stack }
    }
}

impl<'a> Iterator for Flatten<'a> {
    type Item = &'a CommentNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let CommentNode::Comment(comment) = node {
            self.stack.extend(comment.replies().iter().rev());
        }
        Some(node)
    }
}
