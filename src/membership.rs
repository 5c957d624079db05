//! Membership struct definition
//!
//! The name → member map of one board. Owned by the board's event
//! loop and never shared.

use std::collections::HashMap;

use crate::member::Member;

/// Registered members of a board, keyed by name
#[derive(Debug, Default)]
pub struct Membership {
    members: HashMap<String, Member>,
}

impl Membership {
    /// Create an empty membership
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a member under its name
    ///
    /// Last writer wins: returns the member it displaced, if any.
    pub fn insert(&mut self, member: Member) -> Option<Member> {
        self.members.insert(member.name.clone(), member)
    }

    /// Remove a member by name
    ///
    /// Returns None if the name was not registered.
    pub fn remove(&mut self, name: &str) -> Option<Member> {
        self.members.remove(name)
    }

    /// Members a publish from `sender` goes to
    ///
    /// Everyone except `sender`, in map iteration order.
    pub fn recipients<'a>(&'a self, sender: &'a str) -> impl Iterator<Item = &'a Member> + 'a {
        self.members
            .iter()
            .filter(move |(name, _)| name.as_str() != sender)
            .map(|(_, member)| member)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.members.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the number of registered members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if nobody is registered
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
