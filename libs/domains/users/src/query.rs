//! Search and ordering for user lists.
//!
//! Search is a case-insensitive substring match over the displayed columns,
//! with two shortcuts for the verified column: a term containing "yes" also
//! matches verified users and one containing "no" matches unverified users.
//!
//! Names are ordered the way a person reading the list expects: accents and
//! case are ignored first, so "Émile" sorts next to "emile" rather than after
//! "zoe".

use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::models::User;

/// Direction of the name ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn is_ascending(self) -> bool {
        matches!(self, SortOrder::Ascending)
    }
}

/// Filter and ordering applied to a listed collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub search: Option<String>,
    pub order: SortOrder,
}

impl UserQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Keep the users matching the search term, then sort them by name
    pub fn apply(&self, users: Vec<User>) -> Vec<User> {
        let mut users: Vec<User> = match self.search.as_deref() {
            Some(term) if !term.is_empty() => users
                .into_iter()
                .filter(|user| matches_search(user, term))
                .collect(),
            _ => users,
        };
        sort_by_name(&mut users, self.order);
        users
    }
}

/// Whether `user` matches the free-text search `term`
pub fn matches_search(user: &User, term: &str) -> bool {
    let term = term.to_lowercase();

    user.name.to_lowercase().contains(&term)
        || user.company.to_string().to_lowercase().contains(&term)
        || user.role.to_string().to_lowercase().contains(&term)
        || (term.contains("yes") && user.verified)
        || (term.contains("no") && !user.verified)
        || user.status.to_string().to_lowercase().contains(&term)
}

/// Lowercase with diacritics removed
fn fold(name: &str) -> String {
    name.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Compare two names ignoring accents and case first, then accents, then case
pub fn compare_names(a: &str, b: &str) -> Ordering {
    fold(a)
        .cmp(&fold(b))
        .then_with(|| {
            let a_lower: String = a.to_lowercase().nfd().collect();
            let b_lower: String = b.to_lowercase().nfd().collect();
            a_lower.cmp(&b_lower)
        })
        // Same letters differing only in case: lowercase first
        .then_with(|| b.cmp(a))
}

/// Stable sort by name in the given direction
pub fn sort_by_name(users: &mut [User], order: SortOrder) {
    users.sort_by(|a, b| {
        let ordering = compare_names(&a.name, &b.name);
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}
