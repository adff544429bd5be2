//! The visibility predicate for event cards.
//!
//! Kept free of any rendering or I/O so it can be evaluated per keystroke
//! and tested directly against event records.

use crate::models::Event;

/// The category selector: everything, or one exact tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

/// Current values of the two filter controls. Derived from the inputs on
/// every evaluation, never persisted.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub search: String,
    pub category: CategoryFilter,
}

/// A card is visible iff it matches the search text AND the category
/// selector. The two predicates are independent.
pub fn matches(event: &Event, filter: &FilterState) -> bool {
    matches_search(event, &filter.search) && matches_category(event, &filter.category)
}

/// Case-insensitive substring containment against the card's visible front
/// text: title plus organizer name.
fn matches_search(event: &Event, search: &str) -> bool {
    let haystack = format!("{} {}", event.title, event.organizer_name()).to_lowercase();
    haystack.contains(&search.to_lowercase())
}

/// Exact, case-sensitive tag comparison; `All` matches everything.
fn matches_category(event: &Event, category: &CategoryFilter) -> bool {
    match category {
        CategoryFilter::All => true,
        CategoryFilter::Only(tag) => event.category_tag() == tag,
    }
}
