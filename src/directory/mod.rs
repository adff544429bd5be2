//! The event directory view: a local snapshot of published events, rendered
//! as cards whose visibility follows the combined search and category
//! filter.
//!
//! The directory never talks to the network itself. Loads are sequenced by
//! the caller: `begin_load` hands out a monotonic tag, `finish_load` applies
//! a completed fetch and discards anything stale, so a slow early response
//! can never overwrite a later one.

pub mod filter;

use std::collections::BTreeSet;

use tracing::debug;

pub use filter::{CategoryFilter, FilterState};

use crate::models::Event;
use crate::utils::error::AppError;

/// One rendered card: the record snapshot plus the client-side state the
/// backend never sees.
#[derive(Debug, Clone)]
pub struct EventCard {
    pub event: Event,
    pub interested: bool,
    pub visible: bool,
}

impl EventCard {
    /// The status label always agrees with the interest flag.
    pub fn interest_label(&self) -> &'static str {
        if self.interested {
            "Going"
        } else {
            "Interested"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryStatus {
    Loading,
    Loaded,
    Failed(String),
}

/// What the directory asks the rendering layer to draw, top to bottom.
#[derive(Debug)]
pub enum DirectoryRow<'a> {
    Card(&'a EventCard),
    /// Shown exactly once when the filter hides every card.
    NoMatches,
    /// Shown exactly once, in place of the listing, when a load failed.
    LoadFailed(&'a str),
}

pub struct EventDirectory {
    cards: Vec<EventCard>,
    filter: FilterState,
    status: DirectoryStatus,
    latest_seq: u64,
}

impl Default for EventDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDirectory {
    /// An empty directory awaiting its first load.
    pub fn new() -> Self {
        Self {
            cards: Vec::new(),
            filter: FilterState::default(),
            status: DirectoryStatus::Loading,
            latest_seq: 0,
        }
    }

    /// A directory pre-populated from an in-memory list. This is the
    /// fixture entry point for tests; the running client always loads over
    /// the API.
    pub fn from_events(events: Vec<Event>) -> Self {
        let mut directory = Self::new();
        let seq = directory.begin_load();
        directory.finish_load(seq, Ok(events));
        directory
    }

    /// Allocates the tag for the next fetch and marks the view loading.
    /// Cards already on screen stay put until the result arrives.
    pub fn begin_load(&mut self) -> u64 {
        self.latest_seq += 1;
        self.status = DirectoryStatus::Loading;
        self.latest_seq
    }

    /// Applies a completed fetch. Results from superseded loads are dropped
    /// outright; the newest request wins regardless of arrival order.
    ///
    /// A successful load replaces the whole snapshot (interest state
    /// included). A failure clears the listing and records the message to
    /// render in its place.
    pub fn finish_load(&mut self, seq: u64, result: Result<Vec<Event>, AppError>) {
        if seq < self.latest_seq {
            debug!(seq, latest = self.latest_seq, "Discarding stale events response");
            return;
        }
        match result {
            Ok(events) => {
                self.cards = events
                    .into_iter()
                    .map(|event| EventCard {
                        event,
                        interested: false,
                        visible: true,
                    })
                    .collect();
                self.status = DirectoryStatus::Loaded;
                self.apply_filters();
            }
            Err(e) => {
                e.log();
                self.cards.clear();
                self.status = DirectoryStatus::Failed(e.user_message());
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == DirectoryStatus::Loading
    }

    pub fn search(&self) -> &str {
        &self.filter.search
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.filter.category
    }

    pub fn push_search(&mut self, c: char) {
        self.filter.search.push(c);
        self.apply_filters();
    }

    pub fn pop_search(&mut self) {
        self.filter.search.pop();
        self.apply_filters();
    }

    pub fn clear_search(&mut self) {
        self.filter.search.clear();
        self.apply_filters();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.filter.category = category;
        self.apply_filters();
    }

    /// Steps the category selector: All, then each known tag, back to All.
    pub fn cycle_category(&mut self) {
        let tags = self.categories();
        let next = match &self.filter.category {
            CategoryFilter::All => tags.first().cloned().map(CategoryFilter::Only),
            CategoryFilter::Only(current) => tags
                .iter()
                .position(|t| t == current)
                .and_then(|i| tags.get(i + 1))
                .cloned()
                .map(CategoryFilter::Only),
        };
        self.set_category(next.unwrap_or(CategoryFilter::All));
    }

    /// Distinct category tags present in the snapshot, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.cards
            .iter()
            .filter_map(|c| c.event.category.clone())
            .filter(|tag| !tag.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Re-evaluates every card's visibility from the current filter state.
    /// Memoryless: the outcome depends only on the inputs, so re-running
    /// with the same values always yields the same visibility set.
    pub fn apply_filters(&mut self) {
        for card in &mut self.cards {
            card.visible = filter::matches(&card.event, &self.filter);
        }
    }

    pub fn visible_count(&self) -> usize {
        self.cards.iter().filter(|c| c.visible).count()
    }

    /// The render projection, in insertion order. Exactly one placeholder
    /// row stands in for the listing when nothing matches, and exactly one
    /// failure row when the last load failed.
    pub fn rows(&self) -> Vec<DirectoryRow<'_>> {
        if let DirectoryStatus::Failed(message) = &self.status {
            return vec![DirectoryRow::LoadFailed(message.as_str())];
        }
        let cards: Vec<DirectoryRow<'_>> = self
            .cards
            .iter()
            .filter(|c| c.visible)
            .map(DirectoryRow::Card)
            .collect();
        if cards.is_empty() && self.status == DirectoryStatus::Loaded {
            return vec![DirectoryRow::NoMatches];
        }
        cards
    }

    /// Flips interest for exactly one card and returns the new state.
    /// Unknown ids are a no-op.
    pub fn toggle_interest(&mut self, event_id: i64) -> Option<bool> {
        let card = self.cards.iter_mut().find(|c| c.event.id == event_id)?;
        card.interested = !card.interested;
        Some(card.interested)
    }

    pub fn card(&self, event_id: i64) -> Option<&EventCard> {
        self.cards.iter().find(|c| c.event.id == event_id)
    }

    /// The ids of visible cards, in display order.
    pub fn visible_ids(&self) -> Vec<i64> {
        self.cards
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.event.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_events() -> Vec<Event> {
        serde_json::from_value(serde_json::json!([
            {"id": 1, "title": "AI Summit", "category": "Tech",
             "organizer": {"id": 1, "name": "Tech Society"}},
            {"id": 2, "title": "Debate Night", "category": "Debating",
             "organizer": {"id": 2, "name": "Oratory Union"}},
            {"id": 3, "title": "Spring Concert", "category": "Music",
             "organizer": {"id": 3, "name": "Music Society"}},
        ]))
        .unwrap()
    }

    fn placeholder_count(rows: &[DirectoryRow<'_>]) -> usize {
        rows.iter()
            .filter(|r| matches!(r, DirectoryRow::NoMatches))
            .count()
    }

    #[test]
    fn search_and_category_combine_with_and() {
        let mut dir = EventDirectory::from_events(sample_events());
        for c in "summit".chars() {
            dir.push_search(c);
        }
        assert_eq!(dir.visible_ids(), vec![1]);

        dir.set_category(CategoryFilter::Only("Music".into()));
        assert_eq!(dir.visible_ids(), Vec::<i64>::new());

        dir.clear_search();
        assert_eq!(dir.visible_ids(), vec![3]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let mut dir = EventDirectory::from_events(sample_events());
        dir.push_search('a');
        let first = dir.visible_ids();
        dir.apply_filters();
        dir.apply_filters();
        assert_eq!(dir.visible_ids(), first);
    }

    #[test]
    fn hidden_cards_come_back_when_the_filter_relaxes() {
        let mut dir = EventDirectory::from_events(sample_events());
        dir.set_category(CategoryFilter::Only("Tech".into()));
        assert_eq!(dir.visible_ids(), vec![1]);
        dir.set_category(CategoryFilter::All);
        assert_eq!(dir.visible_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn empty_result_shows_exactly_one_placeholder() {
        let mut dir = EventDirectory::from_events(sample_events());
        for c in "zzz".chars() {
            dir.push_search(c);
        }
        assert_eq!(placeholder_count(&dir.rows()), 1);
        assert_eq!(dir.rows().len(), 1);

        // Another non-matching keystroke must not duplicate it.
        dir.push_search('z');
        assert_eq!(placeholder_count(&dir.rows()), 1);

        // As soon as anything matches again the placeholder disappears.
        dir.clear_search();
        assert_eq!(placeholder_count(&dir.rows()), 0);
        assert_eq!(dir.rows().len(), 3);
    }

    #[test]
    fn empty_snapshot_also_shows_the_placeholder() {
        let dir = EventDirectory::from_events(Vec::new());
        assert_eq!(placeholder_count(&dir.rows()), 1);
    }

    #[test]
    fn interest_toggles_are_independent_across_cards() {
        let mut dir = EventDirectory::from_events(sample_events());
        assert_eq!(dir.toggle_interest(1), Some(true));

        assert_eq!(dir.card(1).unwrap().interest_label(), "Going");
        assert_eq!(dir.card(2).unwrap().interest_label(), "Interested");
        assert!(!dir.card(2).unwrap().interested);

        assert_eq!(dir.toggle_interest(1), Some(false));
        assert_eq!(dir.card(1).unwrap().interest_label(), "Interested");
    }

    #[test]
    fn toggling_an_unknown_card_is_a_no_op() {
        let mut dir = EventDirectory::from_events(sample_events());
        assert_eq!(dir.toggle_interest(99), None);
    }

    #[test]
    fn a_new_load_fully_replaces_the_snapshot() {
        let mut dir = EventDirectory::from_events(sample_events());
        dir.toggle_interest(1);

        let replacement: Vec<Event> = serde_json::from_value(serde_json::json!([
            {"id": 1, "title": "AI Summit", "category": "Tech"},
            {"id": 9, "title": "Career Fair", "category": "Careers"},
        ]))
        .unwrap();
        let seq = dir.begin_load();
        dir.finish_load(seq, Ok(replacement));

        assert_eq!(dir.visible_ids(), vec![1, 9]);
        // Interest is part of the discarded snapshot, even for a matching id.
        assert!(!dir.card(1).unwrap().interested);
    }

    #[test]
    fn a_stale_response_never_overwrites_a_newer_one() {
        let mut dir = EventDirectory::new();
        let slow = dir.begin_load();
        let fast = dir.begin_load();

        let fresh: Vec<Event> =
            serde_json::from_value(serde_json::json!([{"id": 2, "title": "Debate Night"}]))
                .unwrap();
        dir.finish_load(fast, Ok(fresh));

        let stale: Vec<Event> =
            serde_json::from_value(serde_json::json!([{"id": 1, "title": "AI Summit"}])).unwrap();
        dir.finish_load(slow, Ok(stale));

        assert_eq!(dir.visible_ids(), vec![2]);
        assert!(!dir.is_loading());
    }

    #[test]
    fn a_failed_load_renders_one_failure_row_and_no_cards() {
        let mut dir = EventDirectory::from_events(sample_events());
        let seq = dir.begin_load();
        dir.finish_load(
            seq,
            Err(AppError::Api {
                status: 503,
                message: "Service unavailable".into(),
            }),
        );

        let rows = dir.rows();
        assert_eq!(rows.len(), 1);
        assert!(matches!(rows[0], DirectoryRow::LoadFailed("Service unavailable")));
        assert!(dir.is_empty());
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let dir = EventDirectory::from_events(sample_events());
        assert_eq!(dir.categories(), vec!["Debating", "Music", "Tech"]);
    }

    #[test]
    fn category_cycle_walks_every_tag_and_wraps() {
        let mut dir = EventDirectory::from_events(sample_events());
        dir.cycle_category();
        assert_eq!(dir.category(), &CategoryFilter::Only("Debating".into()));
        dir.cycle_category();
        dir.cycle_category();
        assert_eq!(dir.category(), &CategoryFilter::Only("Tech".into()));
        dir.cycle_category();
        assert_eq!(dir.category(), &CategoryFilter::All);
    }

    #[test]
    fn cards_render_in_insertion_order() {
        let dir = EventDirectory::from_events(sample_events());
        assert_eq!(dir.visible_ids(), vec![1, 2, 3]);
    }
}
