//! Ranked delivery of content for a set of selected mood tags.
//!
//! Join rows from the store are collapsed per content item and scored by how
//! many selected tags they carry ([`scoring`]), ordered into descending score
//! bands shuffled internally ([`shuffle`]), and handed out batch by batch within
//! fixed-size pages ([`pagination`]). A [`view::ResultsView`] owns that state for
//! one consumer and guards it against late results of superseded selections.

pub mod backdrop;
pub mod pagination;
pub mod scoring;
pub mod selection;
pub mod shuffle;
pub mod source;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use pagination::{PageSize, PageSizeError, Paginator};
pub use selection::{MatchMode, SelectionQuery};
pub use source::{ContentSource, FeedError};
pub use types::{ContentItem, JoinRow, RankedContentItem, Tag};
pub use view::{LoadStatus, ResultsState, ResultsView, SelectOutcome};
