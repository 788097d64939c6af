//! Discovery engine: text normalisation, fuzzy scoring, lazy pagination
//! and top-K ranking.
//!
//! A search walks a panel collection page by page, scores every record
//! against the query across a fixed list of candidate fields, keeps the
//! records that clear the threshold and returns the best of them, sorted
//! by score, with scan statistics.

pub mod fields;
pub mod normalize;
pub mod paginate;
pub mod scoring;
pub mod search;
