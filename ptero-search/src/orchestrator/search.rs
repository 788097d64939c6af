//! Ranker: drive the paginator, score every record, keep the best.
//!
//! # Pipeline
//!
//! 1. Reject an empty (after trimming) query before any request is made
//! 2. Walk the collection with a [`Paginator`]
//! 3. For each record, score the query against every candidate field and
//!    keep the strictly highest (earlier fields win ties)
//! 4. Accept the record if its best score reaches `min_score`
//! 5. Stop early once a near-exact hit arrives and `limit` matches are held
//! 6. Stable sort by score descending, truncate to `limit`, summarize

use std::collections::BTreeSet;

use crate::config::SearchOptions;
use crate::engine::PanelApi;
use crate::error::SearchError;
use crate::summary::Summary;
use crate::types::{Record, ResourceKind, ScanStats, ScoredMatch, SearchResult};

use super::fields::candidate_fields;
use super::paginate::Paginator;
use super::scoring::score;

/// A record scoring at least this much counts as a near-certain hit for
/// the early-exit check.
pub const EARLY_EXIT_SCORE: f64 = 99.5;

/// Search one collection of `api` for `query`.
///
/// `options` are clamped before use.
///
/// # Errors
///
/// - [`SearchError::InvalidInput`] if `query` is empty after trimming; no
///   request is made.
/// - Any transport error from a page fetch. The scan is aborted and
///   nothing collected so far is returned.
pub async fn orchestrate_search<A: PanelApi>(
    api: &A,
    kind: ResourceKind,
    query: &str,
    options: &SearchOptions,
) -> Result<SearchResult, SearchError> {
    let options = options.clamped();
    let paginator = Paginator::new(
        api,
        kind.collection_path(),
        options.per_page,
        options.max_pages,
    );
    rank(paginator, kind, query, &options).await
}

/// Rank the records produced by `paginator` against `query`.
///
/// # Errors
///
/// Same as [`orchestrate_search`].
pub async fn rank<A: PanelApi>(
    mut paginator: Paginator<'_, A>,
    kind: ResourceKind,
    query: &str,
    options: &SearchOptions,
) -> Result<SearchResult, SearchError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(SearchError::InvalidInput(
            "query must be a non-empty string".into(),
        ));
    }
    let options = options.clamped();
    tracing::trace!(%kind, query, "fuzzy search");

    let mut items = 0usize;
    let mut pages = BTreeSet::new();
    let mut accepted: Vec<ScoredMatch> = Vec::new();

    while let Some((page, record)) = paginator.next_record().await? {
        items += 1;
        pages.insert(page);

        let (best, matched_on) = best_field(kind, &record, query);
        if best >= options.min_score {
            accepted.push(ScoredMatch {
                score: best,
                record,
                matched_on,
            });
        }

        if best >= EARLY_EXIT_SCORE && accepted.len() >= options.limit {
            tracing::debug!(%kind, page, items, "near-exact match with full result set; stopping early");
            break;
        }
    }

    accepted.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    accepted.truncate(options.limit);

    tracing::debug!(
        %kind,
        items,
        pages = pages.len(),
        matches = accepted.len(),
        "search finished"
    );

    Ok(SearchResult {
        query: query.to_owned(),
        matches: accepted
            .iter()
            .map(|m| Summary::of_match(kind, m))
            .collect(),
        scanned: ScanStats {
            items,
            pages: pages.len(),
        },
    })
}

/// Score `query` against each candidate field of `record`.
///
/// Returns the best score and the field it came from. Only a strictly
/// greater score replaces the current best, so on a tie the field listed
/// first wins; a record with no scorable field yields `(0.0, None)`.
pub fn best_field(kind: ResourceKind, record: &Record, query: &str) -> (f64, Option<&'static str>) {
    let mut best = 0.0;
    let mut best_field = None;
    for (field, value) in candidate_fields(kind, record) {
        let s = score(query, &value);
        if s > best {
            best = s;
            best_field = Some(field);
        }
    }
    (best, best_field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Method;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory collection split into fixed pages.
    struct FakeCollection {
        pages: Vec<Vec<Value>>,
        fail_on_page: Option<usize>,
        calls: AtomicUsize,
    }

    impl FakeCollection {
        fn new(pages: Vec<Vec<Value>>) -> Self {
            Self {
                pages,
                fail_on_page: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PanelApi for FakeCollection {
        async fn request(
            &self,
            _method: Method,
            _path: &str,
            query: &[(String, String)],
            _body: Option<&Value>,
        ) -> Result<Value, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let page: usize = query
                .iter()
                .find(|(k, _)| k == "page")
                .and_then(|(_, v)| v.parse().ok())
                .unwrap_or(1);
            if self.fail_on_page == Some(page) {
                return Err(SearchError::Http("connection reset".into()));
            }
            let data: Vec<Value> = self
                .pages
                .get(page - 1)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .map(|attrs| json!({"object": "item", "attributes": attrs}))
                .collect();
            Ok(json!({
                "data": data,
                "meta": {"pagination": {"total_pages": self.pages.len()}}
            }))
        }
    }

    fn user(id: u64, username: &str, first: &str, last: &str) -> Value {
        json!({
            "id": id,
            "uuid": format!("uuid-{id}"),
            "username": username,
            "email": format!("{username}@example.com"),
            "first_name": first,
            "last_name": last,
        })
    }

    fn server(id: u64, name: &str) -> Value {
        json!({"id": id, "identifier": format!("srv{id:05}"), "name": name, "suspended": false})
    }

    fn opts(limit: usize, min_score: f64) -> SearchOptions {
        SearchOptions {
            limit,
            min_score,
            ..SearchOptions::default()
        }
    }

    fn assert_sorted(result: &SearchResult) {
        let scores: Vec<f64> = result.matches.iter().filter_map(Summary::score).collect();
        assert_eq!(scores.len(), result.matches.len());
        for pair in scores.windows(2) {
            assert!(pair[0] >= pair[1], "not sorted: {scores:?}");
        }
    }

    #[tokio::test]
    async fn empty_query_is_invalid_input_without_requests() {
        let panel = FakeCollection::new(vec![vec![user(1, "a", "", "")]]);
        for q in ["", "   ", "\t\n"] {
            let err = orchestrate_search(&panel, ResourceKind::Account, q, &SearchOptions::default())
                .await
                .expect_err("empty query");
            assert!(matches!(err, SearchError::InvalidInput(_)));
        }
        assert_eq!(panel.calls(), 0);
    }

    #[tokio::test]
    async fn exact_username_scores_100() {
        let panel = FakeCollection::new(vec![vec![
            user(1, "alice", "Alice", "Jones"),
            user(2, "jsmith", "John", "Smith"),
        ]]);
        let result = orchestrate_search(&panel, ResourceKind::Account, "jsmith", &SearchOptions::default())
            .await
            .expect("search");
        let top = &result.matches[0];
        assert_eq!(top.score(), Some(100.0));
        assert_eq!(top.matched_on(), Some("username"));
        assert_eq!(result.query, "jsmith");
    }

    #[tokio::test]
    async fn first_name_matches_on_full_name() {
        let panel = FakeCollection::new(vec![vec![user(2, "jsmith", "John", "Smith")]]);
        let result = orchestrate_search(&panel, ResourceKind::Account, "  john ", &SearchOptions::default())
            .await
            .expect("search");
        assert_eq!(result.query, "john");
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].matched_on(), Some("name"));
        assert!(result.matches[0].score().is_some_and(|s| s > 55.0));
    }

    #[tokio::test]
    async fn empty_collection_returns_no_matches() {
        let panel = FakeCollection::new(vec![]);
        let result = orchestrate_search(&panel, ResourceKind::Server, "lobby", &SearchOptions::default())
            .await
            .expect("search");
        assert!(result.matches.is_empty());
        assert_eq!(result.scanned, ScanStats { items: 0, pages: 0 });
        assert_eq!(panel.calls(), 1);
    }

    #[tokio::test]
    async fn min_score_100_without_exact_match_is_empty() {
        let panel = FakeCollection::new(vec![vec![
            user(1, "jsmith", "John", "Smith"),
            user(2, "jsmythe", "Jane", "Smythe"),
        ]]);
        let result = orchestrate_search(&panel, ResourceKind::Account, "john smyth", &opts(10, 100.0))
            .await
            .expect("search");
        assert!(result.matches.is_empty());
        assert_eq!(result.scanned.items, 2);
    }

    #[tokio::test]
    async fn matches_respect_limit_threshold_and_order() {
        let names = [
            "survival", "survival-2", "creative", "survival hard", "skyblock", "surv", "lobby",
            "survival eu", "factions", "survivalist",
        ];
        let pages: Vec<Vec<Value>> = names
            .chunks(3)
            .enumerate()
            .map(|(p, chunk)| {
                chunk
                    .iter()
                    .enumerate()
                    .map(|(i, n)| server((p * 3 + i) as u64 + 1, n))
                    .collect()
            })
            .collect();
        let panel = FakeCollection::new(pages);

        let options = SearchOptions {
            limit: 3,
            min_score: 60.0,
            per_page: 3,
            ..SearchOptions::default()
        };
        let result = orchestrate_search(&panel, ResourceKind::Server, "survival", &options)
            .await
            .expect("search");

        assert!(result.matches.len() <= 3);
        assert!(!result.matches.is_empty());
        assert_sorted(&result);
        for m in &result.matches {
            assert!(m.score().is_some_and(|s| s >= 60.0));
        }
        assert_eq!(result.matches[0].score(), Some(100.0));
    }

    #[tokio::test]
    async fn scan_stats_count_rejected_items_and_distinct_pages() {
        let panel = FakeCollection::new(vec![
            vec![user(1, "zed", "", ""), user(2, "yan", "", "")],
            vec![user(3, "xi", "", "")],
        ]);
        let result = orchestrate_search(&panel, ResourceKind::Account, "qqqqqqqq", &SearchOptions::default())
            .await
            .expect("search");
        assert!(result.matches.is_empty());
        assert_eq!(result.scanned, ScanStats { items: 3, pages: 2 });
    }

    #[tokio::test]
    async fn page_budget_limits_scan() {
        let pages: Vec<Vec<Value>> = (1..=10).map(|i| vec![server(i, "node")]).collect();
        let panel = FakeCollection::new(pages);
        let options = SearchOptions {
            max_pages: 3,
            per_page: 1,
            ..SearchOptions::default()
        };
        let result = orchestrate_search(&panel, ResourceKind::Server, "node", &options)
            .await
            .expect("search");
        assert_eq!(result.scanned, ScanStats { items: 3, pages: 3 });
        assert_eq!(panel.calls(), 3);
    }

    #[tokio::test]
    async fn ties_keep_discovery_order() {
        let panel = FakeCollection::new(vec![
            vec![server(1, "lobby")],
            vec![server(2, "lobby"), server(3, "lobby")],
        ]);
        let result = orchestrate_search(&panel, ResourceKind::Server, "lobby", &opts(10, 55.0))
            .await
            .expect("search");
        let ids: Vec<Value> = result
            .matches
            .iter()
            .filter_map(|m| match m {
                Summary::Server(s) => s.id.clone(),
                Summary::Account(_) => None,
            })
            .collect();
        assert_eq!(ids, vec![json!(1), json!(2), json!(3)]);
    }

    #[tokio::test]
    async fn equal_field_scores_prefer_priority_order() {
        let panel = FakeCollection::new(vec![vec![json!({
            "id": 4, "name": "lobby", "identifier": "lobby", "uuid": "lobby"
        })]]);
        let result = orchestrate_search(&panel, ResourceKind::Server, "lobby", &SearchOptions::default())
            .await
            .expect("search");
        assert_eq!(result.matches[0].matched_on(), Some("name"));
    }

    #[tokio::test]
    async fn transport_error_aborts_without_partial_results() {
        let mut panel = FakeCollection::new(vec![
            vec![user(1, "jsmith", "John", "Smith")],
            vec![user(2, "jsmith2", "", "")],
        ]);
        panel.fail_on_page = Some(2);
        let err = orchestrate_search(&panel, ResourceKind::Account, "jsm", &SearchOptions::default())
            .await
            .expect_err("page 2 fails");
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn early_exit_stops_once_limit_reached_with_exact_hit() {
        let panel = FakeCollection::new(vec![
            vec![server(1, "alpha")],
            vec![server(2, "alpha")],
        ]);
        let result = orchestrate_search(&panel, ResourceKind::Server, "alpha", &opts(1, 55.0))
            .await
            .expect("search");
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.scanned, ScanStats { items: 1, pages: 1 });
        assert_eq!(panel.calls(), 1);
    }

    #[tokio::test]
    async fn early_exit_can_miss_a_better_later_match() {
        // The heuristic stops as soon as an exact hit arrives with `limit`
        // matches held, even if a lower-scoring match is among them and a
        // later page would have replaced it.
        let panel = FakeCollection::new(vec![
            vec![server(1, "the alpha"), server(2, "alpha")],
            vec![server(3, "alpha")],
        ]);
        let result = orchestrate_search(&panel, ResourceKind::Server, "alpha", &opts(2, 55.0))
            .await
            .expect("search");
        assert_eq!(result.scanned.pages, 1);
        let scores: Vec<f64> = result.matches.iter().filter_map(Summary::score).collect();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0], 100.0);
        assert!(scores[1] < 100.0, "full scan would have returned two exact hits");
    }

    #[tokio::test]
    async fn limit_is_clamped_to_50() {
        let page: Vec<Value> = (1..=80).map(|i| server(i, "box")).collect();
        let panel = FakeCollection::new(vec![page]);
        let options = SearchOptions {
            limit: 500,
            min_score: 0.0,
            ..SearchOptions::default()
        };
        let result = orchestrate_search(&panel, ResourceKind::Server, "box", &options)
            .await
            .expect("search");
        assert_eq!(result.matches.len(), 50);
    }

    #[test]
    fn best_field_without_candidates_is_zero() {
        let record = Record::new();
        assert_eq!(best_field(ResourceKind::Account, &record, "x"), (0.0, None));
    }
}
