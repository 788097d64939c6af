//! # ptero-search
//!
//! Pterodactyl Application API client with a discovery layer for the two
//! collections an operator looks things up in: user accounts and managed
//! servers.
//!
//! ## Design
//!
//! - Fuzzy search re-scans the live collection on every query; there is
//!   no index and no cache
//! - Pages are fetched lazily and sequentially, bounded by a page budget
//! - Every record is scored against a fixed, prioritised list of fields;
//!   the best field's score decides whether the record is kept
//! - Results are compact summaries with the score and the matched field
//! - Malformed response envelopes degrade to "no items"; transport errors
//!   abort the call
//!
//! ## Security
//!
//! - The panel token is only sent as a bearer header and is redacted from
//!   `Debug` output
//! - Search queries are logged only at trace level

pub mod config;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod summary;
pub mod types;

use std::collections::BTreeMap;

pub use config::{PanelConfig, SearchOptions};
pub use engine::PanelApi;
pub use error::{Result, SearchError};
pub use http::{LazyPanelClient, PanelClient};
pub use summary::{AccountSummary, ServerSummary, Summary};
pub use types::{ListPage, Method, Pagination, Record, ResourceKind, ScanStats, SearchResult};

/// Collections counted by [`totals`], keyed by the name used in the output.
pub const TOTALS_COLLECTIONS: &[(&str, &str)] = &[
    ("users", "/api/application/users"),
    ("servers", "/api/application/servers"),
    ("nodes", "/api/application/nodes"),
    ("locations", "/api/application/locations"),
    ("nests", "/api/application/nests"),
];

/// Default page size for [`list`].
pub const DEFAULT_LIST_PER_PAGE: u32 = 10;

/// Fuzzy search one collection.
///
/// # Errors
///
/// Returns [`SearchError::InvalidInput`] for an empty query (no request is
/// made) and propagates any transport error, discarding partial results.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> ptero_search::Result<()> {
/// use ptero_search::{PanelClient, PanelConfig, ResourceKind, SearchOptions};
///
/// let client = PanelClient::new(&PanelConfig::from_env()?)?;
/// let result = ptero_search::search(&client, ResourceKind::Account, "jsmith", &SearchOptions::default()).await?;
/// for m in &result.matches {
///     println!("{:?} via {:?}", m.score(), m.matched_on());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search<A: PanelApi>(
    api: &A,
    kind: ResourceKind,
    query: &str,
    options: &SearchOptions,
) -> Result<SearchResult> {
    orchestrator::search::orchestrate_search(api, kind, query, options).await
}

/// Fuzzy search user accounts by username, email, name, external id, UUID or id.
///
/// # Errors
///
/// Same as [`search`].
pub async fn search_accounts<A: PanelApi>(
    api: &A,
    query: &str,
    options: &SearchOptions,
) -> Result<SearchResult> {
    search(api, ResourceKind::Account, query, options).await
}

/// Fuzzy search servers by name, identifier, UUID, external id, id or description.
///
/// # Errors
///
/// Same as [`search`].
pub async fn search_servers<A: PanelApi>(
    api: &A,
    query: &str,
    options: &SearchOptions,
) -> Result<SearchResult> {
    search(api, ResourceKind::Server, query, options).await
}

/// Fetch one page of a collection as compact summaries.
///
/// `page` is raised to at least 1 and `per_page` clamped to `1..=100`.
/// Exactly one request is made, and at most `per_page` items are kept even
/// if the panel returns more.
///
/// # Errors
///
/// Propagates the transport error of the request.
pub async fn list<A: PanelApi>(
    api: &A,
    kind: ResourceKind,
    page: u32,
    per_page: u32,
) -> Result<ListPage> {
    let page = page.max(1);
    let per_page = config::clamp_per_page(per_page);
    let payload = api
        .get(kind.collection_path(), &engine::page_query(page, per_page))
        .await?;

    let items = envelope::extract_items(&payload)
        .iter()
        .take(per_page as usize)
        .map(|record| Summary::of(kind, record))
        .collect();

    Ok(ListPage {
        kind,
        items,
        pagination: envelope::extract_pagination(&payload),
    })
}

/// List user accounts. See [`list`].
///
/// # Errors
///
/// Same as [`list`].
pub async fn list_accounts<A: PanelApi>(api: &A, page: u32, per_page: u32) -> Result<ListPage> {
    list(api, ResourceKind::Account, page, per_page).await
}

/// List servers. See [`list`].
///
/// # Errors
///
/// Same as [`list`].
pub async fn list_servers<A: PanelApi>(api: &A, page: u32, per_page: u32) -> Result<ListPage> {
    list(api, ResourceKind::Server, page, per_page).await
}

/// Fetch one record by id (or any identifier the panel accepts in the path).
///
/// # Errors
///
/// Returns [`SearchError::InvalidInput`] for an empty id and propagates
/// the transport error of the request.
pub async fn get_record<A: PanelApi>(api: &A, kind: ResourceKind, id: &str) -> Result<Record> {
    let id = id.trim();
    if id.is_empty() {
        return Err(SearchError::InvalidInput(format!(
            "{kind} id must be a non-empty string"
        )));
    }
    let path = format!("{}/{}", kind.collection_path(), urlencoding::encode(id));
    let payload = api.get(&path, &[]).await?;
    Ok(envelope::extract_attributes(&payload))
}

/// Compact summary of one account.
///
/// # Errors
///
/// Same as [`get_record`].
pub async fn account_summary<A: PanelApi>(api: &A, id: &str) -> Result<AccountSummary> {
    let record = get_record(api, ResourceKind::Account, id).await?;
    Ok(summary::summarize_account(&record))
}

/// Compact summary of one server.
///
/// # Errors
///
/// Same as [`get_record`].
pub async fn server_summary<A: PanelApi>(api: &A, id: &str) -> Result<ServerSummary> {
    let record = get_record(api, ResourceKind::Server, id).await?;
    Ok(summary::summarize_server(&record))
}

/// Count the resources in each of [`TOTALS_COLLECTIONS`].
///
/// Each collection costs one `page=1&per_page=1` request; the count is the
/// declared `meta.pagination.total`, or 0 when it is missing or not a
/// non-negative integer.
///
/// # Errors
///
/// Propagates the first transport error.
pub async fn totals<A: PanelApi>(api: &A) -> Result<BTreeMap<String, u64>> {
    let mut out = BTreeMap::new();
    for (name, path) in TOTALS_COLLECTIONS {
        let payload = api.get(path, &engine::page_query(1, 1)).await?;
        out.insert((*name).to_owned(), envelope::declared_total(&payload));
    }
    Ok(out)
}
