//! Trait definition for the panel transport.
//!
//! Everything in this crate that needs panel data goes through
//! [`PanelApi`]. The production implementation is
//! [`PanelClient`](crate::http::PanelClient); tests substitute in-memory
//! fakes so the discovery engine can be exercised without a network.

use crate::error::SearchError;
use crate::types::Method;

/// Query-string pairs sent with a request, in order.
pub type Query = Vec<(String, String)>;

/// A single request/response exchange with the panel's Application API.
///
/// Implementors own authentication, headers and status mapping:
///
/// - `204 No Content` answers with the sentinel `{"status": 204}`
/// - a non-JSON body is returned as a JSON string
/// - any status `>= 400` is [`SearchError::Api`], network faults are
///   [`SearchError::Http`]
///
/// There are no retries; a failure is returned to the caller unchanged.
/// All implementations must be `Send + Sync` so one handle can serve
/// independent callers.
pub trait PanelApi: Send + Sync {
    /// Perform one request against `path` (e.g. `/api/application/users`).
    fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&serde_json::Value>,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, SearchError>> + Send;

    /// Convenience wrapper for a `GET` without a body.
    fn get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> impl std::future::Future<Output = Result<serde_json::Value, SearchError>> + Send {
        self.request(Method::Get, path, query, None)
    }
}

impl<T: PanelApi> PanelApi for std::sync::Arc<T> {
    fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&serde_json::Value>,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, SearchError>> + Send {
        (**self).request(method, path, query, body)
    }
}

/// Build the `page`/`per_page` pair every collection endpoint accepts.
pub fn page_query(page: u32, per_page: u32) -> Query {
    vec![
        ("page".to_owned(), page.to_string()),
        ("per_page".to_owned(), per_page.to_string()),
    ]
}
