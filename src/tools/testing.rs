//! In-memory panel used by the tool tests.

use std::sync::Mutex;

use serde_json::Value;

use ptero_search::{Method, PanelApi, SearchError};

/// One request seen by [`RecordingPanel`].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Answers by exact path, falling back to a default body, and records
/// every request.
pub struct RecordingPanel {
    fallback: Value,
    routes: Vec<(String, Value)>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingPanel {
    pub fn new(fallback: Value) -> Self {
        Self {
            fallback,
            routes: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn route(mut self, path: &str, body: Value) -> Self {
        self.routes.push((path.to_owned(), body));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl PanelApi for RecordingPanel {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, SearchError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(Call {
                method,
                path: path.to_owned(),
                query: query.to_vec(),
                body: body.cloned(),
            });
        }
        Ok(self
            .routes
            .iter()
            .find(|(p, _)| p == path)
            .map_or_else(|| self.fallback.clone(), |(_, v)| v.clone()))
    }
}
