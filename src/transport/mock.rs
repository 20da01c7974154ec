//! Scripted transport for tests.
//!
//! Routes match on method and URL, optionally narrowed by query parameters.
//! Each route answers with queued one-shot responses first and then with its
//! standing response. Every request is recorded in order so tests can check
//! what was sent and in which sequence.

use super::{HttpRequest, HttpResponse, Method, Transport};
use crate::error::ConnectorResult;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

type Responder = Arc<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync>;

struct Route {
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    queued: VecDeque<HttpResponse>,
    standing: Option<Responder>,
}

impl Route {
    fn matches(&self, request: &HttpRequest) -> bool {
        self.method == request.method
            && self.url == request.url
            && self.query.iter().all(|pair| request.query.contains(pair))
    }
}

#[derive(Default)]
struct MockState {
    routes: Vec<Route>,
    requests: Vec<HttpRequest>,
}

impl MockState {
    fn route_mut(&mut self, method: Method, url: &str, query: &[(&str, &str)]) -> &mut Route {
        let query: Vec<(String, String)> = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let position = self
            .routes
            .iter()
            .position(|r| r.method == method && r.url == url && r.query == query);
        let index = match position {
            Some(index) => index,
            None => {
                self.routes.push(Route {
                    method,
                    url: url.to_string(),
                    query,
                    queued: VecDeque::new(),
                    standing: None,
                });
                self.routes.len() - 1
            }
        };
        &mut self.routes[index]
    }

    fn answer(&mut self, request: &HttpRequest) -> HttpResponse {
        // The most specific matching route wins.
        let best = self
            .routes
            .iter_mut()
            .filter(|r| r.matches(request))
            .max_by_key(|r| r.query.len());

        match best {
            Some(route) => match route.queued.pop_front() {
                Some(response) => response,
                None => match &route.standing {
                    Some(responder) => responder(request),
                    None => unmatched(request),
                },
            },
            None => unmatched(request),
        }
    }
}

fn unmatched(request: &HttpRequest) -> HttpResponse {
    HttpResponse::new(
        404,
        format!("no mock response for {} {}", request.method, request.url),
    )
}

/// In-memory [`Transport`] with scripted responses.
///
/// Clones share the same routes and request log.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<RwLock<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every matching request with `response`.
    pub async fn respond(&self, method: Method, url: &str, response: HttpResponse) {
        self.respond_to_query(method, url, &[], response).await;
    }

    /// Answer matching requests carrying all of `query` with `response`.
    pub async fn respond_to_query(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        response: HttpResponse,
    ) {
        let mut state = self.state.write().await;
        let route = state.route_mut(method, url, query);
        route.queued.clear();
        route.standing = Some(Arc::new(move |_: &HttpRequest| response.clone()));
    }

    /// Compute the response from the request.
    pub async fn respond_with<F>(&self, method: Method, url: &str, responder: F)
    where
        F: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
    {
        let mut state = self.state.write().await;
        let route = state.route_mut(method, url, &[]);
        route.queued.clear();
        route.standing = Some(Arc::new(responder));
    }

    /// Answer the next matching request once with `response`.
    pub async fn enqueue(&self, method: Method, url: &str, response: HttpResponse) {
        let mut state = self.state.write().await;
        state.route_mut(method, url, &[]).queued.push_back(response);
    }

    /// All requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<HttpRequest> {
        self.state.read().await.requests.clone()
    }

    /// Requests received for one method and URL.
    pub async fn requests_to(&self, method: Method, url: &str) -> Vec<HttpRequest> {
        self.state
            .read()
            .await
            .requests
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .cloned()
            .collect()
    }

    pub async fn clear_requests(&self) {
        self.state.write().await.requests.clear();
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> ConnectorResult<HttpResponse> {
        let mut state = self.state.write().await;
        let response = state.answer(&request);
        state.requests.push(request);
        Ok(response)
    }
}
