//! In-process transport whose responses are computed per request and
//! delivered after a chosen delay. Pair with `start_paused = true` so delays
//! are deterministic.

#![allow(dead_code)]

use std::time::Duration;

use parking_lot::Mutex;
use tasks_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Transport};

type Handler = Box<dyn FnMut(&HttpRequest) -> (u64, HttpResponse) + Send>;

pub struct Delayed {
    handler: Mutex<Handler>,
    requests: Mutex<Vec<(HttpMethod, String)>>,
}

impl Delayed {
    pub fn new(handler: impl FnMut(&HttpRequest) -> (u64, HttpResponse) + Send + 'static) -> Self {
        Self {
            handler: Mutex::new(Box::new(handler)),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// `(method, path)` of every request seen so far, paths without the
    /// base URL.
    pub fn requests(&self) -> Vec<(HttpMethod, String)> {
        self.requests.lock().clone()
    }
}

impl Transport for Delayed {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let path = request
            .path
            .strip_prefix(BASE_URL)
            .unwrap_or(&request.path)
            .to_string();
        self.requests.lock().push((request.method, path));
        let (delay_ms, response) = {
            let mut handler = self.handler.lock();
            (*handler)(&request)
        };
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        Ok(response)
    }
}

pub const BASE_URL: &str = "http://tasks.test";

pub fn ok(body: &str) -> HttpResponse {
    status(200, body)
}

pub fn status(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: Vec::new(),
        body: body.to_string(),
    }
}

pub fn path_of(request: &HttpRequest) -> &str {
    request.path.strip_prefix(BASE_URL).unwrap_or(&request.path)
}
