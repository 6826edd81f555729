//! In-memory transport that replays a script, for unit tests.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::client::MedicineClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::retry::RetryPolicy;
use crate::service::SearchService;
use crate::transport::Transport;

pub(crate) const BASE_URL: &str = "http://localhost:8000/finder";

/// What the transport does for one request.
pub(crate) enum Step {
    Respond(HttpResponse),
    Fail(String),
    /// Never completes; only the retry timer gets the caller out.
    Hang,
}

impl Step {
    pub(crate) fn ok(body: &str) -> Self {
        Step::Respond(HttpResponse::new(200, body))
    }

    pub(crate) fn status(status: u16, body: &str) -> Self {
        Step::Respond(HttpResponse::new(status, body))
    }

    pub(crate) fn fail(message: &str) -> Self {
        Step::Fail(message.to_string())
    }
}

#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    steps: Arc<Mutex<VecDeque<Step>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub(crate) fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into())),
            requests: Arc::default(),
        }
    }

    pub(crate) fn push(&self, step: Step) {
        self.steps.lock().unwrap().push_back(step);
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Transport for ScriptedTransport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send {
        self.requests.lock().unwrap().push(request);
        let step = self.steps.lock().unwrap().pop_front();
        async move {
            match step {
                Some(Step::Respond(response)) => Ok(response),
                Some(Step::Fail(message)) => Err(ApiError::Transport(message)),
                Some(Step::Hang) => std::future::pending().await,
                None => Err(ApiError::Transport("script exhausted".to_string())),
            }
        }
    }
}

/// A service over a scripted transport with the default retry policy,
/// plus a handle to inspect what was sent.
pub(crate) fn scripted_service(
    steps: Vec<Step>,
) -> (SearchService<ScriptedTransport>, ScriptedTransport) {
    let transport = ScriptedTransport::new(steps);
    let client = MedicineClient::new(BASE_URL).unwrap();
    let service = SearchService::new(client, transport.clone(), RetryPolicy::default());
    (service, transport)
}
