use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use stress_instruments::{OperationRecord, Reporter};
use url::Url;

use crate::response::ResponseDescriptor;

/// Requests with no response for this long are failed by the client. The scenario core sets no
/// per-request timeout of its own.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An HTTP client that records an [OperationRecord] for every request it makes.
///
/// Each virtual user should create its own instance so that connection pools are not shared
/// between VUs and one slow VU cannot starve the others of connections.
#[derive(Debug)]
pub struct HttpClientInstrumented {
    inner: reqwest::Client,
    reporter: Arc<Reporter>,
}

impl HttpClientInstrumented {
    pub fn new(reporter: Arc<Reporter>) -> anyhow::Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;

        Ok(Self { inner, reporter })
    }

    /// POST a JSON body and wait for the response.
    ///
    /// Failure modes are surfaced on the returned descriptor, never as an `Err`: a transport
    /// failure yields a descriptor with no status and an error message, and a non-2xx status is
    /// simply a status for the caller's checks to judge. The operation is recorded against
    /// `operation_id`, counted as failed when the status falls outside 200-399 or there was no
    /// response at all.
    pub async fn post_json<T: Serialize>(
        &self,
        operation_id: &str,
        url: Url,
        body: &T,
    ) -> ResponseDescriptor {
        let record = OperationRecord::new(operation_id);
        let started = Instant::now();

        let response = self
            .inner
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await;

        let descriptor = match response {
            Ok(response) => ResponseDescriptor {
                status: Some(response.status().as_u16()),
                duration: started.elapsed(),
                error: None,
            },
            Err(e) => ResponseDescriptor {
                status: None,
                duration: started.elapsed(),
                error: Some(e.to_string()),
            },
        };

        let mut record = record.finish(descriptor.request_failed());
        if let Some(status) = descriptor.status {
            record = record.with_attr("status", status.to_string());
        }
        self.reporter.add_operation(record);

        descriptor
    }
}
