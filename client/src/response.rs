use std::time::Duration;

/// What came back from one HTTP request, shaped for uniform checking.
///
/// Transport failures are carried in [ResponseDescriptor::error] rather than being raised, so
/// that a connection refused, a timeout and a non-2xx status can all be fed through the same
/// checks without branching in the behaviour code.
#[derive(Debug, Clone)]
pub struct ResponseDescriptor {
    /// The HTTP status code, absent when the request never produced a response.
    pub status: Option<u16>,
    /// Time from sending the request until the response status and headers were received.
    pub duration: Duration,
    /// The transport error that prevented a response, if any.
    pub error: Option<String>,
}

impl ResponseDescriptor {
    pub fn is_status(&self, status: u16) -> bool {
        self.status == Some(status)
    }

    /// Whether this request counts as failed for the purposes of the failure-rate threshold.
    ///
    /// A request fails when transport failed or the status is outside 200-399.
    pub fn request_failed(&self) -> bool {
        match self.status {
            Some(status) => !(200..400).contains(&status),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(status: Option<u16>, error: Option<&str>) -> ResponseDescriptor {
        ResponseDescriptor {
            status,
            duration: Duration::from_millis(5),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn created_is_not_a_failure() {
        let res = descriptor(Some(201), None);
        assert!(res.is_status(201));
        assert!(!res.request_failed());
    }

    #[test]
    fn non_success_statuses_fail() {
        assert!(descriptor(Some(500), None).request_failed());
        assert!(descriptor(Some(404), None).request_failed());
        assert!(!descriptor(Some(302), None).request_failed());
    }

    #[test]
    fn missing_response_is_a_failure() {
        let res = descriptor(None, Some("connection refused"));
        assert!(res.request_failed());
        assert!(!res.is_status(201));
    }
}
