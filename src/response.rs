extern crate chrono;
use chrono::offset::Utc;
use chrono::{
    Duration,
    NaiveDateTime,
};

/// Which of the expected patterns ended a command exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The expected success pattern (success code, or the outlet's status line).
    Success,
    /// The outlet reference error code (E102).
    OutletError,
    /// Some other error code.
    DeviceError,
    /// Nothing expected showed up before the timeout.
    Timeout,
}

/// Response is the result of one command exchange with the device -- the command(s) sent, what
/// came back, and which expected pattern (if any) ended the exchange. It only lives for the
/// duration of one operation.
#[derive(Debug)]
pub struct Response {
    /// The host(name) of the device being interacted with.
    pub host: String,
    /// The command(s) sent, joined with "; " when more than one.
    pub input: String,
    /// "Raw" (bytes) output received before the match.
    pub raw_result: Vec<u8>,
    /// Output of the operation as a string -- the raw output, or, for status queries, the status
    /// line.
    pub result: String,
    /// The text that matched.
    pub matched: String,
    /// What kind of pattern matched.
    pub kind: MatchKind,
    /// Starting time of the operation represented by this `Response`.
    pub start_time: NaiveDateTime,
    /// Ending time of the operation represented by this `Response`.
    pub end_time: NaiveDateTime,
    /// Total time the operation represented by this `Response` took.
    pub elapsed_time: Duration,
}

impl Response {
    /// Initializes a new `Response` object; until something is recorded it counts as timed out.
    #[must_use]
    pub fn new(
        input: &str,
        host: &str,
    ) -> Self {
        let now = Utc::now().naive_utc();

        Self {
            host: host.to_owned(),
            input: input.to_owned(),
            raw_result: vec![],
            result: String::new(),
            matched: String::new(),
            kind: MatchKind::Timeout,
            start_time: now,
            end_time: now,
            elapsed_time: Duration::zero(),
        }
    }

    fn stop_clock(&mut self) {
        self.end_time = Utc::now().naive_utc();

        self.elapsed_time = self.end_time - self.start_time;
    }

    /// Record the outcome of the exchange.
    pub fn record(
        &mut self,
        kind: MatchKind,
        before: Vec<u8>,
        matched: &[u8],
    ) {
        self.stop_clock();

        self.result = String::from_utf8_lossy(&before).into_owned();
        self.raw_result = before;
        self.matched = String::from_utf8_lossy(matched).into_owned();
        self.kind = kind;
    }

    /// Record that nothing expected arrived in time.
    pub fn record_timeout(&mut self) {
        self.stop_clock();

        self.kind = MatchKind::Timeout;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_response_is_timeout() {
        let resp = Response::new("olOn 1", "pdu");

        assert_eq!(resp.kind, MatchKind::Timeout);
    }

    #[test]
    fn test_record() {
        let mut resp = Response::new("olOn 1", "pdu");
        resp.record(MatchKind::Success, b"olOn 1\r\n".to_vec(), b"E000: Success");

        assert_eq!(resp.kind, MatchKind::Success);
        assert_eq!(resp.result, "olOn 1\r\n");
        assert_eq!(resp.matched, "E000: Success");
        assert!(resp.end_time >= resp.start_time);
    }
}
