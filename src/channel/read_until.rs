use super::Channel;
use crate::channel::patterns::line_end_pattern;
use crate::errors::ApcError;
use chrono::{
    Duration as ChronoDuration,
    Utc,
};
use core::time::Duration;
use regex::bytes::Regex;
use std::thread;

/// What a pattern wait found: which pattern matched, the matched text, and everything that came
/// before it. The buffer is consumed up to the end of the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    /// Index (into the slice of patterns waited for) of the pattern that matched.
    pub index: usize,
    /// Buffered output preceding the match.
    pub before: Vec<u8>,
    /// The matched text.
    pub matched: Vec<u8>,
}

impl Expectation {
    /// The preceding output as (lossy) utf-8.
    #[must_use]
    pub fn before_str(&self) -> String {
        String::from_utf8_lossy(&self.before).into_owned()
    }

    /// The matched text as (lossy) utf-8.
    #[must_use]
    pub fn matched_str(&self) -> String {
        String::from_utf8_lossy(&self.matched).into_owned()
    }
}

fn describe(patterns: &[Regex]) -> String {
    patterns
        .iter()
        .map(|p| format!("'{}'", p.as_str().escape_debug()))
        .collect::<Vec<String>>()
        .join(" or ")
}

impl Channel {
    /// Looks for the earliest match of any pattern in the buffer; ties go to the pattern listed
    /// first. On a match the buffer is consumed through the end of the match.
    fn take_earliest_match(
        &mut self,
        patterns: &[Regex],
    ) -> Option<Expectation> {
        let (index, start, end) = patterns
            .iter()
            .enumerate()
            .filter_map(|(index, p)| p.find(&self.buffer).map(|m| (index, m.start(), m.end())))
            .min_by_key(|&(index, start, _)| (start, index))?;

        let rest = self.buffer.split_off(end);
        let matched = self.buffer.split_off(start);
        let before = core::mem::replace(&mut self.buffer, rest);

        self.last_output.clone_from(&before);

        Some(Expectation {
            index,
            before,
            matched,
        })
    }

    /// Read until any of `patterns` shows up in the device output, or until `timeout` elapses.
    /// Output already buffered is searched first.
    ///
    /// # Errors
    ///
    /// Returns `ApcError::Timeout` if nothing matched in time (the buffer is left untouched), or a
    /// transport error.
    pub fn read_until_any(
        &mut self,
        patterns: &[Regex],
        timeout: Duration,
    ) -> Result<Expectation, ApcError> {
        let deadline = Utc::now()
            + ChronoDuration::from_std(timeout).map_err(|err| {
                ApcError::transport(format!(
                    "failed casting std Duration to chrono Duration, this shouldn't happen, error: {err}"
                ))
            })?;

        loop {
            if let Some(found) = self.take_earliest_match(patterns) {
                return Ok(found);
            }

            if deadline <= Utc::now() {
                return Err(ApcError::Timeout {
                    waiting_for: describe(patterns),
                    timeout,
                });
            }

            if self.read()? == 0 {
                thread::sleep(self.args.read_delay);
            }
        }
    }

    /// Read up to the next line terminator, returning the line without it.
    ///
    /// # Errors
    ///
    /// Returns `ApcError::Timeout` if no full line arrives in time, or a transport error.
    pub fn read_line(
        &mut self,
        timeout: Duration,
    ) -> Result<String, ApcError> {
        self.read_until_any(&[line_end_pattern()], timeout)
            .map(|found| found.before_str())
    }
}
