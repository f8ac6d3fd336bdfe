//! The consent request/response state machine.
//!
//! A cycle alternates between checking what is still needed and waiting for
//! the user's response to a consent request. Denied capabilities reappear as
//! still-needed on the next check and are requested again, so the cycle can
//! repeat indefinitely unless an attempt limit is configured.

use std::collections::BTreeSet;

use crate::Error;

/// The fixed identifier tagging every consent request issued by a splash
/// session. Response callbacks carrying any other identifier are ignored.
pub const CONSENT_REQUEST_ID: u32 = 4646;

/// What the cycle should do next after a reconciliation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleStep {
    /// Issue a platform consent request for exactly these capabilities.
    Request {
        /// The still-needed capabilities, duplicate-free.
        capabilities: Vec<String>,
        /// The identifier the response must carry.
        request_id: u32,
    },
    /// Every declared capability is granted; proceed to the timed transition.
    Satisfied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingCheck,
    AwaitingUserResponse { request_id: u32 },
    Satisfied,
}

/// Drives the platform's interactive consent flow to completion.
///
/// At most one consent request is outstanding at any time: a new request is
/// only issued from `AwaitingCheck`, which is only re-entered once the
/// outstanding request's response has been acknowledged.
#[derive(Debug)]
pub struct ConsentCycle {
    state: State,
    attempts: u32,
    attempt_limit: Option<u32>,
}

impl ConsentCycle {
    /// Create a cycle, optionally bounding the number of requests issued.
    #[must_use]
    pub fn new(attempt_limit: Option<u32>) -> Self {
        Self {
            state: State::AwaitingCheck,
            attempts: 0,
            attempt_limit,
        }
    }

    /// Whether the cycle has reached its terminal state.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.state == State::Satisfied
    }

    /// Feed the result of a reconciliation pass.
    ///
    /// An empty `still_needed` set moves the cycle to its terminal state
    /// without any request being issued. A non-empty set yields the request
    /// to issue and moves the cycle to awaiting the user's response.
    ///
    /// # Errors
    /// Returns [`Error::ConsentExhausted`] when an attempt limit is set and
    /// issuing this request would exceed it.
    pub fn check(&mut self, still_needed: BTreeSet<String>) -> Result<CycleStep, Error> {
        if still_needed.is_empty() {
            log::info!("all declared capabilities granted");
            self.state = State::Satisfied;
            return Ok(CycleStep::Satisfied);
        }

        if let Some(limit) = self.attempt_limit
            && self.attempts >= limit
        {
            log::info!("consent attempt limit ({limit}) reached, giving up");
            return Err(Error::ConsentExhausted);
        }

        self.attempts += 1;
        self.state = State::AwaitingUserResponse {
            request_id: CONSENT_REQUEST_ID,
        };
        log::info!(
            "requesting consent for {} capabilities (attempt {})",
            still_needed.len(),
            self.attempts
        );
        Ok(CycleStep::Request {
            capabilities: still_needed.into_iter().collect(),
            request_id: CONSENT_REQUEST_ID,
        })
    }

    /// Acknowledge a consent response callback.
    ///
    /// Returns `true` and re-arms the next check when `request_id` matches
    /// the outstanding request, whatever mix of grants and denials the user
    /// chose. Responses with a stale or foreign identifier are ignored.
    pub fn acknowledge(&mut self, request_id: u32) -> bool {
        match self.state {
            State::AwaitingUserResponse { request_id: outstanding }
                if outstanding == request_id =>
            {
                self.state = State::AwaitingCheck;
                true
            }
            _ => {
                log::debug!("ignoring consent response with id {request_id}");
                false
            }
        }
    }
}
