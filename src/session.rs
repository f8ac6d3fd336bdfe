//! The splash session: one display-then-transition cycle.

use std::time::{Duration, Instant};

use futures_timer::Delay;

use crate::cycle::{ConsentCycle, CycleStep};
use crate::{CapabilityHost, Error, Navigator, SplashConfig, SplashSurface, frame, reconcile};

/// How the session reaches the timed transition, chosen once at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStrategy {
    /// No revocable-capability model on this platform; go straight to the
    /// timed transition with the full display window remaining.
    Direct,
    /// Hold the transition until every declared capability is granted.
    ConsentGated,
}

impl TransitionStrategy {
    /// Select the strategy for `host`.
    pub fn select<H: CapabilityHost>(host: &H) -> Self {
        if host.runtime_consent_required() {
            Self::ConsentGated
        } else {
            Self::Direct
        }
    }
}

/// One splash screen display, from creation to navigation.
///
/// The session records its start instant at construction, so create it when
/// the splash screen is created: the minimum display duration is measured
/// from that moment, not from when [`run`](Self::run) is polled.
///
/// [`run`](Self::run) consumes the session, so navigation happens at most
/// once per session no matter how many consent round-trips occur. Dropping
/// the future before completion cancels the session.
#[derive(Debug)]
pub struct SplashSession {
    config: SplashConfig,
    started: Instant,
}

impl SplashSession {
    /// Create a session for `config`, capturing the start instant now.
    #[must_use]
    pub fn new(config: SplashConfig) -> Self {
        Self {
            config,
            started: Instant::now(),
        }
    }

    /// Time elapsed since the session started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left in the minimum display window, clamped to zero.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.config.minimum_display().saturating_sub(self.elapsed())
    }

    /// Run the session to completion: acquire consent if the platform
    /// requires it, wait out the remainder of the display window, then
    /// navigate to the configured destination and dismiss the splash.
    ///
    /// # Errors
    /// - [`Error::Decode`] if a configured image blob cannot be decoded.
    /// - [`Error::Manifest`] if the declared capability list is unreadable.
    /// - [`Error::Platform`] / [`Error::Interrupted`] from the consent flow.
    /// - [`Error::ConsentExhausted`] if a configured attempt limit runs out.
    pub async fn run<H, S, N>(self, host: &mut H, surface: &mut S, nav: &mut N) -> Result<(), Error>
    where
        H: CapabilityHost,
        S: SplashSurface,
        N: Navigator,
    {
        // Decode both blobs up front so a bad configuration fails before
        // anything is displayed.
        let primary = frame::decode(self.config.primary_image())?;

        let strategy = TransitionStrategy::select(host);
        log::info!("splash session started ({strategy:?})");

        if strategy == TransitionStrategy::ConsentGated {
            let waiting = frame::decode(self.config.waiting_image())?;
            surface.display(&waiting);
            self.acquire_consent(host).await?;
        }

        let remaining = self.remaining();
        if !remaining.is_zero() {
            // Only swap to the branding image when there is still time to
            // show it; when the consent cycle consumed the whole window,
            // swapping now would flicker for a single frame.
            surface.display(&primary);
            Delay::new(remaining).await;
        }

        log::info!(
            "splash complete after {:?}, starting {}",
            self.elapsed(),
            self.config.destination()
        );
        nav.start_screen(self.config.destination());
        nav.dismiss_current();
        Ok(())
    }

    /// Drive the consent cycle until every declared capability is granted.
    async fn acquire_consent<H: CapabilityHost>(&self, host: &mut H) -> Result<(), Error> {
        let mut cycle = ConsentCycle::new(self.config.consent_attempt_limit());
        loop {
            let declared = self.config.resolve_capabilities(host)?;
            let needed = reconcile::still_needed(declared, |c| host.consent_status(c));
            match cycle.check(needed)? {
                CycleStep::Satisfied => return Ok(()),
                CycleStep::Request {
                    capabilities,
                    request_id,
                } => {
                    let responded = host.request_consent(&capabilities, request_id).await?;
                    if !cycle.acknowledge(responded) {
                        // A host must resolve with the outstanding request's
                        // id; anything else would let a second request be
                        // issued while one is still in flight.
                        return Err(Error::Platform(format!(
                            "consent response id {responded} does not match request {request_id}"
                        )));
                    }
                }
            }
        }
    }
}
