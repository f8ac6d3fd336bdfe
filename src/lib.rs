//! # Splashkit
//!
//! Splash-screen sequencing for mobile application shells: display a branding
//! image for a minimum duration and, on platforms with revocable runtime
//! permissions, hold the screen until the user has granted every capability
//! the application declares, then transition to the main screen exactly once.
//!
//! The crate is a pure coordination core. The platform pieces — permission
//! queries, the consent prompt, navigation, and the image surface — are
//! supplied by the host application through the [`CapabilityHost`],
//! [`SplashSurface`] and [`Navigator`] traits. Ready-made capability hosts
//! live in [`sys`]: a JNI-backed host on Android, and a pass-through host on
//! platforms where permissions are granted at install time and the consent
//! cycle does not apply.
//!
//! ## Example
//!
//! ```rust,no_run
//! use splashkit::{SplashConfig, SplashSession, sys};
//!
//! async fn splash(surface: &mut impl splashkit::SplashSurface,
//!                 nav: &mut impl splashkit::Navigator) -> Result<(), splashkit::Error> {
//!     let config = SplashConfig::new("main")
//!         .with_minimum_display(std::time::Duration::from_millis(1500));
//!     let mut host = sys::DirectHost;
//!     SplashSession::new(config).run(&mut host, surface, nav).await
//! }
//! ```
//!
//! Dropping the future returned by [`SplashSession::run`] cancels the
//! session: any pending consent response or transition timer becomes a no-op
//! and navigation can no longer happen. Do this when the splash screen is
//! destroyed before it finishes.

#![warn(missing_docs)]

pub mod config;
pub mod cycle;
pub mod frame;
pub mod reconcile;
pub mod session;
pub mod sys;

pub use config::{CapabilitySource, SplashConfig};
pub use cycle::{CONSENT_REQUEST_ID, ConsentCycle, CycleStep};
pub use frame::{Frame, decode};
pub use session::{SplashSession, TransitionStrategy};

/// The live consent state of a single capability.
///
/// Queried fresh on every reconciliation pass; never cached across passes,
/// because the user may grant or revoke capabilities externally while the
/// app runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsentStatus {
    /// The user has granted the capability.
    Granted,
    /// The user has denied the capability.
    Denied,
    /// The capability has not been requested yet, or its state could not
    /// be determined.
    NotDetermined,
}

impl ConsentStatus {
    /// Whether this status allows the gated transition to proceed.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Errors that can occur while running a splash session.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The declared-capability source (e.g. the app manifest) could not be
    /// read. This is a fatal configuration error: the session refuses to
    /// proceed with an empty permission set.
    #[error("declared capability list unavailable: {0}")]
    Manifest(String),

    /// An error occurred in the underlying platform implementation.
    #[error("platform error: {0}")]
    Platform(String),

    /// A configured splash image blob could not be decoded.
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// The consent flow was torn down before the user responded (e.g. the
    /// response channel closed because the screen was destroyed).
    #[error("consent flow interrupted")]
    Interrupted,

    /// The configured consent attempt limit was reached with capabilities
    /// still ungranted. See [`SplashConfig::with_consent_attempt_limit`].
    #[error("consent attempt limit reached")]
    ConsentExhausted,
}

/// Platform capability access, as seen by a splash session.
///
/// Implemented by the backends in [`sys`]; a host application only needs its
/// own implementation for testing or for unusual permission models.
#[allow(async_fn_in_trait)]
pub trait CapabilityHost {
    /// Whether this platform requires interactive consent at runtime.
    ///
    /// When this returns `false` the consent cycle is skipped entirely and
    /// the session proceeds straight to the timed transition.
    fn runtime_consent_required(&self) -> bool;

    /// The capabilities the application declares, read from the platform's
    /// static manifest or descriptor.
    ///
    /// # Errors
    /// Returns [`Error::Manifest`] if the declared-capability source cannot
    /// be resolved.
    fn declared_capabilities(&self) -> Result<Vec<String>, Error>;

    /// The current consent state of `capability`, queried live.
    fn consent_status(&self, capability: &str) -> ConsentStatus;

    /// Present the platform's consent UI for `capabilities`, tagged with
    /// `request_id`, and resolve once the user has responded.
    ///
    /// The returned value is the request identifier carried by the response
    /// callback; the session ignores responses whose identifier does not
    /// match the outstanding request.
    ///
    /// # Errors
    /// Returns [`Error::Platform`] if the request cannot be issued, or
    /// [`Error::Interrupted`] if the response will never arrive.
    async fn request_consent(&mut self, capabilities: &[String], request_id: u32)
    -> Result<u32, Error>;
}

/// The image surface owned by the presentation shell.
pub trait SplashSurface {
    /// Replace the displayed image with `frame`.
    fn display(&mut self, frame: &Frame);
}

/// Screen navigation, invoked exactly once per session.
pub trait Navigator {
    /// Start the screen identified by `destination`.
    fn start_screen(&mut self, destination: &str);

    /// Dismiss the splash screen, removing it from back-navigation history
    /// so that pressing back after the transition cannot return to it.
    fn dismiss_current(&mut self);
}
