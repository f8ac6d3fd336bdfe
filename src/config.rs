//! Splash session configuration.
//!
//! Every knob has a default except the destination screen, which is required
//! at construction time. The built-in images are embedded at compile time so
//! a host application gets a working splash screen with no assets of its own.

use std::borrow::Cow;
use std::time::Duration;

use crate::{CapabilityHost, Error};

/// Default minimum time the splash screen stays visible.
pub const DEFAULT_MINIMUM_DISPLAY: Duration = Duration::from_millis(1000);

/// Built-in branding image shown while waiting out the display window.
pub const DEFAULT_LOGO: &[u8] = include_bytes!("../assets/logo.png");

/// Built-in image shown while consent is being acquired.
pub const DEFAULT_WAITING: &[u8] = include_bytes!("../assets/waiting.png");

/// Where the declared capability list comes from.
#[derive(Debug, Clone)]
pub enum CapabilitySource {
    /// Read the platform's static manifest through
    /// [`CapabilityHost::declared_capabilities`]. The default.
    Manifest,
    /// An explicit list supplied by the host application, e.g. to filter
    /// out capabilities that should not gate the splash screen.
    Explicit(Vec<String>),
}

/// Configuration for a [`SplashSession`](crate::SplashSession).
#[derive(Debug, Clone)]
pub struct SplashConfig {
    destination: String,
    primary_image: Cow<'static, [u8]>,
    waiting_image: Cow<'static, [u8]>,
    minimum_display: Duration,
    capabilities: CapabilitySource,
    consent_attempt_limit: Option<u32>,
}

impl SplashConfig {
    /// Create a configuration transitioning to `destination` after the
    /// splash completes. All other settings start at their defaults.
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            primary_image: Cow::Borrowed(DEFAULT_LOGO),
            waiting_image: Cow::Borrowed(DEFAULT_WAITING),
            minimum_display: DEFAULT_MINIMUM_DISPLAY,
            capabilities: CapabilitySource::Manifest,
            consent_attempt_limit: None,
        }
    }

    /// Set the encoded branding image shown during the display window.
    #[must_use]
    pub fn with_primary_image(mut self, blob: impl Into<Cow<'static, [u8]>>) -> Self {
        self.primary_image = blob.into();
        self
    }

    /// Set the encoded image shown while consent is being acquired.
    #[must_use]
    pub fn with_waiting_image(mut self, blob: impl Into<Cow<'static, [u8]>>) -> Self {
        self.waiting_image = blob.into();
        self
    }

    /// Set the minimum time the splash screen stays visible, measured from
    /// session creation.
    #[must_use]
    pub fn with_minimum_display(mut self, duration: Duration) -> Self {
        self.minimum_display = duration;
        self
    }

    /// Gate the transition on an explicit capability list instead of the
    /// platform manifest.
    #[must_use]
    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = CapabilitySource::Explicit(
            capabilities.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Bound the number of consent round-trips.
    ///
    /// By default the session re-requests denied capabilities indefinitely.
    /// With a limit set, the session gives up after `limit` requests and
    /// returns [`Error::ConsentExhausted`](crate::Error::ConsentExhausted),
    /// letting the host decide what to do (typically exit).
    #[must_use]
    pub fn with_consent_attempt_limit(mut self, limit: u32) -> Self {
        self.consent_attempt_limit = Some(limit);
        self
    }

    /// The configured destination screen identifier.
    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// The encoded primary splash image.
    #[must_use]
    pub fn primary_image(&self) -> &[u8] {
        &self.primary_image
    }

    /// The encoded image shown during consent acquisition.
    #[must_use]
    pub fn waiting_image(&self) -> &[u8] {
        &self.waiting_image
    }

    /// The configured minimum display duration.
    #[must_use]
    pub fn minimum_display(&self) -> Duration {
        self.minimum_display
    }

    /// The configured consent attempt limit, if any.
    #[must_use]
    pub fn consent_attempt_limit(&self) -> Option<u32> {
        self.consent_attempt_limit
    }

    /// Resolve the declared capability list against `host`.
    ///
    /// # Errors
    /// Propagates [`Error::Manifest`](crate::Error::Manifest) when the list
    /// is manifest-derived and the manifest cannot be read.
    pub fn resolve_capabilities<H: CapabilityHost>(&self, host: &H) -> Result<Vec<String>, Error> {
        match &self.capabilities {
            CapabilitySource::Manifest => host.declared_capabilities(),
            CapabilitySource::Explicit(list) => Ok(list.clone()),
        }
    }
}
