//! Scenario tests for the full splash session, using mock collaborators.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use splashkit::{
    CapabilityHost, ConsentStatus, Error, Frame, Navigator, SplashConfig, SplashSession,
    SplashSurface,
};

/// Scriptable capability host: declares a fixed list, grants everything it
/// was asked about once `grant_on_attempt` request round-trips have happened.
struct MockHost {
    consent_required: bool,
    declared: Vec<String>,
    granted: BTreeSet<String>,
    grant_on_attempt: Option<u32>,
    response_delay: Duration,
    attempts: u32,
    requests: Vec<Vec<String>>,
}

impl MockHost {
    fn new<const N: usize>(declared: [&str; N]) -> Self {
        Self {
            consent_required: true,
            declared: declared.iter().map(|s| (*s).to_string()).collect(),
            granted: BTreeSet::new(),
            grant_on_attempt: None,
            response_delay: Duration::ZERO,
            attempts: 0,
            requests: Vec::new(),
        }
    }

    fn granted(mut self, capability: &str) -> Self {
        self.granted.insert(capability.to_string());
        self
    }

    fn grant_on_attempt(mut self, attempt: u32) -> Self {
        self.grant_on_attempt = Some(attempt);
        self
    }

    fn response_delay(mut self, delay: Duration) -> Self {
        self.response_delay = delay;
        self
    }
}

impl CapabilityHost for MockHost {
    fn runtime_consent_required(&self) -> bool {
        self.consent_required
    }

    fn declared_capabilities(&self) -> Result<Vec<String>, Error> {
        Ok(self.declared.clone())
    }

    fn consent_status(&self, capability: &str) -> ConsentStatus {
        if self.granted.contains(capability) {
            ConsentStatus::Granted
        } else {
            ConsentStatus::Denied
        }
    }

    async fn request_consent(
        &mut self,
        capabilities: &[String],
        request_id: u32,
    ) -> Result<u32, Error> {
        self.requests.push(capabilities.to_vec());
        self.attempts += 1;
        if !self.response_delay.is_zero() {
            futures_timer::Delay::new(self.response_delay).await;
        }
        if self.grant_on_attempt.is_some_and(|n| self.attempts >= n) {
            for capability in capabilities {
                self.granted.insert(capability.clone());
            }
        }
        Ok(request_id)
    }
}

#[derive(Default)]
struct MockSurface {
    displayed: Vec<Frame>,
}

impl SplashSurface for MockSurface {
    fn display(&mut self, frame: &Frame) {
        self.displayed.push(frame.clone());
    }
}

#[derive(Default)]
struct MockNav {
    started: Vec<String>,
    dismissed: u32,
}

impl Navigator for MockNav {
    fn start_screen(&mut self, destination: &str) {
        self.started.push(destination.to_string());
    }

    fn dismiss_current(&mut self) {
        self.dismissed += 1;
    }
}

fn short_config() -> SplashConfig {
    SplashConfig::new("main").with_minimum_display(Duration::from_millis(20))
}

#[tokio::test]
async fn no_consent_model_waits_full_window_and_navigates() {
    let mut host = MockHost::new([]);
    host.consent_required = false;
    let mut surface = MockSurface::default();
    let mut nav = MockNav::default();

    let started = Instant::now();
    let config = SplashConfig::new("main").with_minimum_display(Duration::from_millis(40));
    SplashSession::new(config)
        .run(&mut host, &mut surface, &mut nav)
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_millis(40));
    assert!(host.requests.is_empty(), "consent cycle must be bypassed");
    // Only the primary image is ever shown on the direct path.
    assert_eq!(surface.displayed.len(), 1);
    assert_eq!(nav.started, ["main"]);
    assert_eq!(nav.dismissed, 1);
}

#[tokio::test]
async fn all_granted_issues_no_requests() {
    let mut host = MockHost::new(["camera", "storage"])
        .granted("camera")
        .granted("storage");
    let mut surface = MockSurface::default();
    let mut nav = MockNav::default();

    SplashSession::new(short_config())
        .run(&mut host, &mut surface, &mut nav)
        .await
        .unwrap();

    assert!(host.requests.is_empty());
    // Waiting image, then the primary image for the remaining window.
    assert_eq!(surface.displayed.len(), 2);
    assert_eq!(nav.started, ["main"]);
}

#[tokio::test]
async fn duplicates_collapse_and_only_ungranted_are_requested() {
    let mut host = MockHost::new(["camera", "camera", "storage"])
        .granted("camera")
        .grant_on_attempt(1);
    let mut surface = MockSurface::default();
    let mut nav = MockNav::default();

    SplashSession::new(short_config())
        .run(&mut host, &mut surface, &mut nav)
        .await
        .unwrap();

    assert_eq!(host.requests, [vec!["storage".to_string()]]);
    assert_eq!(nav.started, ["main"]);
}

#[tokio::test]
async fn repeated_denial_still_navigates_exactly_once() {
    let mut host = MockHost::new(["camera", "storage"]).grant_on_attempt(3);
    let mut surface = MockSurface::default();
    let mut nav = MockNav::default();

    SplashSession::new(short_config())
        .run(&mut host, &mut surface, &mut nav)
        .await
        .unwrap();

    assert_eq!(host.requests.len(), 3, "denials must be re-requested");
    assert_eq!(nav.started, ["main"]);
    assert_eq!(nav.dismissed, 1);
}

#[tokio::test]
async fn consent_overrun_clamps_wait_and_skips_image_swap() {
    // 20 ms window, but the single consent round-trip takes 60 ms: the
    // remaining wait clamps to zero and the waiting image stays on screen.
    let mut host = MockHost::new(["storage"])
        .grant_on_attempt(1)
        .response_delay(Duration::from_millis(60));
    let mut surface = MockSurface::default();
    let mut nav = MockNav::default();

    SplashSession::new(short_config())
        .run(&mut host, &mut surface, &mut nav)
        .await
        .unwrap();

    assert_eq!(
        surface.displayed.len(),
        1,
        "must not swap back to the primary image after the window is spent"
    );
    assert_eq!(nav.started, ["main"]);
}

#[tokio::test]
async fn attempt_limit_aborts_without_navigating() {
    let mut host = MockHost::new(["camera"]); // never granted
    let mut surface = MockSurface::default();
    let mut nav = MockNav::default();

    let config = short_config().with_consent_attempt_limit(2);
    let result = SplashSession::new(config)
        .run(&mut host, &mut surface, &mut nav)
        .await;

    assert!(matches!(result, Err(Error::ConsentExhausted)));
    assert_eq!(host.requests.len(), 2);
    assert!(nav.started.is_empty());
    assert_eq!(nav.dismissed, 0);
}

#[tokio::test]
async fn explicit_capability_list_overrides_manifest() {
    // The manifest declares camera, but the config filters the gate down to
    // storage only.
    let mut host = MockHost::new(["camera"]).grant_on_attempt(1);
    let mut surface = MockSurface::default();
    let mut nav = MockNav::default();

    let config = short_config().with_capabilities(["storage"]);
    SplashSession::new(config)
        .run(&mut host, &mut surface, &mut nav)
        .await
        .unwrap();

    assert_eq!(host.requests, [vec!["storage".to_string()]]);
}

#[tokio::test]
async fn undecodable_primary_image_is_a_configuration_error() {
    let mut host = MockHost::new([]);
    host.consent_required = false;
    let mut surface = MockSurface::default();
    let mut nav = MockNav::default();

    let config = short_config().with_primary_image(&b"not an image"[..]);
    let result = SplashSession::new(config)
        .run(&mut host, &mut surface, &mut nav)
        .await;

    assert!(matches!(result, Err(Error::Decode(_))));
    assert!(surface.displayed.is_empty());
    assert!(nav.started.is_empty());
}

#[tokio::test]
async fn unreadable_manifest_is_fatal() {
    struct BrokenManifest;

    impl CapabilityHost for BrokenManifest {
        fn runtime_consent_required(&self) -> bool {
            true
        }
        fn declared_capabilities(&self) -> Result<Vec<String>, Error> {
            Err(Error::Manifest("descriptor missing".into()))
        }
        fn consent_status(&self, _capability: &str) -> ConsentStatus {
            ConsentStatus::NotDetermined
        }
        async fn request_consent(
            &mut self,
            _capabilities: &[String],
            request_id: u32,
        ) -> Result<u32, Error> {
            Ok(request_id)
        }
    }

    let mut surface = MockSurface::default();
    let mut nav = MockNav::default();
    let result = SplashSession::new(short_config())
        .run(&mut BrokenManifest, &mut surface, &mut nav)
        .await;

    assert!(matches!(result, Err(Error::Manifest(_))));
    assert!(nav.started.is_empty());
}
