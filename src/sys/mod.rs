//! Platform capability hosts.
//!
//! Android is currently the only platform with a revocable runtime-capability
//! model; every other target gets [`DirectHost`], which skips the consent
//! cycle entirely.

#[cfg(target_os = "android")]
mod android;

#[cfg(target_os = "android")]
pub use android::{AndroidHost, deliver_consent_result};

#[cfg(not(target_os = "android"))]
mod direct;

#[cfg(not(target_os = "android"))]
pub use direct::DirectHost;
