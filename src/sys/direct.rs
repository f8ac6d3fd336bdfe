//! Host for platforms without a revocable runtime-capability model.

use crate::{CapabilityHost, ConsentStatus, Error};

/// Capability host for platforms where permissions are granted at install
/// time and cannot be revoked afterwards.
///
/// A session running against this host bypasses the consent cycle and goes
/// straight to the timed transition with the full display window remaining.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectHost;

impl CapabilityHost for DirectHost {
    fn runtime_consent_required(&self) -> bool {
        false
    }

    fn declared_capabilities(&self) -> Result<Vec<String>, Error> {
        Ok(Vec::new())
    }

    fn consent_status(&self, _capability: &str) -> ConsentStatus {
        ConsentStatus::Granted
    }

    async fn request_consent(
        &mut self,
        _capabilities: &[String],
        request_id: u32,
    ) -> Result<u32, Error> {
        Ok(request_id)
    }
}
