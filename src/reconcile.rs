//! Capability reconciliation: declared versus granted.

use std::collections::BTreeSet;

use crate::ConsentStatus;

/// Compute the set of declared capabilities that still need user consent.
///
/// The declared list may contain duplicates; they are collapsed, so the
/// result is a duplicate-free subset of the input. Each capability's consent
/// state is queried live through `status_of` — nothing is cached, because
/// the user may grant or revoke externally between passes.
pub fn still_needed<I, S, F>(declared: I, status_of: F) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    F: Fn(&str) -> ConsentStatus,
{
    let deduplicated: BTreeSet<String> = declared.into_iter().map(Into::into).collect();

    let mut needed = BTreeSet::new();
    for capability in deduplicated {
        let status = status_of(&capability);
        if status.is_granted() {
            log::debug!("capability {capability} already granted");
        } else {
            log::debug!("capability {capability} not yet granted ({status:?})");
            needed.insert(capability);
        }
    }
    needed
}
