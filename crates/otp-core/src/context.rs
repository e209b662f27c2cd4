//! Decode context entries published by training plan documents

use crate::zone::ZoneSystem;
use otp_remote::RemoteResource;

/// The zone system in effect for every intensity decoded under a plan
///
/// Published by the plan root before its subtree is bound. May still be a
/// pending reference at that point; intensities resolve their own copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveZoneSystem(RemoteResource<ZoneSystem>);

impl ActiveZoneSystem {
    /// Create entry
    #[inline]
    #[must_use]
    pub fn new(zone_system: RemoteResource<ZoneSystem>) -> Self {
        Self(zone_system)
    }

    /// The zone system cell
    #[inline]
    #[must_use]
    pub fn zone_system(&self) -> &RemoteResource<ZoneSystem> {
        &self.0
    }
}

impl From<ZoneSystem> for ActiveZoneSystem {
    fn from(system: ZoneSystem) -> Self {
        Self(RemoteResource::inline(system))
    }
}
