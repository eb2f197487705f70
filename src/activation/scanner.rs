use super::{ActivationMarker, Phase};
use crate::module::ActivationModule;

/// Reads the markers of one phase off a module
pub struct MarkerScanner;

impl MarkerScanner {
    /// Markers of `phase` declared on `module`, in declaration order.
    ///
    /// A module whose metadata cannot be read yields no markers; the failure
    /// is logged and never propagated, so one broken module cannot block the rest.
    pub fn scan(module: &dyn ActivationModule, phase: Phase) -> Vec<ActivationMarker> {
        match module.markers() {
            Ok(markers) => {
                let markers: Vec<_> = markers
                    .into_iter()
                    .filter(|marker| marker.phase() == phase)
                    .collect();
                tracing::debug!("Scanned {}: {} {} marker(s)", module.id(), markers.len(), phase);
                markers
            }
            Err(e) => {
                tracing::warn!(
                    module = %module.id(),
                    "Skipping module during {} scan: {}",
                    phase,
                    e
                );
                Vec::new()
            }
        }
    }
}
