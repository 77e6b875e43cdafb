//! Ordered registry of probes constituting "all tests" for a run.

use crate::core::Probe;
use std::sync::Arc;

/// An ordered list of probes, immutable for the duration of a run.
///
/// Entries are distinct trait objects even when display names repeat (the
/// three sound-band probes, for example, may all report under a shared
/// dialog). The registry is cheap to clone, so rebuilding the probe set
/// between runs means constructing a fresh orchestrator over a new one.
#[derive(Clone, Default)]
pub struct ProbeRegistry {
    entries: Vec<Arc<dyn Probe>>,
}

impl ProbeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a probe to the end of the run order.
    pub fn register(&mut self, probe: Arc<dyn Probe>) {
        log::debug!("Registered probe '{}' at index {}", probe.name(), self.entries.len());
        self.entries.push(probe);
    }

    /// Number of registered probes.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// True when no probes are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the probe at `index`, if any.
    pub fn at(&self, index: usize) -> Option<Arc<dyn Probe>> {
        self.entries.get(index).cloned()
    }

    /// Registry names in run order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|p| p.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Verdict;
    use async_trait::async_trait;

    struct NamedProbe(&'static str);

    #[async_trait]
    impl Probe for NamedProbe {
        fn name(&self) -> String {
            self.0.to_string()
        }

        async fn execute(&self) -> anyhow::Result<Verdict> {
            Ok(Verdict::pass(self.0, "ok"))
        }
    }

    #[test]
    fn registry_preserves_order() {
        let mut registry = ProbeRegistry::new();
        registry.register(Arc::new(NamedProbe("Vibration")));
        registry.register(Arc::new(NamedProbe("Touch Tracking")));
        registry.register(Arc::new(NamedProbe("Geolocation")));

        assert_eq!(registry.count(), 3);
        assert_eq!(
            registry.names(),
            vec!["Vibration", "Touch Tracking", "Geolocation"]
        );
        assert_eq!(registry.at(1).map(|p| p.name()).as_deref(), Some("Touch Tracking"));
        assert!(registry.at(3).is_none());
    }

    #[test]
    fn duplicate_names_are_distinct_entries() {
        let mut registry = ProbeRegistry::new();
        registry.register(Arc::new(NamedProbe("Sound Test")));
        registry.register(Arc::new(NamedProbe("Sound Test")));
        assert_eq!(registry.count(), 2);
        assert!(!Arc::ptr_eq(
            &registry.at(0).unwrap(),
            &registry.at(1).unwrap()
        ));
    }
}
