//! Explicit mapping from pane kind to constructor.

use tracing::debug;

use super::{PaneKind, PaneOverlay};
use crate::settings::GridSettings;
use crate::surface::{Surface, SurfaceProvider};

/// Builds a pane around the surface created for it.
pub type PaneConstructor = fn(Box<dyn Surface>, &GridSettings) -> PaneOverlay;

/// Which constructor builds which pane kind.
#[derive(Clone)]
pub struct PaneRegistry {
    constructors: Vec<(PaneKind, PaneConstructor)>,
}

impl std::fmt::Debug for PaneRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.constructors.iter().map(|(kind, _)| kind))
            .finish()
    }
}

impl Default for PaneRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl PaneRegistry {
    /// An empty registry. The master pane still gets built by [`PaneRegistry::build`].
    pub fn empty() -> Self {
        Self {
            constructors: Vec::new(),
        }
    }

    /// Registry with a constructor for every kind.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(PaneKind::Master, |surface, settings| {
            PaneOverlay::new(PaneKind::Master, surface, settings)
        });
        registry.register(PaneKind::Left, |surface, settings| {
            PaneOverlay::new(PaneKind::Left, surface, settings)
        });
        registry.register(PaneKind::Top, |surface, settings| {
            PaneOverlay::new(PaneKind::Top, surface, settings)
        });
        registry.register(PaneKind::Bottom, |surface, settings| {
            PaneOverlay::new(PaneKind::Bottom, surface, settings)
        });
        registry.register(PaneKind::TopLeftCorner, |surface, settings| {
            PaneOverlay::new(PaneKind::TopLeftCorner, surface, settings)
        });
        registry.register(PaneKind::BottomLeftCorner, |surface, settings| {
            PaneOverlay::new(PaneKind::BottomLeftCorner, surface, settings)
        });
        registry
    }

    /// Register (or replace) the constructor for `kind`.
    pub fn register(&mut self, kind: PaneKind, constructor: PaneConstructor) {
        if let Some(entry) = self.constructors.iter_mut().find(|(k, _)| *k == kind) {
            entry.1 = constructor;
        } else {
            self.constructors.push((kind, constructor));
        }
    }

    pub fn constructor(&self, kind: PaneKind) -> Option<PaneConstructor> {
        self.constructors
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, constructor)| *constructor)
    }

    /// Build the panes listed in `settings.panes`, in refresh order.
    ///
    /// Duplicates are ignored and the master pane is always built. Kinds
    /// without a registered constructor are skipped.
    pub fn build(
        &self,
        settings: &GridSettings,
        provider: &mut dyn SurfaceProvider,
    ) -> Vec<PaneOverlay> {
        let mut kinds: Vec<PaneKind> = settings.panes.clone();
        kinds.push(PaneKind::Master);
        kinds.sort_by_key(|kind| kind.refresh_rank());
        kinds.dedup();

        kinds
            .into_iter()
            .filter_map(|kind| {
                let constructor: PaneConstructor = match self.constructor(kind) {
                    Some(constructor) => constructor,
                    None if kind == PaneKind::Master => default_master,
                    None => {
                        debug!(pane = kind.name(), "no constructor registered");
                        return None;
                    }
                };
                Some(constructor(provider.create_surface(kind), settings))
            })
            .collect()
    }
}

fn default_master(surface: Box<dyn Surface>, settings: &GridSettings) -> PaneOverlay {
    PaneOverlay::new(PaneKind::Master, surface, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurfaceProvider;

    #[test]
    fn test_build_orders_and_dedups() {
        let mut settings = GridSettings::new(10, 10);
        settings.panes = vec![PaneKind::Left, PaneKind::TopLeftCorner, PaneKind::Left];
        let mut provider = MemorySurfaceProvider::new();

        let panes = PaneRegistry::standard().build(&settings, &mut provider);
        let kinds: Vec<PaneKind> = panes.iter().map(PaneOverlay::kind).collect();
        assert_eq!(
            kinds,
            vec![PaneKind::TopLeftCorner, PaneKind::Left, PaneKind::Master]
        );
        assert!(provider.surface(PaneKind::Top).is_none());
    }

    #[test]
    fn test_master_always_built() {
        let mut settings = GridSettings::new(10, 10);
        settings.panes = vec![PaneKind::Left];
        let mut provider = MemorySurfaceProvider::new();

        let panes = PaneRegistry::empty().build(&settings, &mut provider);
        assert_eq!(panes.len(), 1);
        assert_eq!(panes.first().map(PaneOverlay::kind), Some(PaneKind::Master));
    }
}
