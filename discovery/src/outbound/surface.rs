//! In-memory map surface.
//!
//! Used by the CLI, which has no display, and by tests that inspect the
//! marker layer directly.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    ClickHandler, InitError, MapSurface, MapView, MarkerId, MarkerSpec, MountTarget,
    PlacedMarker, SurfaceFactory, SurfaceOptions,
};

struct Entry {
    placed: PlacedMarker,
    on_click: Option<ClickHandler>,
}

/// Surface that keeps its camera and markers in memory.
pub struct InMemorySurface {
    view: MapView,
    markers: BTreeMap<MarkerId, Entry>,
    next_id: u64,
}

impl InMemorySurface {
    /// Surface positioned by `options`.
    pub fn new(options: &SurfaceOptions) -> Self {
        Self {
            view: MapView {
                center: options.center,
                zoom: options.zoom,
            },
            markers: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl MapSurface for InMemorySurface {
    fn set_view(&mut self, view: MapView) {
        self.view = view;
    }

    fn view(&self) -> MapView {
        self.view
    }

    fn add_marker(&mut self, spec: MarkerSpec) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        let MarkerSpec {
            position,
            title,
            style,
            on_click,
        } = spec;
        self.markers.insert(
            id,
            Entry {
                placed: PlacedMarker {
                    id,
                    position,
                    title,
                    style,
                },
                on_click,
            },
        );
        id
    }

    fn remove_marker(&mut self, id: MarkerId) -> bool {
        self.markers.remove(&id).is_some()
    }

    fn markers(&self) -> Vec<PlacedMarker> {
        self.markers
            .values()
            .map(|entry| entry.placed.clone())
            .collect()
    }

    fn click(&self, id: MarkerId) -> bool {
        let Some(entry) = self.markers.get(&id) else {
            return false;
        };
        if let Some(handler) = &entry.on_click {
            handler();
        }
        true
    }
}

/// Factory creating [`InMemorySurface`]s on registered mount targets.
#[derive(Debug, Default)]
pub struct InMemorySurfaceFactory {
    targets: Mutex<HashSet<String>>,
}

impl InMemorySurfaceFactory {
    /// Factory accepting the given mount targets.
    pub fn with_targets<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: Mutex::new(targets.into_iter().map(Into::into).collect()),
        }
    }

    /// Make `target` available for mounting.
    pub fn register(&self, target: &MountTarget) {
        self.targets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(target.as_str().to_owned());
    }
}

#[async_trait]
impl SurfaceFactory for InMemorySurfaceFactory {
    async fn create(
        &self,
        target: &MountTarget,
        options: &SurfaceOptions,
    ) -> Result<Box<dyn MapSurface>, InitError> {
        let mounted = self
            .targets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(target.as_str());
        if !mounted {
            return Err(InitError::target_missing(target.as_str()));
        }
        Ok(Box::new(InMemorySurface::new(options)))
    }
}
