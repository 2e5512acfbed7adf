//! Render-loop driver for a set of items.
//!
//! [`Viewer`] owns the shared scene plus everything items need to acquire
//! their visuals, and advances them once per frame:
//!
//! ```rust,ignore
//! let mut viewer = Viewer::new(GltfStreamer::new("assets"));
//! let key = viewer.add_item(model, None)?;
//! let mut timer = Timer::new();
//! loop {
//!     if viewer.tick(timer.tick()) {
//!         // redraw
//!     }
//! }
//! ```

use glam::Vec3;
use slotmap::{SlotMap, new_key_type};

use crate::assets::streamer::AssetStreamer;
use crate::config::ItemSettings;
use crate::errors::Result;
use crate::item::VisualItem;
use crate::model::SharedModel;
use crate::parametric::ParametricRegistry;
use crate::scene::{NodeHandle, Scene, SharedScene};

new_key_type! {
    pub struct ItemKey;
}

/// Nearest item under a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub item: ItemKey,
    /// Distance along the ray, in world units.
    pub distance: f32,
    pub point: Vec3,
}

pub struct Viewer<S: AssetStreamer> {
    scene: SharedScene,
    streamer: S,
    registry: ParametricRegistry,
    settings: ItemSettings,
    items: SlotMap<ItemKey, VisualItem>,
}

impl<S: AssetStreamer> Viewer<S> {
    /// A viewer over a fresh scene with the built-in parametric families.
    pub fn new(streamer: S) -> Self {
        Self::with_scene(Scene::new().into_shared(), streamer)
    }

    pub fn with_scene(scene: SharedScene, streamer: S) -> Self {
        Self {
            scene,
            streamer,
            registry: ParametricRegistry::with_defaults(),
            settings: ItemSettings::default(),
            items: SlotMap::with_key(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ItemSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_registry(mut self, registry: ParametricRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn scene(&self) -> &SharedScene {
        &self.scene
    }

    #[must_use]
    pub fn streamer(&self) -> &S {
        &self.streamer
    }

    #[must_use]
    pub fn settings(&self) -> &ItemSettings {
        &self.settings
    }

    // ========================================================================
    // Items
    // ========================================================================

    /// Creates the visual for `model` under `parent` (scene root if `None`).
    pub fn add_item(&mut self, model: SharedModel, parent: Option<NodeHandle>) -> Result<ItemKey> {
        let item = VisualItem::new(
            model,
            self.scene.clone(),
            parent,
            &self.streamer,
            &self.registry,
            &self.settings,
        )?;
        Ok(self.items.insert(item))
    }

    /// Disposes the item and deletes its nodes. Returns whether it existed.
    pub fn remove_item(&mut self, key: ItemKey) -> bool {
        let Some(mut item) = self.items.remove(key) else {
            return false;
        };
        item.dispose();
        self.scene.borrow_mut().remove_node(item.node());
        true
    }

    #[must_use]
    pub fn item(&self, key: ItemKey) -> Option<&VisualItem> {
        self.items.get(key)
    }

    pub fn item_mut(&mut self, key: ItemKey) -> Option<&mut VisualItem> {
        self.items.get_mut(key)
    }

    pub fn items(&self) -> impl Iterator<Item = (ItemKey, &VisualItem)> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Re-acquires an item's visual after its asset reference changed.
    pub fn reload_item(&mut self, key: ItemKey) -> Result<bool> {
        let Some(item) = self.items.get_mut(key) else {
            return Ok(false);
        };
        item.reacquire(&self.streamer, &self.registry)?;
        Ok(true)
    }

    /// Selects `key` and deselects everything else. `None` clears selection.
    pub fn select(&mut self, key: Option<ItemKey>) {
        for (k, item) in &mut self.items {
            let selected = Some(k) == key;
            if item.selected() != selected {
                item.set_selected(selected);
            }
        }
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Polls streams, advances animations and refreshes world matrices.
    /// Returns whether anything changed that needs a redraw.
    pub fn tick(&mut self, dt: f32) -> bool {
        let mut changed = false;
        for item in self.items.values_mut() {
            changed |= item.poll() > 0;
        }

        let mut scene = self.scene.borrow_mut();
        changed |= scene.update(dt);
        changed |= scene.take_any_needs_update();
        scene.update_matrix_world();
        changed
    }

    /// Casts a ray against every visible item's placeholder box and returns
    /// the nearest hit.
    ///
    /// The test runs in each item's space, so rotated or scaled parents are
    /// honoured. World matrices are walked from the current transforms, so
    /// the result does not wait for the next [`Viewer::tick`].
    #[must_use]
    pub fn pick(&self, origin: Vec3, direction: Vec3) -> Option<PickHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let scene = self.scene.borrow();
        let mut nearest: Option<PickHit> = None;

        for (key, item) in &self.items {
            if item.is_disposed() {
                continue;
            }
            let Some(node) = scene.get_node(item.node()) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            let Some(bounds) = item.placeholder_bounds() else {
                continue;
            };
            let world = match scene.compute_world_matrix(item.node()) {
                Ok(world) => world,
                Err(err) => {
                    log::warn!("Skipping item in pick: {err}");
                    continue;
                }
            };

            let inverse = world.inverse();
            let local_origin = inverse.transform_point3(origin);
            let local_dir = inverse.transform_vector3(direction);

            let Some(t) = bounds.ray_intersect(local_origin, local_dir) else {
                continue;
            };
            let point = world.transform_point3(local_origin + local_dir * t);
            let distance = (point - origin).length();

            if nearest.is_none_or(|hit| distance < hit.distance) {
                nearest = Some(PickHit { item: key, distance, point });
            }
        }

        nearest
    }
}
