//! The visual half of a placed item.
//!
//! A [`VisualItem`] owns three scene nodes:
//!
//! - the item node itself, carrying the placeholder box mesh that serves as
//!   the item's pick/intersection proxy,
//! - the highlight, a child wireframe box shown while selected,
//! - the loaded visual, a child subtree present once streaming or synthesis
//!   completed.
//!
//! # Timing domains
//!
//! Model mutations arrive synchronously through a model subscription and
//! only schedule tweens. Streamed assets arrive through a channel drained by
//! [`VisualItem::poll`]. Tweens advance in [`Scene::update`]. None of these
//! ever observes a half-initialized item: bounds, placeholder, highlight and
//! the attached subtree are all updated inside one call before
//! [`ItemEvent::Loaded`] is sent.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec3;

use crate::animation::{Ease, TweenChannel};
use crate::assets::streamer::{AssetStreamer, LoadTicket, StreamMessage, StreamSink};
use crate::assets::subtree::VisualSubtree;
use crate::config::ItemSettings;
use crate::errors::{Error, Result};
use crate::item::events::{AcquisitionState, ItemEvent};
use crate::model::{IntersectionPlane, ItemModel, ItemProperty, SharedModel, SubscriptionId};
use crate::parametric::GeometryProvider;
use crate::resources::geometry::BoundingBox;
use crate::resources::material::{Material, color_from_hex};
use crate::resources::mesh::Mesh;
use crate::resources::primitives::{create_box, create_box_edges};
use crate::scene::{Node, NodeHandle, Scene, SharedScene};

const LOADED_VISUAL_NAME: &str = "LoadedVisual";

/// Undrained events past which further progress ticks are dropped.
/// `Loaded` and `Failed` are always delivered.
const PROGRESS_BACKLOG: usize = 32;

/// Bounds of the loaded visual in the item's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBounds {
    pub bounding_box: BoundingBox,
    pub center: Vec3,
    pub size: Vec3,
}

impl ItemBounds {
    fn from_box(bounding_box: BoundingBox) -> Self {
        // An empty subtree still yields a well-defined, zero-sized box
        let bounding_box = if bounding_box.is_empty() {
            BoundingBox::new(Vec3::ZERO, Vec3::ZERO)
        } else {
            bounding_box
        };
        Self {
            bounding_box,
            center: bounding_box.center(),
            size: bounding_box.size(),
        }
    }
}

/// Animation parameters captured by the model subscription.
#[derive(Debug, Clone, Copy)]
struct Motion {
    duration: f32,
    ease: Ease,
}

/// State shared between the item and its model subscription.
#[derive(Debug)]
struct ItemState {
    node: NodeHandle,
    highlight: NodeHandle,
    loaded_visual: Option<NodeHandle>,
    bounds: Option<ItemBounds>,
    selected: bool,
    acquisition: AcquisitionState,
    disposed: bool,
}

/// An in-flight streaming request.
struct PendingStream {
    receiver: flume::Receiver<StreamMessage>,
    ticket: LoadTicket,
}

/// Scene representation of one [`ItemModel`].
pub struct VisualItem {
    model: SharedModel,
    scene: SharedScene,
    settings: ItemSettings,

    state: Rc<RefCell<ItemState>>,
    subscription: Option<SubscriptionId>,
    stream: Option<PendingStream>,

    events_tx: flume::Sender<ItemEvent>,
    events_rx: flume::Receiver<ItemEvent>,
}

impl VisualItem {
    /// Creates the item's nodes under `parent` (or at the scene root) and
    /// starts acquiring its visual.
    ///
    /// Parametric models are synthesized before anything touches the scene,
    /// so an unsupported descriptor fails without leaving nodes behind.
    /// Streaming only starts here; completion is picked up by
    /// [`VisualItem::poll`].
    pub fn new(
        model: SharedModel,
        scene: SharedScene,
        parent: Option<NodeHandle>,
        streamer: &dyn AssetStreamer,
        geometry: &dyn GeometryProvider,
        settings: &ItemSettings,
    ) -> Result<Self> {
        let synthesized = synthesize(&model.borrow(), geometry)?;

        let (node, highlight) = {
            let model_ref = model.borrow();
            let mut scene_ref = scene.borrow_mut();
            create_nodes(&mut scene_ref, &model_ref, parent, settings)
        };

        let state = Rc::new(RefCell::new(ItemState {
            node,
            highlight,
            loaded_visual: None,
            bounds: None,
            selected: false,
            acquisition: AcquisitionState::Idle,
            disposed: false,
        }));

        let (events_tx, events_rx) = flume::unbounded();

        let mut item = Self {
            model,
            scene,
            settings: settings.clone(),
            state,
            subscription: None,
            stream: None,
            events_tx,
            events_rx,
        };

        item.subscribe();

        match synthesized {
            Some(subtree) => item.initialize_child(&subtree, AcquisitionState::Synthesized),
            None => item.start_stream(streamer),
        }

        Ok(item)
    }

    fn subscribe(&mut self) {
        let state: Weak<RefCell<ItemState>> = Rc::downgrade(&self.state);
        let scene = Rc::clone(&self.scene);
        let motion = Motion {
            duration: self.settings.animation_duration,
            ease: self.settings.ease,
        };

        let id = self.model.borrow_mut().subscribe(move |model, property| {
            let Some(state) = state.upgrade() else {
                return;
            };
            let state = state.borrow();
            if state.disposed {
                return;
            }
            let Ok(mut scene) = scene.try_borrow_mut() else {
                log::warn!("Scene busy; dropping '{property}' change of item '{}'", model.name());
                return;
            };
            apply_change(&mut scene, &state, model, property, motion);
        });
        self.subscription = Some(id);
    }

    // ========================================================================
    // Acquisition
    // ========================================================================

    fn start_stream(&mut self, streamer: &dyn AssetStreamer) {
        let reference = {
            let model = self.model.borrow();
            model
                .asset_reference(&self.settings.placeholder_reference)
                .map(ToString::to_string)
        };

        let Some(reference) = reference else {
            log::debug!(
                "Item '{}' has no asset reference; nothing to load",
                self.model.borrow().name()
            );
            self.state.borrow_mut().acquisition = AcquisitionState::Idle;
            return;
        };

        log::debug!("Streaming '{reference}'");
        let (sink, receiver) = StreamSink::channel(&reference);
        let ticket = sink.ticket().clone();
        self.stream = Some(PendingStream { receiver, ticket });
        self.state.borrow_mut().acquisition = AcquisitionState::Streaming;

        streamer.load(&reference, sink);
    }

    /// Drains stream messages: progress becomes [`ItemEvent::Loading`],
    /// completion wires the visual in, failure becomes
    /// [`ItemEvent::Failed`]. Call once per render-loop tick.
    ///
    /// Returns the number of messages handled. A disposed item handles none.
    pub fn poll(&mut self) -> usize {
        if self.is_disposed() {
            return 0;
        }

        let mut handled = 0;
        while let Some(message) = self.stream.as_ref().and_then(|s| s.receiver.try_recv().ok()) {
            handled += 1;
            match message {
                StreamMessage::Progress(progress) => {
                    if self.events_tx.len() < PROGRESS_BACKLOG {
                        self.emit(ItemEvent::Loading(progress));
                    } else {
                        log::trace!("Event backlog full; skipping progress {}/{}", progress.loaded, progress.total);
                    }
                }
                StreamMessage::Completed(subtree) => {
                    self.stream = None;
                    self.initialize_child(&subtree, AcquisitionState::Streamed);
                }
                StreamMessage::Failed(err) => {
                    self.stream = None;
                    log::error!("Item '{}' failed to load: {err}", self.model.borrow().name());
                    self.state.borrow_mut().acquisition = AcquisitionState::Failed;
                    self.emit(ItemEvent::Failed(err.to_string()));
                }
            }
        }
        handled
    }

    /// Derives bounds from `subtree`, resizes the placeholder and highlight,
    /// attaches the subtree and announces [`ItemEvent::Loaded`].
    fn initialize_child(&mut self, subtree: &VisualSubtree, outcome: AcquisitionState) {
        let bounds = ItemBounds::from_box(subtree.compute_bounding_box());
        let rotation = self.model.borrow().rotation();

        {
            let mut state = self.state.borrow_mut();
            let mut scene = self.scene.borrow_mut();
            let size = bounds.size;

            if let Some(node) = scene.get_node_mut(state.node) {
                let mut material = node
                    .mesh
                    .as_ref()
                    .map_or_else(Material::default, |mesh| mesh.material.clone());
                material.visible = false;
                node.mesh = Some(Mesh::new(create_box(size.x, size.y, size.z), material).with_name("Placeholder"));
            }

            if let Some(highlight) = scene.get_node_mut(state.highlight) {
                let material = highlight
                    .mesh
                    .as_ref()
                    .map_or_else(|| highlight_material(&self.settings), |mesh| mesh.material.clone());
                highlight.mesh = Some(Mesh::new(create_box_edges(size.x, size.y, size.z), material).with_name("Highlight"));
                highlight.transform.rotation = rotation;
            }

            let root = scene.instantiate(subtree, LOADED_VISUAL_NAME);
            if let Some(root_node) = scene.get_node_mut(root) {
                root_node.transform.rotation = rotation;
            }
            scene.attach(root, state.node);

            state.loaded_visual = Some(root);
            state.bounds = Some(bounds);
            state.acquisition = outcome;
        }

        log::info!(
            "Item '{}' loaded ({} meshes, size {:?})",
            self.model.borrow().name(),
            subtree.mesh_count(),
            bounds.size
        );
        self.emit(ItemEvent::Loaded);
    }

    /// Acquires the visual again, e.g. after the model's asset reference
    /// changed. Any in-flight stream is cancelled and the current visual is
    /// removed from the scene first.
    pub fn reacquire(&mut self, streamer: &dyn AssetStreamer, geometry: &dyn GeometryProvider) -> Result<()> {
        if self.is_disposed() {
            return Err(Error::Disposed);
        }

        let synthesized = synthesize(&self.model.borrow(), geometry)?;

        self.cancel_stream();
        self.clear_visual();

        match synthesized {
            Some(subtree) => self.initialize_child(&subtree, AcquisitionState::Synthesized),
            None => self.start_stream(streamer),
        }
        Ok(())
    }

    fn clear_visual(&mut self) {
        let mut state = self.state.borrow_mut();
        let mut scene = self.scene.borrow_mut();
        if let Some(visual) = state.loaded_visual.take() {
            scene.remove_node(visual);
        }
        state.bounds = None;
        state.acquisition = AcquisitionState::Idle;
    }

    fn cancel_stream(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.ticket.cancel();
        }
    }

    fn emit(&self, event: ItemEvent) {
        // The item holds a receiver itself, so this cannot fail
        let _ = self.events_tx.send(event);
    }

    // ========================================================================
    // Selection, location & snapping
    // ========================================================================

    #[must_use]
    pub fn selected(&self) -> bool {
        self.state.borrow().selected
    }

    /// Shows or hides the highlight. Nothing else changes.
    pub fn set_selected(&mut self, selected: bool) {
        let mut state = self.state.borrow_mut();
        state.selected = selected;
        if let Some(highlight) = self.scene.borrow_mut().get_node_mut(state.highlight) {
            highlight.visible = selected;
        }
    }

    /// The model's position.
    #[must_use]
    pub fn location(&self) -> Vec3 {
        self.model.borrow().position()
    }

    /// Moves the model; the visual follows through the usual animation.
    pub fn set_location(&self, location: Vec3) {
        self.model.borrow_mut().set_position(location);
    }

    /// The model's intersection planes.
    #[must_use]
    pub fn intersection_planes(&self) -> Vec<IntersectionPlane> {
        self.model.borrow().intersection_planes().to_vec()
    }

    /// Forwards to [`ItemModel::snap_to_point`].
    pub fn snap_to_point(&self, point: Vec3, normal: Vec3, plane: Option<&IntersectionPlane>) -> bool {
        self.model.borrow_mut().snap_to_point(point, normal, plane)
    }

    // ========================================================================
    // Disposal
    // ========================================================================

    /// Stops listening to the model, cancels any pending stream and running
    /// animations, and detaches the item from its parent. The nodes stay in
    /// the scene until their owner removes them. Idempotent, and also run
    /// when the item is dropped.
    pub fn dispose(&mut self) {
        let (node, highlight, visual) = {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                return;
            }
            state.disposed = true;
            (state.node, state.highlight, state.loaded_visual)
        };

        if let Some(id) = self.subscription.take() {
            match self.model.try_borrow_mut() {
                Ok(mut model) => {
                    model.unsubscribe(id);
                }
                Err(_) => log::warn!("Model busy during dispose; its listener stays inert"),
            }
        }

        self.cancel_stream();

        let Ok(mut scene) = self.scene.try_borrow_mut() else {
            log::warn!("Scene busy during dispose; item node {node:?} stays attached");
            return;
        };
        for target in [Some(node), Some(highlight), visual].into_iter().flatten() {
            scene.tweens.cancel_target(target);
        }
        scene.detach(node);
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.state.borrow().disposed
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn model(&self) -> &SharedModel {
        &self.model
    }

    #[must_use]
    pub fn node(&self) -> NodeHandle {
        self.state.borrow().node
    }

    #[must_use]
    pub fn highlight(&self) -> NodeHandle {
        self.state.borrow().highlight
    }

    #[must_use]
    pub fn loaded_visual(&self) -> Option<NodeHandle> {
        self.state.borrow().loaded_visual
    }

    #[must_use]
    pub fn bounds(&self) -> Option<ItemBounds> {
        self.state.borrow().bounds
    }

    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounds().map(|b| b.bounding_box)
    }

    #[must_use]
    pub fn center(&self) -> Option<Vec3> {
        self.bounds().map(|b| b.center)
    }

    #[must_use]
    pub fn size(&self) -> Option<Vec3> {
        self.bounds().map(|b| b.size)
    }

    #[must_use]
    pub fn acquisition(&self) -> AcquisitionState {
        self.state.borrow().acquisition
    }

    /// Bounds of the placeholder geometry in item space.
    #[must_use]
    pub fn placeholder_bounds(&self) -> Option<BoundingBox> {
        let node = self.node();
        let scene = self.scene.borrow();
        scene
            .get_node(node)
            .and_then(|n| n.mesh.as_ref())
            .map(Mesh::local_bounds)
    }

    /// Receiver for this item's events. Every clone competes for the same
    /// messages.
    #[must_use]
    pub fn events(&self) -> flume::Receiver<ItemEvent> {
        self.events_rx.clone()
    }
}

impl Drop for VisualItem {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for VisualItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisualItem")
            .field("state", &self.state.borrow())
            .field("streaming", &self.stream.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn synthesize(model: &ItemModel, geometry: &dyn GeometryProvider) -> Result<Option<VisualSubtree>> {
    let Some(descriptor) = model.parametric() else {
        return Ok(None);
    };
    log::debug!(
        "Synthesizing '{}' (base type {}, sub type {})",
        model.name(),
        descriptor.base_type,
        descriptor.sub.sub_type
    );
    let mesh = geometry.generate(descriptor)?;
    Ok(Some(mesh.into_subtree(model.name())))
}

fn highlight_material(settings: &ItemSettings) -> Material {
    Material::new_line(color_from_hex(settings.highlight_color), settings.highlight_line_width).with_name("Highlight")
}

/// Item node with a unit placeholder box, plus its hidden highlight child.
fn create_nodes(
    scene: &mut Scene,
    model: &ItemModel,
    parent: Option<NodeHandle>,
    settings: &ItemSettings,
) -> (NodeHandle, NodeHandle) {
    let placeholder = Mesh::new(create_box(1.0, 1.0, 1.0), Material::default()).with_name("Placeholder");
    let mut item_node = Node::with_mesh(model.name(), placeholder);
    item_node.transform.position = model.position();
    item_node.visible = model.visible();

    let node = match parent {
        Some(parent) if scene.get_node(parent).is_some() => scene.add_to_parent(item_node, parent),
        Some(_) => {
            log::warn!("Parent of item '{}' not found; adding it at the scene root", model.name());
            scene.add_node(item_node)
        }
        None => scene.add_node(item_node),
    };

    let edges = Mesh::new(create_box_edges(1.0, 1.0, 1.0), highlight_material(settings)).with_name("Highlight");
    let mut highlight_node = Node::with_mesh("Highlight", edges);
    highlight_node.visible = false;
    highlight_node.transform.rotation = model.rotation();
    let highlight = scene.add_to_parent(highlight_node, node);

    (node, highlight)
}

/// Model notification handler.
fn apply_change(scene: &mut Scene, state: &ItemState, model: &ItemModel, property: &ItemProperty, motion: Motion) {
    match property {
        ItemProperty::Position => {
            let target = model.position().to_array();
            for (channel, to) in TweenChannel::POSITION.into_iter().zip(target) {
                scene.animate(state.node, channel, to, motion.duration, motion.ease, true);
            }
        }
        ItemProperty::Rotation => {
            let target = model.rotation().to_array();
            for handle in std::iter::once(state.highlight).chain(state.loaded_visual) {
                for (channel, to) in TweenChannel::ROTATION.into_iter().zip(target) {
                    scene.animate(handle, channel, to, motion.duration, motion.ease, false);
                }
            }
        }
        ItemProperty::Visible => {
            if let Some(node) = scene.get_node_mut(state.node) {
                node.visible = model.visible();
            }
            scene.mark_parent_needs_update(state.node);
        }
        other => {
            log::trace!("Ignoring change of '{other}'");
        }
    }
}
