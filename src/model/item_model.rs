use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use glam::Vec3;
use smallvec::SmallVec;

use crate::model::surface::{IntersectionPlane, Placement};
use crate::parametric::ParametricDescriptor;

/// Shared handle to a model. The code that creates a model keeps one clone
/// and hands another to its [`VisualItem`](crate::item::VisualItem).
pub type SharedModel = Rc<RefCell<ItemModel>>;

/// Name of a mutated model property, carried by change notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemProperty {
    Position,
    Rotation,
    Visible,
    ModelUrl,
    Name,
    /// Anything else a caller chooses to announce.
    Other(String),
}

impl ItemProperty {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ItemProperty::Position => "position",
            ItemProperty::Rotation => "rotation",
            ItemProperty::Visible => "visible",
            ItemProperty::ModelUrl => "modelURL",
            ItemProperty::Name => "name",
            ItemProperty::Other(name) => name.as_str(),
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "position" => ItemProperty::Position,
            "rotation" => ItemProperty::Rotation,
            "visible" => ItemProperty::Visible,
            "modelURL" => ItemProperty::ModelUrl,
            "name" => ItemProperty::Name,
            other => ItemProperty::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ItemProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle returned by [`ItemModel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type ChangeListener = Box<dyn FnMut(&ItemModel, &ItemProperty)>;

/// Authoritative, non-visual description of a placed item.
///
/// Setters notify subscribers synchronously, in subscription order, after
/// the new value is stored. Listeners see the model read-only and must not
/// re-borrow the [`SharedModel`] it lives in.
pub struct ItemModel {
    name: String,
    position: Vec3,
    rotation: Vec3,
    visible: bool,
    model_url: Option<String>,
    parametric: Option<ParametricDescriptor>,
    placement: Placement,
    intersection_planes: Vec<IntersectionPlane>,

    listeners: SmallVec<[(SubscriptionId, ChangeListener); 2]>,
    next_subscription: u64,
}

impl fmt::Debug for ItemModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemModel")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("visible", &self.visible)
            .field("model_url", &self.model_url)
            .field("parametric", &self.parametric)
            .field("placement", &self.placement)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for ItemModel {
    fn default() -> Self {
        Self::new("Item")
    }
}

impl ItemModel {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            visible: true,
            model_url: None,
            parametric: None,
            placement: Placement::default(),
            intersection_planes: Vec::new(),
            listeners: SmallVec::new(),
            next_subscription: 0,
        }
    }

    #[must_use]
    pub fn with_model_url(mut self, url: &str) -> Self {
        self.model_url = Some(url.to_string());
        self
    }

    #[must_use]
    pub fn with_parametric(mut self, descriptor: ParametricDescriptor) -> Self {
        self.parametric = Some(descriptor);
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn with_intersection_planes(mut self, planes: Vec<IntersectionPlane>) -> Self {
        self.intersection_planes = planes;
        self
    }

    #[must_use]
    pub fn into_shared(self) -> SharedModel {
        Rc::new(RefCell::new(self))
    }

    // ========================================================================
    // Subscription
    // ========================================================================

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&ItemModel, &ItemProperty) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns whether `id` was subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Announces a change of `property` to every subscriber.
    pub fn notify(&mut self, property: &ItemProperty) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for (_, listener) in &mut listeners {
            listener(self, property);
        }
        self.listeners = listeners;
    }

    // ========================================================================
    // Properties
    // ========================================================================

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        if self.name != name {
            self.name = name.to_string();
            self.notify(&ItemProperty::Name);
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        if self.position != position {
            self.position = position;
            self.notify(&ItemProperty::Position);
        }
    }

    /// Euler XYZ, radians.
    #[must_use]
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        if self.rotation != rotation {
            self.rotation = rotation;
            self.notify(&ItemProperty::Rotation);
        }
    }

    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.notify(&ItemProperty::Visible);
        }
    }

    #[must_use]
    pub fn model_url(&self) -> Option<&str> {
        self.model_url.as_deref()
    }

    pub fn set_model_url(&mut self, url: Option<&str>) {
        if self.model_url.as_deref() != url {
            self.model_url = url.map(ToString::to_string);
            self.notify(&ItemProperty::ModelUrl);
        }
    }

    /// The asset reference, unless it is missing, empty or equal to
    /// `placeholder`.
    #[must_use]
    pub fn asset_reference(&self, placeholder: &str) -> Option<&str> {
        self.model_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty() && *url != placeholder)
    }

    #[must_use]
    pub fn is_parametric(&self) -> bool {
        self.parametric.is_some()
    }

    #[must_use]
    pub fn parametric(&self) -> Option<&ParametricDescriptor> {
        self.parametric.as_ref()
    }

    #[must_use]
    pub fn base_parametric_type(&self) -> Option<u32> {
        self.parametric.as_ref().map(|p| p.base_type)
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    #[must_use]
    pub fn intersection_planes(&self) -> &[IntersectionPlane] {
        &self.intersection_planes
    }

    pub fn set_intersection_planes(&mut self, planes: Vec<IntersectionPlane>) {
        self.intersection_planes = planes;
        self.notify(&ItemProperty::Other("intersectionPlanes".to_string()));
    }

    // ========================================================================
    // Snapping
    // ========================================================================

    /// Moves the item onto `point` of a surface with the given `normal`.
    ///
    /// When `plane` is given and its kind does not suit the item's placement
    /// the call is ignored. Floor items keep their height; wall items also
    /// turn to face along the wall normal. Returns whether the item moved.
    pub fn snap_to_point(&mut self, point: Vec3, normal: Vec3, plane: Option<&IntersectionPlane>) -> bool {
        if let Some(plane) = plane
            && plane.kind != self.placement.snap_surface()
        {
            log::debug!(
                "Item '{}' ({:?}) cannot snap to a {:?} surface",
                self.name,
                self.placement,
                plane.kind
            );
            return false;
        }

        match self.placement {
            Placement::Floor => {
                self.set_position(Vec3::new(point.x, self.position.y, point.z));
            }
            Placement::Wall => {
                self.set_position(point);
                if normal.length_squared() > f32::EPSILON {
                    let mut rotation = self.rotation;
                    rotation.y = normal.x.atan2(normal.z);
                    self.set_rotation(rotation);
                }
            }
            Placement::InWall | Placement::Ceiling => {
                self.set_position(point);
            }
        }
        true
    }
}
