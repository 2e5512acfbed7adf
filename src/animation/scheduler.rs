use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::animation::ease::Ease;
use crate::animation::tween::Tween;
use crate::scene::NodeHandle;
use crate::scene::node::Node;
use crate::scene::transform::Transform;

/// A single animatable scalar on a node's transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenChannel {
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
}

impl TweenChannel {
    pub const POSITION: [TweenChannel; 3] =
        [TweenChannel::PositionX, TweenChannel::PositionY, TweenChannel::PositionZ];
    pub const ROTATION: [TweenChannel; 3] =
        [TweenChannel::RotationX, TweenChannel::RotationY, TweenChannel::RotationZ];

    #[must_use]
    pub fn read(self, transform: &Transform) -> f32 {
        match self {
            TweenChannel::PositionX => transform.position.x,
            TweenChannel::PositionY => transform.position.y,
            TweenChannel::PositionZ => transform.position.z,
            TweenChannel::RotationX => transform.rotation.x,
            TweenChannel::RotationY => transform.rotation.y,
            TweenChannel::RotationZ => transform.rotation.z,
        }
    }

    pub fn write(self, transform: &mut Transform, value: f32) {
        match self {
            TweenChannel::PositionX => transform.position.x = value,
            TweenChannel::PositionY => transform.position.y = value,
            TweenChannel::PositionZ => transform.position.z = value,
            TweenChannel::RotationX => transform.rotation.x = value,
            TweenChannel::RotationY => transform.rotation.y = value,
            TweenChannel::RotationZ => transform.rotation.z = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenKey {
    pub target: NodeHandle,
    pub channel: TweenChannel,
}

#[derive(Debug, Clone, Copy)]
struct ScheduledTween {
    tween: Tween<f32>,
    /// Raise the target parent's `needs_update` on every step.
    redraw_parent: bool,
}

/// Outcome of one [`TweenScheduler::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TweenStep {
    /// At least one node was written.
    pub stepped: bool,
    /// A redraw-hinting tween stepped a root node, which has no parent to
    /// carry the hint. The owning scene takes it instead.
    pub redraw_root: bool,
}

/// Per-scene tween table.
///
/// At most one tween runs per `(node, channel)`: scheduling on a busy key
/// replaces the running tween, and the replacement starts from wherever the
/// node currently is. There is no queue.
#[derive(Debug, Default)]
pub struct TweenScheduler {
    tweens: FxHashMap<TweenKey, ScheduledTween>,
}

impl TweenScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) the tween for `key`. Returns the tween it replaced.
    pub fn schedule(&mut self, key: TweenKey, tween: Tween<f32>, redraw_parent: bool) -> Option<Tween<f32>> {
        self.tweens
            .insert(key, ScheduledTween { tween, redraw_parent })
            .map(|old| old.tween)
    }

    /// Convenience over [`TweenScheduler::schedule`]: reads the start value
    /// from the node. Returns `false` if the node does not exist.
    pub fn animate(
        &mut self,
        nodes: &SlotMap<NodeHandle, Node>,
        key: TweenKey,
        to: f32,
        duration: f32,
        ease: Ease,
        redraw_parent: bool,
    ) -> bool {
        let Some(node) = nodes.get(key.target) else {
            log::warn!("Tween scheduled on a missing node: {:?}", key.target);
            return false;
        };
        let from = key.channel.read(&node.transform);
        self.schedule(key, Tween::new(from, to, duration, ease), redraw_parent);
        true
    }

    /// Advances every tween by `dt` and writes the results into `nodes`.
    ///
    /// Finished tweens and tweens whose node disappeared are dropped.
    pub fn update(&mut self, dt: f32, nodes: &mut SlotMap<NodeHandle, Node>) -> TweenStep {
        let mut step = TweenStep::default();
        if self.tweens.is_empty() {
            return step;
        }

        self.tweens.retain(|key, scheduled| {
            let Some(node) = nodes.get_mut(key.target) else {
                return false;
            };

            let value = scheduled.tween.advance(dt);
            key.channel.write(&mut node.transform, value);
            step.stepped = true;

            let parent = node.parent;
            if scheduled.redraw_parent {
                match parent {
                    Some(parent) => {
                        if let Some(parent_node) = nodes.get_mut(parent) {
                            parent_node.needs_update = true;
                        }
                    }
                    None => step.redraw_root = true,
                }
            }

            !scheduled.tween.is_finished()
        });

        step
    }

    /// Drops every tween targeting `target`.
    pub fn cancel_target(&mut self, target: NodeHandle) {
        self.tweens.retain(|key, _| key.target != target);
    }

    #[must_use]
    pub fn is_animating(&self, target: NodeHandle) -> bool {
        self.tweens.keys().any(|key| key.target == target)
    }

    #[must_use]
    pub fn get(&self, key: TweenKey) -> Option<&Tween<f32>> {
        self.tweens.get(&key).map(|s| &s.tween)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}
