//! Animation System Tests
//!
//! Tests for:
//! - Ease curves and their serialized names
//! - Tween progress, clamping and zero-length tweens
//! - TweenScheduler last-writer-wins replacement
//! - Redraw hints raised on the animated node's parent

use glam::{Quat, Vec3};

use myth_items::animation::{Ease, Interpolatable, Tween, TweenChannel, TweenKey};
use myth_items::scene::{Node, Scene};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// ============================================================================
// Ease
// ============================================================================

#[test]
fn ease_endpoints_are_fixed() {
    for ease in [Ease::Linear, Ease::Power1Out, Ease::Power2InOut] {
        assert!(approx(ease.apply(0.0), 0.0), "{ease:?}");
        assert!(approx(ease.apply(1.0), 1.0), "{ease:?}");
    }
}

#[test]
fn power1_out_leads_linear() {
    assert!(Ease::Power1Out.apply(0.5) > 0.5);
    assert!(approx(Ease::Power1Out.apply(0.5), 0.75));
}

#[test]
fn ease_deserializes_from_tween_engine_names() {
    let ease: Ease = serde_json::from_str("\"power1.out\"").unwrap();
    assert_eq!(ease, Ease::Power1Out);
    let ease: Ease = serde_json::from_str("\"linear\"").unwrap();
    assert_eq!(ease, Ease::Linear);
}

// ============================================================================
// Tween
// ============================================================================

#[test]
fn tween_reaches_target_exactly() {
    let mut tween = Tween::new(0.0_f32, 10.0, 0.15, Ease::Power1Out);
    for _ in 0..20 {
        tween.advance(1.0 / 60.0);
    }
    assert!(tween.is_finished());
    assert_eq!(tween.value(), 10.0);
}

#[test]
fn tween_overshoot_clamps() {
    let mut tween = Tween::new(Vec3::ZERO, Vec3::ONE, 0.5, Ease::Linear);
    assert_eq!(tween.advance(3.0), Vec3::ONE);
}

#[test]
fn zero_length_tween_is_immediately_done() {
    let tween = Tween::new(1.0_f32, 2.0, 0.0, Ease::Linear);
    assert!(tween.is_finished());
    assert_eq!(tween.value(), 2.0);
}

#[test]
fn quat_interpolation_is_normalized() {
    let q = Quat::interpolate_linear(Quat::IDENTITY, Quat::from_rotation_y(1.0), 0.5);
    assert!(approx(q.length(), 1.0));
}

// ============================================================================
// TweenScheduler
// ============================================================================

#[test]
fn scheduler_writes_channels_into_nodes() {
    let mut scene = Scene::new();
    let node = scene.add_node(Node::new("Node"));

    scene.animate(node, TweenChannel::RotationY, 1.5, 0.1, Ease::Linear, false);
    scene.update(0.05);
    assert!(approx(scene.get_node(node).unwrap().transform.rotation.y, 0.75));

    scene.update(0.05);
    assert!(approx(scene.get_node(node).unwrap().transform.rotation.y, 1.5));
    assert!(scene.tweens.is_empty());
}

#[test]
fn rescheduling_replaces_and_restarts_from_current_value() {
    let mut scene = Scene::new();
    let node = scene.add_node(Node::new("Node"));

    scene.animate(node, TweenChannel::PositionX, 10.0, 1.0, Ease::Linear, false);
    scene.update(0.5);
    scene.animate(node, TweenChannel::PositionX, 0.0, 1.0, Ease::Linear, false);

    assert_eq!(scene.tweens.len(), 1);
    let key = TweenKey { target: node, channel: TweenChannel::PositionX };
    assert_eq!(scene.tweens.get(key).unwrap().target(), 0.0);

    scene.update(0.5);
    assert!(approx(scene.get_node(node).unwrap().transform.position.x, 2.5));
}

#[test]
fn channels_animate_independently() {
    let mut scene = Scene::new();
    let node = scene.add_node(Node::new("Node"));

    for (channel, to) in TweenChannel::POSITION.into_iter().zip([1.0, 2.0, 3.0]) {
        scene.animate(node, channel, to, 0.2, Ease::Power1Out, false);
    }
    assert_eq!(scene.tweens.len(), 3);

    scene.update(0.2);
    assert_eq!(scene.get_node(node).unwrap().transform.position, Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn redraw_hint_marks_parent_on_every_step() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("Parent"));
    let child = scene.add_to_parent(Node::new("Child"), parent);

    scene.animate(child, TweenChannel::PositionZ, 4.0, 0.25, Ease::Linear, true);

    for _ in 0..3 {
        assert!(scene.update(0.1));
        assert!(scene.take_needs_update(parent));
    }
    assert!(!scene.update(0.1));
    assert!(!scene.take_needs_update(parent));
}

#[test]
fn redraw_hint_on_root_node_marks_scene() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Root"));

    scene.animate(root, TweenChannel::RotationY, 1.0, 0.2, Ease::Linear, false);
    scene.update(0.1);
    assert!(!scene.needs_update);

    scene.animate(root, TweenChannel::PositionX, 3.0, 0.2, Ease::Linear, true);
    scene.update(0.1);
    assert!(scene.needs_update);
    assert!(scene.take_any_needs_update());
    assert!(!scene.take_any_needs_update());
}

#[test]
fn animate_on_missing_node_is_rejected() {
    let mut scene = Scene::new();
    let node = scene.add_node(Node::new("Gone"));
    scene.remove_node(node);

    assert!(!scene.animate(node, TweenChannel::PositionX, 1.0, 0.1, Ease::Linear, false));
    assert!(scene.tweens.is_empty());
}
