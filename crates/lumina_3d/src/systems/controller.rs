//! First-person controller systems: mouse look and fly movement.

use std::f32::consts::PI;

use glam::{EulerRot, Quat, Vec3};

use super::InputState;
use crate::ecs::World;
use crate::scene::{FirstPersonController, Transform};

/// Pitch clamp, just short of straight up or down.
const PITCH_LIMIT: f32 = 0.49 * PI;

/// Input events the look system consumes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControllerEvent {
    /// Relative pointer motion in pixels since the last event.
    PointerMotion { xrel: f32, yrel: f32 },
    /// The quit key went down.
    EscapePressed,
}

/// Apply one input event to every entity carrying a controller and a
/// transform.
///
/// Pointer motion yaws about the world up axis and pitches about the
/// entity's current right axis, each scaled by the controller's
/// sensitivity. Pitch is clamped short of the poles; past the limit the
/// orientation is rebuilt from its recovered yaw with pitch pinned and
/// roll zeroed, so roll cannot accumulate either.
///
/// Returns `true` when Escape asked the application to quit.
pub fn controller_event_system(world: &mut World, event: &ControllerEvent) -> bool {
    let mut quit = false;
    for (entity, controller) in world.controllers.iter() {
        let Some(transform) = world.transforms.get_mut(entity) else {
            continue;
        };
        match *event {
            ControllerEvent::PointerMotion { xrel, yrel } => {
                look(transform, controller, xrel, yrel);
            }
            ControllerEvent::EscapePressed => quit = true,
        }
    }
    quit
}

fn look(transform: &mut Transform, controller: &FirstPersonController, xrel: f32, yrel: f32) {
    let delta_yaw = xrel * controller.sensitivity;
    let delta_pitch = yrel * controller.sensitivity;

    let mut rotation = Quat::from_rotation_y(delta_yaw) * transform.rotation;

    // Yaw about world up leaves pitch alone, so with the clamp below
    // holding, forward is never parallel to up and the cross is sound.
    let forward = rotation * Vec3::NEG_Z;
    let right = forward.cross(Vec3::Y).normalize();
    rotation = (Quat::from_axis_angle(right, delta_pitch) * rotation).normalize();

    let forward = rotation * Vec3::NEG_Z;
    let pitch = forward.y.clamp(-1.0, 1.0).asin();
    if pitch.abs() > PITCH_LIMIT {
        let yaw = forward.x.atan2(forward.z) + PI;
        rotation = Quat::from_euler(
            EulerRot::YXZ,
            yaw,
            pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            0.0,
        );
    }
    transform.rotation = rotation;
}

/// Integrate held movement keys for every entity carrying a controller
/// and a transform.
///
/// The wish direction sums the entity's local axes for each held key,
/// then is normalized so diagonals are no faster than a single key, and
/// scaled by the controller's speed and the frame's delta time.
pub fn controller_update_system(world: &mut World, input: &InputState, dt: f32) {
    for (entity, controller) in world.controllers.iter() {
        let Some(transform) = world.transforms.get_mut(entity) else {
            continue;
        };
        let mut wish = Vec3::ZERO;
        if input.forward {
            wish += transform.forward();
        }
        if input.backward {
            wish -= transform.forward();
        }
        if input.left {
            wish -= transform.right();
        }
        if input.right {
            wish += transform.right();
        }
        if input.ascend {
            wish += transform.up();
        }
        transform.position += wish.normalize_or_zero() * (controller.move_speed * dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rigged_world(sensitivity: f32, move_speed: f32) -> (World, crate::ecs::Entity) {
        let mut world = World::new();
        let e = world.spawn();
        world.add_transform(e, Transform::new());
        world.add_controller(e, FirstPersonController::new(sensitivity, move_speed));
        (world, e)
    }

    #[test]
    fn test_pointer_motion_scales_by_sensitivity() {
        let (mut world, e) = rigged_world(0.01, 5.0);
        let quit = controller_event_system(
            &mut world,
            &ControllerEvent::PointerMotion {
                xrel: 100.0,
                yrel: 0.0,
            },
        );
        assert!(!quit);

        let rotation = world.transform(e).unwrap().rotation;
        let expected = Quat::from_rotation_y(1.0);
        assert!(rotation.angle_between(expected) < 1e-5);
        assert!((rotation.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_quarter_turn_yaw_faces_minus_x() {
        let (mut world, e) = rigged_world(0.01, 5.0);
        controller_event_system(
            &mut world,
            &ControllerEvent::PointerMotion {
                xrel: 100.0 * std::f32::consts::FRAC_PI_2,
                yrel: 0.0,
            },
        );
        let forward = world.transform(e).unwrap().forward();
        assert!((forward - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_pitch_stops_short_of_the_pole() {
        let (mut world, e) = rigged_world(0.01, 5.0);
        // Many small upward-pitch steps, together far past the limit.
        for _ in 0..40 {
            controller_event_system(
                &mut world,
                &ControllerEvent::PointerMotion {
                    xrel: 0.0,
                    yrel: 10.0,
                },
            );
        }
        let transform = world.transform(e).unwrap();
        let forward = transform.forward();
        let pitch = forward.y.asin();
        assert!(pitch.abs() <= PITCH_LIMIT + 1e-4, "pitch {pitch} escaped");
        // Yaw started at zero and pitching must not introduce any.
        assert!(forward.x.abs() < 1e-4);
        // The rebuild zeroes roll: right stays level.
        assert!(transform.right().y.abs() < 1e-4);
        assert!((transform.rotation.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_escape_reports_quit_only_with_a_live_controller() {
        let (mut world, _) = rigged_world(0.01, 5.0);
        assert!(controller_event_system(
            &mut world,
            &ControllerEvent::EscapePressed
        ));

        let mut empty = World::new();
        assert!(!controller_event_system(
            &mut empty,
            &ControllerEvent::EscapePressed
        ));

        // A controller without a transform is skipped entirely.
        let mut half = World::new();
        let e = half.spawn();
        half.add_controller(e, FirstPersonController::default());
        assert!(!controller_event_system(
            &mut half,
            &ControllerEvent::EscapePressed
        ));
    }

    #[test]
    fn test_diagonal_movement_is_not_faster() {
        let (mut world, e) = rigged_world(0.01, 2.0);
        let input = InputState {
            forward: true,
            right: true,
            ..Default::default()
        };
        controller_update_system(&mut world, &input, 1.0);

        let position = world.transform(e).unwrap().position;
        assert!((position.length() - 2.0).abs() < 1e-5);
        let expected = (Vec3::NEG_Z + Vec3::X).normalize() * 2.0;
        assert!((position - expected).length() < 1e-5);
    }

    #[test]
    fn test_opposed_keys_cancel() {
        let (mut world, e) = rigged_world(0.01, 3.0);
        let input = InputState {
            forward: true,
            backward: true,
            ..Default::default()
        };
        controller_update_system(&mut world, &input, 1.0);
        assert_eq!(world.transform(e).unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn test_no_keys_no_motion() {
        let (mut world, e) = rigged_world(0.01, 3.0);
        controller_update_system(&mut world, &InputState::default(), 100.0);
        assert_eq!(world.transform(e).unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn test_movement_follows_entity_axes() {
        let (mut world, e) = rigged_world(0.01, 1.0);
        world.transform_mut(e).unwrap().rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let input = InputState {
            forward: true,
            ..Default::default()
        };
        controller_update_system(&mut world, &input, 1.0);
        let position = world.transform(e).unwrap().position;
        assert!((position - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_ascend_rises_along_local_up() {
        let (mut world, e) = rigged_world(0.01, 4.0);
        let input = InputState {
            ascend: true,
            ..Default::default()
        };
        controller_update_system(&mut world, &input, 0.5);
        assert!((world.transform(e).unwrap().position - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_update_skips_controller_without_transform() {
        let mut world = World::new();
        let bare = world.spawn();
        world.add_controller(bare, FirstPersonController::default());
        let full = world.spawn();
        world.add_transform(full, Transform::new());
        world.add_controller(full, FirstPersonController::new(0.01, 1.0));

        let input = InputState {
            forward: true,
            ..Default::default()
        };
        controller_update_system(&mut world, &input, 1.0);
        assert!((world.transform(full).unwrap().position - Vec3::NEG_Z).length() < 1e-5);
        assert!(world.transform(bare).is_none());
    }
}
