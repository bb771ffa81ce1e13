//! Rendering plugin - mirrors session bodies as shapes, scrolls the skyline, and shakes the camera.

use bevy::prelude::*;
use bevy_vector_shapes::prelude::*;
use rand::prelude::*;

use crate::game::{
    BodyEntities, BodyLink, CameraShake, DUCK_BEAK_COLOR, DUCK_BODY_COLOR, DUCK_HURT_COLOR,
    DUCK_WING_COLOR, Duck, DuckHurt, DuckWing, GameSet, GameState, LOG_COLOR, LogSprite,
    PIXEL_SCALE, SCREEN_HEIGHT, SCREEN_WIDTH, SKYLINE_FAR_COLOR, SKYLINE_NEAR_COLOR,
    SessionEnded, SkylineBlock, WING_ANGLES, Z_DUCK, Z_LOG, Z_SKYLINE_FAR, Z_SKYLINE_NEAR,
};
use crate::sim::{Body, BodyKind, Visual};

/// Plugin for rendering and visual effects.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BodyEntities>()
            .init_resource::<CameraShake>()
            .add_systems(Startup, spawn_skyline)
            .add_systems(
                Update,
                (
                    sync_bodies,
                    update_duck_pose,
                    scroll_skyline,
                    trigger_camera_shake_on_game_over,
                    camera_shake_system,
                )
                    .chain()
                    .in_set(GameSet::Present),
            );
    }
}

/// Maps a point in screen units (origin top-left, y down) to world space.
pub fn screen_to_world(point: Vec2, z: f32) -> Vec3 {
    Vec3::new(
        (point.x - SCREEN_WIDTH / 2.0) * PIXEL_SCALE,
        (SCREEN_HEIGHT / 2.0 - point.y) * PIXEL_SCALE,
        z,
    )
}

/// Wraps a scrolled left edge into `[-width, SCREEN_WIDTH + period - width)`.
fn wrap_x(x: f32, width: f32, period: f32) -> f32 {
    (x + width).rem_euclid(period) - width
}

/// Startup system spawning two parallax rows of buildings.
fn spawn_skyline(mut commands: Commands) {
    let layers = [
        (SKYLINE_FAR_COLOR, Z_SKYLINE_FAR, 0.5, 14.0, [34.0, 22.0, 40.0, 28.0, 46.0]),
        (SKYLINE_NEAR_COLOR, Z_SKYLINE_NEAR, 1.0, 20.0, [18.0, 30.0, 14.0, 26.0, 20.0]),
    ];

    for (color, z, parallax, width, heights) in layers {
        let step = (SCREEN_WIDTH + width) / heights.len() as f32;
        for (i, height) in heights.into_iter().enumerate() {
            let base_x = i as f32 * step;
            let center = Vec2::new(base_x + width / 2.0, SCREEN_HEIGHT - height / 2.0);
            commands.spawn((
                Sprite {
                    color,
                    custom_size: Some(Vec2::new(width, height) * PIXEL_SCALE),
                    ..default()
                },
                Transform::from_translation(screen_to_world(center, z)),
                SkylineBlock {
                    base_x,
                    width,
                    parallax,
                },
            ));
        }
    }
}

/// Spawns the duck: a body with a wing, eye, beak, and a hidden hurt overlay.
fn spawn_duck(commands: &mut Commands, body: &Body) -> Entity {
    let radius = body.size.x / 2.0 * PIXEL_SCALE;

    commands
        .spawn((
            Transform::from_translation(screen_to_world(body.position, Z_DUCK)),
            Visibility::default(),
            Duck,
            BodyLink(body.id),
        ))
        .with_children(|parent| {
            parent.spawn(ShapeBundle::circle(
                &ShapeConfig {
                    color: DUCK_BODY_COLOR,
                    ..ShapeConfig::default_2d()
                },
                radius,
            ));

            parent.spawn((
                ShapeBundle::circle(
                    &ShapeConfig {
                        color: DUCK_HURT_COLOR,
                        transform: Transform::from_xyz(0.0, 0.0, 0.05).with_scale(Vec3::ZERO),
                        ..ShapeConfig::default_2d()
                    },
                    radius,
                ),
                DuckHurt,
            ));

            parent.spawn((
                ShapeBundle::rect(
                    &ShapeConfig {
                        color: DUCK_WING_COLOR,
                        corner_radii: Vec4::splat(0.5),
                        transform: Transform::from_xyz(-radius * 0.2, -radius * 0.1, 0.1),
                        ..ShapeConfig::default_2d()
                    },
                    Vec2::new(radius * 1.1, radius * 0.5),
                ),
                DuckWing,
            ));

            // Eye
            parent.spawn(ShapeBundle::circle(
                &ShapeConfig {
                    color: Color::srgba(0.0, 0.0, 0.0, 1.0),
                    transform: Transform::from_xyz(radius * 0.45, radius * 0.35, 0.1),
                    ..ShapeConfig::default_2d()
                },
                radius * 0.15,
            ));

            // Beak
            parent.spawn(ShapeBundle::rect(
                &ShapeConfig {
                    color: DUCK_BEAK_COLOR,
                    transform: Transform::from_xyz(radius * 1.05, 0.0, 0.1),
                    ..ShapeConfig::default_2d()
                },
                Vec2::new(radius * 0.6, radius * 0.35),
            ));
        })
        .id()
}

/// Spawns a log as a plain rectangle.
fn spawn_log(commands: &mut Commands, body: &Body) -> Entity {
    commands
        .spawn((
            ShapeBundle::rect(
                &ShapeConfig {
                    color: LOG_COLOR,
                    transform: Transform::from_translation(screen_to_world(body.position, Z_LOG)),
                    ..ShapeConfig::default_2d()
                },
                body.size * PIXEL_SCALE,
            ),
            LogSprite,
            BodyLink(body.id),
        ))
        .id()
}

/// System to spawn, move, and despawn entities so they match the session's bodies.
fn sync_bodies(
    mut commands: Commands,
    game_state: Res<GameState>,
    mut body_entities: ResMut<BodyEntities>,
    mut transforms: Query<&mut Transform, With<BodyLink>>,
) {
    // A new session reuses body ids, so start from a clean slate.
    if body_entities.generation != game_state.generation {
        for (_, entity) in body_entities.entities.drain() {
            commands.entity(entity).despawn();
        }
        body_entities.generation = game_state.generation;
    }

    let Some(session) = game_state.session.as_ref() else {
        return;
    };

    for body in session.bodies() {
        if body.visual == Visual::Hidden {
            continue;
        }
        match body_entities.entities.get(&body.id) {
            Some(&entity) => {
                if let Ok(mut transform) = transforms.get_mut(entity) {
                    let z = transform.translation.z;
                    transform.translation = screen_to_world(body.position, z);
                }
            }
            None => {
                let entity = match body.kind {
                    BodyKind::Player => spawn_duck(&mut commands, body),
                    BodyKind::Log | BodyKind::Gap => spawn_log(&mut commands, body),
                };
                body_entities.entities.insert(body.id, entity);
            }
        }
    }

    body_entities.entities.retain(|id, entity| {
        let alive = session.body(*id).is_some();
        if !alive {
            commands.entity(*entity).despawn();
        }
        alive
    });
}

/// System to pose the wing for the current flap frame and show the hurt overlay.
fn update_duck_pose(
    game_state: Res<GameState>,
    mut wings: Query<&mut Transform, (With<DuckWing>, Without<DuckHurt>)>,
    mut hurt: Query<&mut Transform, (With<DuckHurt>, Without<DuckWing>)>,
) {
    let Some(session) = game_state.session.as_ref() else {
        return;
    };

    let (frame, is_hurt) = match session.player().visual {
        Visual::Duck(frame) => (frame, false),
        Visual::Hurt => (1, true),
        Visual::Solid | Visual::Hidden => (1, false),
    };
    let angle = WING_ANGLES[(frame.max(1) as usize - 1).min(WING_ANGLES.len() - 1)];

    for mut transform in wings.iter_mut() {
        transform.rotation = Quat::from_rotation_z(angle);
    }
    for mut transform in hurt.iter_mut() {
        transform.scale = if is_hurt { Vec3::ONE } else { Vec3::ZERO };
    }
}

/// System to scroll the skyline with the session's background offset.
fn scroll_skyline(game_state: Res<GameState>, mut blocks: Query<(&SkylineBlock, &mut Transform)>) {
    let offset = game_state
        .session
        .as_ref()
        .map_or(0.0, |session| session.background_offset());

    for (block, mut transform) in blocks.iter_mut() {
        let period = SCREEN_WIDTH + block.width;
        let left = wrap_x(block.base_x - offset * block.parallax, block.width, period);
        transform.translation.x = (left + block.width / 2.0 - SCREEN_WIDTH / 2.0) * PIXEL_SCALE;
    }
}

/// System to trigger camera shake when the duck crashes.
fn trigger_camera_shake_on_game_over(
    mut ended_reader: MessageReader<SessionEnded>,
    mut camera_shake: ResMut<CameraShake>,
) {
    if ended_reader.read().next().is_some() {
        camera_shake.timer = Timer::from_seconds(0.4, TimerMode::Once);
        camera_shake.intensity = 10.0;
    }
}

/// System to apply camera shake effect.
fn camera_shake_system(
    time: Res<Time>,
    mut camera_shake: ResMut<CameraShake>,
    mut camera_query: Query<&mut Transform, With<Camera2d>>,
) {
    if camera_shake.timer.is_finished() {
        return;
    }
    camera_shake.timer.tick(time.delta());

    if let Ok(mut camera_transform) = camera_query.single_mut() {
        if camera_shake.timer.is_finished() {
            camera_transform.translation.x = 0.0;
            camera_transform.translation.y = 0.0;
        } else {
            let decay = 1.0 - camera_shake.timer.fraction();
            let mut rng = rand::rng();
            camera_transform.translation.x =
                (rng.random::<f32>() - 0.5) * camera_shake.intensity * decay;
            camera_transform.translation.y =
                (rng.random::<f32>() - 0.5) * camera_shake.intensity * decay;
        }
    }
}
