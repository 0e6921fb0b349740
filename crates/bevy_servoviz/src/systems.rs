use bevy::math::EulerRot;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use std::collections::HashMap;

use crate::components::{ArmSegment, EndEffector, ServovizRoot};
use crate::resources::{BindingIndex, FrameInputs, PendingOutputs, ServovizEngine};
use servoviz_core::{
    canonical_path, ChainSpec, Inputs, PointerSample, Ray, SegmentId, TargetResolver,
};

/// Spawn a chain as an entity tree with rest-pose transforms. Returns the
/// root entity, or `None` for an empty chain.
pub fn spawn_chain(commands: &mut Commands, spec: &ChainSpec) -> Option<Entity> {
    let effector = spec.end_effector();
    let mut entities: Vec<Entity> = Vec::with_capacity(spec.len());

    for (i, segment) in spec.segments.iter().enumerate() {
        let rest_rotation = Quat::from_euler(
            EulerRot::XYZ,
            segment.rotation[0],
            segment.rotation[1],
            segment.rotation[2],
        );
        let transform = Transform {
            translation: segment.translation,
            rotation: rest_rotation,
            scale: Vec3::splat(segment.scale),
        };

        let id = SegmentId(i as u32);
        let mut spawned = commands.spawn((
            Name::new(segment.name.clone()),
            ArmSegment {
                id,
                joint: segment.joint,
                rest_rotation,
            },
            SpatialBundle::from_transform(transform),
        ));
        if segment.parent.is_none() {
            spawned.insert(ServovizRoot);
        }
        if Some(id) == effector {
            spawned.insert(EndEffector);
        }
        let entity = spawned.id();
        if let Some(parent) = segment.parent {
            commands.entity(entities[parent.0 as usize]).add_child(entity);
        }
        entities.push(entity);
    }
    entities.first().copied()
}

/// Startup: spawn the engine's chain.
pub fn spawn_chain_system(mut commands: Commands, engine: Res<ServovizEngine>) {
    spawn_chain(&mut commands, engine.0.chain());
}

/// Walks descendants under each `ServovizRoot` and populates the
/// `BindingIndex` mapping canonical handles to entities.
pub fn build_binding_index_system(
    roots: Query<Entity, With<ServovizRoot>>,
    children: Query<&Children>,
    segments: Query<(&Name, &ArmSegment)>,
    mut index: ResMut<BindingIndex>,
) {
    let mut map: HashMap<String, Entity> = HashMap::new();

    fn walk(
        e: Entity,
        map: &mut HashMap<String, Entity>,
        segments: &Query<(&Name, &ArmSegment)>,
        children: &Query<&Children>,
    ) {
        if let Ok((name, segment)) = segments.get(e) {
            if let Some(binding) = segment.joint {
                map.insert(canonical_path(name.as_str(), binding.axis), e);
            }
        }
        if let Ok(cs) = children.get(e) {
            for &c in cs.iter() {
                walk(c, map, segments, children);
            }
        }
    }

    for root in roots.iter() {
        walk(root, &mut map, &segments, &children);
    }

    index.map = map;
}

/// Bridges the core prebind call into the ECS: canonical paths resolve to
/// themselves when the binding index knows the node.
pub fn prebind_core_system(mut engine: ResMut<ServovizEngine>, index: Res<BindingIndex>) {
    struct Resolver<'a> {
        idx: &'a BindingIndex,
    }
    impl TargetResolver for Resolver<'_> {
        fn resolve(&mut self, path: &str) -> Option<String> {
            self.idx.map.contains_key(path).then(|| path.to_string())
        }
    }
    let mut resolver = Resolver { idx: &index };
    engine.0.prebind(&mut resolver);
}

/// Build this frame's `Inputs` from the primary window cursor, the 3D
/// camera's pointer ray, and the end-effector's measured world position.
pub fn gather_inputs_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    effectors: Query<&GlobalTransform, With<EndEffector>>,
    mut frame: ResMut<FrameInputs>,
) {
    let mut inputs = Inputs {
        effector_world: effectors.iter().next().map(|t| t.translation()),
        ..Default::default()
    };

    if let (Ok(window), Ok((camera, camera_transform))) =
        (windows.get_single(), cameras.get_single())
    {
        if let Some(cursor) = window.cursor_position() {
            let size = Vec2::new(window.width(), window.height());
            if size.x > 0.0 && size.y > 0.0 {
                // Cursor is top-left origin in logical pixels; NDC is
                // centered with +y up.
                let ndc = Vec2::new(
                    cursor.x / size.x * 2.0 - 1.0,
                    1.0 - cursor.y / size.y * 2.0,
                );
                if let Some(ray) = camera.viewport_to_world(camera_transform, cursor) {
                    inputs.pointer = Some(PointerSample {
                        ndc,
                        ray: Ray::new(ray.origin, *ray.direction),
                    });
                }
            }
        }
    }

    frame.0 = inputs;
}

/// Tick the core with this frame's inputs and stage the resulting changes.
pub fn tick_engine_system(
    mut engine: ResMut<ServovizEngine>,
    mut frame: ResMut<FrameInputs>,
    time: Res<Time>,
    mut pending: ResMut<PendingOutputs>,
) {
    let inputs = std::mem::take(&mut frame.0);
    let out = engine.0.update(time.delta_seconds(), inputs);
    pending.changes.clear();
    pending.changes.extend(out.changes.iter().cloned());
    for event in &out.events {
        debug!("servoviz: {event:?}");
    }
}

/// Apply staged joint angles onto segment `Transform`s via the binding index.
pub fn apply_outputs_system(
    index: Res<BindingIndex>,
    mut pending: ResMut<PendingOutputs>,
    mut nodes: Query<(&ArmSegment, &mut Transform)>,
) {
    for change in pending.changes.drain(..) {
        let Some(&entity) = index.map.get(&change.key) else {
            continue;
        };
        if let Ok((segment, mut transform)) = nodes.get_mut(entity) {
            // The joint angle composes after the rest orientation.
            transform.rotation =
                segment.rest_rotation * Quat::from_axis_angle(change.axis.unit(), change.angle);
        }
    }
}
