//! Deterministic fixed-step AABB physics.
//!
//! Minimal by design: no continuous collision, no rotation-aware shapes.
//! Trigger listeners are plain function pointers rather than a boxed
//! trait object. Each listener receives the entity store and the body
//! table by reference, so it needs no captured state and there is no
//! back-reference from `PhysicsSim` to its owner.

use itertools::Itertools;

use crate::component_table::ComponentTable;
use crate::components::{BodyKind, BoxBody};
use crate::constants::STATIC_COLLISION_EPSILON;
use crate::entity::{ComponentMask, Entity, EntityStore};

/// Called once per overlapping pair, in ascending `(i, j)` discovery order.
/// May mutate `bodies`; mutations are visible to subsequent pair
/// resolutions within the same [`PhysicsSim::step`] call.
pub type TriggerListener = fn(&EntityStore, &mut ComponentTable<BoxBody>, Entity, Entity);

#[derive(Default)]
pub struct PhysicsSim {
    listeners: Vec<TriggerListener>,
}

impl PhysicsSim {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_trigger_listener(&mut self, listener: TriggerListener) {
        self.listeners.push(listener);
    }

    /// Integrates all bodies, then detects and resolves overlapping pairs.
    pub fn step(&self, store: &EntityStore, bodies: &mut ComponentTable<BoxBody>, dt: f32) {
        self.integrate(store, bodies, dt);
        self.detect_and_resolve(store, bodies);
    }

    fn integrate(&self, store: &EntityStore, bodies: &mut ComponentTable<BoxBody>, dt: f32) {
        for index in 0..store.entities_len() {
            let entity = store.entity_at(index);
            if !store.has_component(entity, ComponentMask::BOX_BODY) {
                continue;
            }
            let body = bodies.get_mut(entity);
            body.position += body.velocity * dt;
            body.rotation += body.angular_velocity * dt;
        }
    }

    /// Pairs are discovered in ascending `(i, j)` order. Collecting the
    /// live-body entities once and walking `tuple_combinations` over them
    /// preserves that order while skipping the O(n^2) dead-entity checks a
    /// raw nested loop would repeat.
    fn detect_and_resolve(&self, store: &EntityStore, bodies: &mut ComponentTable<BoxBody>) {
        let live: Vec<Entity> = (0..store.entities_len())
            .map(|index| store.entity_at(index))
            .filter(|&e| is_live_body(store, e))
            .collect();

        for (ei, ej) in live.into_iter().tuple_combinations() {
            let bi = *bodies.get(ei);
            let bj = *bodies.get(ej);
            if bi.kind == BodyKind::Static && bj.kind == BodyKind::Static {
                continue;
            }
            if bi.is_zero_extent() || bj.is_zero_extent() {
                continue;
            }
            if !overlap(&bi, &bj) {
                continue;
            }
            resolve_collision(bodies, ei, bi, ej, bj);
            for listener in &self.listeners {
                listener(store, bodies, ei, ej);
            }
        }
    }
}

fn is_live_body(store: &EntityStore, entity: Entity) -> bool {
    store.has_component(entity, ComponentMask::BOX_BODY)
        && !store.has_component(entity, ComponentMask::DESTROYED)
}

/// Inclusive AABB overlap test using full extents (2 * half-extents).
/// Symmetric in its arguments by construction: swapping a and b gives the
/// same result.
pub fn overlap(a: &BoxBody, b: &BoxBody) -> bool {
    let a_min = a.position - a.half_extents;
    let a_max = a.position + a.half_extents;
    let b_min = b.position - b.half_extents;
    let b_max = b.position + b.half_extents;
    a_min.x <= b_max.x && a_max.x >= b_min.x && a_min.y <= b_max.y && a_max.y >= b_min.y
}

fn resolve_collision(
    bodies: &mut ComponentTable<BoxBody>,
    ei: Entity,
    bi: BoxBody,
    ej: Entity,
    bj: BoxBody,
) {
    if bi.is_trigger || bj.is_trigger {
        return;
    }
    match (bi.kind, bj.kind) {
        (BodyKind::Dynamic, BodyKind::Dynamic) => {
            let mut new_i = bi;
            let mut new_j = bj;
            new_i.velocity = bj.velocity;
            new_j.velocity = bi.velocity;
            bodies.set(ei, new_i);
            bodies.set(ej, new_j);
        }
        (BodyKind::Static, BodyKind::Dynamic) => reflect_against_static(bodies, ei, bi, ej, bj),
        (BodyKind::Dynamic, BodyKind::Static) => reflect_against_static(bodies, ej, bj, ei, bi),
        (BodyKind::Static, BodyKind::Static) => {
            unreachable!("static-static pairs are filtered before resolve_collision")
        }
    }
}

/// For each axis independently, if the gap between the two bodies' edges on
/// that axis is below [`STATIC_COLLISION_EPSILON`], negate the dynamic
/// body's velocity on that axis. Both gaps are computed up front so a body
/// embedded past the threshold on both axes gets exactly one flip per axis,
/// never a double negation that would net out to nothing.
fn reflect_against_static(
    bodies: &mut ComponentTable<BoxBody>,
    _static_entity: Entity,
    static_body: BoxBody,
    dynamic_entity: Entity,
    dynamic_body: BoxBody,
) {
    let mut dynamic = dynamic_body;
    let dx = (dynamic_body.position.x - static_body.position.x).abs()
        - (dynamic_body.half_extents.x + static_body.half_extents.x);
    let dy = (dynamic_body.position.y - static_body.position.y).abs()
        - (dynamic_body.half_extents.y + static_body.half_extents.y);
    if dx < STATIC_COLLISION_EPSILON {
        dynamic.velocity.x = -dynamic.velocity.x;
    }
    if dy < STATIC_COLLISION_EPSILON {
        dynamic.velocity.y = -dynamic.velocity.y;
    }
    bodies.set(dynamic_entity, dynamic);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;

    fn body(position: Vec2, half_extents: Vec2, kind: BodyKind) -> BoxBody {
        BoxBody {
            position,
            half_extents,
            kind,
            ..Default::default()
        }
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = body(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), BodyKind::Dynamic);
        let b = body(Vec2::new(1.5, 0.0), Vec2::new(1.0, 1.0), BodyKind::Dynamic);
        assert_eq!(overlap(&a, &b), overlap(&b, &a));
        assert!(overlap(&a, &b));
    }

    #[test]
    fn touching_edges_overlap_inclusively() {
        let a = body(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), BodyKind::Dynamic);
        let b = body(Vec2::new(2.0, 0.0), Vec2::new(1.0, 1.0), BodyKind::Dynamic);
        assert!(overlap(&a, &b));
    }

    #[test]
    fn static_static_never_emits_or_moves() {
        let mut store = EntityStore::new();
        let e0 = store.create_entity();
        let e1 = store.create_entity();
        store.add_component(e0, ComponentMask::BOX_BODY);
        store.add_component(e1, ComponentMask::BOX_BODY);
        let mut bodies: ComponentTable<BoxBody> = ComponentTable::new();
        bodies.set(
            e0,
            body(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), BodyKind::Static),
        );
        bodies.set(
            e1,
            body(Vec2::new(0.5, 0.0), Vec2::new(1.0, 1.0), BodyKind::Static),
        );
        let before0 = *bodies.get(e0);
        let before1 = *bodies.get(e1);
        let mut sim = PhysicsSim::new();
        fn panics_if_called(_: &EntityStore, _: &mut ComponentTable<BoxBody>, _: Entity, _: Entity) {
            panic!("trigger listener should not run for static-static pairs");
        }
        sim.register_trigger_listener(panics_if_called);
        sim.step(&store, &mut bodies, 0.02);
        assert_eq!(bodies.get(e0).position, before0.position);
        assert_eq!(bodies.get(e1).position, before1.position);
    }

    #[test]
    fn dynamic_dynamic_swaps_velocity() {
        let mut store = EntityStore::new();
        let e0 = store.create_entity();
        let e1 = store.create_entity();
        store.add_component(e0, ComponentMask::BOX_BODY);
        store.add_component(e1, ComponentMask::BOX_BODY);
        let mut bodies: ComponentTable<BoxBody> = ComponentTable::new();
        let mut b0 = body(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), BodyKind::Dynamic);
        b0.velocity = Vec2::new(1.0, 0.0);
        let mut b1 = body(Vec2::new(0.5, 0.0), Vec2::new(1.0, 1.0), BodyKind::Dynamic);
        b1.velocity = Vec2::new(-1.0, 0.0);
        bodies.set(e0, b0);
        bodies.set(e1, b1);
        let sim = PhysicsSim::new();
        sim.step(&store, &mut bodies, 0.0);
        assert_eq!(bodies.get(e0).velocity, Vec2::new(-1.0, 0.0));
        assert_eq!(bodies.get(e1).velocity, Vec2::new(1.0, 0.0));
    }
}
