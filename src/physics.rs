// src/physics.rs

use log::{info, warn};
use rapier3d::prelude::*;

use crate::config::VehicleConfig;
use crate::engine::{RayHit, RigidBodyEngine};
use crate::error::VehicleError;
use crate::tire::SimContext;

const GROUP_GROUND: Group  = Group::from_bits_truncate(0b0001);
const GROUP_CHASSIS: Group = Group::from_bits_truncate(0b0010);

pub struct PhysicsWorld {
    pub gravity: Vector<Real>, // gravity vector
    pub pipeline: PhysicsPipeline, // physics pipeline
    pub island_manager: IslandManager, // manages islands of bodies
    pub broad_phase: DefaultBroadPhase, // broad-phase collision detection
    pub narrow_phase: NarrowPhase, // collision detection
    pub bodies: RigidBodySet, // for rigid bodies
    pub colliders: ColliderSet, // for collision shapes
    pub joints: ImpulseJointSet, // for constraints
    pub multibody_joints: MultibodyJointSet,// for articulated bodies
    pub ccd: CCDSolver, // continuous collision detection
    pub query_pipeline: QueryPipeline, // for raycasting
    spawn_point: Vector<Real>, // where exploded bodies are reset to
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Empty world with standard gravity and no ground.
    pub fn empty() -> Self {
        Self {
            gravity: vector![0.0, -9.81, 0.0],
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            spawn_point: vector![0.0, 2.0, 0.0],
        }
    }

    /// World with a large static ground slab whose top surface is y = 0.
    pub fn new() -> Self {
        let mut world = Self::empty();
        world.add_static_cuboid(
            vector![500.0, 1.0, 500.0],
            Isometry::translation(0.0, -1.0, 0.0),
        );
        info!(
            "ground inserted. bodies = {}, colliders = {}",
            world.bodies.len(),
            world.colliders.len()
        );
        world
    }

    /// Timestep + gravity magnitude for the vehicle pipeline.
    pub fn context(&self, dt: Real) -> Result<SimContext, VehicleError> {
        SimContext::new(dt, self.gravity.norm())
    }

    /// Static environment box (ground, ramps, platforms).
    pub fn add_static_cuboid(&mut self, half_extents: Vector<Real>, pose: Isometry<Real>) -> RigidBodyHandle {
        let rb = RigidBodyBuilder::fixed().position(pose).build();
        let handle = self.bodies.insert(rb);

        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .collision_groups(InteractionGroups::new(GROUP_GROUND, GROUP_CHASSIS))
            .friction(1.0)
            .restitution(0.0)
            .build();
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);
        self.query_pipeline.update(&self.colliders);
        handle
    }

    /// Dynamic chassis box whose total mass equals `config.mass`.
    pub fn spawn_chassis(&mut self, config: &VehicleConfig, position: Vector<Real>) -> RigidBodyHandle {
        let [hx, hy, hz] = config.chassis_half_extents;
        let volume = 8.0 * hx * hy * hz;
        let density = config.mass / volume; // ρ = m / V

        let rb = RigidBodyBuilder::dynamic()
            .translation(position)
            .ccd_enabled(true)
            .build();

        // Tire forces do the gripping; the box itself is frictionless.
        let collider = ColliderBuilder::cuboid(hx, hy, hz)
            .collision_groups(InteractionGroups::new(GROUP_CHASSIS, GROUP_GROUND))
            .density(density)
            .friction(0.0)
            .restitution(0.0)
            .build();

        let handle = self.bodies.insert(rb);
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);
        // mass is read by the load balance before the first step
        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.recompute_mass_properties_from_colliders(&self.colliders);
        }
        self.query_pipeline.update(&self.colliders);
        self.spawn_point = position;

        info!("spawned chassis at {:?} (body = {:?})", position, handle);
        handle
    }

    pub fn chassis(&self, handle: RigidBodyHandle) -> Result<&RigidBody, VehicleError> {
        self.bodies.get(handle).ok_or(VehicleError::MissingBody)
    }

    /// Integrate one step, then clear the forces accumulated for it.
    pub fn step(&mut self, dt: Real) {
        self.pipeline.step(
            &self.gravity,
            &IntegrationParameters {
                dt,
                ..IntegrationParameters::default()
            },
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
        }

        // Safety: prevent bodies from exploding to insane coordinates
        for (handle, body) in self.bodies.iter_mut() {
            let pos = *body.translation();

            let bad =
                !pos.x.is_finite() || !pos.y.is_finite() || !pos.z.is_finite() ||
                pos.x.abs() > 1_000.0 || pos.y.abs() > 1_000.0 || pos.z.abs() > 1_000.0;

            if bad && body.is_dynamic() {
                body.set_translation(self.spawn_point, true);
                body.set_rotation(Rotation::identity(), true);
                body.set_linvel(vector![0.0, 0.0, 0.0], true);
                body.set_angvel(vector![0.0, 0.0, 0.0], true);

                warn!("reset exploding body {:?} back to {:?}", handle, self.spawn_point);
            }
        }
    }
}

impl RigidBodyEngine for PhysicsWorld {
    fn cast_ray(
        &self,
        origin: Point<Real>,
        dir: Vector<Real>,
        max_distance: Real,
        exclude: RigidBodyHandle,
    ) -> Option<RayHit> {
        let ray = Ray::new(origin, dir);
        let filter = QueryFilter::default().exclude_rigid_body(exclude);

        let (_collider, hit) = self.query_pipeline.cast_ray_and_get_normal(
            &self.bodies,
            &self.colliders,
            &ray,
            max_distance,
            true,
            filter,
        )?;

        // Origin inside a solid: no meaningful normal, push back up the strut.
        let normal = if hit.normal.norm_squared() > 1e-12 { hit.normal } else { -dir };

        Some(RayHit {
            distance: hit.time_of_impact,
            point: ray.point_at(hit.time_of_impact),
            normal,
        })
    }

    fn apply_force_at_point(&mut self, body: RigidBodyHandle, force: Vector<Real>, point: Point<Real>) {
        if let Some(rb) = self.bodies.get_mut(body) {
            rb.add_force_at_point(force, point, true);
        }
    }

    fn velocity_at_point(&self, body: RigidBodyHandle, point: Point<Real>) -> Vector<Real> {
        self.bodies
            .get(body)
            .map(|rb| rb.velocity_at_point(&point))
            .unwrap_or_else(Vector::zeros)
    }

    fn mass(&self, body: RigidBodyHandle) -> Real {
        self.bodies.get(body).map(|rb| rb.mass()).unwrap_or(0.0)
    }

    fn linear_speed(&self, body: RigidBodyHandle) -> Real {
        self.bodies.get(body).map(|rb| rb.linvel().norm()).unwrap_or(0.0)
    }

    fn pose(&self, body: RigidBodyHandle) -> Isometry<Real> {
        self.bodies
            .get(body)
            .map(|rb| *rb.position())
            .unwrap_or_else(Isometry::identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::COUPE;
    use approx::assert_relative_eq;

    #[test]
    fn chassis_mass_matches_config() {
        let mut world = PhysicsWorld::new();
        let h = world.spawn_chassis(&COUPE, vector![0.0, 1.0, 0.0]);
        assert_relative_eq!(world.mass(h), COUPE.mass, max_relative = 1e-3);
    }

    #[test]
    fn ray_hits_ground_top_and_ignores_chassis() {
        let mut world = PhysicsWorld::new();
        let h = world.spawn_chassis(&COUPE, vector![0.0, 1.0, 0.0]);
        let hit = world
            .cast_ray(point![0.0, 1.0, 0.0], vector![0.0, -1.0, 0.0], 5.0, h)
            .expect("ground below");
        assert_relative_eq!(hit.distance, 1.0, epsilon = 1e-3);
        assert_relative_eq!(hit.normal, vector![0.0, 1.0, 0.0], epsilon = 1e-4);
    }

    #[test]
    fn ray_misses_beyond_range() {
        let mut world = PhysicsWorld::new();
        let h = world.spawn_chassis(&COUPE, vector![0.0, 5.0, 0.0]);
        assert!(world.cast_ray(point![0.0, 5.0, 0.0], vector![0.0, -1.0, 0.0], 1.0, h).is_none());
    }

    #[test]
    fn forces_are_cleared_after_step() {
        let mut world = PhysicsWorld::new();
        let h = world.spawn_chassis(&COUPE, vector![0.0, 3.0, 0.0]);
        world.apply_force_at_point(h, vector![100.0, 0.0, 0.0], point![0.0, 3.0, 0.0]);
        assert_relative_eq!(world.chassis(h).unwrap().user_force().x, 100.0);
        world.step(1.0 / 60.0);
        assert_relative_eq!(world.chassis(h).unwrap().user_force().norm(), 0.0);
    }
}
