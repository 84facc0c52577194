//! The conversion context: converter registry, scheduler and shared
//! scratch resources for one simulation.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;

use dimshift_core::CancellationToken;
use dimshift_core::mesh::TriMesh;
use dimshift_geometry::{
    CapsuleMapper, CuboidMapper, MeshMapper, ShapeKind, SilhouetteRenderer, SkipReason,
    SoftwareRenderer, SphereMapper,
};

use crate::adapters::AdapterRegistry;
use crate::converter::{ConvertCx, Converter};
use crate::converters::{
    BodyConverter, BoxConverter, CapsuleConverter, ConstantForceConverter, JointConverter,
    MeshConverter, SphereConverter,
};
use crate::direction::Direction;
use crate::error::{ConversionError, SettingsError};
use crate::host::PhysicsHost;
use crate::order::ConversionOrder;
use crate::overlap::{OverlapState, OverlapSuppressor};
use crate::scene::{Arena, Collider, EntityId, Scene};
use crate::schedule::{ConverterId, Schedule, SweepCursor, SweepReport, SweepStatus};
use crate::settings::ConversionSettings;

struct ConverterSlot {
    converter: Box<dyn Converter>,
    type_id: TypeId,
    active: bool,
}

#[derive(Debug, Clone, Copy)]
struct TypeOrder {
    order: ConversionOrder,
    name: &'static str,
}

/// Owns every registry the conversion pipeline needs.
///
/// Create one per simulation and pass the scene and physics host to each
/// call. Builtin converter types are registered on construction with the
/// orders from [`ConversionSettings`], which must validate.
///
/// ```ignore
/// let mut ctx = ConversionContext::new(ConversionSettings::default())?;
/// ctx.attach_entity(&mut scene, player)?;
/// ctx.convert_all_to_2d()?;
/// // once per frame:
/// ctx.advance(&mut scene, &mut host);
/// ```
pub struct ConversionContext {
    settings: ConversionSettings,
    orders: HashMap<TypeId, TypeOrder>,
    slots: Arena<ConverterSlot>,
    schedule: Schedule,
    sweep: Option<SweepCursor>,
    /// Converters removed while a sweep was running.
    pending_removals: Vec<ConverterId>,
    overlaps: OverlapSuppressor,
    adapters: AdapterRegistry,
    renderer: Box<dyn SilhouetteRenderer>,
    replaced_meshes: Vec<Arc<TriMesh>>,
    /// Skips seen by the running sweep.
    sweep_skips: Vec<(ConverterId, SkipReason)>,
}

impl ConversionContext {
    pub fn new(settings: ConversionSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let mut ctx = Self {
            orders: HashMap::new(),
            slots: Arena::default(),
            schedule: Schedule::new(),
            sweep: None,
            pending_removals: Vec::new(),
            overlaps: OverlapSuppressor::new(),
            adapters: AdapterRegistry::new(),
            renderer: Box::new(SoftwareRenderer::new()),
            replaced_meshes: Vec::new(),
            sweep_skips: Vec::new(),
            settings,
        };
        ctx.register_builtins();
        Ok(ctx)
    }

    fn register_builtins(&mut self) {
        let shapes = self.settings.shape_order;
        let bodies = self.settings.body_order;
        let attachments = self.settings.attachment_order;
        self.insert_order::<SphereConverter>(shapes);
        self.insert_order::<CapsuleConverter>(shapes);
        self.insert_order::<BoxConverter>(shapes);
        self.insert_order::<MeshConverter>(shapes);
        self.insert_order::<BodyConverter>(bodies);
        self.insert_order::<ConstantForceConverter>(attachments);
        self.insert_order::<JointConverter>(attachments);
    }

    fn insert_order<C: Converter>(&mut self, order: ConversionOrder) {
        self.orders.insert(
            TypeId::of::<C>(),
            TypeOrder {
                order,
                name: type_name::<C>(),
            },
        );
    }

    /// Replace the silhouette renderer used for mesh outlines.
    pub fn with_renderer(mut self, renderer: Box<dyn SilhouetteRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    /// For registering adapters of user attachment types.
    pub fn adapters_mut(&mut self) -> &mut AdapterRegistry {
        &mut self.adapters
    }

    // ---- Converter types ----

    /// Register a converter type with its conversion order.
    pub fn register_type<C: Converter>(&mut self, order: ConversionOrder) -> Result<(), ConversionError> {
        order.validate(type_name::<C>())?;
        self.insert_order::<C>(order);
        Ok(())
    }

    /// Change the order of a registered type. Active instances move to
    /// their new group, after the current sweep if one is running.
    pub fn set_order<C: Converter>(&mut self, order: ConversionOrder) -> Result<(), ConversionError> {
        let type_id = TypeId::of::<C>();
        let entry = self
            .orders
            .get_mut(&type_id)
            .ok_or(ConversionError::UnknownConverterType(type_name::<C>()))?;
        order.validate(entry.name)?;
        entry.order = order;

        for (index, generation, slot) in self.slots.iter() {
            if slot.type_id == type_id && slot.active {
                self.schedule
                    .insert(ConverterId::new(index, generation), order);
            }
        }
        Ok(())
    }

    pub fn order_of<C: Converter>(&self) -> Option<ConversionOrder> {
        self.orders.get(&TypeId::of::<C>()).map(|t| t.order)
    }

    // ---- Converter instances ----

    /// Add an active converter instance. Its type must be registered.
    pub fn add_converter<C: Converter>(&mut self, converter: C) -> Result<ConverterId, ConversionError> {
        let type_id = TypeId::of::<C>();
        let order = self
            .orders
            .get(&type_id)
            .map(|t| t.order)
            .ok_or(ConversionError::UnknownConverterType(type_name::<C>()))?;
        let (index, generation) = self.slots.insert(ConverterSlot {
            converter: Box::new(converter),
            type_id,
            active: true,
        });
        let id = ConverterId::new(index, generation);
        self.schedule.insert(id, order);
        Ok(id)
    }

    /// Activate or deactivate a converter. Inactive converters keep their
    /// state but take no part in sweeps.
    pub fn set_active(&mut self, id: ConverterId, active: bool) -> Result<(), ConversionError> {
        let slot = self
            .slots
            .get_mut(id.index(), id.generation())
            .filter(|_| !self.pending_removals.contains(&id))
            .ok_or(ConversionError::UnknownConverter(id))?;
        if slot.active == active {
            return Ok(());
        }
        slot.active = active;
        if active {
            let order = self
                .orders
                .get(&slot.type_id)
                .map(|t| t.order)
                .unwrap_or_default();
            self.schedule.insert(id, order);
        } else {
            self.schedule.remove(id);
        }
        Ok(())
    }

    pub fn is_active(&self, id: ConverterId) -> bool {
        self.slots
            .get(id.index(), id.generation())
            .is_some_and(|s| s.active)
    }

    /// Remove a converter and the latent half of what it manages. During a
    /// sweep the converter goes inactive at once and is dropped when the
    /// sweep ends.
    pub fn remove_converter(&mut self, id: ConverterId, scene: &mut Scene) -> Result<(), ConversionError> {
        let slot = self
            .slots
            .get_mut(id.index(), id.generation())
            .ok_or(ConversionError::UnknownConverter(id))?;
        if self.pending_removals.contains(&id) {
            return Ok(());
        }
        slot.active = false;
        self.schedule.remove(id);
        if self.sweep.is_some() {
            self.pending_removals.push(id);
        } else {
            self.drop_converter(id, scene);
        }
        Ok(())
    }

    fn drop_converter(&mut self, id: ConverterId, scene: &mut Scene) {
        if let Some(mut slot) = self.slots.remove(id.index(), id.generation()) {
            slot.converter.teardown(scene);
        }
    }

    pub fn converter<C: Converter>(&self, id: ConverterId) -> Option<&C> {
        let slot = self.slots.get(id.index(), id.generation())?;
        (*slot.converter).as_any().downcast_ref::<C>()
    }

    pub fn converter_mut<C: Converter>(&mut self, id: ConverterId) -> Option<&mut C> {
        let slot = self.slots.get_mut(id.index(), id.generation())?;
        (*slot.converter).as_any_mut().downcast_mut::<C>()
    }

    pub fn converter_count(&self) -> usize {
        self.slots.len()
    }

    /// Active converters bound to `entity`, in sweep order.
    pub fn converters_of(&self, entity: EntityId, direction: Direction) -> Vec<ConverterId> {
        self.schedule
            .members(direction)
            .filter(|id| {
                self.slots
                    .get(id.index(), id.generation())
                    .is_some_and(|s| s.converter.entity() == entity)
            })
            .collect()
    }

    /// Create converters for everything convertible on `entity`: one per
    /// volume collider, plus body, force and joint converters when present.
    pub fn attach_entity(&mut self, scene: &mut Scene, entity: EntityId) -> Result<Vec<ConverterId>, ConversionError> {
        let record = scene
            .entity(entity)
            .ok_or(ConversionError::MissingEntity(entity))?;
        let has_body = record.body3d.is_some() || record.body2d.is_some();
        let has_force = record.force3d.is_some() || record.force2d.is_some();
        let has_joint = record.joint3d.is_some() || record.joint2d.is_some();

        let volumes: Vec<_> = scene
            .colliders_of(entity)
            .filter_map(|id| match scene.collider(id) {
                Some(Collider::Volume(c)) => Some((id, c.shape.kind())),
                _ => None,
            })
            .collect();

        let mut ids = Vec::new();
        for (volume, kind) in volumes {
            let id = match kind {
                ShapeKind::Sphere => {
                    let c = SphereConverter::attach(scene, entity, volume, SphereMapper)?;
                    self.add_converter(c)?
                }
                ShapeKind::Capsule => {
                    let c = CapsuleConverter::attach(scene, entity, volume, CapsuleMapper)?;
                    self.add_converter(c)?
                }
                ShapeKind::Box => {
                    let mapper = CuboidMapper {
                        safe: self.settings.safe_box_conversion,
                    };
                    let c = BoxConverter::attach(scene, entity, volume, mapper)?;
                    self.add_converter(c)?
                }
                ShapeKind::Mesh => {
                    let mapper = MeshMapper::new(self.settings.outline)
                        .with_mesh_options(self.settings.mesh_options);
                    let c = MeshConverter::attach(scene, entity, volume, mapper)?;
                    self.add_converter(c)?
                }
            };
            ids.push(id);
        }
        if has_body {
            ids.push(self.add_converter(BodyConverter::new(entity))?);
        }
        if has_force {
            ids.push(self.add_converter(ConstantForceConverter::new(entity))?);
        }
        if has_joint {
            ids.push(self.add_converter(JointConverter::new(entity))?);
        }
        Ok(ids)
    }

    // ---- Sweeps ----

    pub fn is_sweeping(&self) -> bool {
        self.sweep.is_some()
    }

    /// Start a frame-spread sweep. Drive it with [`advance`](Self::advance).
    pub fn begin_sweep(
        &mut self,
        direction: Direction,
        token: Option<CancellationToken>,
    ) -> Result<(), ConversionError> {
        if self.sweep.is_some() {
            return Err(ConversionError::SweepInProgress);
        }
        let cursor = self.schedule.begin_sweep(direction, token);
        log::info!(
            "{direction} sweep started: {} converter(s) in {} group(s)",
            cursor.remaining_total(),
            cursor.groups().len()
        );
        self.sweep = Some(cursor);
        self.sweep_skips.clear();
        Ok(())
    }

    pub fn convert_all_to_2d(&mut self) -> Result<(), ConversionError> {
        self.begin_sweep(Direction::ToPlanar, None)
    }

    pub fn convert_all_to_3d(&mut self) -> Result<(), ConversionError> {
        self.begin_sweep(Direction::ToVolume, None)
    }

    /// One scheduling tick of the running sweep.
    pub fn advance(&mut self, scene: &mut Scene, host: &mut dyn PhysicsHost) -> SweepStatus {
        let Some(mut cursor) = self.sweep.take() else {
            return SweepStatus::Idle;
        };
        let direction = cursor.direction();
        let mut status = cursor.advance(|id| {
            let skipped = self.run_converter(id, direction, scene, host)?;
            self.sweep_skips.extend(skipped.into_iter().map(|reason| (id, reason)));
            Ok(())
        });
        if let SweepStatus::Complete(report) | SweepStatus::Cancelled(report) = &mut status {
            report.skipped = std::mem::take(&mut self.sweep_skips);
        }
        if status.is_finished() {
            self.finish_sweep(&status, scene, host);
        } else {
            self.sweep = Some(cursor);
        }
        status
    }

    fn finish_sweep(&mut self, status: &SweepStatus, scene: &mut Scene, host: &mut dyn PhysicsHost) {
        self.schedule.end_sweep();
        for id in std::mem::take(&mut self.pending_removals) {
            self.drop_converter(id, scene);
        }
        let resolved = self.resolve_pending_joints(scene, host);
        match status {
            SweepStatus::Complete(report) => log::info!(
                "{} sweep complete: {} converted, {} failed, {} tick(s), {resolved} joint(s) reconnected",
                report.direction,
                report.converted,
                report.failed.len(),
                report.ticks
            ),
            SweepStatus::Cancelled(report) => log::info!(
                "{} sweep cancelled after {} conversion(s)",
                report.direction,
                report.converted
            ),
            SweepStatus::Idle | SweepStatus::Yielded { .. } => {}
        }
    }

    /// Run a whole sweep within this call.
    ///
    /// Fails with [`ConversionError::SweepInProgress`] when a frame-spread
    /// sweep is already running.
    pub fn convert_all_blocking(
        &mut self,
        direction: Direction,
        scene: &mut Scene,
        host: &mut dyn PhysicsHost,
    ) -> Result<SweepReport, ConversionError> {
        self.begin_sweep(direction, None)?;
        loop {
            match self.advance(scene, host) {
                SweepStatus::Complete(report) | SweepStatus::Cancelled(report) => return Ok(report),
                SweepStatus::Idle => return Err(ConversionError::SweepInProgress),
                SweepStatus::Yielded { .. } => {}
            }
        }
    }

    /// Convert a single entity right away, in schedule order. Returns the
    /// number of converters run.
    ///
    /// Every converter is attempted; the first error is returned.
    pub fn convert(
        &mut self,
        direction: Direction,
        entity: EntityId,
        scene: &mut Scene,
        host: &mut dyn PhysicsHost,
    ) -> Result<usize, ConversionError> {
        if !scene.contains(entity) {
            return Err(ConversionError::MissingEntity(entity));
        }
        let mut first_error = None;
        let mut converted = 0;
        for id in self.converters_of(entity, direction) {
            match self.run_converter(id, direction, scene, host) {
                Ok(skipped) => {
                    for reason in skipped {
                        log::warn!("converter {id:?} kept its previous shape: {reason}");
                    }
                    converted += 1;
                }
                Err(err) => {
                    log::error!("converter {id:?} failed: {err}");
                    first_error.get_or_insert(err);
                }
            }
        }
        self.resolve_pending_joints(scene, host);
        match first_error {
            Some(err) => Err(err),
            None => Ok(converted),
        }
    }

    /// Run one converter. Returns the mappings it skipped.
    fn run_converter(
        &mut self,
        id: ConverterId,
        direction: Direction,
        scene: &mut Scene,
        host: &mut dyn PhysicsHost,
    ) -> Result<Vec<SkipReason>, ConversionError> {
        dimshift_core::profile_scope!("run_converter");
        let slot = self
            .slots
            .get_mut(id.index(), id.generation())
            .ok_or(ConversionError::UnknownConverter(id))?;
        let mut cx = ConvertCx {
            scene,
            host,
            renderer: &mut *self.renderer,
            overlaps: &mut self.overlaps,
            adapters: &self.adapters,
            mode: self.settings.mode,
            suppress_overlaps: self.settings.suppress_overlaps,
            replaced_meshes: &mut self.replaced_meshes,
            skipped: Vec::new(),
        };
        slot.converter.convert(direction, &mut cx)?;

        let entity = slot.converter.entity();
        if let Some(record) = cx.scene.entity_mut(entity) {
            record.dimension = direction.target();
        }
        Ok(cx.skipped)
    }

    /// Reconnect joints whose connected entity has caught up. Returns the
    /// number reconnected.
    pub fn resolve_pending_joints(&mut self, scene: &mut Scene, host: &mut dyn PhysicsHost) -> usize {
        let mut cx = ConvertCx {
            scene,
            host,
            renderer: &mut *self.renderer,
            overlaps: &mut self.overlaps,
            adapters: &self.adapters,
            mode: self.settings.mode,
            suppress_overlaps: self.settings.suppress_overlaps,
            replaced_meshes: &mut self.replaced_meshes,
            skipped: Vec::new(),
        };
        let mut resolved = 0;
        for (_, _, slot) in self.slots.iter_mut() {
            if !slot.converter.is_pending() {
                continue;
            }
            match slot.converter.resolve(&mut cx) {
                Ok(()) if !slot.converter.is_pending() => resolved += 1,
                Ok(()) => {}
                Err(err) => log::error!("resolving {:?} failed: {err}", slot.converter.entity()),
            }
        }
        resolved
    }

    /// Converters still waiting on another entity.
    pub fn pending_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|(_, _, s)| s.converter.is_pending())
            .count()
    }

    // ---- Overlap suppression ----

    /// Monitoring tick for every suppressing body. Call once per physics
    /// step. Returns the number of pairs whose suppression was lifted.
    pub fn step_overlaps(&mut self, scene: &Scene, host: &mut dyn PhysicsHost) -> usize {
        self.overlaps.prune(scene, host);
        self.overlaps.tick(scene, host)
    }

    pub fn overlap_state(&self, entity: EntityId) -> OverlapState {
        self.overlaps.state(entity)
    }

    pub fn overlaps(&self) -> &OverlapSuppressor {
        &self.overlaps
    }

    /// Meshes replaced by polygon→mesh conversion with `release_previous`
    /// off.
    pub fn take_replaced_meshes(&mut self) -> Vec<Arc<TriMesh>> {
        std::mem::take(&mut self.replaced_meshes)
    }
}
