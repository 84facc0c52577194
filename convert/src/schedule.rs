//! Priority-ordered, batched conversion scheduling.
//!
//! [`Schedule`] keeps active converters grouped by priority and batch size.
//! A sweep takes a snapshot of that grouping into a [`SweepCursor`], which a
//! driver advances once per tick:
//!
//! ```text
//! priority -100 ── batch 100: [c0 c1 .. c99 | c100 ..]   yield every 100
//!              └── batch 10:  [..]                       yield after group
//! priority  -50 ── batch 100: [..]
//! ```
//!
//! Membership changes made while a sweep runs are deferred until it ends.

use std::collections::BTreeMap;

use dimshift_core::{CancellationToken, Cancelled};
use dimshift_geometry::SkipReason;

use crate::direction::Direction;
use crate::error::ConversionError;
use crate::order::ConversionOrder;
use crate::scene::generational_id;

generational_id!(
    /// Identifier of a converter instance registered with a context.
    ConverterId
);

type Buckets = BTreeMap<i32, BTreeMap<u32, Vec<ConverterId>>>;

#[derive(Debug, Clone, Copy)]
enum Change {
    Insert(ConverterId, ConversionOrder),
    Remove(ConverterId),
}

/// Active converters by direction, priority and batch size.
#[derive(Debug, Default)]
pub struct Schedule {
    to_planar: Buckets,
    to_volume: Buckets,
    locked: bool,
    deferred: Vec<Change>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    fn buckets_mut(&mut self, direction: Direction) -> &mut Buckets {
        match direction {
            Direction::ToPlanar => &mut self.to_planar,
            Direction::ToVolume => &mut self.to_volume,
        }
    }

    fn buckets(&self, direction: Direction) -> &Buckets {
        match direction {
            Direction::ToPlanar => &self.to_planar,
            Direction::ToVolume => &self.to_volume,
        }
    }

    /// Add `id` to the groups for `order`. Deferred while locked.
    pub fn insert(&mut self, id: ConverterId, order: ConversionOrder) {
        if self.locked {
            self.deferred.push(Change::Insert(id, order));
            return;
        }
        self.remove_now(id);
        for direction in [Direction::ToPlanar, Direction::ToVolume] {
            self.buckets_mut(direction)
                .entry(order.priority)
                .or_default()
                .entry(order.batch(direction))
                .or_default()
                .push(id);
        }
    }

    /// Remove `id` from every group. Deferred while locked.
    pub fn remove(&mut self, id: ConverterId) {
        if self.locked {
            self.deferred.push(Change::Remove(id));
        } else {
            self.remove_now(id);
        }
    }

    fn remove_now(&mut self, id: ConverterId) {
        for direction in [Direction::ToPlanar, Direction::ToVolume] {
            let buckets = self.buckets_mut(direction);
            for groups in buckets.values_mut() {
                for members in groups.values_mut() {
                    members.retain(|m| *m != id);
                }
                groups.retain(|_, members| !members.is_empty());
            }
            buckets.retain(|_, groups| !groups.is_empty());
        }
    }

    pub fn contains(&self, id: ConverterId) -> bool {
        self.members(Direction::ToPlanar).any(|m| m == id)
    }

    /// Members in sweep order for `direction`.
    pub fn members(&self, direction: Direction) -> impl Iterator<Item = ConverterId> + '_ {
        self.buckets(direction)
            .values()
            .flat_map(|groups| groups.values())
            .flatten()
            .copied()
    }

    pub fn len(&self) -> usize {
        self.members(Direction::ToPlanar).count()
    }

    pub fn is_empty(&self) -> bool {
        self.to_planar.is_empty()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn pending_changes(&self) -> usize {
        self.deferred.len()
    }

    /// Freeze membership and snapshot it into a cursor.
    pub fn begin_sweep(&mut self, direction: Direction, token: Option<CancellationToken>) -> SweepCursor {
        self.locked = true;
        let groups = self
            .buckets(direction)
            .iter()
            .flat_map(|(&priority, groups)| {
                groups.iter().map(move |(&batch, members)| SweepGroup {
                    priority,
                    // a zero batch would never make progress
                    batch: batch.max(1),
                    members: members.clone(),
                })
            })
            .filter(|g| !g.members.is_empty())
            .collect();
        SweepCursor::new(direction, groups, token)
    }

    /// Unfreeze membership and apply deferred changes in order.
    pub fn end_sweep(&mut self) {
        self.locked = false;
        for change in std::mem::take(&mut self.deferred) {
            match change {
                Change::Insert(id, order) => self.insert(id, order),
                Change::Remove(id) => self.remove_now(id),
            }
        }
    }
}

/// One (priority, batch size) group of a sweep snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepGroup {
    pub priority: i32,
    pub batch: u32,
    pub members: Vec<ConverterId>,
}

/// Outcome of a finished or cancelled sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepReport {
    pub direction: Direction,
    /// Converters that handed over, skipped mappings included.
    pub converted: usize,
    pub failed: Vec<(ConverterId, ConversionError)>,
    /// Mappings that kept the target's previous parameters.
    pub skipped: Vec<(ConverterId, SkipReason)>,
    /// Ticks spent, including the one that finished the sweep.
    pub ticks: usize,
}

impl SweepReport {
    fn new(direction: Direction) -> Self {
        Self {
            direction,
            converted: 0,
            failed: Vec::new(),
            skipped: Vec::new(),
            ticks: 0,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of one [`SweepCursor::advance`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum SweepStatus {
    /// No sweep is running.
    Idle,
    /// A batch boundary was reached; call again next tick.
    Yielded { converted: usize },
    Complete(SweepReport),
    Cancelled(SweepReport),
}

impl SweepStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, SweepStatus::Complete(_) | SweepStatus::Cancelled(_))
    }
}

/// Resumable position inside a sweep.
#[derive(Debug)]
pub struct SweepCursor {
    groups: Vec<SweepGroup>,
    group: usize,
    member: usize,
    remaining: u32,
    token: Option<CancellationToken>,
    report: SweepReport,
    finished: bool,
}

impl SweepCursor {
    fn new(direction: Direction, groups: Vec<SweepGroup>, token: Option<CancellationToken>) -> Self {
        let remaining = groups.first().map_or(0, |g| g.batch);
        Self {
            groups,
            group: 0,
            member: 0,
            remaining,
            token,
            report: SweepReport::new(direction),
            finished: false,
        }
    }

    pub fn direction(&self) -> Direction {
        self.report.direction
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Conversions not yet attempted.
    pub fn remaining_total(&self) -> usize {
        self.groups
            .iter()
            .skip(self.group)
            .map(|g| g.members.len())
            .sum::<usize>()
            .saturating_sub(self.member)
    }

    pub fn groups(&self) -> &[SweepGroup] {
        &self.groups
    }

    fn checkpoint(&self) -> Result<(), Cancelled> {
        match &self.token {
            Some(token) => token.checkpoint(),
            None => Ok(()),
        }
    }

    fn finish(&mut self) -> SweepReport {
        self.finished = true;
        let direction = self.report.direction;
        std::mem::replace(&mut self.report, SweepReport::new(direction))
    }

    /// Run conversions until the next batch boundary.
    ///
    /// `step` converts one instance; an error is logged and recorded and the
    /// sweep moves on.
    pub fn advance(
        &mut self,
        mut step: impl FnMut(ConverterId) -> Result<(), ConversionError>,
    ) -> SweepStatus {
        dimshift_core::profile_function!();
        if self.finished {
            return SweepStatus::Idle;
        }
        if let Err(cancelled) = self.checkpoint() {
            log::info!("{} sweep stopped: {cancelled}", self.report.direction);
            return SweepStatus::Cancelled(self.finish());
        }

        self.report.ticks += 1;
        let mut converted = 0;
        loop {
            let Some(group) = self.groups.get(self.group) else {
                return SweepStatus::Complete(self.finish());
            };

            if self.member >= group.members.len() {
                self.group += 1;
                self.member = 0;
                self.remaining = self.groups.get(self.group).map_or(0, |g| g.batch);
                if self.group < self.groups.len() {
                    log::debug!("sweep group done, {converted} converted this tick");
                    return SweepStatus::Yielded { converted };
                }
                return SweepStatus::Complete(self.finish());
            }

            if self.remaining == 0 {
                self.remaining = group.batch;
                log::debug!("sweep batch done, {converted} converted this tick");
                return SweepStatus::Yielded { converted };
            }

            let id = group.members[self.member];
            self.member += 1;
            self.remaining -= 1;
            match step(id) {
                Ok(()) => {
                    converted += 1;
                    self.report.converted += 1;
                }
                Err(err) => {
                    log::error!("converter {id:?} failed: {err}");
                    self.report.failed.push((id, err));
                }
            }
        }
    }

    /// Drive the sweep to the end without yielding.
    pub fn run_to_end(
        &mut self,
        mut step: impl FnMut(ConverterId) -> Result<(), ConversionError>,
    ) -> SweepReport {
        loop {
            match self.advance(&mut step) {
                SweepStatus::Complete(report) | SweepStatus::Cancelled(report) => return report,
                SweepStatus::Idle => return SweepReport::new(self.report.direction),
                SweepStatus::Yielded { .. } => {}
            }
        }
    }
}
