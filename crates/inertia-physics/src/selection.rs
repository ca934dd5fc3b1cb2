//! Which bodies a force acts on.
//!
//! A [`Selection`] is stored with each force and resolved into a
//! [`Bodies`] sub-view at apply time, against the rows occupied then.

use std::ops::Range;

use inertia_core::RowId;
use inertia_pose::{compose, Pose, Vec2};
use inertia_soa::{StoreError, StoreHandle};

use crate::body::Body;
use crate::force::ForceError;
use crate::schema::BodySchema;

/// The bodies a force applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// A single body.
    Row(RowId),
    /// An explicit set of bodies, applied in the given order.
    Rows(Vec<RowId>),
    /// A contiguous range of rows.
    Range(Range<u32>),
    /// Every body in the world at apply time, including bodies created
    /// after the force was added.
    All,
}

impl Selection {
    /// Check the selection only names rows that exist.
    ///
    /// `len` is the number of bodies at the time of the check. Rows are
    /// never removed, so a selection that passes stays valid.
    pub fn validate(&self, len: usize) -> Result<(), ForceError> {
        let out_of_range = |row: RowId| ForceError::InvalidSelection {
            reason: format!("row {row} not allocated ({len} bodies)"),
        };
        match self {
            Self::Row(row) if row.index() >= len => Err(out_of_range(*row)),
            Self::Rows(rows) => match rows.iter().find(|r| r.index() >= len) {
                Some(row) => Err(out_of_range(*row)),
                None => Ok(()),
            },
            Self::Range(range) if range.start > range.end => Err(ForceError::InvalidSelection {
                reason: format!("inverted row range {}..{}", range.start, range.end),
            }),
            Self::Range(range) if range.end as usize > len => Err(ForceError::InvalidSelection {
                reason: format!(
                    "row range {}..{} exceeds {len} bodies",
                    range.start, range.end
                ),
            }),
            _ => Ok(()),
        }
    }

    /// Resolve against `len` occupied rows.
    pub(crate) fn resolve(&self, len: usize) -> SelectedRows {
        match self {
            Self::Row(row) => {
                let r = row.index().min(len);
                SelectedRows::Contiguous(r..(r + 1).min(len))
            }
            Self::Rows(rows) => SelectedRows::Listed(
                rows.iter()
                    .map(|r| r.index())
                    .filter(|&r| r < len)
                    .collect(),
            ),
            Self::Range(range) => {
                let end = (range.end as usize).min(len);
                SelectedRows::Contiguous((range.start as usize).min(end)..end)
            }
            Self::All => SelectedRows::Contiguous(0..len),
        }
    }
}

impl From<RowId> for Selection {
    fn from(row: RowId) -> Self {
        Self::Row(row)
    }
}

impl From<&Body> for Selection {
    fn from(body: &Body) -> Self {
        Self::Row(body.row())
    }
}

impl From<Vec<RowId>> for Selection {
    fn from(rows: Vec<RowId>) -> Self {
        Self::Rows(rows)
    }
}

impl From<&[Body]> for Selection {
    fn from(bodies: &[Body]) -> Self {
        Self::Rows(bodies.iter().map(Body::row).collect())
    }
}

impl From<Range<u32>> for Selection {
    fn from(range: Range<u32>) -> Self {
        Self::Range(range)
    }
}

/// Row indices a selection resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SelectedRows {
    Contiguous(Range<usize>),
    Listed(Vec<usize>),
}

impl SelectedRows {
    fn len(&self) -> usize {
        match self {
            Self::Contiguous(r) => r.len(),
            Self::Listed(rows) => rows.len(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        let (range, list) = match self {
            Self::Contiguous(r) => (r.clone(), &[][..]),
            Self::Listed(rows) => (0..0, rows.as_slice()),
        };
        range.chain(list.iter().copied())
    }
}

/// Copy of one selected body's dynamics state.
///
/// Handed to the closure of [`Bodies::for_each_mut`]; only the two
/// acceleration members are written back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyState {
    /// The body's row.
    pub row: RowId,
    /// Inverse mass.
    pub inverse_mass: f64,
    /// Inverse moment of inertia.
    pub inverse_inertia: f64,
    /// Position.
    pub position: Vec2,
    /// Linear velocity.
    pub velocity: Vec2,
    /// Heading.
    pub orientation: f64,
    /// Angular velocity.
    pub angular_velocity: f64,
    /// Linear acceleration accumulated so far this step. Written back.
    pub acceleration: Vec2,
    /// Angular acceleration accumulated so far this step. Written back.
    pub angular_acceleration: f64,
}

impl BodyState {
    /// Body-to-world transform.
    pub fn pose(&self) -> Pose {
        compose(self.position, self.orientation)
    }
}

/// The bodies a selection resolved to for one step.
pub struct Bodies<'w> {
    store: &'w StoreHandle,
    schema: &'w BodySchema,
    rows: SelectedRows,
}

impl<'w> Bodies<'w> {
    pub(crate) fn new(store: &'w StoreHandle, schema: &'w BodySchema, rows: SelectedRows) -> Self {
        Self {
            store,
            schema,
            rows,
        }
    }

    /// Number of selected bodies.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the selection is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selected rows, in application order.
    pub fn rows(&self) -> impl Iterator<Item = RowId> + '_ {
        self.rows.iter().map(|r| RowId(r as u32))
    }

    /// Live views of the selected bodies, one item per selected row.
    ///
    /// An item is an error when the view cannot be built, for example
    /// while the store is borrowed by [`for_each_mut`](Self::for_each_mut).
    pub fn iter(&self) -> impl Iterator<Item = Result<Body, StoreError>> + '_ {
        self.rows().map(|row| {
            self.store
                .view(row)
                .map(|view| Body::new(view, *self.schema))
        })
    }

    /// Run `f` on each selected body's state and write its acceleration
    /// and angular acceleration back.
    ///
    /// The store stays borrowed for the whole pass; `f` only sees copies.
    /// Other bodies must be read before the call, or through the `try_*`
    /// accessors of [`Body`] in [`try_for_each_mut`](Self::try_for_each_mut).
    pub fn for_each_mut(&self, mut f: impl FnMut(&mut BodyState)) -> Result<(), StoreError> {
        self.try_for_each_mut(|state| {
            f(state);
            Ok(())
        })
    }

    /// [`for_each_mut`](Self::for_each_mut) with a fallible closure.
    ///
    /// Stops at the first error. Bodies already visited keep their
    /// written-back accelerations.
    pub fn try_for_each_mut(
        &self,
        mut f: impl FnMut(&mut BodyState) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let fields = self.schema.dynamics();
        self.store.with_mut(|s| -> Result<(), StoreError> {
            let [im, ii, pos, vel, acc, theta, omega, alpha] = s.raw_many_mut::<f64, 8>(fields)?;
            for r in self.rows.iter() {
                let mut state = BodyState {
                    row: RowId(r as u32),
                    inverse_mass: im[r],
                    inverse_inertia: ii[r],
                    position: Vec2::new(pos[2 * r], pos[2 * r + 1]),
                    velocity: Vec2::new(vel[2 * r], vel[2 * r + 1]),
                    orientation: theta[r],
                    angular_velocity: omega[r],
                    acceleration: Vec2::new(acc[2 * r], acc[2 * r + 1]),
                    angular_acceleration: alpha[r],
                };
                f(&mut state)?;
                acc[2 * r] = state.acceleration.x;
                acc[2 * r + 1] = state.acceleration.y;
                alpha[r] = state.angular_acceleration;
            }
            Ok(())
        })?
    }
}
