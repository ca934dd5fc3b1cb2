//! Live row views over a shared store.
//!
//! A [`StoreHandle`] is the shared, single-threaded owner of a
//! [`ColumnStore`]. A [`View`] is a `(handle, row)` pair: it holds no field
//! data and re-resolves the column on every call, so it keeps working
//! across growth and two views over the same row see each other's writes
//! immediately. A [`SliceView`] is the bulk form over a contiguous row
//! range.
//!
//! Every store borrow is scoped to a single method call. Calling back into
//! the same store from inside [`StoreHandle::with_mut`] yields
//! [`StoreError::Busy`] rather than a panic.

use std::cell::RefCell;
use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use inertia_core::{FieldDef, FieldId, Layout, RowId};
use smallvec::SmallVec;

use crate::column::{Element, RowValues};
use crate::error::StoreError;
use crate::store::ColumnStore;

/// Physical index ranges covering a contiguous run of rows.
type PhysicalRanges = SmallVec<[Range<usize>; 9]>;

/// Shared handle to a single-threaded [`ColumnStore`].
///
/// Cloning the handle is cheap and every clone addresses the same store.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Rc<RefCell<ColumnStore>>,
}

impl StoreHandle {
    /// Wrap a store in a shared handle.
    pub fn new(store: ColumnStore) -> Self {
        Self {
            inner: Rc::new(RefCell::new(store)),
        }
    }

    /// Run `f` with shared access to the store.
    pub fn with<R>(&self, f: impl FnOnce(&ColumnStore) -> R) -> Result<R, StoreError> {
        let store = self.inner.try_borrow().map_err(|_| StoreError::Busy)?;
        Ok(f(&store))
    }

    /// Run `f` with exclusive access to the store.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut ColumnStore) -> R) -> Result<R, StoreError> {
        let mut store = self.inner.try_borrow_mut().map_err(|_| StoreError::Busy)?;
        Ok(f(&mut store))
    }

    /// Register a new column. See [`ColumnStore::register`].
    pub fn register(&self, def: FieldDef) -> Result<FieldId, StoreError> {
        Ok(self.with_mut(|s| s.register(def))??)
    }

    /// Allocate a row. See [`ColumnStore::take`].
    pub fn take(&self) -> Result<RowId, StoreError> {
        self.with_mut(ColumnStore::take)?
    }

    /// A live view over an occupied row.
    pub fn view(&self, row: RowId) -> Result<View, StoreError> {
        let len = self.with(ColumnStore::len)?;
        if row.index() >= len {
            return Err(StoreError::RowOutOfRange { row, len });
        }
        Ok(View {
            store: self.clone(),
            row,
        })
    }

    /// A bulk view over a contiguous range of occupied rows.
    pub fn slice(&self, rows: Range<usize>) -> Result<SliceView, StoreError> {
        self.with(|s| s.check_rows(&rows))??;
        Ok(SliceView {
            store: self.clone(),
            rows,
        })
    }

    /// A bulk view over every occupied row at the time of the call.
    pub fn occupied(&self) -> Result<SliceView, StoreError> {
        let len = self.with(ColumnStore::len)?;
        self.slice(0..len)
    }

    /// Resolve a field name.
    pub fn field_id(&self, name: &str) -> Result<FieldId, StoreError> {
        self.with(|s| s.field_id(name))?
            .ok_or_else(|| StoreError::UnknownFieldName {
                name: name.to_string(),
            })
    }

    /// A copy of a field's definition.
    pub fn field(&self, field: FieldId) -> Result<FieldDef, StoreError> {
        self.with(|s| s.field(field).cloned())?
            .ok_or(StoreError::UnknownField { field })
    }

    /// Number of rows in use.
    ///
    /// # Panics
    ///
    /// Panics if called from inside [`with_mut`](Self::with_mut) on the
    /// same store.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Whether no rows have been taken.
    ///
    /// # Panics
    ///
    /// Same as [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of allocated rows.
    ///
    /// # Panics
    ///
    /// Same as [`len`](Self::len).
    pub fn capacity(&self) -> usize {
        self.inner.borrow().capacity()
    }

    /// Whether two handles address the same store.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(store) => f
                .debug_struct("StoreHandle")
                .field("len", &store.len())
                .field("capacity", &store.capacity())
                .field("fields", &store.field_count())
                .finish(),
            Err(_) => f.write_str("StoreHandle { <borrowed> }"),
        }
    }
}

/// A live accessor for one row of a store.
///
/// Holds no field data. Every accessor looks the column up again, so the
/// view stays valid across growth.
#[derive(Clone)]
pub struct View {
    store: StoreHandle,
    row: RowId,
}

impl View {
    /// The row this view addresses.
    pub fn row(&self) -> RowId {
        self.row
    }

    /// The store this view reads from.
    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// The row's elements of `field`, in logical component order.
    pub fn get<T: Element>(&self, field: FieldId) -> Result<RowValues<T>, StoreError> {
        self.store.with(|s| s.read_row(field, self.row))?
    }

    /// Overwrite the row's elements of `field`.
    pub fn set<T: Element>(&self, field: FieldId, values: &[T]) -> Result<(), StoreError> {
        self.store.with_mut(|s| s.write_row(field, self.row, values))?
    }

    /// The first element of `field`; the whole value for scalar fields.
    pub fn scalar<T: Element>(&self, field: FieldId) -> Result<T, StoreError> {
        self.element(field, 0)
    }

    /// Overwrite the first element of `field`.
    pub fn set_scalar<T: Element>(&self, field: FieldId, value: T) -> Result<(), StoreError> {
        self.set_element(field, 0, value)
    }

    /// One element of `field`, by logical component index.
    pub fn element<T: Element>(&self, field: FieldId, component: usize) -> Result<T, StoreError> {
        self.store
            .with(|s| s.element(field, self.row, component))?
    }

    /// Overwrite one element of `field`.
    pub fn set_element<T: Element>(
        &self,
        field: FieldId,
        component: usize,
        value: T,
    ) -> Result<(), StoreError> {
        self.store
            .with_mut(|s| s.set_element(field, self.row, component, value))?
    }

    /// Read-modify-write the row's elements of `field`.
    pub fn update<T: Element>(
        &self,
        field: FieldId,
        f: impl FnOnce(&mut [T]),
    ) -> Result<(), StoreError> {
        self.store.with_mut(|s| -> Result<(), StoreError> {
            let mut values = s.read_row::<T>(field, self.row)?;
            f(&mut values);
            s.write_row(field, self.row, &values)
        })?
    }

    /// [`get`](Self::get) by field name.
    pub fn get_by_name<T: Element>(&self, name: &str) -> Result<RowValues<T>, StoreError> {
        let field = self.store.field_id(name)?;
        self.get(field)
    }

    /// [`set`](Self::set) by field name.
    pub fn set_by_name<T: Element>(&self, name: &str, values: &[T]) -> Result<(), StoreError> {
        let field = self.store.field_id(name)?;
        self.set(field, values)
    }

    /// [`scalar`](Self::scalar) by field name.
    pub fn scalar_by_name<T: Element>(&self, name: &str) -> Result<T, StoreError> {
        let field = self.store.field_id(name)?;
        self.scalar(field)
    }

    /// [`set_scalar`](Self::set_scalar) by field name.
    pub fn set_scalar_by_name<T: Element>(&self, name: &str, value: T) -> Result<(), StoreError> {
        let field = self.store.field_id(name)?;
        self.set_scalar(field, value)
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View").field("row", &self.row).finish()
    }
}

/// A bulk accessor for a contiguous range of rows.
///
/// The range is fixed when the slice is built; rows taken afterwards are
/// not included.
#[derive(Clone)]
pub struct SliceView {
    store: StoreHandle,
    rows: Range<usize>,
}

impl SliceView {
    /// The covered rows.
    pub fn rows(&self) -> Range<usize> {
        self.rows.clone()
    }

    /// Number of covered rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the slice covers no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The store this slice reads from.
    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Copy the covered rows of `field` out, row by row in logical order.
    pub fn read<T: Element>(&self, field: FieldId) -> Result<Vec<T>, StoreError> {
        self.store.with(|s| -> Result<Vec<T>, StoreError> {
            let column = s.column(field)?;
            let data = s.raw::<T>(field)?;
            let capacity = s.capacity();
            let components = column.components();
            let mut out = Vec::with_capacity(self.rows.len() * components);
            for row in self.rows.clone() {
                out.extend((0..components).map(|c| data[column.index(row, c, capacity)]));
            }
            Ok(out)
        })?
    }

    /// Set every element of the covered rows of `field` to `value`.
    pub fn fill<T: Element>(&self, field: FieldId, value: T) -> Result<(), StoreError> {
        self.store.with_mut(|s| -> Result<(), StoreError> {
            let ranges = physical_ranges(s, field, &self.rows)?;
            let data = s.raw_mut::<T>(field)?;
            for range in ranges {
                data[range].fill(value);
            }
            Ok(())
        })?
    }

    /// `y += a * x` over the covered rows of two equally shaped float
    /// columns.
    pub fn axpy(&self, a: f64, x: FieldId, y: FieldId) -> Result<(), StoreError> {
        self.store.with_mut(|s| -> Result<(), StoreError> {
            check_same_shape(s, x, y)?;
            let ranges = physical_ranges(s, y, &self.rows)?;
            if x == y {
                let data = s.raw_mut::<f64>(y)?;
                for range in ranges {
                    data[range].iter_mut().for_each(|v| *v += a * *v);
                }
                return Ok(());
            }
            let [xs, ys] = s.raw_many_mut::<f64, 2>([x, y])?;
            for range in ranges {
                for (yv, xv) in ys[range.clone()].iter_mut().zip(&xs[range]) {
                    *yv += a * xv;
                }
            }
            Ok(())
        })?
    }

    /// `y[row] += s[row] * x[row]` over the covered rows, where `s` is a
    /// scalar float column and `x`, `y` are equally shaped float columns.
    pub fn scale_add_rows(&self, s: FieldId, x: FieldId, y: FieldId) -> Result<(), StoreError> {
        self.store.with_mut(|store| -> Result<(), StoreError> {
            check_same_shape(store, x, y)?;
            let scale_column = store.column(s)?;
            if scale_column.components() != 1 {
                return Err(StoreError::ShapeMismatch {
                    reason: format!(
                        "scale field {s} has {} components, expected 1",
                        scale_column.components()
                    ),
                });
            }
            let capacity = store.capacity();
            let scales = store.raw::<f64>(s)?[self.rows.clone()].to_vec();
            let column = store.column(y)?;
            let components = column.components();
            let indices: Vec<usize> = self
                .rows
                .clone()
                .flat_map(|row| (0..components).map(move |c| (row, c)))
                .map(|(row, c)| column.index(row, c, capacity))
                .collect();
            let xs: Vec<f64> = {
                let data = store.raw::<f64>(x)?;
                indices.iter().map(|&i| data[i]).collect()
            };
            let ys = store.raw_mut::<f64>(y)?;
            for (n, (&i, xv)) in indices.iter().zip(xs).enumerate() {
                ys[i] += scales[n / components] * xv;
            }
            Ok(())
        })?
    }

    /// Run `f` over the covered rows of `N` distinct row-major float
    /// columns at once.
    ///
    /// Each slice holds `len() * components` elements, row by row.
    pub fn with_floats_mut<const N: usize, R>(
        &self,
        fields: [FieldId; N],
        f: impl FnOnce([&mut [f64]; N]) -> R,
    ) -> Result<R, StoreError> {
        self.store.with_mut(|s| -> Result<R, StoreError> {
            let mut bounds: SmallVec<[Range<usize>; 4]> = SmallVec::with_capacity(N);
            for &field in &fields {
                let column = s.column(field)?;
                if column.layout() != Layout::RowMajor {
                    return Err(StoreError::ShapeMismatch {
                        reason: format!("field {field} is not row-major"),
                    });
                }
                let k = column.components();
                bounds.push(self.rows.start * k..self.rows.end * k);
            }
            let slices = s.raw_many_mut::<f64, N>(fields)?;
            let mut next = 0;
            let slices = slices.map(|slice| {
                let bound = bounds[next].clone();
                next += 1;
                &mut slice[bound]
            });
            Ok(f(slices))
        })?
    }
}

impl fmt::Debug for SliceView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliceView")
            .field("rows", &self.rows)
            .finish()
    }
}

/// Physical ranges of `field` that hold the rows in `rows`.
///
/// One range for row-major columns, one per component otherwise.
fn physical_ranges(
    store: &ColumnStore,
    field: FieldId,
    rows: &Range<usize>,
) -> Result<PhysicalRanges, StoreError> {
    store.check_rows(rows)?;
    let column = store.column(field)?;
    let k = column.components();
    let ranges = match column.layout() {
        Layout::RowMajor => SmallVec::from_elem(rows.start * k..rows.end * k, 1),
        Layout::ComponentMajor => {
            let capacity = store.capacity();
            (0..k)
                .map(|c| c * capacity + rows.start..c * capacity + rows.end)
                .collect()
        }
    };
    Ok(ranges)
}

fn check_same_shape(store: &ColumnStore, x: FieldId, y: FieldId) -> Result<(), StoreError> {
    let xc = store.column(x)?;
    let yc = store.column(y)?;
    if xc.def().shape != yc.def().shape {
        return Err(StoreError::ShapeMismatch {
            reason: format!(
                "fields {x} and {y} differ in shape ({:?} vs {:?})",
                xc.def().shape,
                yc.def().shape
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use inertia_core::ScalarType;

    fn handle() -> StoreHandle {
        let store = ColumnStore::with_fields(
            StoreConfig::new(0),
            [
                FieldDef::scalar("m").with_fill(1.0),
                FieldDef::vector("p", 2),
                FieldDef::vector("v", 2),
                FieldDef::new("c", &[2, 1], ScalarType::Float).unwrap(),
                FieldDef::new("d", &[2, 1], ScalarType::Float).unwrap(),
            ],
        )
        .unwrap();
        StoreHandle::new(store)
    }

    #[test]
    fn views_alias_the_same_row() {
        let h = handle();
        let row = h.take().unwrap();
        let a = h.view(row).unwrap();
        let b = h.view(row).unwrap();
        a.set_by_name("p", &[1.5, -2.0]).unwrap();
        assert_eq!(b.get_by_name::<f64>("p").unwrap().as_slice(), &[1.5, -2.0]);
        b.set_element(FieldId(1), 0, 9.0).unwrap();
        assert_eq!(a.element::<f64>(FieldId(1), 0).unwrap(), 9.0);
    }

    #[test]
    fn view_survives_growth() {
        let h = handle();
        let row = h.take().unwrap();
        let view = h.view(row).unwrap();
        view.set_scalar(FieldId(0), 4.0).unwrap();
        for _ in 0..20 {
            h.take().unwrap();
        }
        assert!(h.capacity() >= 21);
        assert_eq!(view.scalar::<f64>(FieldId(0)).unwrap(), 4.0);
    }

    #[test]
    fn late_field_fills_existing_rows() {
        let h = handle();
        let rows: Vec<_> = (0..3).map(|_| h.take().unwrap()).collect();
        let f = h.register(FieldDef::vector("f", 2).with_fill(0.5)).unwrap();
        let capacity = h.capacity();
        let shape = h.with(|s| s.physical_shape(f)).unwrap().unwrap();
        assert_eq!(shape.as_slice(), &[capacity, 2]);
        for row in rows {
            let view = h.view(row).unwrap();
            assert_eq!(view.get::<f64>(f).unwrap().as_slice(), &[0.5, 0.5]);
        }
        assert_eq!(h.field_id("f").unwrap(), f);
    }

    #[test]
    fn duplicate_field_through_handle_is_config_error() {
        let h = handle();
        assert_eq!(
            h.register(FieldDef::scalar("m")),
            Err(StoreError::Config(inertia_core::ConfigError::DuplicateField {
                name: "m".into()
            }))
        );
        assert_eq!(h.with(ColumnStore::field_count).unwrap(), 5);
    }

    #[test]
    fn clones_share_the_store() {
        let h = handle();
        let clone = h.clone();
        assert!(h.ptr_eq(&clone));
        assert!(!h.ptr_eq(&handle()));
        clone.take().unwrap();
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn view_of_untaken_row_fails() {
        let h = handle();
        assert!(matches!(
            h.view(RowId(0)),
            Err(StoreError::RowOutOfRange { .. })
        ));
    }

    #[test]
    fn unknown_name_is_reported() {
        let h = handle();
        let view = h.view(h.take().unwrap()).unwrap();
        assert_eq!(
            view.scalar_by_name::<f64>("nope"),
            Err(StoreError::UnknownFieldName {
                name: "nope".into()
            })
        );
    }

    #[test]
    fn reentrant_borrow_is_busy() {
        let h = handle();
        let row = h.take().unwrap();
        let view = h.view(row).unwrap();
        let inner = h.with_mut(|_| view.scalar::<f64>(FieldId(0))).unwrap();
        assert_eq!(inner, Err(StoreError::Busy));
    }

    #[test]
    fn update_modifies_in_place() {
        let h = handle();
        let view = h.view(h.take().unwrap()).unwrap();
        view.set(FieldId(1), &[1.0, 2.0]).unwrap();
        view.update::<f64>(FieldId(1), |p| p.iter_mut().for_each(|x| *x *= 3.0))
            .unwrap();
        assert_eq!(view.get::<f64>(FieldId(1)).unwrap().as_slice(), &[3.0, 6.0]);
    }

    #[test]
    fn axpy_row_and_component_major() {
        let h = handle();
        for i in 0..3 {
            let view = h.view(h.take().unwrap()).unwrap();
            let x = i as f64;
            view.set(FieldId(1), &[x, 1.0]).unwrap();
            view.set(FieldId(3), &[x, 2.0]).unwrap();
        }
        let all = h.occupied().unwrap();
        all.axpy(2.0, FieldId(1), FieldId(2)).unwrap();
        all.axpy(0.5, FieldId(3), FieldId(4)).unwrap();
        assert_eq!(
            all.read::<f64>(FieldId(2)).unwrap(),
            vec![0.0, 2.0, 2.0, 2.0, 4.0, 2.0]
        );
        assert_eq!(
            all.read::<f64>(FieldId(4)).unwrap(),
            vec![0.0, 1.0, 0.5, 1.0, 1.0, 1.0]
        );
    }

    #[test]
    fn axpy_rejects_mismatched_shapes() {
        let h = handle();
        h.take().unwrap();
        let all = h.occupied().unwrap();
        assert!(matches!(
            all.axpy(1.0, FieldId(0), FieldId(1)),
            Err(StoreError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn scale_add_rows_uses_per_row_scale() {
        let h = handle();
        for i in 0..2 {
            let view = h.view(h.take().unwrap()).unwrap();
            view.set_scalar(FieldId(0), (i + 1) as f64).unwrap();
            view.set(FieldId(1), &[1.0, -1.0]).unwrap();
        }
        let all = h.occupied().unwrap();
        all.scale_add_rows(FieldId(0), FieldId(1), FieldId(2)).unwrap();
        assert_eq!(
            all.read::<f64>(FieldId(2)).unwrap(),
            vec![1.0, -1.0, 2.0, -2.0]
        );
    }

    #[test]
    fn fill_covers_only_the_slice() {
        let h = handle();
        for _ in 0..4 {
            h.take().unwrap();
        }
        h.slice(1..3).unwrap().fill(FieldId(3), 5.0).unwrap();
        let all = h.occupied().unwrap();
        assert_eq!(
            all.read::<f64>(FieldId(3)).unwrap(),
            vec![0.0, 0.0, 5.0, 5.0, 5.0, 5.0, 0.0, 0.0]
        );
    }

    #[test]
    fn slice_past_len_fails() {
        let h = handle();
        h.take().unwrap();
        assert!(h.slice(0..2).is_err());
    }

    #[test]
    fn with_floats_mut_sees_row_ranges() {
        let h = handle();
        for _ in 0..3 {
            h.take().unwrap();
        }
        let tail = h.slice(1..3).unwrap();
        let n = tail
            .with_floats_mut([FieldId(1), FieldId(2)], |[p, v]| {
                p.fill(1.0);
                v.fill(2.0);
                p.len()
            })
            .unwrap();
        assert_eq!(n, 4);
        let p = h.occupied().unwrap().read::<f64>(FieldId(1)).unwrap();
        assert_eq!(p, vec![0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
        assert!(tail.with_floats_mut([FieldId(3)], |_| ()).is_err());
    }
}
