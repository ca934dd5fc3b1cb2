//! Integration test: growth preserves data and views stay live.
//!
//! Fills rows of every shape class with marker values, forces several
//! reallocations, and checks that every earlier row still holds its
//! marker while new rows hold each field's fill value. Views built
//! before growth must keep reading and writing the same logical rows.

use inertia_core::{FieldId, RowId};
use inertia_soa::{ColumnStore, StoreConfig, StoreError, StoreHandle};
use inertia_test_utils::fixtures::{every_shape, kinematic_fields};

fn every_shape_store(initial_capacity: usize) -> StoreHandle {
    let store = ColumnStore::with_fields(StoreConfig::new(initial_capacity), every_shape())
        .expect("fixture fields register");
    StoreHandle::new(store)
}

fn id(h: &StoreHandle, name: &str) -> FieldId {
    h.field_id(name).unwrap()
}

#[test]
fn markers_survive_repeated_growth() {
    let h = every_shape_store(0);
    let (array, col, matrix, tensor, flag) = (
        id(&h, "array"),
        id(&h, "col"),
        id(&h, "matrix"),
        id(&h, "tensor"),
        id(&h, "flag"),
    );

    let mut views = Vec::new();
    for i in 0..5i64 {
        let view = h.view(h.take().unwrap()).unwrap();
        let m = i as f64;
        view.set(array, &[m, m + 0.5, m + 0.25]).unwrap();
        view.set(col, &[i, -i, 10 * i]).unwrap();
        view.set(matrix, &[m; 9]).unwrap();
        view.set(tensor, &[m; 8]).unwrap();
        view.set_scalar(flag, i % 2 == 0).unwrap();
        views.push(view);
    }
    let growths_before = h.with(|s| s.growth_count()).unwrap();

    // 6 → 14 → 30
    let mut fresh = Vec::new();
    for _ in 0..20 {
        fresh.push(h.take().unwrap());
    }
    assert!(h.with(|s| s.growth_count()).unwrap() > growths_before);
    assert_eq!(h.capacity(), 30);

    for (i, view) in views.iter().enumerate() {
        let m = i as f64;
        let i = i as i64;
        assert_eq!(view.get::<f64>(array).unwrap().as_slice(), &[m, m + 0.5, m + 0.25]);
        assert_eq!(view.get::<i64>(col).unwrap().as_slice(), &[i, -i, 10 * i]);
        assert_eq!(view.get::<f64>(matrix).unwrap().as_slice(), &[m; 9]);
        assert_eq!(view.get::<f64>(tensor).unwrap().as_slice(), &[m; 8]);
        assert_eq!(view.scalar::<bool>(flag).unwrap(), i % 2 == 0);
    }

    let scalar = id(&h, "scalar");
    for row in fresh {
        let view = h.view(row).unwrap();
        assert_eq!(view.scalar::<f64>(scalar).unwrap(), 1.0);
        assert_eq!(view.get::<i64>(col).unwrap().as_slice(), &[0i64, 0, 0]);
        assert!(!view.scalar::<bool>(flag).unwrap());
    }
}

#[test]
fn physical_shapes_track_capacity() {
    let h = every_shape_store(0);
    h.take().unwrap();
    let shape = |name: &str| {
        h.with(|s| s.physical_shape(s.field_id(name).unwrap()))
            .unwrap()
            .unwrap()
    };
    assert_eq!(shape("scalar").as_slice(), &[2]);
    assert_eq!(shape("array").as_slice(), &[2, 3]);
    assert_eq!(shape("row").as_slice(), &[2, 3]);
    assert_eq!(shape("col").as_slice(), &[3, 2]);
    assert_eq!(shape("matrix").as_slice(), &[2, 3, 3]);
    assert_eq!(shape("tensor").as_slice(), &[2, 2, 2, 2]);
}

#[test]
fn two_views_over_one_row_alias() {
    let h = every_shape_store(1);
    let row = h.take().unwrap();
    let a = h.view(row).unwrap();
    let b = h.view(row).unwrap();
    a.set_by_name("row", &[7.0, 8.0, 9.0]).unwrap();
    assert_eq!(b.get_by_name::<f64>("row").unwrap().as_slice(), &[7.0, 8.0, 9.0]);
    b.set_element(id(&h, "row"), 1, -1.0).unwrap();
    assert_eq!(a.element::<f64>(id(&h, "row"), 1).unwrap(), -1.0);
}

#[test]
fn bulk_ops_cover_occupied_rows_only() {
    let store = ColumnStore::with_fields(StoreConfig::new(0), kinematic_fields()).unwrap();
    let h = StoreHandle::new(store);
    let (scale, x, v, a) = (id(&h, "scale"), id(&h, "x"), id(&h, "v"), id(&h, "a"));
    for i in 0..3 {
        let view = h.view(h.take().unwrap()).unwrap();
        view.set_scalar(scale, 2.0).unwrap();
        view.set(a, &[1.0, i as f64]).unwrap();
    }
    assert_eq!(h.capacity(), 6);

    let all = h.occupied().unwrap();
    all.scale_add_rows(scale, a, v).unwrap();
    all.axpy(0.5, v, x).unwrap();
    assert_eq!(
        all.read::<f64>(x).unwrap(),
        vec![1.0, 0.0, 1.0, 1.0, 1.0, 2.0]
    );
    // Unoccupied capacity rows are untouched.
    let raw = h.with(|s| s.raw::<f64>(x).unwrap().to_vec()).unwrap();
    assert!(raw[6..].iter().all(|&e| e == 0.0));
}

#[test]
fn wrong_element_type_is_reported() {
    let h = every_shape_store(1);
    let view = h.view(h.take().unwrap()).unwrap();
    let col = id(&h, "col");
    assert!(matches!(
        view.get::<f64>(col),
        Err(StoreError::TypeMismatch { .. })
    ));
    assert!(matches!(
        view.get::<f64>(FieldId(99)),
        Err(StoreError::UnknownField { .. })
    ));
}

#[test]
fn rows_are_never_reused() {
    let h = every_shape_store(0);
    let rows: Vec<RowId> = (0..10).map(|_| h.take().unwrap()).collect();
    let expected: Vec<RowId> = (0..10).map(RowId).collect();
    assert_eq!(rows, expected);
    assert_eq!(h.len(), 10);
}
