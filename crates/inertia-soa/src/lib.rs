//! Growable columnar (structure-of-arrays) storage with live row views.
//!
//! A [`ColumnStore`] holds one typed column per registered field, all
//! sized to a shared row capacity. Rows are allocated with
//! [`take()`](ColumnStore::take); when the store is full every column is
//! regrown in lock-step, preserving existing rows and filling new ones
//! with each field's declared fill value.
//!
//! # Architecture
//!
//! ```text
//! StoreHandle (Rc<RefCell<_>>, cloned into every view)
//! └── ColumnStore
//!     ├── FieldTable (name → FieldId, registration order)
//!     └── Column[] (FieldId-indexed, capacity × components each)
//!
//! View      = (StoreHandle, RowId)          one row, re-resolved per call
//! SliceView = (StoreHandle, Range<usize>)   bulk ops over contiguous rows
//! ```
//!
//! Columns are row-major except column vectors (`[k, 1]` fields), which
//! are stored component-major with the row capacity as the trailing
//! dimension.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod column;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod store;
pub mod view;

pub use column::{Column, ColumnData, Element, RowValues};
pub use config::StoreConfig;
pub use error::StoreError;
pub use store::ColumnStore;
pub use view::{SliceView, StoreHandle, View};
