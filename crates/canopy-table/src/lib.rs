//! Row-major numeric tables for the canopy learners.
//!
//! Pure data library, zero I/O. A [`Table`] is an immutable rectangular grid
//! of finite `f64` cells; every reshaping operation (slicing, gathering,
//! stacking) returns a new table. [`LabelColumn`] addresses the column that
//! holds class labels, either by index or as the last column.

mod error;
mod label;
mod table;

pub use error::TableError;
pub use label::LabelColumn;
pub use table::{Rows, Table};
