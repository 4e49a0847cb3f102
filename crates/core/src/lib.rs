//! Core types shared by the grid engine and the widget layer.
//!
//! Nothing in here knows about drawing, input or mutable grid state.

pub mod geometry;
pub mod schema;
pub mod selection;
pub mod value;

pub use geometry::{Point, Rect, Size};
pub use schema::{ColumnDef, ColumnType, Schema, SchemaError, SelectOption};
pub use selection::{CellCoords, SelectionRange};
pub use value::{CellValue, RowData};
