//! Grid engine: the mutable state store, virtualization math, validation,
//! type coercion and change events. Knows nothing about input or drawing.

pub mod coerce;
pub mod dimensions;
pub mod error;
pub mod events;
pub mod format;
pub mod ops;
pub mod sizes;
pub mod state;
pub mod validation;

pub use dimensions::{DimensionCalculator, IndexSpan, ViewportMetrics, VisibleRange};
pub use error::GridError;
pub use events::{ChangeBatch, ChangeRecord, DeletedRow, EventCollector, GridEvent};
pub use sizes::SizeTrack;
pub use state::{CellError, CellWrite, CopyBuffer, DisabledPredicate, DragState, StateManager};
pub use validation::ValidationError;
