/// Structural misuse of the public API. Interactive paths never produce these;
/// the widget logs them and treats the call as a no-op.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("row {row} out of range ({rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },
    #[error("column {col} out of range ({cols} columns)")]
    ColumnOutOfRange { col: usize, cols: usize },
    #[error("unknown column key '{0}'")]
    UnknownColumn(String),
}
