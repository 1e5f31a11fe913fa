//! Reserved cell values that drive template discovery and directive parsing.
//!
//! Boundary markers delimit the form rectangle; directive markers turn a row
//! into an instruction; operand markers locate the cells a directive reads
//! from or writes to. All comparisons are exact string matches.

pub const TOP: &str = "%top";
pub const BOTTOM: &str = "%bottom";
pub const LEFT: &str = "%left";
pub const RIGHT: &str = "%right";

pub const CALL: &str = "#call";
pub const OUTPUT: &str = "#output";

/// Start of the primary operand run (call parameters, output path segments).
pub const OPERANDS: &str = "##";
/// Start of the placeholder-substitution operand run for output paths.
pub const PATH_PARAMS: &str = "###";
/// Marks the cell left of the output destination.
pub const DESTINATION: &str = "####";

pub const PLACEHOLDER: char = '%';

/// Boundary token tagged with a 1-based replica index, e.g. `%left3`.
pub fn replica_marker(base: &str, index: usize) -> String {
    format!("{base}{index}")
}
