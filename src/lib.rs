//! Purpose: Library crate backing the `confpeek` CLI and its tests.
//! Exports: `core` (path resolution, loading, parsing, run pipeline, errors),
//! `color_json` (JSON rendering), `report` (outcome rendering).
//! Role: Holds every step of a run behind explicit inputs; the binary only wires I/O.
//! Invariants: Library code never writes to the process stdout/stderr directly.
pub mod color_json;
pub mod core;
mod json;
pub mod report;
