//! Purpose: Internal JSON parsing boundary shared by the config parser.
//! Exports: `parse` module with decode helpers and failure categorization.
//! Role: Single seam for parser implementation so callsites avoid ad hoc decode logic.
//! Invariants: Runtime JSON decoding goes through this module.

pub(crate) mod parse;
