/// Loaders for the three source tables.
///
/// Each submodule owns one upstream format and exposes a `parse_*` function
/// over in-memory text (used by tests) and a `load_*`/`fetch_*` function
/// that reads the file or URL and delegates to it. No loader retries; any
/// read or parse failure is returned to the caller and ends the run.
///
/// Submodules:
/// - `population` — regional population estimates (latin-1 CSV).
/// - `hospitals` — hospital facility table, aggregated to beds per state.
/// - `nyt` — per-state daily cumulative case feed.

pub mod hospitals;
pub mod nyt;
pub mod population;
