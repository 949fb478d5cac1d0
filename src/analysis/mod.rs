/// Derived views over the joined time-series table.
///
/// Everything here is a pure function of the records it is given; nothing
/// is cached between calls.
///
/// Submodules:
/// - `grouping` — ranking by latest positive tests, pagination into groups.
/// - `daily_increase` — state × date pivot of first-differenced case counts.

pub mod daily_increase;
pub mod grouping;
