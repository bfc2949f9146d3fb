/// Statistical algorithms for analysing datasets.
pub mod algorithm;

/// Financial metrics and the means to scale them over different
/// [`TimeIntervals`](time::TimeInterval).
pub mod metric;

/// TimeInterval definitions used for financial calculations.
///
/// For example, `Annual252`, `Daily`, etc.
pub mod time;
