#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]

//! # Finquant-Returns
//! Stateless calculation of standard financial returns over labelled, time-indexed price tables.
//!
//! * **Table**: [`PriceTable`](table::PriceTable) / [`ReturnTable`](table::ReturnTable) hold one
//!   `f64` column per asset, with rows indexed by a strictly increasing time key. Missing
//!   values are `NaN`.
//! * **Returns**: [`cumulative_returns`], [`daily_returns`], [`daily_log_returns`],
//!   [`weighted_mean_daily_returns`] and [`historical_mean_return`]. Every function derives a
//!   new value and never mutates its input.
//! * **Statistic**: NaN-skipping Welford mean, [`TimeInterval`](statistic::time::TimeInterval)
//!   definitions and the linearly scaled
//!   [`RateOfReturn`](statistic::metric::rate_of_return::RateOfReturn) used for annualisation.
//!
//! ## Row filtering
//! [`cumulative_returns`] drops every row with *any* missing price, while [`daily_returns`] and
//! [`daily_log_returns`] only drop rows where *all* values are missing.
//!
//! ## Example
//! ```
//! use chrono::NaiveDate;
//! use finquant_returns::{cumulative_returns, daily_returns, table::PriceTable};
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
//!
//! let prices = PriceTable::new(
//!     vec![day(4), day(5), day(6)],
//!     ["ACME"],
//!     vec![vec![100.0], vec![110.0], vec![121.0]],
//! )
//! .unwrap();
//!
//! let daily = daily_returns(&prices);
//! assert_eq!(daily.index(), &[day(5), day(6)]);
//!
//! let cumulative = cumulative_returns(&prices, 0.0);
//! assert_eq!(cumulative.value(0, 0), Some(0.0));
//! assert!((cumulative.value(2, 0).unwrap() - 0.21).abs() < 1e-12);
//! ```

/// Serde-deserialisable defaults for the `dividend` and `freq` parameters.
pub mod config;

/// All [`Error`](std::error::Error)s generated in `finquant-returns`.
pub mod error;

/// Provides default `finquant-returns` `tracing` logging initialisers.
pub mod logging;

/// Returns calculations over [`PriceTable`](table::PriceTable)s.
pub mod returns;

/// Statistical algorithms, metrics & time intervals used by the returns calculations.
pub mod statistic;

/// Labelled, time-indexed containers of `f64` values.
pub mod table;

pub use error::ReturnsError;
pub use returns::{
    IntoPriceData, MeanReturn, PriceData, cumulative_returns, daily_log_returns, daily_returns,
    historical_mean_return, weighted_mean_daily_returns,
};
