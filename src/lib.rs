//! Core library for the cruzeiro-stats command line application.
//!
//! The library turns a workbook of match records, one sheet per competition,
//! into player statistics. Token rules live in
//! [`cruzeiro::stats::participation`], per-sheet accumulation in
//! [`cruzeiro::stats::aggregate`], cross-sheet orchestration in
//! [`cruzeiro::stats::orchestrate`] and the report structures in
//! [`cruzeiro::stats::report`]. Reading and exporting workbooks is handled by
//! the adapters under [`cruzeiro::stats::io`].

pub mod cruzeiro;

pub use cruzeiro::stats::{
    Result, StatsError, aggregate, error, io, model, orchestrate, participation, report,
};
