//! Accounts, ledgers and balance sheets for agent-based simulations.
//!
//! Agents share accounts through [`domain::AccountHandle`]: a deposit on a
//! shared account is visible on every ledger and balance sheet that lists it.
//! The [`engine::Simulation`] drives a [`book::Book`] tick by tick and
//! snapshots each account once per tick to build time series.

pub mod book;
pub mod config;
pub mod dlq;
pub mod domain;
pub mod engine;
pub mod ingestion;
pub mod plot;
pub mod report;

pub use book::Book;
pub use domain::{Account, AccountHandle, BalanceSheet, Chart, Error, Ledger};
pub use engine::Simulation;
