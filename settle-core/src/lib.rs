//! Settle Up Core
//!
//! Shared-expense splitting: net balances from an expense history and a
//! greedy reduction of the debts those balances imply.
//!
//! # Architecture
//!
//! Two pure components run one after the other:
//!
//! 1. **Balance Engine** ([`balance`]): folds the full expense history into
//!    per-participant net balances plus the raw per-expense debt list
//! 2. **Debt Optimizer** ([`optimizer`]): matches the largest creditor with
//!    the largest debtor until every balance is settled
//!
//! [`session::SplitSession`] owns the mutable state of one splitting session,
//! validates input and re-runs the engine after every mutation.
//!
//! # Invariants
//!
//! - Zero sum: Σ(net balances) == 0
//! - Balances are always recomputed from the whole history, never patched
//! - The optimizer emits at most `creditors + debtors - 1` transfers
//!
//! # Example
//!
//! ```
//! use settle_core::{NewExpense, SplitSession};
//! use rust_decimal::Decimal;
//!
//! let mut session = SplitSession::default();
//! session.add_participant("Asha")?;
//! session.add_participant("Ben")?;
//! session.add_expense(NewExpense::new("Dinner", Decimal::from(100), "Asha"))?;
//!
//! let report = session.run_optimizer()?;
//! assert_eq!(report.transfers.len(), 1);
//! # Ok::<(), settle_core::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod balance;
pub mod optimizer;
pub mod session;
pub mod graph;
pub mod error;
pub mod config;

// Re-exports
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use balance::compute_balances;
pub use optimizer::{optimize, DebtOptimizer};
pub use session::{NewExpense, SplitSession};
