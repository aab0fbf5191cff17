//! Text rendering of a session

use rust_decimal::{Decimal, RoundingStrategy};
use settle_core::{OptimizationReport, SplitSession};
use std::fmt::Write;

/// Format `amount` with the currency symbol and two decimals
pub fn money(symbol: &str, amount: Decimal) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{}{:.2}", symbol, rounded)
}

/// Signed balance as shown in the balances panel: `+₹46.67`, `-₹53.33`
pub fn signed_money(symbol: &str, amount: Decimal) -> String {
    let sign = if amount > Decimal::ZERO { "+" } else { "-" };
    format!("{}{}", sign, money(symbol, amount))
}

/// Before/after comparison line
pub fn metrics_line(report: &OptimizationReport) -> String {
    if report.is_already_minimal() {
        format!(
            "Optimization complete! Debts are already minimal ({} transactions).",
            report.optimized_transaction_count
        )
    } else {
        format!(
            "Before: {} transactions, After: {} transactions ({} saved)",
            report.raw_transaction_count,
            report.optimized_transaction_count,
            report.transactions_saved()
        )
    }
}

/// Render every panel of the session as plain text
pub fn render_text(session: &SplitSession, symbol: &str) -> String {
    let epsilon = session.optimizer().settle_epsilon();
    let mut out = String::new();

    let _ = writeln!(out, "Participants");
    for participant in session.participants() {
        let _ = writeln!(out, "  {}", participant);
    }

    let _ = writeln!(out, "\nExpenses");
    if session.expenses().is_empty() {
        let _ = writeln!(out, "  No expenses added yet.");
    }
    for expense in session.expenses() {
        let _ = writeln!(
            out,
            "  {} {} (paid by {}) {}",
            expense.category,
            expense.description,
            expense.payer,
            money(symbol, expense.amount)
        );
    }

    let _ = writeln!(out, "\nNet balances");
    let mut outstanding = session.balances().outstanding(epsilon).peekable();
    if outstanding.peek().is_none() {
        if session.expenses().is_empty() {
            let _ = writeln!(out, "  Add an expense to calculate balances.");
        } else {
            let _ = writeln!(out, "  Everyone is perfectly settled up!");
        }
    }
    for (participant, balance) in outstanding {
        let _ = writeln!(out, "  {} {}", participant, signed_money(symbol, balance));
    }

    let _ = writeln!(out, "\nRaw debts");
    if session.raw_debts().is_empty() {
        let _ = writeln!(out, "  No debts");
    }
    for debt in session.raw_debts() {
        let _ = writeln!(out, "  {} -> {} {}", debt.from, debt.to, money(symbol, debt.amount));
    }

    let _ = writeln!(out, "\nOptimized debts");
    match session.optimized() {
        None => {
            let _ = writeln!(out, "  Run algorithm to see optimized debts");
        }
        Some(report) => {
            for transfer in &report.transfers {
                let _ = writeln!(
                    out,
                    "  {} -> {} {}",
                    transfer.from,
                    transfer.to,
                    money(symbol, transfer.amount)
                );
            }
            if report.raw_transaction_count > 0 {
                let _ = writeln!(out, "\n{}", metrics_line(report));
            }
        }
    }

    out
}
