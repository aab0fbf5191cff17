//! Balance engine
//!
//! Folds the full expense history into net balances and raw debts.
//!
//! # Example
//!
//! ```text
//! Participants: A, B, C
//! Expenses:
//!   A paid 100
//!   B paid 60
//!
//! Split shares: 100 / 3 = 33.33, 60 / 3 = 20
//!
//! Net balances:
//!   A: +46.67
//!   B:  +6.67
//!   C: -53.33
//!
//! Raw debts (4):
//!   B -> A 33.33, C -> A 33.33, A -> B 20, C -> B 20
//! ```
//!
//! The split share always uses the participant count at computation time,
//! so adding a participant re-splits every earlier expense on the next run.

use crate::types::*;
use rust_decimal::Decimal;

/// Compute net balances and raw debts from scratch.
///
/// Inputs are trusted: callers guarantee at least two participants, positive
/// amounts whose sum fits in a `Decimal`, and payers drawn from `participants`.
pub fn compute_balances(participants: &[Participant], expenses: &[Expense]) -> BalanceSheet {
    let mut balances = NetBalances::zeroed(participants);
    let mut raw_debts = Vec::new();

    if participants.is_empty() {
        return BalanceSheet { balances, raw_debts };
    }

    let participant_count = Decimal::from(participants.len());

    for expense in expenses {
        let split_share = expense.amount / participant_count;

        for participant in participants {
            if *participant == expense.payer {
                balances.adjust(participant, expense.amount - split_share);
            } else {
                balances.adjust(participant, -split_share);
                raw_debts.push(RawDebt {
                    from: participant.clone(),
                    to: expense.payer.clone(),
                    amount: split_share,
                });
            }
        }
    }

    tracing::debug!(
        participants = participants.len(),
        expenses = expenses.len(),
        raw_debts = raw_debts.len(),
        "Balances recomputed"
    );

    BalanceSheet { balances, raw_debts }
}
