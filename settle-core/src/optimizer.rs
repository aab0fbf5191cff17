//! Debt optimizer
//!
//! Greedy reduction of the transactions needed to settle a set of net
//! balances.
//!
//! # Algorithm
//!
//! 1. Split participants into creditors (balance > ε) and debtors
//!    (balance < -ε), debtor amounts stored as magnitudes
//! 2. Sort both sides, largest first
//! 3. Largest debtor pays largest creditor `round(min(c, d))`
//! 4. Drop any side whose remainder fell below ε, repeat from 2
//!
//! Each round clears at least one side, so at most
//! `creditors + debtors - 1` transfers are emitted. The result is small,
//! not provably minimal.
//!
//! # Example
//!
//! ```text
//! Net balances:
//!   A: +46.67, B: +6.67, C: -53.33
//!
//! Transfers:
//!   C pays A: 46.67
//!   C pays B:  6.66
//!
//! Raw debts 4 → 2 transfers
//! ```

use crate::{types::*, Error, Result};
use rust_decimal::{Decimal, RoundingStrategy};

/// Open position during matching
#[derive(Debug, Clone)]
struct Position {
    participant: Participant,
    remaining: Decimal,
}

/// Debt optimizer
#[derive(Debug, Clone)]
pub struct DebtOptimizer {
    /// Balances within this distance of zero count as settled
    settle_epsilon: Decimal,

    /// Decimal places each transfer is rounded to
    decimal_places: u32,
}

impl Default for DebtOptimizer {
    fn default() -> Self {
        Self {
            settle_epsilon: Decimal::new(1, 2),
            decimal_places: 2,
        }
    }
}

impl DebtOptimizer {
    /// Create new optimizer.
    ///
    /// Epsilon must be positive and at least half a rounding unit, otherwise
    /// a transfer could round to zero and leave both sides open forever.
    pub fn new(settle_epsilon: Decimal, decimal_places: u32) -> Result<Self> {
        if settle_epsilon <= Decimal::ZERO {
            return Err(Error::Config(format!(
                "settle epsilon must be positive, got {}",
                settle_epsilon
            )));
        }

        if decimal_places > 27 {
            return Err(Error::Config(format!(
                "decimal places must be at most 27, got {}",
                decimal_places
            )));
        }

        let half_unit = Decimal::new(5, decimal_places + 1);
        if settle_epsilon < half_unit {
            return Err(Error::Config(format!(
                "settle epsilon {} is below half a rounding unit ({}) for {} decimal places",
                settle_epsilon, half_unit, decimal_places
            )));
        }

        Ok(Self {
            settle_epsilon,
            decimal_places,
        })
    }

    /// Settlement epsilon
    pub fn settle_epsilon(&self) -> Decimal {
        self.settle_epsilon
    }

    /// Rounding precision
    pub fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    /// Compute settling transfers for a balance snapshot
    pub fn optimize(&self, balances: &NetBalances) -> Vec<OptimizedDebt> {
        let (mut creditors, mut debtors) = self.partition(balances);
        let mut transfers = Vec::new();

        while !creditors.is_empty() && !debtors.is_empty() {
            // Stable sorts: exact ties keep participant order
            creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
            debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

            let amount = self.round(creditors[0].remaining.min(debtors[0].remaining));

            tracing::debug!(
                from = %debtors[0].participant,
                to = %creditors[0].participant,
                %amount,
                "Settling transfer"
            );

            transfers.push(OptimizedDebt {
                from: debtors[0].participant.clone(),
                to: creditors[0].participant.clone(),
                amount,
            });

            creditors[0].remaining -= amount;
            debtors[0].remaining -= amount;

            if creditors[0].remaining < self.settle_epsilon {
                creditors.remove(0);
            }
            if debtors[0].remaining < self.settle_epsilon {
                debtors.remove(0);
            }
        }

        tracing::info!(
            participants = balances.len(),
            transfers = transfers.len(),
            "Debt optimization complete"
        );

        transfers
    }

    /// Optimize and compare against the raw debt count
    pub fn report(&self, sheet: &BalanceSheet) -> OptimizationReport {
        OptimizationReport::new(sheet.raw_debts.len(), self.optimize(&sheet.balances))
    }

    /// Split balances into creditor and debtor positions
    fn partition(&self, balances: &NetBalances) -> (Vec<Position>, Vec<Position>) {
        let mut creditors = Vec::new();
        let mut debtors = Vec::new();

        for (participant, balance) in balances.iter() {
            if balance > self.settle_epsilon {
                creditors.push(Position {
                    participant: participant.clone(),
                    remaining: balance,
                });
            } else if balance < -self.settle_epsilon {
                debtors.push(Position {
                    participant: participant.clone(),
                    remaining: balance.abs(),
                });
            }
        }

        (creditors, debtors)
    }

    fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.decimal_places, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Optimize with the default epsilon (0.01) and two decimal places
pub fn optimize(balances: &NetBalances) -> Vec<OptimizedDebt> {
    DebtOptimizer::default().optimize(balances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::compute_balances;

    fn balances(entries: &[(&str, i64)]) -> NetBalances {
        entries
            .iter()
            .map(|(name, cents)| (Participant::new(*name), Decimal::new(*cents, 2)))
            .collect()
    }

    fn transfer(from: &str, to: &str, cents: i64) -> OptimizedDebt {
        OptimizedDebt {
            from: Participant::new(from),
            to: Participant::new(to),
            amount: Decimal::new(cents, 2),
        }
    }

    #[test]
    fn test_even_split() {
        let transfers = optimize(&balances(&[("A", 5000), ("B", -5000)]));
        assert_eq!(transfers, vec![transfer("B", "A", 5000)]);
    }

    #[test]
    fn test_three_way_scenario() {
        let participants: Vec<Participant> = ["A", "B", "C"].iter().map(|n| Participant::new(*n)).collect();
        let expenses = vec![
            Expense {
                description: "Hotel".to_string(),
                amount: Decimal::from(100),
                category: Category::default(),
                payer: Participant::new("A"),
            },
            Expense {
                description: "Fuel".to_string(),
                amount: Decimal::from(60),
                category: Category::default(),
                payer: Participant::new("B"),
            },
        ];

        let sheet = compute_balances(&participants, &expenses);
        let report = DebtOptimizer::default().report(&sheet);

        // C settles against the largest creditor first
        assert_eq!(
            report.transfers,
            vec![transfer("C", "A", 4667), transfer("C", "B", 666)]
        );
        assert_eq!(report.raw_transaction_count, 4);
        assert_eq!(report.optimized_transaction_count, 2);
        assert!(!report.is_already_minimal());
    }

    #[test]
    fn test_already_settled() {
        let transfers = optimize(&balances(&[("A", 1), ("B", -1), ("C", 0)]));
        assert!(transfers.is_empty());
    }

    #[test]
    fn test_one_creditor_many_debtors() {
        let transfers = optimize(&balances(&[
            ("A", -1000),
            ("B", -3000),
            ("C", 6000),
            ("D", -2000),
        ]));

        assert_eq!(
            transfers,
            vec![
                transfer("B", "C", 3000),
                transfer("D", "C", 2000),
                transfer("A", "C", 1000),
            ]
        );
    }

    #[test]
    fn test_ties_keep_participant_order() {
        let transfers = optimize(&balances(&[
            ("A", 1000),
            ("B", 1000),
            ("C", -1000),
            ("D", -1000),
        ]));

        assert_eq!(
            transfers,
            vec![transfer("C", "A", 1000), transfer("D", "B", 1000)]
        );
    }

    #[test]
    fn test_transfer_count_bound() {
        let sheet = balances(&[
            ("A", 1234),
            ("B", -777),
            ("C", 5000),
            ("D", -2457),
            ("E", -3000),
        ]);
        let transfers = optimize(&sheet);
        assert!(transfers.len() <= 5 - 1);

        let paid: Decimal = transfers.iter().map(|t| t.amount).sum();
        assert_eq!(paid, Decimal::new(6234, 2));
    }

    #[test]
    fn test_idempotent() {
        let sheet = balances(&[("A", 3333), ("B", 3334), ("C", -6667)]);
        let optimizer = DebtOptimizer::default();
        assert_eq!(optimizer.optimize(&sheet), optimizer.optimize(&sheet));
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        let sheet: NetBalances = vec![
            (Participant::new("A"), Decimal::new(12345, 3)),
            (Participant::new("B"), Decimal::new(-12345, 3)),
        ]
        .into_iter()
        .collect();

        let transfers = optimize(&sheet);
        assert_eq!(transfers, vec![transfer("B", "A", 1235)]);
    }

    #[test]
    fn test_custom_precision() {
        let optimizer = DebtOptimizer::new(Decimal::new(5, 1), 0).unwrap();
        let transfers = optimizer.optimize(&balances(&[("A", 1040), ("B", -1040)]));
        assert_eq!(transfers, vec![transfer("B", "A", 1000)]);
    }

    #[test]
    fn test_rejects_non_terminating_configuration() {
        assert!(DebtOptimizer::new(Decimal::ZERO, 2).is_err());
        assert!(DebtOptimizer::new(Decimal::new(1, 3), 2).is_err());
        assert!(DebtOptimizer::new(Decimal::new(1, 2), 28).is_err());
        assert!(DebtOptimizer::new(Decimal::new(5, 3), 2).is_ok());
    }
}
