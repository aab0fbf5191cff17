//! Core types for expense splitting

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Participant identifier (unique display name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Participant(String);

impl Participant {
    /// Create new participant
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First character of the name, used as the graph node label
    pub fn initial(&self) -> Option<char> {
        self.0.chars().next()
    }
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Participant {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Expense category label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Create new category
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Category {
    fn default() -> Self {
        Self("general".to_string())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Recorded expense, immutable once created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// What the money was spent on
    pub description: String,

    /// Amount paid (always > 0)
    pub amount: Decimal,

    /// Category label
    pub category: Category,

    /// Participant who paid
    pub payer: Participant,
}

/// Net balance per participant
///
/// Positive = owed money overall, negative = owes money overall.
/// Iteration follows participant order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetBalances(IndexMap<Participant, Decimal>);

impl NetBalances {
    /// Create empty balances
    pub fn new() -> Self {
        Self::default()
    }

    /// Start every participant at zero
    pub fn zeroed<'a>(participants: impl IntoIterator<Item = &'a Participant>) -> Self {
        Self(
            participants
                .into_iter()
                .map(|p| (p.clone(), Decimal::ZERO))
                .collect(),
        )
    }

    /// Balance of one participant
    pub fn get(&self, participant: &Participant) -> Option<Decimal> {
        self.0.get(participant).copied()
    }

    /// Add `delta` to a participant's balance, inserting it at zero if absent
    pub fn adjust(&mut self, participant: &Participant, delta: Decimal) {
        *self.0.entry(participant.clone()).or_insert(Decimal::ZERO) += delta;
    }

    /// Iterate in participant order
    pub fn iter(&self) -> impl Iterator<Item = (&Participant, Decimal)> + '_ {
        self.0.iter().map(|(p, b)| (p, *b))
    }

    /// Number of participants
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// No participants
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all balances (zero for any consistent sheet)
    pub fn total(&self) -> Decimal {
        self.0.values().copied().sum()
    }

    /// Balances whose magnitude exceeds `epsilon`
    pub fn outstanding(&self, epsilon: Decimal) -> impl Iterator<Item = (&Participant, Decimal)> + '_ {
        self.iter().filter(move |(_, b)| b.abs() > epsilon)
    }

    /// Every balance within `epsilon` of zero
    pub fn is_settled(&self, epsilon: Decimal) -> bool {
        self.outstanding(epsilon).next().is_none()
    }
}

impl FromIterator<(Participant, Decimal)> for NetBalances {
    fn from_iter<I: IntoIterator<Item = (Participant, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Illustrative per-expense debt of one non-payer towards the payer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDebt {
    /// Debtor
    pub from: Participant,

    /// Payer of the expense
    pub to: Participant,

    /// Split share
    pub amount: Decimal,
}

/// Settling transaction produced by the optimizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizedDebt {
    /// Participant who pays
    pub from: Participant,

    /// Participant who receives
    pub to: Participant,

    /// Amount, rounded to the configured decimal places
    pub amount: Decimal,
}

/// Output of the balance engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Net balance per participant
    pub balances: NetBalances,

    /// One entry per (expense, non-payer) pair
    pub raw_debts: Vec<RawDebt>,
}

/// Optimizer result with the before/after comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationReport {
    /// Settling transactions, in emission order
    pub transfers: Vec<OptimizedDebt>,

    /// Number of raw debts before optimization
    pub raw_transaction_count: usize,

    /// Number of settling transactions
    pub optimized_transaction_count: usize,
}

impl OptimizationReport {
    /// Build a report from the raw debt count and the optimizer output
    pub fn new(raw_transaction_count: usize, transfers: Vec<OptimizedDebt>) -> Self {
        Self {
            optimized_transaction_count: transfers.len(),
            raw_transaction_count,
            transfers,
        }
    }

    /// Optimization did not reduce the transaction count.
    ///
    /// Observational only: a smarter algorithm might still do better.
    pub fn is_already_minimal(&self) -> bool {
        self.optimized_transaction_count >= self.raw_transaction_count
    }

    /// Transactions eliminated by the optimizer
    pub fn transactions_saved(&self) -> usize {
        self.raw_transaction_count
            .saturating_sub(self.optimized_transaction_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balances(entries: &[(&str, i64)]) -> NetBalances {
        entries
            .iter()
            .map(|(name, cents)| (Participant::new(*name), Decimal::new(*cents, 2)))
            .collect()
    }

    #[test]
    fn test_net_balances_keep_participant_order() {
        let sheet = balances(&[("Zoe", 100), ("Adam", -50), ("Mia", -50)]);
        let names: Vec<&str> = sheet.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(names, vec!["Zoe", "Adam", "Mia"]);
        assert_eq!(sheet.total(), Decimal::ZERO);
    }

    #[test]
    fn test_outstanding_and_settled() {
        let epsilon = Decimal::new(1, 2);
        let sheet = balances(&[("A", 1), ("B", -1)]);
        assert!(sheet.is_settled(epsilon));

        let sheet = balances(&[("A", 500), ("B", -499), ("C", -1)]);
        let open: Vec<&str> = sheet.outstanding(epsilon).map(|(p, _)| p.as_str()).collect();
        assert_eq!(open, vec!["A", "B"]);
        assert!(!sheet.is_settled(epsilon));
    }

    #[test]
    fn test_adjust_inserts_missing_participant() {
        let mut sheet = NetBalances::zeroed(&[Participant::new("A")]);
        sheet.adjust(&Participant::new("B"), Decimal::from(-3));
        sheet.adjust(&Participant::new("A"), Decimal::from(3));
        assert_eq!(sheet.get(&Participant::new("A")), Some(Decimal::from(3)));
        assert_eq!(sheet.get(&Participant::new("B")), Some(Decimal::from(-3)));
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn test_report_counts() {
        let transfer = OptimizedDebt {
            from: Participant::new("B"),
            to: Participant::new("A"),
            amount: Decimal::from(50),
        };

        let report = OptimizationReport::new(4, vec![transfer.clone(), transfer.clone()]);
        assert_eq!(report.optimized_transaction_count, 2);
        assert_eq!(report.transactions_saved(), 2);
        assert!(!report.is_already_minimal());

        let report = OptimizationReport::new(1, vec![transfer]);
        assert!(report.is_already_minimal());
        assert_eq!(report.transactions_saved(), 0);
    }

    #[test]
    fn test_participant_initial() {
        assert_eq!(Participant::new("Ravi").initial(), Some('R'));
        assert_eq!(Participant::new("").initial(), None);
    }
}
