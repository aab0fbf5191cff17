//! Splitting session
//!
//! Owns the participants, the expense history and the latest derived
//! results. Every mutation validates first and either applies fully or
//! leaves the session untouched.

use crate::{
    balance::compute_balances, optimizer::DebtOptimizer, types::*, Error, Result,
};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Expense as entered, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    /// Description (trimmed, must be non-empty)
    pub description: String,

    /// Amount (must be > 0)
    pub amount: Decimal,

    /// Category label
    pub category: Category,

    /// Payer name (must be a participant)
    pub payer: String,
}

impl NewExpense {
    /// Create an expense in the default category
    pub fn new(description: impl Into<String>, amount: Decimal, payer: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            amount,
            category: Category::default(),
            payer: payer.into(),
        }
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Category::new(category);
        self
    }
}

/// Parse a user-entered amount
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| Error::InvalidAmount(format!("{:?} is not a number", raw)))
}

/// Mutable state of one splitting session
#[derive(Debug, Clone, Default)]
pub struct SplitSession {
    participants: Vec<Participant>,
    expenses: Vec<Expense>,
    sheet: BalanceSheet,
    optimized: Option<OptimizationReport>,
    optimizer: DebtOptimizer,
}

impl SplitSession {
    /// Create an empty session using `optimizer`
    pub fn new(optimizer: DebtOptimizer) -> Self {
        Self {
            optimizer,
            ..Default::default()
        }
    }

    /// Add a participant.
    ///
    /// Balances are recomputed, so earlier expenses are re-split across the
    /// new participant count.
    pub fn add_participant(&mut self, name: &str) -> Result<&Participant> {
        let name = name.trim();
        if name.is_empty() {
            tracing::warn!("Rejected participant with empty name");
            return Err(Error::EmptyName);
        }

        if self.participants.iter().any(|p| p.as_str() == name) {
            tracing::warn!(participant = name, "Rejected duplicate participant");
            return Err(Error::DuplicateParticipant(name.to_string()));
        }

        self.participants.push(Participant::new(name));
        tracing::info!(
            participant = name,
            participants = self.participants.len(),
            "Participant added"
        );
        self.recompute();

        Ok(&self.participants[self.participants.len() - 1])
    }

    /// Record an expense and recompute balances from the whole history
    pub fn add_expense(&mut self, expense: NewExpense) -> Result<&Expense> {
        let expense = self.validate_expense(expense).map_err(|e| {
            tracing::warn!(error = %e, "Rejected expense");
            e
        })?;

        tracing::info!(
            description = %expense.description,
            amount = %expense.amount,
            payer = %expense.payer,
            "Expense recorded"
        );

        self.expenses.push(expense);
        self.recompute();

        Ok(&self.expenses[self.expenses.len() - 1])
    }

    /// Run the debt optimizer on the current balances
    pub fn run_optimizer(&mut self) -> Result<&OptimizationReport> {
        if self.expenses.is_empty() {
            return Err(Error::NoExpenses);
        }

        let report = self.optimizer.report(&self.sheet);
        tracing::info!(
            raw = report.raw_transaction_count,
            optimized = report.optimized_transaction_count,
            already_minimal = report.is_already_minimal(),
            "Optimizer run"
        );

        Ok(&*self.optimized.insert(report))
    }

    /// Drop every participant, expense and derived result
    pub fn reset(&mut self) {
        self.participants.clear();
        self.expenses.clear();
        self.sheet = BalanceSheet::default();
        self.optimized = None;
        tracing::info!("Session reset");
    }

    /// Participants in entry order
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Expenses in entry order
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Latest balance sheet
    pub fn sheet(&self) -> &BalanceSheet {
        &self.sheet
    }

    /// Latest net balances
    pub fn balances(&self) -> &NetBalances {
        &self.sheet.balances
    }

    /// Latest raw debts
    pub fn raw_debts(&self) -> &[RawDebt] {
        &self.sheet.raw_debts
    }

    /// Optimizer result, if still current
    pub fn optimized(&self) -> Option<&OptimizationReport> {
        self.optimized.as_ref()
    }

    /// Optimizer used by [`Self::run_optimizer`]
    pub fn optimizer(&self) -> &DebtOptimizer {
        &self.optimizer
    }

    fn validate_expense(&self, expense: NewExpense) -> Result<Expense> {
        let description = expense.description.trim();
        if description.is_empty() {
            return Err(Error::MissingDescription);
        }

        let payer = expense.payer.trim();
        if payer.is_empty() {
            return Err(Error::MissingPayer);
        }

        if self.participants.len() < 2 {
            return Err(Error::NotEnoughParticipants {
                count: self.participants.len(),
            });
        }

        let payer = self
            .participants
            .iter()
            .find(|p| p.as_str() == payer)
            .cloned()
            .ok_or_else(|| Error::UnknownPayer(payer.to_string()))?;

        if expense.amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount(format!(
                "{} is not greater than 0",
                expense.amount
            )));
        }

        // Every balance is bounded by the sum of all amounts
        let total = self
            .expenses
            .iter()
            .try_fold(expense.amount, |total, e| total.checked_add(e.amount));
        if total.is_none() {
            return Err(Error::InvalidAmount(format!(
                "{} pushes the session total past {}",
                expense.amount,
                Decimal::MAX
            )));
        }

        Ok(Expense {
            description: description.to_string(),
            amount: expense.amount,
            category: expense.category,
            payer,
        })
    }

    /// Rebuild the sheet from the full history; the optimizer result is stale
    fn recompute(&mut self) {
        self.sheet = compute_balances(&self.participants, &self.expenses);
        self.optimized = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(names: &[&str]) -> SplitSession {
        let mut session = SplitSession::default();
        for name in names {
            session.add_participant(name).unwrap();
        }
        session
    }

    #[test]
    fn test_add_participant_trims_and_rejects_duplicates() {
        let mut session = SplitSession::default();
        assert_eq!(session.add_participant("  Asha ").unwrap().as_str(), "Asha");

        assert!(matches!(
            session.add_participant("Asha"),
            Err(Error::DuplicateParticipant(name)) if name == "Asha"
        ));
        assert!(matches!(session.add_participant("   "), Err(Error::EmptyName)));
        assert_eq!(session.participants().len(), 1);
    }

    #[test]
    fn test_expense_needs_two_participants() {
        let mut session = session_with(&["Asha"]);
        let err = session
            .add_expense(NewExpense::new("Taxi", Decimal::from(10), "Asha"))
            .unwrap_err();

        assert!(matches!(err, Error::NotEnoughParticipants { count: 1 }));
        assert!(session.expenses().is_empty());
    }

    #[test]
    fn test_expense_validation_leaves_state_untouched() {
        let mut session = session_with(&["Asha", "Ben"]);
        session
            .add_expense(NewExpense::new("Lunch", Decimal::from(40), "Ben"))
            .unwrap();
        let before = session.sheet().clone();

        let cases = vec![
            NewExpense::new("  ", Decimal::from(10), "Asha"),
            NewExpense::new("Taxi", Decimal::from(10), ""),
            NewExpense::new("Taxi", Decimal::from(10), "Carl"),
            NewExpense::new("Taxi", Decimal::ZERO, "Asha"),
            NewExpense::new("Taxi", Decimal::from(-5), "Asha"),
        ];

        for case in cases {
            let err = session.add_expense(case).unwrap_err();
            assert!(err.is_validation());
        }

        assert_eq!(session.expenses().len(), 1);
        assert_eq!(session.sheet(), &before);
    }

    #[test]
    fn test_oversized_total_rejected_before_recording() {
        let mut session = session_with(&["A", "B"]);
        let huge = parse_amount("50000000000000000000000000000").unwrap();

        session
            .add_expense(NewExpense::new("Yacht", huge, "A"))
            .unwrap();
        let before = session.sheet().clone();

        let err = session
            .add_expense(NewExpense::new("Second yacht", huge, "A"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAmount(_)));
        assert_eq!(session.expenses().len(), 1);
        assert_eq!(session.sheet(), &before);

        // Smaller amounts still fit next to the first one
        session
            .add_expense(NewExpense::new("Fuel", Decimal::from(100), "B"))
            .unwrap();
        assert_eq!(session.expenses().len(), 2);
    }

    #[test]
    fn test_validation_order() {
        let mut session = session_with(&["Asha"]);
        let err = session
            .add_expense(NewExpense::new("", Decimal::ZERO, ""))
            .unwrap_err();
        assert!(matches!(err, Error::MissingDescription));

        let err = session
            .add_expense(NewExpense::new("Taxi", Decimal::ZERO, ""))
            .unwrap_err();
        assert!(matches!(err, Error::MissingPayer));
    }

    #[test]
    fn test_new_expense_clears_optimized_result() {
        let mut session = session_with(&["A", "B"]);
        session
            .add_expense(NewExpense::new("Dinner", Decimal::from(100), "A"))
            .unwrap();
        session.run_optimizer().unwrap();
        assert!(session.optimized().is_some());

        session
            .add_expense(NewExpense::new("Cab", Decimal::from(20), "B").with_category("🚕"))
            .unwrap();
        assert!(session.optimized().is_none());
        assert_eq!(session.expenses()[1].category.as_str(), "🚕");
        assert_eq!(session.balances().get(&Participant::new("A")), Some(Decimal::from(40)));
    }

    #[test]
    fn test_new_participant_resplits_history() {
        let mut session = session_with(&["A", "B"]);
        session
            .add_expense(NewExpense::new("Dinner", Decimal::from(90), "A"))
            .unwrap();
        session.run_optimizer().unwrap();

        session.add_participant("C").unwrap();
        assert!(session.optimized().is_none());
        assert_eq!(session.balances().get(&Participant::new("A")), Some(Decimal::from(60)));
        assert_eq!(session.balances().get(&Participant::new("C")), Some(Decimal::from(-30)));
        assert_eq!(session.raw_debts().len(), 2);
    }

    #[test]
    fn test_optimizer_requires_expenses() {
        let mut session = session_with(&["A", "B"]);
        assert!(matches!(session.run_optimizer(), Err(Error::NoExpenses)));
        assert!(session.optimized().is_none());
    }

    #[test]
    fn test_already_minimal_report() {
        let mut session = session_with(&["A", "B"]);
        session
            .add_expense(NewExpense::new("Dinner", Decimal::from(100), "A"))
            .unwrap();

        let report = session.run_optimizer().unwrap();
        assert_eq!(report.raw_transaction_count, 1);
        assert_eq!(report.optimized_transaction_count, 1);
        assert!(report.is_already_minimal());
    }

    #[test]
    fn test_reset() {
        let mut session = session_with(&["A", "B"]);
        session
            .add_expense(NewExpense::new("Dinner", Decimal::from(100), "A"))
            .unwrap();
        session.run_optimizer().unwrap();

        session.reset();
        assert!(session.participants().is_empty());
        assert!(session.expenses().is_empty());
        assert!(session.balances().is_empty());
        assert!(session.raw_debts().is_empty());
        assert!(session.optimized().is_none());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 12.50 ").unwrap(), Decimal::new(1250, 2));
        assert_eq!(parse_amount("1e2").unwrap(), Decimal::from(100));
        assert!(matches!(parse_amount("twelve"), Err(Error::InvalidAmount(_))));
        assert!(parse_amount("").is_err());
    }
}
