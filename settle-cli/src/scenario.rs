//! Scenario files
//!
//! A scenario is the sequence of actions a user would take in one session:
//!
//! ```toml
//! participants = ["Asha", "Ben", "Chen"]
//!
//! [[expenses]]
//! description = "Hotel"
//! amount = "100"
//! category = "🏨"
//! payer = "Asha"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use settle_core::{session::parse_amount, NewExpense, SplitSession};
use std::path::Path;

/// Participants and expenses in entry order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Participant names
    #[serde(default)]
    pub participants: Vec<String>,

    /// Expenses
    #[serde(default)]
    pub expenses: Vec<ScenarioExpense>,
}

/// One expense as typed by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioExpense {
    /// Description
    pub description: String,

    /// Amount text
    pub amount: AmountText,

    /// Category label
    #[serde(default)]
    pub category: Option<String>,

    /// Payer name
    pub payer: String,
}

/// Amount written either as a TOML string or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountText {
    /// `amount = "12.50"`
    Text(String),
    /// `amount = 12`
    Integer(i64),
    /// `amount = 12.5`
    Float(f64),
}

impl AmountText {
    fn as_text(&self) -> String {
        match self {
            AmountText::Text(text) => text.clone(),
            AmountText::Integer(value) => value.to_string(),
            AmountText::Float(value) => value.to_string(),
        }
    }
}

impl Scenario {
    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse scenario {}", path.display()))
    }

    /// Replay every action into `session`, stopping at the first rejected one
    pub fn apply(&self, session: &mut SplitSession) -> Result<()> {
        for name in &self.participants {
            session
                .add_participant(name)
                .with_context(|| format!("Participant {:?} rejected", name))?;
        }

        for (index, expense) in self.expenses.iter().enumerate() {
            let amount = parse_amount(&expense.amount.as_text())
                .with_context(|| format!("Expense #{} ({:?})", index + 1, expense.description))?;

            let mut entry = NewExpense::new(expense.description.clone(), amount, expense.payer.clone());
            if let Some(category) = &expense.category {
                entry = entry.with_category(category.clone());
            }

            session
                .add_expense(entry)
                .with_context(|| format!("Expense #{} ({:?}) rejected", index + 1, expense.description))?;
        }

        tracing::info!(
            participants = session.participants().len(),
            expenses = session.expenses().len(),
            "Scenario applied"
        );

        Ok(())
    }
}
