use rust_decimal::Decimal;
use serde::Serialize;
use std::io;
use std::io::Write;

use crate::models::{BankStatement, Transaction};
use crate::types::RecordId;

/// A matched pair whose magnitudes differ.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Discrepancy {
    pub transaction_id: RecordId,
    pub statement_id: RecordId,
    pub transaction_amount: Decimal,
    pub statement_amount: Decimal,
    /// Always non-negative.
    pub difference: Decimal
}

/// Outcome of a single reconciliation run.
///
/// Built up by the matcher and handed out read-only once matching completes.
/// Unmatched records keep the order of their input collections.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct ReconciliationReport {
    processed_system: usize,
    processed_bank: usize,
    matched: usize,
    unmatched_system: Vec<Transaction>,
    unmatched_bank: Vec<BankStatement>,
    discrepancy_sum: Decimal,
    discrepancies: Vec<Discrepancy>
}

impl ReconciliationReport {
    /// Starts an empty report sized from the raw inputs.
    pub fn new(processed_system: usize, processed_bank: usize) -> Self {
        Self {
            processed_system,
            processed_bank,
            ..Self::default()
        }
    }

    pub fn processed_system(&self) -> usize {
        self.processed_system
    }

    pub fn processed_bank(&self) -> usize {
        self.processed_bank
    }

    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn unmatched_system(&self) -> &[Transaction] {
        &self.unmatched_system
    }

    pub fn unmatched_bank(&self) -> &[BankStatement] {
        &self.unmatched_bank
    }

    pub fn discrepancy_sum(&self) -> Decimal {
        self.discrepancy_sum
    }

    pub fn discrepancies(&self) -> &[Discrepancy] {
        &self.discrepancies
    }

    /// Counts a pairing and returns the discrepancy it produced, if any.
    pub(crate) fn record_match(&mut self, transaction: &Transaction, statement: &BankStatement) -> Option<&Discrepancy> {
        self.matched += 1;

        let transaction_magnitude = transaction.amount.abs();
        let statement_magnitude = statement.amount.abs();

        if transaction_magnitude == statement_magnitude {
            return None;
        }

        let difference = (transaction_magnitude - statement_magnitude).abs();
        self.discrepancy_sum += difference;
        self.discrepancies.push(Discrepancy {
            transaction_id: transaction.id.clone(),
            statement_id: statement.id.clone(),
            transaction_amount: transaction.amount,
            statement_amount: statement.amount,
            difference
        });

        self.discrepancies.last()
    }

    pub(crate) fn record_unmatched_transaction(&mut self, transaction: Transaction) {
        self.unmatched_system.push(transaction);
    }

    pub(crate) fn record_unmatched_statement(&mut self, statement: BankStatement) {
        self.unmatched_bank.push(statement);
    }

    /// Writes the plain-text summary followed by per-record details.
    pub fn write_summary<W: Write>(&self, output: &mut W) -> io::Result<()> {
        writeln!(output, "Reconciliation Summary:")?;
        writeln!(output, "Total transactions processed (System): {}", self.processed_system)?;
        writeln!(output, "Total transactions processed (Bank): {}", self.processed_bank)?;
        writeln!(output, "Total matched transactions: {}", self.matched)?;
        writeln!(output, "Total unmatched transactions (System): {}", self.unmatched_system.len())?;
        writeln!(output, "Total unmatched transactions (Bank): {}", self.unmatched_bank.len())?;
        writeln!(output, "Total discrepancy sum: {:.2}", self.discrepancy_sum)?;

        if !self.discrepancies.is_empty() {
            writeln!(output)?;
            writeln!(output, "Discrepancies:")?;

            for discrepancy in &self.discrepancies {
                writeln!(
                    output,
                    "  - [System: {} ({:.2}), Bank: {} ({:.2}), Difference: {:.2}]",
                    discrepancy.transaction_id,
                    discrepancy.transaction_amount,
                    discrepancy.statement_id,
                    discrepancy.statement_amount,
                    discrepancy.difference
                )?;
            }
        }

        if !self.unmatched_system.is_empty() {
            writeln!(output)?;
            writeln!(output, "System transactions missing in bank statement(s):")?;

            for transaction in &self.unmatched_system {
                writeln!(
                    output,
                    "  - [ID: {}, Amount: {:.2}, Type: {:?}, Date: {}]",
                    transaction.id, transaction.amount, transaction.transaction_type, transaction.date
                )?;
            }
        }

        if !self.unmatched_bank.is_empty() {
            writeln!(output)?;
            writeln!(output, "Bank statement lines missing in system:")?;

            for statement in &self.unmatched_bank {
                writeln!(output, "  - [ID: {}, Amount: {:.2}, Date: {}]", statement.id, statement.amount, statement.date)?;
            }
        }

        Ok(())
    }
}
