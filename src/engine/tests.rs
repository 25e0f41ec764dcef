use super::{reconcile, EngineError, ReconciliationEngine};

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;
use tempfile::NamedTempFile;

use crate::models::{BankStatement, ReconciliationReport, Transaction, TransactionType};
use crate::source::{CsvRecordSource, RecordSource, SourceError};
use crate::types::DateRange;

fn create_transaction(id: &str, amount: &str, transaction_type: TransactionType, date: &str) -> Result<Transaction> {
    Ok(Transaction {
        id: id.to_string(),
        amount: Decimal::from_str(amount)?,
        transaction_type,
        date: NaiveDate::from_str(date)?
    })
}

fn create_statement(id: &str, amount: &str, date: &str) -> Result<BankStatement> {
    Ok(BankStatement {
        id: id.to_string(),
        amount: Decimal::from_str(amount)?,
        date: NaiveDate::from_str(date)?
    })
}

fn create_temporary_csv(header: &str, rows: &[&str]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;

    writeln!(file, "{header}")?;

    for row in rows {
        writeln!(file, "{row}")?;
    }

    file.flush()?;

    Ok(file)
}

fn unmatched_system_ids(report: &ReconciliationReport) -> Vec<&str> {
    report.unmatched_system().iter().map(|transaction| transaction.id.as_str()).collect()
}

fn unmatched_bank_ids(report: &ReconciliationReport) -> Vec<&str> {
    report.unmatched_bank().iter().map(|statement| statement.id.as_str()).collect()
}

#[test]
fn test_debit_matches_statement_of_equal_magnitude() -> Result<()> {
    let transactions = vec![create_transaction("T1", "-100.00", TransactionType::Debit, "2023-10-25")?];
    let statements = vec![create_statement("B1", "100.00", "2023-10-25")?];

    let report = reconcile(&transactions, &statements);

    assert_eq!(report.matched(), 1);
    assert!(report.discrepancy_sum().is_zero());
    assert!(report.unmatched_system().is_empty());
    assert!(report.unmatched_bank().is_empty());

    Ok(())
}

#[test]
fn test_amount_difference_is_a_discrepancy_not_a_mismatch() -> Result<()> {
    // Both amounts round to the same key; the difference is taken at full precision.
    let transactions = vec![
        create_transaction("T1", "-100.00", TransactionType::Debit, "2023-10-25")?,
        create_transaction("T2", "-20.004", TransactionType::Debit, "2023-10-25")?,
    ];
    let statements = vec![
        create_statement("B1", "100.00", "2023-10-25")?,
        create_statement("B2", "20.001", "2023-10-25")?,
    ];

    let report = reconcile(&transactions, &statements);

    assert_eq!(report.matched(), 2);
    assert_eq!(report.discrepancy_sum(), Decimal::from_str("0.003")?);
    assert_eq!(report.discrepancies().len(), 1);
    assert!(report.unmatched_system().is_empty());
    assert!(report.unmatched_bank().is_empty());

    Ok(())
}

#[test]
fn test_amounts_differing_by_whole_cents_do_not_share_a_key() -> Result<()> {
    let transactions = vec![create_transaction("T1", "-100.00", TransactionType::Debit, "2023-10-25")?];
    let statements = vec![create_statement("B1", "90.00", "2023-10-25")?];

    let report = reconcile(&transactions, &statements);

    // Keys differ, so a 90.00 statement is not a candidate for a 100.00 debit.
    assert_eq!(report.matched(), 0);
    assert_eq!(unmatched_system_ids(&report), vec!["T1"]);
    assert_eq!(unmatched_bank_ids(&report), vec!["B1"]);

    Ok(())
}

#[test]
fn test_credit_without_statement_is_unmatched() -> Result<()> {
    let transactions = vec![
        create_transaction("T1", "-100.00", TransactionType::Debit, "2023-10-25")?,
        create_transaction("T2", "50.00", TransactionType::Credit, "2023-10-26")?,
    ];
    let statements = vec![create_statement("B1", "100.00", "2023-10-25")?];

    let report = reconcile(&transactions, &statements);

    assert_eq!(report.matched(), 1);
    assert_eq!(unmatched_system_ids(&report), vec!["T2"]);
    assert!(report.unmatched_bank().is_empty());

    Ok(())
}

#[test]
fn test_duplicate_keys_are_consumed_in_load_order() -> Result<()> {
    let transactions = vec![
        create_transaction("T1", "-100.00", TransactionType::Debit, "2023-10-25")?,
        create_transaction("T2", "-100.00", TransactionType::Debit, "2023-10-25")?,
    ];
    let statements = vec![
        create_statement("B1", "100.00", "2023-10-25")?,
        create_statement("B2", "100.00", "2023-10-25")?,
    ];

    let report = reconcile(&transactions, &statements);

    assert_eq!(report.matched(), 2);
    assert!(report.unmatched_system().is_empty());
    assert!(report.unmatched_bank().is_empty());

    // Sub-cent differences share the key but make each pairing visible.
    let marked = vec![
        create_statement("B1", "100.001", "2023-10-25")?,
        create_statement("B2", "100.002", "2023-10-25")?,
    ];
    let report = reconcile(&transactions, &marked);
    let pairs: Vec<(&str, &str)> = report.discrepancies().iter()
        .map(|discrepancy| (discrepancy.transaction_id.as_str(), discrepancy.statement_id.as_str()))
        .collect();

    assert_eq!(pairs, vec![("T1", "B1"), ("T2", "B2")]);
    assert_eq!(report.discrepancy_sum(), Decimal::from_str("0.003")?);

    // A lone debit takes the first loaded statement.
    let report = reconcile(&transactions[..1], &statements);

    assert_eq!(unmatched_bank_ids(&report), vec!["B2"]);

    // A third debit finds the pool exhausted.
    let mut exhausted = transactions.clone();
    exhausted.push(create_transaction("T3", "-100.00", TransactionType::Debit, "2023-10-25")?);
    let report = reconcile(&exhausted, &statements);

    assert_eq!(report.matched(), 2);
    assert_eq!(unmatched_system_ids(&report), vec!["T3"]);

    Ok(())
}

#[test]
fn test_first_statement_wins_discrepancy_attribution() -> Result<()> {
    let transactions = vec![create_transaction("T1", "-100.004", TransactionType::Debit, "2023-10-25")?];
    let statements = vec![
        create_statement("B1", "100.001", "2023-10-25")?,
        create_statement("B2", "100.00", "2023-10-25")?,
    ];

    let report = reconcile(&transactions, &statements);

    assert_eq!(report.discrepancies()[0].statement_id, "B1");
    assert_eq!(unmatched_bank_ids(&report), vec!["B2"]);

    Ok(())
}

#[test]
fn test_negative_credit_never_matches() -> Result<()> {
    let transactions = vec![create_transaction("T1", "-75.00", TransactionType::Credit, "2023-10-25")?];
    let statements = vec![
        create_statement("B1", "75.00", "2023-10-25")?,
        create_statement("B2", "-75.00", "2023-10-25")?,
    ];

    let report = reconcile(&transactions, &statements);

    assert_eq!(report.matched(), 0);
    assert_eq!(unmatched_system_ids(&report), vec!["T1"]);
    assert_eq!(unmatched_bank_ids(&report), vec!["B1", "B2"]);

    Ok(())
}

#[test]
fn test_different_days_do_not_match() -> Result<()> {
    let transactions = vec![create_transaction("T1", "-100.00", TransactionType::Debit, "2023-10-25")?];
    let statements = vec![create_statement("B1", "100.00", "2023-10-26")?];

    let report = reconcile(&transactions, &statements);

    assert_eq!(report.matched(), 0);
    assert_eq!(unmatched_system_ids(&report), vec!["T1"]);
    assert_eq!(unmatched_bank_ids(&report), vec!["B1"]);

    Ok(())
}

#[test]
fn test_statements_sharing_id_and_key_are_consumed_together() -> Result<()> {
    let transactions = vec![
        create_transaction("T1", "-100.00", TransactionType::Debit, "2023-10-25")?,
        create_transaction("T2", "-100.00", TransactionType::Debit, "2023-10-25")?,
    ];
    let statements = vec![
        create_statement("B1", "100.00", "2023-10-25")?,
        create_statement("B1", "100.00", "2023-10-25")?,
    ];

    let report = reconcile(&transactions, &statements);

    assert_eq!(report.matched(), 1);
    assert_eq!(unmatched_system_ids(&report), vec!["T2"]);
    assert!(report.unmatched_bank().is_empty());

    Ok(())
}

#[test]
fn test_every_record_lands_in_exactly_one_bucket() -> Result<()> {
    let transactions = vec![
        create_transaction("T1", "-100.00", TransactionType::Debit, "2023-10-25")?,
        create_transaction("T2", "100.00", TransactionType::Credit, "2023-10-25")?,
        create_transaction("T3", "-100.00", TransactionType::Debit, "2023-10-25")?,
        create_transaction("T4", "42.10", TransactionType::Credit, "2023-10-26")?,
        create_transaction("T5", "-42.10", TransactionType::Credit, "2023-10-26")?,
        create_transaction("T6", "-7.5", TransactionType::Debit, "2023-10-27")?,
    ];
    let statements = vec![
        create_statement("B1", "100.00", "2023-10-25")?,
        create_statement("B2", "-100.00", "2023-10-25")?,
        create_statement("B3", "42.1", "2023-10-26")?,
        create_statement("B4", "7.50", "2023-10-28")?,
        create_statement("B5", "1.00", "2023-10-28")?,
    ];

    let report = reconcile(&transactions, &statements);

    assert_eq!(report.processed_system(), transactions.len());
    assert_eq!(report.processed_bank(), statements.len());
    assert_eq!(report.matched() + report.unmatched_system().len(), transactions.len());

    for transaction in &transactions {
        let occurrences = report.unmatched_system().iter().filter(|unmatched| unmatched.id == transaction.id).count();
        assert!(occurrences <= 1, "transaction [{}] listed more than once", transaction.id);
    }

    // Statements are unique by (id, key) here, so consumed ones are exactly those absent from the unmatched list.
    let consumed = statements.len() - report.unmatched_bank().len();

    assert_eq!(consumed, report.matched());
    assert_eq!(report.matched(), 3);
    assert_eq!(unmatched_system_ids(&report), vec!["T3", "T5", "T6"]);
    assert_eq!(unmatched_bank_ids(&report), vec!["B4", "B5"]);
    assert!(report.discrepancy_sum() >= Decimal::ZERO);

    Ok(())
}

#[test]
fn test_reconcile_is_idempotent() -> Result<()> {
    let transactions = vec![
        create_transaction("T1", "-100.00", TransactionType::Debit, "2023-10-25")?,
        create_transaction("T2", "-100.004", TransactionType::Debit, "2023-10-25")?,
        create_transaction("T3", "50.00", TransactionType::Credit, "2023-10-26")?,
    ];
    let statements = vec![
        create_statement("B1", "100.00", "2023-10-25")?,
        create_statement("B2", "100.001", "2023-10-25")?,
        create_statement("B3", "60.00", "2023-10-26")?,
    ];

    let first = reconcile(&transactions, &statements);
    let second = reconcile(&transactions, &statements);

    assert_eq!(first, second);

    Ok(())
}

#[test]
fn test_empty_inputs_produce_empty_report() {
    let report = reconcile(&[], &[]);

    assert_eq!(report, ReconciliationReport::new(0, 0));
}

#[tokio::test]
async fn test_engine_reconciles_csv_sources_end_to_end() -> Result<()> {
    let system = create_temporary_csv("trxID,amount,type,transactionTime", &[
        "T1,-100.00,DEBIT,2023-10-25",
        "T2,50.00,CREDIT,2023-10-26",
        "T3,-100.00,DEBIT,2023-10-25",
        "T4,-5.00,DEBIT,2023-11-30",
    ])?;
    let first_bank = create_temporary_csv("unique_identifier,amount,date", &[
        "B1,100.00,2023-10-25",
        "B9,12.00,2023-10-27",
    ])?;
    let second_bank = create_temporary_csv("unique_identifier,amount,date", &[
        "B2,100.00,2023-10-25",
        "B3,100.00,not-a-date",
    ])?;

    let engine = ReconciliationEngine::new(Arc::new(CsvRecordSource::new()));
    let report = engine.run(
        system.path(),
        &[first_bank.path().to_path_buf(), second_bank.path().to_path_buf()],
        DateRange::parse("2023-10-25", "2023-10-28")?
    ).await?;

    assert_eq!(report.processed_system(), 3);
    assert_eq!(report.processed_bank(), 3);
    assert_eq!(report.matched(), 2);
    assert_eq!(unmatched_system_ids(&report), vec!["T2"]);
    assert_eq!(unmatched_bank_ids(&report), vec!["B9"]);

    Ok(())
}

#[tokio::test]
async fn test_engine_fails_when_a_source_is_missing() -> Result<()> {
    let system = create_temporary_csv("trxID,amount,type,transactionTime", &["T1,-100.00,DEBIT,2023-10-25"])?;

    let engine = ReconciliationEngine::new(Arc::new(CsvRecordSource::new()));
    let result = engine.run(
        system.path(),
        &[PathBuf::from("missing-bank-statement.csv")],
        DateRange::parse("2023-10-25", "2023-10-28")?
    ).await;

    assert!(matches!(result, Err(EngineError::Source(SourceError::Open { .. }))));

    Ok(())
}

struct SlowSource {
    delay: Duration
}

impl RecordSource for SlowSource {
    fn load_transactions(&self, _path: &Path, _range: DateRange) -> Result<Vec<Transaction>, SourceError> {
        sleep(self.delay);
        Ok(Vec::new())
    }

    fn load_bank_statements(&self, _paths: &[PathBuf], _range: DateRange) -> Result<Vec<BankStatement>, SourceError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_engine_aborts_loads_past_the_deadline() -> Result<()> {
    let engine = ReconciliationEngine::new(Arc::new(SlowSource { delay: Duration::from_millis(500) }))
        .with_load_timeout(Duration::from_millis(50));

    let result = engine.run(Path::new("system.csv"), &[], DateRange::parse("2023-10-25", "2023-10-28")?).await;

    assert!(matches!(result, Err(EngineError::Timeout(_))));

    Ok(())
}

#[tokio::test]
async fn test_engine_completes_within_a_generous_deadline() -> Result<()> {
    let engine = ReconciliationEngine::new(Arc::new(SlowSource { delay: Duration::from_millis(10) }))
        .with_load_timeout(Duration::from_secs(5));

    let report = engine.run(Path::new("system.csv"), &[], DateRange::parse("2023-10-25", "2023-10-28")?).await?;

    assert_eq!(report, ReconciliationReport::new(0, 0));

    Ok(())
}
