use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::models::{BankStatement, ReconciliationReport, Transaction};
use crate::types::MatchKey;

/// Candidate statements per key, in the order they were loaded.
type StatementIndex<'a> = HashMap<MatchKey, Vec<&'a BankStatement>>;

/// Identifies a statement for consumption. Two statements only collide here
/// when they share both id and key.
type ConsumptionKey<'a> = (&'a str, MatchKey);

/// Reconciles system transactions against bank statements.
///
/// Matching is greedy and single pass: each transaction, in input order,
/// claims the first statement under its key that no earlier transaction
/// claimed. There is no backtracking, so ties always go to the statement
/// loaded first. Both inputs are expected to be date-filtered already.
pub fn reconcile(transactions: &[Transaction], statements: &[BankStatement]) -> ReconciliationReport {
    let mut report = ReconciliationReport::new(transactions.len(), statements.len());
    let index = build_index(statements);
    let mut consumed = HashSet::<ConsumptionKey>::new();

    for transaction in transactions {
        let key = transaction.match_key();

        let Some(statement) = claim_candidate(&index, &mut consumed, key) else {
            debug!("No bank statement available for transaction [{}] under key [{key}]", transaction.id);
            report.record_unmatched_transaction(transaction.clone());
            continue;
        };

        if let Some(discrepancy) = report.record_match(transaction, statement) {
            info!(
                "Discrepancy found: system transaction [{}] ({}) vs bank statement [{}] ({}), difference {}",
                discrepancy.transaction_id,
                discrepancy.transaction_amount,
                discrepancy.statement_id,
                discrepancy.statement_amount,
                discrepancy.difference
            );
        }
    }

    for statement in statements {
        if !consumed.contains(&consumption_key(statement)) {
            report.record_unmatched_statement(statement.clone());
        }
    }

    report
}

fn build_index(statements: &[BankStatement]) -> StatementIndex<'_> {
    let mut index = StatementIndex::new();

    for statement in statements {
        index.entry(statement.match_key()).or_default().push(statement);
    }

    index
}

fn consumption_key(statement: &BankStatement) -> ConsumptionKey<'_> {
    (statement.id.as_str(), statement.match_key())
}

/// Marks and returns the first unconsumed candidate for `key`.
fn claim_candidate<'a>(
    index: &StatementIndex<'a>,
    consumed: &mut HashSet<ConsumptionKey<'a>>,
    key: MatchKey,
) -> Option<&'a BankStatement> {
    let candidates = index.get(&key)?;
    let statement = candidates.iter().copied().find(|statement| !consumed.contains(&consumption_key(*statement)))?;

    consumed.insert(consumption_key(statement));

    Some(statement)
}
