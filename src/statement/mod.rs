//! Running balance / statement calculator
//!
//! Balances are derived by replaying the ledger's journal history on every
//! request rather than maintained as a stored counter. Concurrent postings
//! therefore only need per-voucher atomicity, never cross-voucher locking.
//!
//! All arithmetic here uses one internal sign convention: a positive running
//! total always means a debit-side excess. Credit-normal ledgers get their
//! opening magnitude negated on the way in, and the presentation layer turns
//! the sign back into a Dr/Cr direction.

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// One display line of a ledger statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    /// Transaction date; `None` for the synthetic opening row
    pub date: Option<NaiveDate>,
    /// Counter-ledger name, or a label for synthetic rows
    pub party: String,
    /// Originating voucher type; `None` for the opening row
    pub voucher_type: Option<VoucherType>,
    /// Originating voucher number
    pub reference: String,
    /// Amount on the debit side of this ledger (zero if credit)
    pub debit: BigDecimal,
    /// Amount on the credit side of this ledger (zero if debit)
    pub credit: BigDecimal,
    /// Running balance after this row (signed; positive = debit excess)
    pub balance: BigDecimal,
}

/// A ledger statement over an optional date window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerStatement {
    /// The ledger the statement belongs to
    pub ledger_id: String,
    /// The ledger's display name
    pub ledger_name: String,
    /// Balance brought forward from the opening balance plus all entries
    /// dated before the window start
    pub opening_brought_forward: BigDecimal,
    /// Opening row followed by one row per in-window entry
    pub rows: Vec<StatementRow>,
    /// Running balance after the last row
    pub closing_balance: BigDecimal,
}

impl LedgerStatement {
    /// Closing balance in Dr/Cr presentation form
    pub fn closing_display(&self) -> String {
        display_balance(&self.closing_balance)
    }
}

/// Render a signed balance as magnitude plus direction, e.g. `1300 Dr` or
/// `300 Cr`. Zero sits on the debit side.
pub fn display_balance(balance: &BigDecimal) -> String {
    if *balance < BigDecimal::from(0) {
        format!("{} Cr", balance.abs())
    } else {
        format!("{} Dr", balance)
    }
}

/// Replay a ledger's journal entries chronologically into a statement
///
/// Entries dated strictly before `start` fold into the brought-forward
/// balance; entries after `end` are excluded entirely. Ties on date are
/// broken by journal sequence, so the output is stable across repeated
/// calls. `names` maps ledger ids to display names for the party column.
pub fn compute_statement(
    ledger: &LedgerAccount,
    account_type: AccountType,
    mut entries: Vec<JournalEntry>,
    names: &HashMap<String, String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> LedgerStatement {
    let zero = BigDecimal::from(0);

    // Sign-adjusted opening: credit-normal magnitudes become negative so
    // positive always means debit excess below.
    let mut brought_forward = if account_type.is_debit_normal() {
        ledger.opening_balance.clone()
    } else {
        -ledger.opening_balance.clone()
    };

    entries.sort_by(|a, b| a.date.cmp(&b.date).then(a.sequence.cmp(&b.sequence)));

    let mut in_window = Vec::new();
    for entry in entries {
        if let Some(end) = end {
            if entry.date > end {
                continue;
            }
        }
        let is_debit = entry.debit_ledger_id == ledger.id;
        let net_change = if is_debit {
            entry.amount.clone()
        } else {
            -entry.amount.clone()
        };
        match start {
            Some(start) if entry.date < start => brought_forward += net_change,
            _ => in_window.push((entry, is_debit, net_change)),
        }
    }

    let mut rows = Vec::with_capacity(in_window.len() + 1);
    rows.push(StatementRow {
        date: None,
        party: "Opening Balance (B/F)".to_string(),
        voucher_type: None,
        reference: String::new(),
        debit: if brought_forward >= zero {
            brought_forward.clone()
        } else {
            zero.clone()
        },
        credit: if brought_forward < zero {
            brought_forward.abs()
        } else {
            zero.clone()
        },
        balance: brought_forward.clone(),
    });

    let mut running = brought_forward.clone();
    for (entry, is_debit, net_change) in in_window {
        running += net_change;
        let counter_id = if is_debit {
            &entry.credit_ledger_id
        } else {
            &entry.debit_ledger_id
        };
        rows.push(StatementRow {
            date: Some(entry.date),
            party: names
                .get(counter_id)
                .cloned()
                .unwrap_or_else(|| counter_id.clone()),
            voucher_type: Some(entry.voucher_type),
            reference: entry.voucher_number.clone(),
            debit: if is_debit {
                entry.amount.clone()
            } else {
                zero.clone()
            },
            credit: if is_debit {
                zero.clone()
            } else {
                entry.amount.clone()
            },
            balance: running.clone(),
        });
    }

    LedgerStatement {
        ledger_id: ledger.id.clone(),
        ledger_name: ledger.name.clone(),
        opening_brought_forward: brought_forward,
        rows,
        closing_balance: running,
    }
}
