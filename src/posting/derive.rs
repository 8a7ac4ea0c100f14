//! Pure derivation of balanced journal entries from vouchers
//!
//! Each voucher type has a fixed posting shape, expressed as one strategy
//! per [`VoucherBody`] variant. The strategies are pure functions so the
//! wiring of debits and credits can be unit tested without storage.

use bigdecimal::BigDecimal;

use crate::types::*;

/// Validate the type-specific posting shape of a voucher body
///
/// Enforces, in order: the anchor account(s) are present, items exist and
/// each carries a ledger and a strictly positive amount, no destination
/// equals the source for CONTRA/TRANSFER, and the voucher total is
/// positive. The first violated rule is reported; nothing is ever partially
/// posted.
pub fn validate_shape(body: &VoucherBody) -> CoreResult<()> {
    match body {
        VoucherBody::Expense { paid_from, items } => {
            validate_anchor(paid_from, "paid-from ledger")?;
            validate_items(items)?;
        }
        VoucherBody::Income {
            received_into,
            items,
        } => {
            validate_anchor(received_into, "received-into ledger")?;
            validate_items(items)?;
        }
        VoucherBody::Contra {
            source_account,
            items,
        } => {
            validate_anchor(source_account, "source ledger")?;
            validate_items(items)?;
            for item in items {
                if item.account_id == *source_account {
                    return Err(CoreError::validation(
                        ValidationCode::SelfTransfer,
                        format!("destination ledger '{}' equals the source", item.account_id),
                    ));
                }
            }
        }
        VoucherBody::Transfer {
            from_account,
            to_account,
            amount,
        } => {
            validate_anchor(from_account, "from account")?;
            validate_anchor(to_account, "to account")?;
            if amount <= &BigDecimal::from(0) {
                return Err(CoreError::validation(
                    ValidationCode::NonPositiveAmount,
                    format!("transfer amount must be positive, got {}", amount),
                ));
            }
            if from_account == to_account {
                return Err(CoreError::validation(
                    ValidationCode::SelfTransfer,
                    format!("cannot transfer from ledger '{}' to itself", from_account),
                ));
            }
        }
    }

    if body.total_amount() <= BigDecimal::from(0) {
        return Err(CoreError::validation(
            ValidationCode::ZeroTotal,
            "voucher total must be positive",
        ));
    }

    Ok(())
}

fn validate_anchor(account_id: &str, role: &str) -> CoreResult<()> {
    if account_id.trim().is_empty() {
        return Err(CoreError::validation(
            ValidationCode::MissingAnchorAccount,
            format!("{} is required", role),
        ));
    }
    Ok(())
}

fn validate_items(items: &[VoucherItem]) -> CoreResult<()> {
    if items.is_empty() {
        return Err(CoreError::validation(
            ValidationCode::NoItems,
            "voucher must have at least one item",
        ));
    }
    for item in items {
        if item.account_id.trim().is_empty() {
            return Err(CoreError::validation(
                ValidationCode::MissingItemAccount,
                "every item must reference a ledger",
            ));
        }
        if item.amount <= BigDecimal::from(0) {
            return Err(CoreError::validation(
                ValidationCode::NonPositiveAmount,
                format!(
                    "item amount for ledger '{}' must be positive, got {}",
                    item.account_id, item.amount
                ),
            ));
        }
    }
    Ok(())
}

/// Derive the balanced journal entry set a voucher represents
///
/// Assumes the body passed shape validation. Every entry is one
/// debit/credit pair, so the set balances by construction; the total is
/// still asserted against the voucher total and a mismatch is surfaced as
/// an integrity violation rather than posted.
pub fn derive_entries(voucher: &Voucher) -> CoreResult<Vec<JournalEntry>> {
    let make = |debit: &str, credit: &str, amount: &BigDecimal, narration: &Option<String>| {
        JournalEntry::new(
            voucher.company_id.clone(),
            voucher.date,
            voucher.voucher_type(),
            voucher.voucher_number.clone(),
            debit.to_string(),
            credit.to_string(),
            amount.clone(),
            narration.clone(),
        )
    };

    let entries: Vec<JournalEntry> = match &voucher.body {
        // Expense: each item ledger is debited, the paying ledger credited
        VoucherBody::Expense { paid_from, items } => items
            .iter()
            .map(|item| make(&item.account_id, paid_from, &item.amount, &item.narration))
            .collect(),
        // Income: the receiving ledger is debited, each item ledger credited
        VoucherBody::Income {
            received_into,
            items,
        } => items
            .iter()
            .map(|item| make(received_into, &item.account_id, &item.amount, &item.narration))
            .collect(),
        // Contra: each destination ledger is debited, the source credited
        VoucherBody::Contra {
            source_account,
            items,
        } => items
            .iter()
            .map(|item| {
                make(
                    &item.account_id,
                    source_account,
                    &item.amount,
                    &item.narration,
                )
            })
            .collect(),
        // Transfer: a single pair
        VoucherBody::Transfer {
            from_account,
            to_account,
            amount,
        } => vec![make(
            to_account,
            from_account,
            amount,
            &voucher.main_narration,
        )],
    };

    let derived_total: BigDecimal = entries.iter().map(|e| &e.amount).sum();
    if derived_total != voucher.total_amount() {
        return Err(CoreError::Integrity(format!(
            "derived entries total {} does not match voucher total {}",
            derived_total,
            voucher.total_amount()
        )));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(account_id: &str, amount: i64) -> VoucherItem {
        VoucherItem::new(account_id.to_string(), BigDecimal::from(amount), None)
    }

    fn voucher(body: VoucherBody) -> Voucher {
        let now = chrono::Utc::now().naive_utc();
        Voucher {
            id: "v1".to_string(),
            voucher_number: "EVCH-1".to_string(),
            company_id: "co1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            manual_receipt_no: None,
            main_narration: None,
            body,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn expense_debits_items_and_credits_payer() {
        let v = voucher(VoucherBody::Expense {
            paid_from: "cash".to_string(),
            items: vec![item("rent", 700), item("power", 300)],
        });

        let entries = derive_entries(&v).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].debit_ledger_id, "rent");
        assert_eq!(entries[0].credit_ledger_id, "cash");
        assert_eq!(entries[0].amount, BigDecimal::from(700));
        assert_eq!(entries[1].debit_ledger_id, "power");
        assert_eq!(entries[1].credit_ledger_id, "cash");
    }

    #[test]
    fn income_debits_receiver_and_credits_items() {
        let v = voucher(VoucherBody::Income {
            received_into: "bank".to_string(),
            items: vec![item("sales", 900)],
        });

        let entries = derive_entries(&v).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].debit_ledger_id, "bank");
        assert_eq!(entries[0].credit_ledger_id, "sales");
        assert_eq!(entries[0].amount, BigDecimal::from(900));
    }

    #[test]
    fn contra_debits_destinations_and_credits_source() {
        let v = voucher(VoucherBody::Contra {
            source_account: "cash".to_string(),
            items: vec![item("bank", 250), item("petty_cash", 50)],
        });

        let entries = derive_entries(&v).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.credit_ledger_id == "cash"));
        assert_eq!(entries[0].debit_ledger_id, "bank");
        assert_eq!(entries[1].debit_ledger_id, "petty_cash");
    }

    #[test]
    fn transfer_produces_a_single_pair() {
        let v = voucher(VoucherBody::Transfer {
            from_account: "bank_a".to_string(),
            to_account: "bank_b".to_string(),
            amount: BigDecimal::from(1200),
        });

        let entries = derive_entries(&v).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].debit_ledger_id, "bank_b");
        assert_eq!(entries[0].credit_ledger_id, "bank_a");
        assert_eq!(entries[0].amount, BigDecimal::from(1200));
    }

    #[test]
    fn every_derivation_balances_against_the_voucher_total() {
        let v = voucher(VoucherBody::Expense {
            paid_from: "cash".to_string(),
            items: vec![item("rent", 700), item("power", 300), item("water", 45)],
        });

        let entries = derive_entries(&v).unwrap();
        let total: BigDecimal = entries.iter().map(|e| &e.amount).sum();
        assert_eq!(total, v.total_amount());
        assert_eq!(total, BigDecimal::from(1045));
    }

    #[test]
    fn contra_rejects_destination_equal_to_source() {
        let body = VoucherBody::Contra {
            source_account: "cash".to_string(),
            items: vec![item("cash", 100)],
        };

        let err = validate_shape(&body).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation {
                code: ValidationCode::SelfTransfer,
                ..
            }
        ));
    }

    #[test]
    fn transfer_rejects_self_transfer() {
        let body = VoucherBody::Transfer {
            from_account: "bank".to_string(),
            to_account: "bank".to_string(),
            amount: BigDecimal::from(10),
        };

        let err = validate_shape(&body).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation {
                code: ValidationCode::SelfTransfer,
                ..
            }
        ));
    }

    #[test]
    fn first_violated_rule_is_reported() {
        // Missing anchor beats the bad item amount
        let body = VoucherBody::Expense {
            paid_from: "".to_string(),
            items: vec![item("rent", -5)],
        };

        let err = validate_shape(&body).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation {
                code: ValidationCode::MissingAnchorAccount,
                ..
            }
        ));
    }

    #[test]
    fn empty_items_and_non_positive_amounts_are_rejected() {
        let no_items = VoucherBody::Expense {
            paid_from: "cash".to_string(),
            items: vec![],
        };
        assert!(matches!(
            validate_shape(&no_items).unwrap_err(),
            CoreError::Validation {
                code: ValidationCode::NoItems,
                ..
            }
        ));

        let zero_amount = VoucherBody::Income {
            received_into: "bank".to_string(),
            items: vec![item("sales", 0)],
        };
        assert!(matches!(
            validate_shape(&zero_amount).unwrap_err(),
            CoreError::Validation {
                code: ValidationCode::NonPositiveAmount,
                ..
            }
        ));

        let zero_transfer = VoucherBody::Transfer {
            from_account: "a".to_string(),
            to_account: "b".to_string(),
            amount: BigDecimal::from(0),
        };
        assert!(matches!(
            validate_shape(&zero_transfer).unwrap_err(),
            CoreError::Validation {
                code: ValidationCode::NonPositiveAmount,
                ..
            }
        ));
    }
}
