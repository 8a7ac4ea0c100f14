//! Validation utilities

use crate::posting::derive::validate_shape;
use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;
use std::collections::HashSet;

/// Validate that an amount is strictly positive
pub fn validate_positive_amount(amount: &BigDecimal) -> CoreResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(CoreError::validation(
            ValidationCode::NonPositiveAmount,
            "amount must be positive",
        ))
    } else {
        Ok(())
    }
}

/// Validate that a ledger/group id is well-formed
pub fn validate_account_id(account_id: &str) -> CoreResult<()> {
    if account_id.trim().is_empty() {
        return Err(CoreError::validation(
            ValidationCode::MissingItemAccount,
            "account id cannot be empty",
        ));
    }

    if account_id.len() > 50 {
        return Err(CoreError::validation(
            ValidationCode::MissingItemAccount,
            "account id cannot exceed 50 characters",
        ));
    }

    // Alphanumeric, dashes, and underscores only
    if !account_id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CoreError::validation(
            ValidationCode::MissingItemAccount,
            "account id can only contain alphanumeric characters, dashes, and underscores",
        ));
    }

    Ok(())
}

/// Validate that an account or ledger name is valid
pub fn validate_name(name: &str) -> CoreResult<()> {
    if name.trim().is_empty() {
        return Err(CoreError::validation(
            ValidationCode::EmptyName,
            "name cannot be empty",
        ));
    }

    if name.len() > 100 {
        return Err(CoreError::validation(
            ValidationCode::EmptyName,
            "name cannot exceed 100 characters",
        ));
    }

    Ok(())
}

/// Enhanced voucher validator with detailed checks beyond the posting shape
///
/// Adds well-formedness checks on every referenced account id and rejects
/// the same ledger appearing in more than one item of a voucher.
pub struct EnhancedVoucherValidator;

impl VoucherValidator for EnhancedVoucherValidator {
    fn validate_body(&self, body: &VoucherBody) -> CoreResult<()> {
        validate_shape(body)?;

        let items = match body {
            VoucherBody::Expense { paid_from, items } => {
                validate_account_id(paid_from)?;
                items
            }
            VoucherBody::Income {
                received_into,
                items,
            } => {
                validate_account_id(received_into)?;
                items
            }
            VoucherBody::Contra {
                source_account,
                items,
            } => {
                validate_account_id(source_account)?;
                items
            }
            VoucherBody::Transfer {
                from_account,
                to_account,
                amount,
            } => {
                validate_account_id(from_account)?;
                validate_account_id(to_account)?;
                validate_positive_amount(amount)?;
                return Ok(());
            }
        };

        let mut seen = HashSet::new();
        for item in items {
            validate_account_id(&item.account_id)?;
            validate_positive_amount(&item.amount)?;
            if !seen.insert(item.account_id.as_str()) {
                return Err(CoreError::validation(
                    ValidationCode::DuplicateItemAccount,
                    format!(
                        "ledger '{}' appears in more than one item",
                        item.account_id
                    ),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(account_id: &str, amount: i64) -> VoucherItem {
        VoucherItem::new(account_id.to_string(), BigDecimal::from(amount), None)
    }

    #[test]
    fn duplicate_item_accounts_are_rejected() {
        let body = VoucherBody::Expense {
            paid_from: "cash".to_string(),
            items: vec![item("rent", 100), item("rent", 200)],
        };

        let err = EnhancedVoucherValidator.validate_body(&body).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation {
                code: ValidationCode::DuplicateItemAccount,
                ..
            }
        ));
    }

    #[test]
    fn malformed_account_ids_are_rejected() {
        assert!(validate_account_id("cash-1").is_ok());
        assert!(validate_account_id("no spaces").is_err());
        assert!(validate_account_id("").is_err());
    }
}
