//! Posting engine orchestrating chart management, voucher posting, and
//! statement computation over a storage backend

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::coa;
use crate::posting::derive;
use crate::statement::{compute_statement, LedgerStatement};
use crate::traits::*;
use crate::types::*;

/// Posting engine coordinating all voucher and chart operations
///
/// Generic over [`JournalStorage`] so the same engine runs against any
/// backend. One engine call per voucher create/update/delete; each of those
/// maps to one atomic storage operation.
pub struct PostingEngine<S: JournalStorage> {
    storage: S,
    validator: Box<dyn VoucherValidator>,
}

impl<S: JournalStorage> PostingEngine<S> {
    /// Create a new engine with the default shape validator
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultVoucherValidator),
        }
    }

    /// Create a new engine with a custom voucher validator
    pub fn with_validator(storage: S, validator: Box<dyn VoucherValidator>) -> Self {
        Self { storage, validator }
    }

    // Chart of Accounts operations

    /// Create an account group in a company's chart
    pub async fn create_group(&mut self, group: AccountGroup) -> CoreResult<AccountGroup> {
        crate::utils::validation::validate_name(&group.name)?;
        if self
            .storage
            .get_group(&group.company_id, &group.id)
            .await?
            .is_some()
        {
            return Err(CoreError::validation(
                ValidationCode::DuplicateId,
                format!("account group '{}' already exists", group.id),
            ));
        }
        if let Some(ref parent_id) = group.parent_id {
            if self
                .storage
                .get_group(&group.company_id, parent_id)
                .await?
                .is_none()
            {
                return Err(CoreError::validation(
                    ValidationCode::UnknownGroup,
                    format!("parent group '{}' does not exist", parent_id),
                ));
            }
        }
        self.storage.save_group(&group).await?;
        Ok(group)
    }

    /// Create a leaf ledger under an existing group
    pub async fn create_ledger(&mut self, ledger: LedgerAccount) -> CoreResult<LedgerAccount> {
        crate::utils::validation::validate_name(&ledger.name)?;
        if ledger.opening_balance < BigDecimal::from(0) {
            return Err(CoreError::validation(
                ValidationCode::NegativeOpeningBalance,
                "opening balance is a magnitude and cannot be negative",
            ));
        }
        if self
            .storage
            .get_ledger(&ledger.company_id, &ledger.id)
            .await?
            .is_some()
        {
            return Err(CoreError::validation(
                ValidationCode::DuplicateId,
                format!("ledger '{}' already exists", ledger.id),
            ));
        }
        if self
            .storage
            .get_group(&ledger.company_id, &ledger.group_id)
            .await?
            .is_none()
        {
            return Err(CoreError::validation(
                ValidationCode::UnknownGroup,
                format!("account group '{}' does not exist", ledger.group_id),
            ));
        }
        self.storage.save_ledger(&ledger).await?;
        Ok(ledger)
    }

    /// Get a ledger by id within a company's chart
    pub async fn get_ledger(&self, company_id: &str, ledger_id: &str) -> CoreResult<LedgerAccount> {
        self.storage
            .get_ledger(company_id, ledger_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("ledger '{}'", ledger_id)))
    }

    /// Delete a ledger; refused while posted entries reference it
    pub async fn delete_ledger(&mut self, company_id: &str, ledger_id: &str) -> CoreResult<()> {
        if self
            .storage
            .get_ledger(company_id, ledger_id)
            .await?
            .is_none()
        {
            return Err(CoreError::NotFound(format!("ledger '{}'", ledger_id)));
        }
        self.storage.delete_ledger(company_id, ledger_id).await
    }

    /// Resolve a ledger's effective accounting type via the group ancestry
    pub async fn resolve_ledger_type(
        &self,
        company_id: &str,
        ledger_id: &str,
    ) -> CoreResult<AccountType> {
        let ledger = self.get_ledger(company_id, ledger_id).await?;
        let groups = self.storage.list_groups(company_id).await?;
        coa::resolve_ledger_type(&groups, &ledger)
    }

    /// Flattened registry of the company's chart: every leaf ledger with
    /// its resolved type and owning group name, in stable pre-order
    pub async fn chart_of_ledgers(&self, company_id: &str) -> CoreResult<Vec<FlatLedger>> {
        let groups = self.storage.list_groups(company_id).await?;
        let ledgers = self.storage.list_ledgers(company_id).await?;
        coa::flatten_ledgers(&groups, &ledgers)
    }

    // Voucher operations

    /// Validate a submission, assign a voucher number, and atomically post
    /// the voucher with its derived journal entries
    pub async fn create_voucher(&mut self, draft: VoucherDraft) -> CoreResult<PostingResult> {
        self.validator.validate_body(&draft.body)?;
        self.check_account_references(&draft.company_id, &draft.body)
            .await?;

        let voucher_number = self
            .next_voucher_number(&draft.company_id, draft.body.voucher_type())
            .await?;
        let now = chrono::Utc::now().naive_utc();
        let voucher = Voucher {
            id: Uuid::new_v4().to_string(),
            voucher_number,
            company_id: draft.company_id,
            date: draft.date,
            manual_receipt_no: draft.manual_receipt_no,
            main_narration: draft.main_narration,
            body: draft.body,
            created_at: now,
            updated_at: now,
        };

        let entries = derive::derive_entries(&voucher)?;
        let stored = self.storage.post_voucher(&voucher, &entries).await?;

        Ok(PostingResult {
            total_amount: voucher.total_amount(),
            voucher_number: voucher.voucher_number,
            journal_entry_ids: stored.into_iter().map(|e| e.id).collect(),
        })
    }

    /// Edit a posted voucher: its attributed journal entries are replaced
    /// wholesale so the net effect is indistinguishable from a fresh
    /// posting, except the id, voucher number, and creation timestamp are
    /// preserved
    pub async fn update_voucher(&mut self, voucher: Voucher) -> CoreResult<PostingResult> {
        let existing = self
            .storage
            .get_voucher(&voucher.company_id, &voucher.id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("voucher '{}'", voucher.id)))?;

        if voucher.voucher_type() != existing.voucher_type() {
            return Err(CoreError::validation(
                ValidationCode::VoucherTypeChanged,
                format!(
                    "voucher '{}' cannot change type; its number is type-bound",
                    existing.voucher_number
                ),
            ));
        }

        self.validator.validate_body(&voucher.body)?;
        self.check_account_references(&voucher.company_id, &voucher.body)
            .await?;

        let updated = Voucher {
            id: existing.id,
            voucher_number: existing.voucher_number,
            company_id: existing.company_id,
            date: voucher.date,
            manual_receipt_no: voucher.manual_receipt_no,
            main_narration: voucher.main_narration,
            body: voucher.body,
            created_at: existing.created_at,
            updated_at: chrono::Utc::now().naive_utc(),
        };

        let entries = derive::derive_entries(&updated)?;
        let stored = self.storage.post_voucher(&updated, &entries).await?;

        Ok(PostingResult {
            total_amount: updated.total_amount(),
            voucher_number: updated.voucher_number,
            journal_entry_ids: stored.into_iter().map(|e| e.id).collect(),
        })
    }

    /// Delete a voucher and its attributed journal entries atomically
    pub async fn delete_voucher(&mut self, company_id: &str, voucher_id: &str) -> CoreResult<()> {
        if self
            .storage
            .get_voucher(company_id, voucher_id)
            .await?
            .is_none()
        {
            return Err(CoreError::NotFound(format!("voucher '{}'", voucher_id)));
        }
        self.storage.delete_voucher(company_id, voucher_id).await
    }

    /// Get a voucher by id
    pub async fn get_voucher(&self, company_id: &str, voucher_id: &str) -> CoreResult<Voucher> {
        self.storage
            .get_voucher(company_id, voucher_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("voucher '{}'", voucher_id)))
    }

    /// List a company's vouchers, optionally filtered by type
    pub async fn list_vouchers(
        &self,
        company_id: &str,
        voucher_type: Option<VoucherType>,
    ) -> CoreResult<Vec<Voucher>> {
        self.storage.list_vouchers(company_id, voucher_type).await
    }

    // Statement operations

    /// Compute a ledger's statement over an optional date window
    pub async fn ledger_statement(
        &self,
        company_id: &str,
        ledger_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> CoreResult<LedgerStatement> {
        let ledger = self.get_ledger(company_id, ledger_id).await?;
        let groups = self.storage.list_groups(company_id).await?;
        let account_type = coa::resolve_ledger_type(&groups, &ledger)?;
        let entries = self.storage.entries_for_ledger(company_id, ledger_id).await?;

        let names: HashMap<String, String> = self
            .storage
            .list_ledgers(company_id)
            .await?
            .into_iter()
            .map(|l| (l.id, l.name))
            .collect();

        Ok(compute_statement(
            &ledger,
            account_type,
            entries,
            &names,
            start_date,
            end_date,
        ))
    }

    /// Every ledger referenced by the body must exist in the voucher's
    /// company (validation rule 4)
    async fn check_account_references(
        &self,
        company_id: &str,
        body: &VoucherBody,
    ) -> CoreResult<()> {
        let mut referenced: Vec<&str> = Vec::new();
        match body {
            VoucherBody::Expense { paid_from, items } => {
                referenced.push(paid_from);
                referenced.extend(items.iter().map(|i| i.account_id.as_str()));
            }
            VoucherBody::Income {
                received_into,
                items,
            } => {
                referenced.push(received_into);
                referenced.extend(items.iter().map(|i| i.account_id.as_str()));
            }
            VoucherBody::Contra {
                source_account,
                items,
            } => {
                referenced.push(source_account);
                referenced.extend(items.iter().map(|i| i.account_id.as_str()));
            }
            VoucherBody::Transfer {
                from_account,
                to_account,
                ..
            } => {
                referenced.push(from_account);
                referenced.push(to_account);
            }
        }

        for account_id in referenced {
            if self
                .storage
                .get_ledger(company_id, account_id)
                .await?
                .is_none()
            {
                return Err(CoreError::validation(
                    ValidationCode::AccountNotInCompany,
                    format!(
                        "ledger '{}' does not exist in company '{}'",
                        account_id, company_id
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Next type-prefixed voucher number: max numeric suffix over the
    /// company's existing vouchers of this type, plus one. Monotonic across
    /// creation order; gaps after deletion are acceptable.
    async fn next_voucher_number(
        &self,
        company_id: &str,
        voucher_type: VoucherType,
    ) -> CoreResult<String> {
        let prefix = voucher_type.number_prefix();
        let vouchers = self
            .storage
            .list_vouchers(company_id, Some(voucher_type))
            .await?;
        let max_suffix = vouchers
            .iter()
            .filter_map(|v| {
                v.voucher_number
                    .strip_prefix(prefix)?
                    .strip_prefix('-')?
                    .parse::<u64>()
                    .ok()
            })
            .max()
            .unwrap_or(0);
        Ok(format!("{}-{}", prefix, max_suffix + 1))
    }
}
