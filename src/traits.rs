//! Traits for storage abstraction and extensibility

use async_trait::async_trait;

use crate::types::*;

/// Storage abstraction for the posting system
///
/// This trait allows the posting core to work with any storage backend
/// (PostgreSQL, MySQL, SQLite, in-memory, etc.) by implementing these
/// methods. Every method is scoped to one company; implementations must not
/// let rows leak across tenants.
///
/// Atomicity contract: [`post_voucher`](JournalStorage::post_voucher) and
/// [`delete_voucher`](JournalStorage::delete_voucher) must each apply as a
/// single atomic unit. Running balances are derived by replay, never stored,
/// so no cross-voucher serialization is required beyond that.
#[async_trait]
pub trait JournalStorage: Send + Sync {
    /// Save an account group to the company's chart
    async fn save_group(&mut self, group: &AccountGroup) -> CoreResult<()>;

    /// Get an account group by id
    async fn get_group(&self, company_id: &str, group_id: &str)
        -> CoreResult<Option<AccountGroup>>;

    /// List the company's account groups in stored (creation) order
    async fn list_groups(&self, company_id: &str) -> CoreResult<Vec<AccountGroup>>;

    /// Save a ledger account to the company's chart
    async fn save_ledger(&mut self, ledger: &LedgerAccount) -> CoreResult<()>;

    /// Get a ledger account by id
    async fn get_ledger(&self, company_id: &str, ledger_id: &str)
        -> CoreResult<Option<LedgerAccount>>;

    /// List the company's ledger accounts in stored (creation) order
    async fn list_ledgers(&self, company_id: &str) -> CoreResult<Vec<LedgerAccount>>;

    /// Delete a ledger account. Must refuse with
    /// [`CoreError::Integrity`] while journal entries reference the ledger.
    async fn delete_ledger(&mut self, company_id: &str, ledger_id: &str) -> CoreResult<()>;

    /// Get a voucher by id
    async fn get_voucher(&self, company_id: &str, voucher_id: &str) -> CoreResult<Option<Voucher>>;

    /// List the company's vouchers, optionally filtered by type
    async fn list_vouchers(
        &self,
        company_id: &str,
        voucher_type: Option<VoucherType>,
    ) -> CoreResult<Vec<Voucher>>;

    /// Atomically post a voucher: delete any journal entries attributed to
    /// its voucher number/type, upsert the voucher (with its items), and
    /// append the given entries assigning each a monotonic journal
    /// sequence. Returns the stored entries.
    async fn post_voucher(
        &mut self,
        voucher: &Voucher,
        entries: &[JournalEntry],
    ) -> CoreResult<Vec<JournalEntry>>;

    /// Atomically delete a voucher: its attributed journal entries, then
    /// its items, then the voucher itself
    async fn delete_voucher(&mut self, company_id: &str, voucher_id: &str) -> CoreResult<()>;

    /// All journal entries touching the ledger on either side, in no
    /// particular order (callers sort)
    async fn entries_for_ledger(
        &self,
        company_id: &str,
        ledger_id: &str,
    ) -> CoreResult<Vec<JournalEntry>>;

    /// Journal entries attributed to a voucher number/type
    async fn entries_for_voucher(
        &self,
        company_id: &str,
        voucher_type: VoucherType,
        voucher_number: &str,
    ) -> CoreResult<Vec<JournalEntry>>;
}

/// Trait for implementing custom voucher validation rules
///
/// Shape rules only; the posting engine separately checks account existence
/// against storage.
pub trait VoucherValidator: Send + Sync {
    /// Validate a voucher body before posting
    fn validate_body(&self, body: &VoucherBody) -> CoreResult<()>;
}

/// Default voucher validator enforcing the posting shape rules
pub struct DefaultVoucherValidator;

impl VoucherValidator for DefaultVoucherValidator {
    fn validate_body(&self, body: &VoucherBody) -> CoreResult<()> {
        crate::posting::derive::validate_shape(body)
    }
}
