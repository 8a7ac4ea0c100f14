//! Core types and data structures for the voucher posting system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account types following standard accounting principles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Assets - what the business owns (Cash, Bank, Receivables, etc.)
    Asset,
    /// Liabilities - what the business owes (Loans, Payables, etc.)
    Liability,
    /// Equity - owner's interest in the business
    Equity,
    /// Income/Revenue - money earned by the business
    Income,
    /// Expenses - costs incurred by the business
    Expense,
}

impl AccountType {
    /// Returns the normal balance side for this account type.
    /// Assets and Expenses normally carry debit balances;
    /// Liabilities, Equity, and Income normally carry credit balances.
    pub fn normal_balance(&self) -> EntrySide {
        match self {
            AccountType::Asset | AccountType::Expense => EntrySide::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Income => EntrySide::Credit,
        }
    }

    /// Whether a positive running balance on this account means a debit excess
    pub fn is_debit_normal(&self) -> bool {
        self.normal_balance() == EntrySide::Debit
    }
}

/// The two sides of a double-entry posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntrySide {
    Debit,
    Credit,
}

/// A classification node in the Chart of Accounts tree
///
/// Groups form a tree per company. A group may carry an explicit
/// `account_type`; when it does not, the type is inherited from the nearest
/// ancestor that does (see [`crate::coa`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountGroup {
    /// Unique identifier within the company's chart
    pub id: String,
    /// Owning company (tenant scope)
    pub company_id: String,
    /// Human-readable group name
    pub name: String,
    /// Parent group, `None` for a root group
    pub parent_id: Option<String>,
    /// Explicit accounting type; `None` inherits from the ancestor chain
    pub account_type: Option<AccountType>,
    /// When the group was created
    pub created_at: NaiveDateTime,
    /// When the group was last updated
    pub updated_at: NaiveDateTime,
}

impl AccountGroup {
    /// Create a new account group
    pub fn new(
        id: String,
        company_id: String,
        name: String,
        parent_id: Option<String>,
        account_type: Option<AccountType>,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            company_id,
            name,
            parent_id,
            account_type,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A leaf financial account that accumulates a balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerAccount {
    /// Unique identifier within the company's chart
    pub id: String,
    /// Owning company (tenant scope)
    pub company_id: String,
    /// Human-readable ledger name
    pub name: String,
    /// Owning account group, exactly one
    pub group_id: String,
    /// Opening balance magnitude, entered non-negative on the account's
    /// natural side
    pub opening_balance: BigDecimal,
    /// When the ledger was created
    pub created_at: NaiveDateTime,
    /// When the ledger was last updated
    pub updated_at: NaiveDateTime,
}

impl LedgerAccount {
    /// Create a new ledger account
    pub fn new(
        id: String,
        company_id: String,
        name: String,
        group_id: String,
        opening_balance: BigDecimal,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            company_id,
            name,
            group_id,
            opening_balance,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A leaf ledger together with its resolved classification, as produced by
/// the flattened ledger registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatLedger {
    /// The ledger itself
    pub ledger: LedgerAccount,
    /// Name of the owning account group
    pub group_name: String,
    /// Accounting type resolved through the group ancestry
    pub account_type: AccountType,
}

/// The four voucher document types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoucherType {
    Expense,
    Income,
    Contra,
    Transfer,
}

impl VoucherType {
    /// Prefix used when generating voucher numbers, e.g. `EVCH-7`
    pub fn number_prefix(&self) -> &'static str {
        match self {
            VoucherType::Expense => "EVCH",
            VoucherType::Income => "IVCH",
            VoucherType::Contra => "CVCH",
            VoucherType::Transfer => "TVCH",
        }
    }
}

/// A single line of a voucher targeting one ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoucherItem {
    /// Unique identifier
    pub id: String,
    /// Target ledger
    pub account_id: String,
    /// Line amount, strictly positive
    pub amount: BigDecimal,
    /// Optional line narration
    pub narration: Option<String>,
}

impl VoucherItem {
    /// Create a new voucher item
    pub fn new(account_id: String, amount: BigDecimal, narration: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id,
            amount,
            narration,
        }
    }
}

/// Type-specific shape of a voucher: which ledgers anchor the posting and
/// which side each one lands on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VoucherBody {
    /// One "paid from" ledger credited against N debited item ledgers
    Expense {
        paid_from: String,
        items: Vec<VoucherItem>,
    },
    /// One "received into" ledger debited against N credited item ledgers
    Income {
        received_into: String,
        items: Vec<VoucherItem>,
    },
    /// One source ledger credited against N debited destination ledgers
    Contra {
        source_account: String,
        items: Vec<VoucherItem>,
    },
    /// Exactly one from/to pair and one amount
    Transfer {
        from_account: String,
        to_account: String,
        amount: BigDecimal,
    },
}

impl VoucherBody {
    /// The voucher type this body represents
    pub fn voucher_type(&self) -> VoucherType {
        match self {
            VoucherBody::Expense { .. } => VoucherType::Expense,
            VoucherBody::Income { .. } => VoucherType::Income,
            VoucherBody::Contra { .. } => VoucherType::Contra,
            VoucherBody::Transfer { .. } => VoucherType::Transfer,
        }
    }

    /// Sum of item amounts (or the single transfer amount)
    pub fn total_amount(&self) -> BigDecimal {
        match self {
            VoucherBody::Expense { items, .. }
            | VoucherBody::Income { items, .. }
            | VoucherBody::Contra { items, .. } => items.iter().map(|i| &i.amount).sum(),
            VoucherBody::Transfer { amount, .. } => amount.clone(),
        }
    }
}

/// A voucher submission before it has been validated, numbered, and posted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoucherDraft {
    /// Tenant scope
    pub company_id: String,
    /// Business date of the transaction
    pub date: NaiveDate,
    /// Optional free-text cross-reference (receipt book number etc.)
    pub manual_receipt_no: Option<String>,
    /// Optional voucher-level narration
    pub main_narration: Option<String>,
    /// Type-specific posting shape
    pub body: VoucherBody,
}

/// A posted voucher document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voucher {
    /// Unique identifier
    pub id: String,
    /// Type-prefixed number, unique per company and voucher type
    pub voucher_number: String,
    /// Tenant scope
    pub company_id: String,
    /// Business date of the transaction
    pub date: NaiveDate,
    /// Optional free-text cross-reference
    pub manual_receipt_no: Option<String>,
    /// Optional voucher-level narration
    pub main_narration: Option<String>,
    /// Type-specific posting shape, owns the voucher items
    pub body: VoucherBody,
    /// When the voucher was first posted
    pub created_at: NaiveDateTime,
    /// When the voucher was last edited
    pub updated_at: NaiveDateTime,
}

impl Voucher {
    /// The voucher type, derived from the body
    pub fn voucher_type(&self) -> VoucherType {
        self.body.voucher_type()
    }

    /// The voucher total, derived from the body
    pub fn total_amount(&self) -> BigDecimal {
        self.body.total_amount()
    }
}

/// One atomic debit/credit pair recorded against two ledgers
///
/// Entries are immutable once appended to the journal. Editing a voucher
/// replaces its attributed entry set wholesale rather than mutating rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier
    pub id: String,
    /// Monotonic insertion order assigned by the journal at append; used to
    /// break ties between entries sharing a date
    pub sequence: i64,
    /// Tenant scope
    pub company_id: String,
    /// Business date of the underlying voucher
    pub date: NaiveDate,
    /// Type of the originating voucher
    pub voucher_type: VoucherType,
    /// Number of the originating voucher (weak attribution, not ownership)
    pub voucher_number: String,
    /// Ledger debited
    pub debit_ledger_id: String,
    /// Ledger credited
    pub credit_ledger_id: String,
    /// Amount moved, strictly positive
    pub amount: BigDecimal,
    /// Optional narration carried from the voucher line
    pub narration: Option<String>,
}

impl JournalEntry {
    /// Create a new journal entry; `sequence` is assigned by the journal
    /// when the entry is appended
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        company_id: String,
        date: NaiveDate,
        voucher_type: VoucherType,
        voucher_number: String,
        debit_ledger_id: String,
        credit_ledger_id: String,
        amount: BigDecimal,
        narration: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sequence: 0,
            company_id,
            date,
            voucher_type,
            voucher_number,
            debit_ledger_id,
            credit_ledger_id,
            amount,
            narration,
        }
    }
}

/// Outcome of a successful voucher posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingResult {
    /// Assigned (or preserved, on edit) voucher number
    pub voucher_number: String,
    /// Voucher total
    pub total_amount: BigDecimal,
    /// Ids of the journal entries written
    pub journal_entry_ids: Vec<String>,
}

/// Machine-checkable reason codes for validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationCode {
    /// Voucher-type-specific anchor account is missing or empty
    MissingAnchorAccount,
    /// Voucher has no items
    NoItems,
    /// An item references no ledger
    MissingItemAccount,
    /// An amount is zero or negative
    NonPositiveAmount,
    /// Source and destination ledger are the same account
    SelfTransfer,
    /// A referenced ledger does not exist in the voucher's company
    AccountNotInCompany,
    /// Voucher total is not strictly positive
    ZeroTotal,
    /// The same ledger appears in more than one item
    DuplicateItemAccount,
    /// A name field is empty
    EmptyName,
    /// Opening balance magnitude is negative
    NegativeOpeningBalance,
    /// A group or ledger id is already taken
    DuplicateId,
    /// Referenced account group does not exist
    UnknownGroup,
    /// An edit attempted to change the voucher's type
    VoucherTypeChanged,
}

impl std::fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Errors that can occur in the posting and statement system
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),
    /// Malformed or incomplete voucher/chart input; recoverable by the
    /// caller correcting the input
    #[error("Validation error [{code}]: {message}")]
    Validation {
        code: ValidationCode,
        message: String,
    },
    /// Chart of Accounts inconsistency (unresolvable type, cyclic group
    /// tree); a data setup defect rather than user input
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Referenced voucher/ledger does not exist in the tenant's scope
    #[error("Not found: {0}")]
    NotFound(String),
    /// Invariant breach: referenced ledger deletion, or debits != credits
    /// after derivation
    #[error("Integrity violation: {0}")]
    Integrity(String),
}

impl CoreError {
    /// Shorthand for building a validation error
    pub fn validation(code: ValidationCode, message: impl Into<String>) -> Self {
        CoreError::Validation {
            code,
            message: message.into(),
        }
    }
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;
