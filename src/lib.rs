//! # ERP Ledger Core
//!
//! Multi-tenant double-entry voucher posting and ledger statement engine:
//! the accounting core that sits under a company-scoped ERP's vouchers and
//! reports.
//!
//! ## Features
//!
//! - **Chart of Accounts tree**: hierarchical account groups classifying
//!   leaf ledgers, with type inheritance down the tree
//! - **Ledger registry**: stable flattened view of every leaf ledger with
//!   its resolved accounting type and natural balance side
//! - **Voucher posting**: expense, income, contra, and bank transfer
//!   vouchers validated and converted into balanced journal entries
//! - **Append-only journal**: posted entries are immutable; edits replace a
//!   voucher's attributed set atomically
//! - **Statement calculator**: opening-balance-carried-forward running
//!   balances, correctly signed per account nature
//! - **Storage abstraction**: database-agnostic design with trait-based
//!   storage
//!
//! ## Quick Start
//!
//! ```rust
//! use erp_ledger_core::{MemoryStorage, PostingEngine};
//!
//! // The engine runs against any JournalStorage implementation
//! let storage = MemoryStorage::new();
//! let mut engine = PostingEngine::new(storage);
//! ```

pub mod coa;
pub mod posting;
pub mod statement;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use coa::*;
pub use posting::*;
pub use statement::*;
pub use traits::*;
pub use types::*;
pub use utils::memory_storage::MemoryStorage;
