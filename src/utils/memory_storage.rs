//! In-memory storage implementation for testing and development

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

#[derive(Debug, Default)]
struct MemoryState {
    groups: Vec<AccountGroup>,
    ledgers: Vec<LedgerAccount>,
    vouchers: Vec<Voucher>,
    entries: Vec<JournalEntry>,
    next_sequence: i64,
}

/// In-memory [`JournalStorage`] backed by a single `RwLock`
///
/// Every trait call takes the lock once, so each call is atomic; rows keep
/// insertion order, which is the stored order the chart traversal and the
/// journal sequence rely on.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        let mut state = self.state.write().unwrap();
        *state = MemoryState::default();
    }
}

#[async_trait]
impl JournalStorage for MemoryStorage {
    async fn save_group(&mut self, group: &AccountGroup) -> CoreResult<()> {
        let mut state = self.state.write().unwrap();
        match state
            .groups
            .iter()
            .position(|g| g.company_id == group.company_id && g.id == group.id)
        {
            Some(pos) => state.groups[pos] = group.clone(),
            None => state.groups.push(group.clone()),
        }
        Ok(())
    }

    async fn get_group(
        &self,
        company_id: &str,
        group_id: &str,
    ) -> CoreResult<Option<AccountGroup>> {
        let state = self.state.read().unwrap();
        Ok(state
            .groups
            .iter()
            .find(|g| g.company_id == company_id && g.id == group_id)
            .cloned())
    }

    async fn list_groups(&self, company_id: &str) -> CoreResult<Vec<AccountGroup>> {
        let state = self.state.read().unwrap();
        Ok(state
            .groups
            .iter()
            .filter(|g| g.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn save_ledger(&mut self, ledger: &LedgerAccount) -> CoreResult<()> {
        let mut state = self.state.write().unwrap();
        match state
            .ledgers
            .iter()
            .position(|l| l.company_id == ledger.company_id && l.id == ledger.id)
        {
            Some(pos) => state.ledgers[pos] = ledger.clone(),
            None => state.ledgers.push(ledger.clone()),
        }
        Ok(())
    }

    async fn get_ledger(
        &self,
        company_id: &str,
        ledger_id: &str,
    ) -> CoreResult<Option<LedgerAccount>> {
        let state = self.state.read().unwrap();
        Ok(state
            .ledgers
            .iter()
            .find(|l| l.company_id == company_id && l.id == ledger_id)
            .cloned())
    }

    async fn list_ledgers(&self, company_id: &str) -> CoreResult<Vec<LedgerAccount>> {
        let state = self.state.read().unwrap();
        Ok(state
            .ledgers
            .iter()
            .filter(|l| l.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn delete_ledger(&mut self, company_id: &str, ledger_id: &str) -> CoreResult<()> {
        let mut state = self.state.write().unwrap();
        let referenced = state.entries.iter().any(|e| {
            e.company_id == company_id
                && (e.debit_ledger_id == ledger_id || e.credit_ledger_id == ledger_id)
        });
        if referenced {
            return Err(CoreError::Integrity(format!(
                "ledger '{}' is referenced by posted journal entries",
                ledger_id
            )));
        }
        let before = state.ledgers.len();
        state
            .ledgers
            .retain(|l| !(l.company_id == company_id && l.id == ledger_id));
        if state.ledgers.len() == before {
            return Err(CoreError::NotFound(format!("ledger '{}'", ledger_id)));
        }
        Ok(())
    }

    async fn get_voucher(&self, company_id: &str, voucher_id: &str) -> CoreResult<Option<Voucher>> {
        let state = self.state.read().unwrap();
        Ok(state
            .vouchers
            .iter()
            .find(|v| v.company_id == company_id && v.id == voucher_id)
            .cloned())
    }

    async fn list_vouchers(
        &self,
        company_id: &str,
        voucher_type: Option<VoucherType>,
    ) -> CoreResult<Vec<Voucher>> {
        let state = self.state.read().unwrap();
        Ok(state
            .vouchers
            .iter()
            .filter(|v| {
                v.company_id == company_id
                    && voucher_type.map_or(true, |t| v.voucher_type() == t)
            })
            .cloned()
            .collect())
    }

    async fn post_voucher(
        &mut self,
        voucher: &Voucher,
        entries: &[JournalEntry],
    ) -> CoreResult<Vec<JournalEntry>> {
        let mut state = self.state.write().unwrap();

        // Replace any entries already attributed to this voucher number
        state.entries.retain(|e| {
            !(e.company_id == voucher.company_id
                && e.voucher_type == voucher.voucher_type()
                && e.voucher_number == voucher.voucher_number)
        });

        match state
            .vouchers
            .iter()
            .position(|v| v.company_id == voucher.company_id && v.id == voucher.id)
        {
            Some(pos) => state.vouchers[pos] = voucher.clone(),
            None => state.vouchers.push(voucher.clone()),
        }

        let mut stored = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut entry = entry.clone();
            state.next_sequence += 1;
            entry.sequence = state.next_sequence;
            state.entries.push(entry.clone());
            stored.push(entry);
        }
        Ok(stored)
    }

    async fn delete_voucher(&mut self, company_id: &str, voucher_id: &str) -> CoreResult<()> {
        let mut state = self.state.write().unwrap();
        let voucher = state
            .vouchers
            .iter()
            .find(|v| v.company_id == company_id && v.id == voucher_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("voucher '{}'", voucher_id)))?;

        // Entries first, then the voucher (its items go with it)
        state.entries.retain(|e| {
            !(e.company_id == company_id
                && e.voucher_type == voucher.voucher_type()
                && e.voucher_number == voucher.voucher_number)
        });
        state
            .vouchers
            .retain(|v| !(v.company_id == company_id && v.id == voucher_id));
        Ok(())
    }

    async fn entries_for_ledger(
        &self,
        company_id: &str,
        ledger_id: &str,
    ) -> CoreResult<Vec<JournalEntry>> {
        let state = self.state.read().unwrap();
        Ok(state
            .entries
            .iter()
            .filter(|e| {
                e.company_id == company_id
                    && (e.debit_ledger_id == ledger_id || e.credit_ledger_id == ledger_id)
            })
            .cloned()
            .collect())
    }

    async fn entries_for_voucher(
        &self,
        company_id: &str,
        voucher_type: VoucherType,
        voucher_number: &str,
    ) -> CoreResult<Vec<JournalEntry>> {
        let state = self.state.read().unwrap();
        Ok(state
            .entries
            .iter()
            .filter(|e| {
                e.company_id == company_id
                    && e.voucher_type == voucher_type
                    && e.voucher_number == voucher_number
            })
            .cloned()
            .collect())
    }
}
