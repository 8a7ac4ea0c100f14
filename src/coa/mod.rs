//! Chart of Accounts tree and flattened ledger registry
//!
//! Account groups form a per-company tree; a group inherits its accounting
//! type from the nearest ancestor carrying an explicit one. Everything here
//! is a pure function over rows fetched from storage, so type resolution
//! never depends on ambient mutable state.

use std::collections::HashMap;

use crate::types::*;

/// Index over a company's account groups with memoized type resolution
pub struct GroupIndex<'a> {
    by_id: HashMap<&'a str, &'a AccountGroup>,
    resolved: HashMap<String, AccountType>,
}

impl<'a> GroupIndex<'a> {
    /// Build an index over the given groups
    pub fn new(groups: &'a [AccountGroup]) -> Self {
        Self {
            by_id: groups.iter().map(|g| (g.id.as_str(), g)).collect(),
            resolved: HashMap::new(),
        }
    }

    /// Resolve a group's effective accounting type by walking parent links
    /// to the nearest group carrying an explicit type
    pub fn resolve_group_type(&mut self, group_id: &str) -> CoreResult<AccountType> {
        if let Some(t) = self.resolved.get(group_id) {
            return Ok(*t);
        }

        let mut chain: Vec<&'a str> = Vec::new();
        let mut current = group_id;
        let account_type = loop {
            let group: &'a AccountGroup = self.by_id.get(current).copied().ok_or_else(|| {
                CoreError::Configuration(format!("account group '{}' does not exist", current))
            })?;
            chain.push(group.id.as_str());

            if let Some(t) = self.resolved.get(current) {
                break *t;
            }
            if let Some(t) = group.account_type {
                break t;
            }
            match group.parent_id.as_deref() {
                Some(parent) if chain.contains(&parent) => {
                    return Err(CoreError::Configuration(format!(
                        "account group tree contains a cycle through '{}'",
                        parent
                    )));
                }
                Some(parent) => current = parent,
                None => {
                    return Err(CoreError::Configuration(format!(
                        "no ancestor of account group '{}' carries an account type",
                        group_id
                    )));
                }
            }
        };

        for id in chain {
            self.resolved.insert(id.to_string(), account_type);
        }
        Ok(account_type)
    }
}

/// Resolve the effective accounting type of a single ledger
pub fn resolve_ledger_type(
    groups: &[AccountGroup],
    ledger: &LedgerAccount,
) -> CoreResult<AccountType> {
    GroupIndex::new(groups).resolve_group_type(&ledger.group_id)
}

/// Produce every leaf ledger with its resolved type and owning group name
///
/// Order is a pre-order traversal of the group tree: root groups in stored
/// order; within a group, its ledgers in stored order, then its subgroups
/// depth-first. The order is stable across repeated calls.
pub fn flatten_ledgers(
    groups: &[AccountGroup],
    ledgers: &[LedgerAccount],
) -> CoreResult<Vec<FlatLedger>> {
    let mut index = GroupIndex::new(groups);

    let mut children: HashMap<&str, Vec<&AccountGroup>> = HashMap::new();
    let mut roots: Vec<&AccountGroup> = Vec::new();
    for group in groups {
        match group.parent_id.as_deref() {
            Some(parent) => children.entry(parent).or_default().push(group),
            None => roots.push(group),
        }
    }

    let mut ledgers_by_group: HashMap<&str, Vec<&LedgerAccount>> = HashMap::new();
    for ledger in ledgers {
        if !groups.iter().any(|g| g.id == ledger.group_id) {
            return Err(CoreError::Configuration(format!(
                "ledger '{}' references unknown account group '{}'",
                ledger.id, ledger.group_id
            )));
        }
        ledgers_by_group
            .entry(ledger.group_id.as_str())
            .or_default()
            .push(ledger);
    }

    let mut flat = Vec::with_capacity(ledgers.len());
    let mut stack: Vec<&AccountGroup> = roots.into_iter().rev().collect();
    while let Some(group) = stack.pop() {
        if let Some(owned) = ledgers_by_group.get(group.id.as_str()) {
            let account_type = index.resolve_group_type(&group.id)?;
            for ledger in owned {
                flat.push(FlatLedger {
                    ledger: (*ledger).clone(),
                    group_name: group.name.clone(),
                    account_type,
                });
            }
        }
        if let Some(subgroups) = children.get(group.id.as_str()) {
            for subgroup in subgroups.iter().rev() {
                stack.push(subgroup);
            }
        }
    }

    // Groups trapped in a parent cycle are unreachable from any root; any
    // ledgers they own would silently vanish from the registry.
    if flat.len() != ledgers.len() {
        return Err(CoreError::Configuration(
            "account group tree contains groups unreachable from a root".to_string(),
        ));
    }

    Ok(flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    fn group(id: &str, parent: Option<&str>, account_type: Option<AccountType>) -> AccountGroup {
        AccountGroup::new(
            id.to_string(),
            "co1".to_string(),
            format!("{} group", id),
            parent.map(|p| p.to_string()),
            account_type,
        )
    }

    fn ledger(id: &str, group_id: &str) -> LedgerAccount {
        LedgerAccount::new(
            id.to_string(),
            "co1".to_string(),
            format!("{} ledger", id),
            group_id.to_string(),
            BigDecimal::from(0),
        )
    }

    #[test]
    fn resolves_type_through_nested_subgroups() {
        let groups = vec![
            group("assets", None, Some(AccountType::Asset)),
            group("current", Some("assets"), None),
            group("bank", Some("current"), None),
        ];
        let cash = ledger("cash", "bank");

        let resolved = resolve_ledger_type(&groups, &cash).unwrap();
        assert_eq!(resolved, AccountType::Asset);
    }

    #[test]
    fn subgroup_override_wins_over_ancestor() {
        let groups = vec![
            group("assets", None, Some(AccountType::Asset)),
            group("contra", Some("assets"), Some(AccountType::Liability)),
        ];
        let depreciation = ledger("depreciation", "contra");

        let resolved = resolve_ledger_type(&groups, &depreciation).unwrap();
        assert_eq!(resolved, AccountType::Liability);
    }

    #[test]
    fn unresolvable_type_is_configuration_error() {
        let groups = vec![group("loose", None, None)];
        let orphan = ledger("orphan", "loose");

        let err = resolve_ledger_type(&groups, &orphan).unwrap_err();
        assert!(matches!(err, CoreError::Configuration(_)));
    }

    #[test]
    fn parent_cycle_is_configuration_error() {
        let groups = vec![group("a", Some("b"), None), group("b", Some("a"), None)];
        let stuck = ledger("stuck", "a");

        let err = resolve_ledger_type(&groups, &stuck).unwrap_err();
        assert!(matches!(err, CoreError::Configuration(_)));
    }

    #[test]
    fn flatten_is_pre_order_with_stable_sibling_order() {
        let groups = vec![
            group("assets", None, Some(AccountType::Asset)),
            group("income", None, Some(AccountType::Income)),
            group("current", Some("assets"), None),
        ];
        let ledgers = vec![
            ledger("fixed_deposit", "assets"),
            ledger("cash", "current"),
            ledger("bank", "current"),
            ledger("sales", "income"),
        ];

        let flat = flatten_ledgers(&groups, &ledgers).unwrap();
        let order: Vec<&str> = flat.iter().map(|f| f.ledger.id.as_str()).collect();
        assert_eq!(order, vec!["fixed_deposit", "cash", "bank", "sales"]);

        assert_eq!(flat[1].account_type, AccountType::Asset);
        assert_eq!(flat[1].group_name, "current group");
        assert_eq!(flat[3].account_type, AccountType::Income);
    }

    #[test]
    fn flatten_rejects_ledger_with_unknown_group() {
        let groups = vec![group("assets", None, Some(AccountType::Asset))];
        let ledgers = vec![ledger("cash", "missing")];

        let err = flatten_ledgers(&groups, &ledgers).unwrap_err();
        assert!(matches!(err, CoreError::Configuration(_)));
    }

    #[test]
    fn memoized_resolution_matches_fresh_resolution() {
        let groups = vec![
            group("liabilities", None, Some(AccountType::Liability)),
            group("loans", Some("liabilities"), None),
            group("secured", Some("loans"), None),
        ];

        let mut index = GroupIndex::new(&groups);
        let first = index.resolve_group_type("secured").unwrap();
        let second = index.resolve_group_type("secured").unwrap();
        let parent = index.resolve_group_type("loans").unwrap();
        assert_eq!(first, AccountType::Liability);
        assert_eq!(second, first);
        assert_eq!(parent, first);
    }
}
