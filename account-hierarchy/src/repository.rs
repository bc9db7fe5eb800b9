use crate::error::{HierarchyError, Result};
use crate::models::AccountRecord;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

/// Repository seam for account documents.
///
/// The backing store is the caller's concern; the contract that matters
/// here is atomicity of the hierarchy edge: `record_child` and
/// `insert_with_parent` write both sides of the creator edge as one unit.
/// A failure must leave neither side updated — an edge recorded on one
/// side only corrupts the hierarchy invariant.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_account(&self, id: &str) -> Result<Option<AccountRecord>>;

    /// Insert an account with no hierarchy edge (tenant bootstrap only).
    async fn insert_account(&self, account: AccountRecord) -> Result<()>;

    /// Insert `account` and record the creator edge to `parent_id` in one
    /// atomic unit: the child's createdBy/parentUser fields and the
    /// parent's childUsers append both land, or neither does.
    async fn insert_with_parent(&self, account: AccountRecord, parent_id: &str) -> Result<()>;

    /// Re-point an existing account under a new parent, writing both edge
    /// sides atomically.
    async fn record_child(&self, parent_id: &str, child_id: &str) -> Result<()>;

    async fn update_account(&self, account: AccountRecord) -> Result<()>;

    async fn set_active(&self, id: &str, active: bool) -> Result<()>;
}

/// In-memory account repository for testing and development.
///
/// One mutex over the whole map, not a concurrent map: the two-sided edge
/// writes must mutate parent and child under a single lock to honor the
/// atomicity contract.
pub struct InMemoryAccountRepository {
    accounts: Mutex<HashMap<String, AccountRecord>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, AccountRecord>>> {
        self.accounts
            .lock()
            .map_err(|_| HierarchyError::RepositoryError("account store poisoned".to_string()))
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_account(&self, id: &str) -> Result<Option<AccountRecord>> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn insert_account(&self, account: AccountRecord) -> Result<()> {
        let mut accounts = self.lock()?;
        if accounts.contains_key(&account.id) {
            return Err(HierarchyError::RepositoryError(format!(
                "account already exists: {}",
                account.id
            )));
        }
        accounts.insert(account.id.clone(), account);
        Ok(())
    }

    async fn insert_with_parent(&self, mut account: AccountRecord, parent_id: &str) -> Result<()> {
        let mut accounts = self.lock()?;
        // Validate everything before touching either record.
        if accounts.contains_key(&account.id) {
            return Err(HierarchyError::RepositoryError(format!(
                "account already exists: {}",
                account.id
            )));
        }
        if !accounts.contains_key(parent_id) {
            return Err(HierarchyError::AccountNotFound(parent_id.to_string()));
        }

        account.hierarchy.created_by = Some(parent_id.to_string());
        account.hierarchy.parent_user = Some(parent_id.to_string());
        let child_id = account.id.clone();
        accounts.insert(child_id.clone(), account);

        if let Some(parent) = accounts.get_mut(parent_id) {
            parent.hierarchy.child_users.push(child_id);
            parent.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn record_child(&self, parent_id: &str, child_id: &str) -> Result<()> {
        let mut accounts = self.lock()?;
        if !accounts.contains_key(parent_id) {
            return Err(HierarchyError::AccountNotFound(parent_id.to_string()));
        }
        if !accounts.contains_key(child_id) {
            return Err(HierarchyError::AccountNotFound(child_id.to_string()));
        }

        if let Some(child) = accounts.get_mut(child_id) {
            child.hierarchy.created_by = Some(parent_id.to_string());
            child.hierarchy.parent_user = Some(parent_id.to_string());
            child.updated_at = Utc::now();
        }
        if let Some(parent) = accounts.get_mut(parent_id) {
            if !parent.hierarchy.child_users.iter().any(|id| id == child_id) {
                parent.hierarchy.child_users.push(child_id.to_string());
            }
            parent.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_account(&self, account: AccountRecord) -> Result<()> {
        let mut accounts = self.lock()?;
        if !accounts.contains_key(&account.id) {
            return Err(HierarchyError::AccountNotFound(account.id));
        }
        accounts.insert(account.id.clone(), account);
        Ok(())
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<()> {
        let mut accounts = self.lock()?;
        match accounts.get_mut(id) {
            Some(account) => {
                account.is_active = active;
                account.updated_at = Utc::now();
                Ok(())
            }
            None => Err(HierarchyError::AccountNotFound(id.to_string())),
        }
    }
}
