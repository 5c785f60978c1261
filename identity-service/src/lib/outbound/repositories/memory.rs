use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AccountStatus;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::ports::AccountRepository;

/// Account store kept in process memory.
///
/// Uniqueness checks and inserts happen under one write lock, so concurrent
/// registrations with the same email see exactly one winner. Used by tests and
/// local runs without PostgreSQL.
#[derive(Default, Clone)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<AccountId, Account>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|existing| existing.email == account.email) {
            return Err(AccountError::EmailTaken(account.email.to_string()));
        }

        if let Some(token) = &account.verification_token {
            if accounts
                .values()
                .any(|existing| existing.verification_token.as_ref() == Some(token))
            {
                return Err(AccountError::Internal(
                    "Verification token collision".to_string(),
                ));
            }
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        Ok(self.accounts.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|account| &account.email == email)
            .cloned())
    }

    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<Account>, AccountError> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|account| {
                account
                    .verification_token
                    .as_ref()
                    .is_some_and(|stored| stored.as_str() == token)
            })
            .cloned())
    }

    async fn activate(&self, id: &AccountId) -> Result<bool, AccountError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(id)
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;

        if account.is_active() {
            return Ok(false);
        }

        let now = Utc::now();
        account.status = AccountStatus::Active;
        account.verified_at = Some(now);
        account.updated_at = now;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::models::PersonName;
    use crate::domain::account::models::VerificationToken;

    fn account(email: &str) -> Account {
        Account::new_pending(
            PersonName::new("Alice".to_string()).unwrap(),
            PersonName::new("Doe".to_string()).unwrap(),
            EmailAddress::new(email.to_string()).unwrap(),
            "$argon2id$hash".to_string(),
            VerificationToken::generate(),
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repository = InMemoryAccountRepository::new();
        let created = repository.create(account("alice@x.com")).await.unwrap();

        let email = EmailAddress::new("ALICE@x.com".to_string()).unwrap();
        let found = repository.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(found.id, created.id);

        let token = created.verification_token.as_ref().unwrap().as_str();
        let found = repository
            .find_by_verification_token(token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);

        assert!(repository
            .find_by_verification_token("unknown")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let repository = InMemoryAccountRepository::new();
        repository.create(account("alice@x.com")).await.unwrap();

        let result = repository.create(account("Alice@X.com")).await;
        assert!(matches!(result, Err(AccountError::EmailTaken(_))));
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_create_same_email_has_one_winner() {
        let repository = InMemoryAccountRepository::new();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repository = repository.clone();
                tokio::spawn(async move { repository.create(account("race@x.com")).await })
            })
            .collect();

        let mut created = 0;
        let mut taken = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AccountError::EmailTaken(_)) => taken += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(taken, 7);
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_activate_is_idempotent() {
        let repository = InMemoryAccountRepository::new();
        let created = repository.create(account("alice@x.com")).await.unwrap();

        assert!(repository.activate(&created.id).await.unwrap());
        assert!(!repository.activate(&created.id).await.unwrap());

        let stored = repository.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.status, AccountStatus::Active);
        assert!(stored.verified_at.is_some());
        // Token stays as a consumed marker.
        assert_eq!(stored.verification_token, created.verification_token);
    }

    #[tokio::test]
    async fn test_activate_unknown_account() {
        let repository = InMemoryAccountRepository::new();

        let result = repository.activate(&AccountId::new()).await;
        assert!(matches!(result, Err(AccountError::NotFound(_))));
    }
}
