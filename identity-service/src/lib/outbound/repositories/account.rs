use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AccountStatus;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::PersonName;
use crate::domain::account::models::VerificationToken;
use crate::domain::account::ports::AccountRepository;

const SELECT_ACCOUNT: &str = r#"
    SELECT id, name, surname, email, password_hash, status,
           verification_token, verified_at, created_at, updated_at
    FROM accounts
"#;

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_optional(
        &self,
        query: sqlx::query::QueryAs<'_, sqlx::Postgres, AccountRow, sqlx::postgres::PgArguments>,
    ) -> Result<Option<Account>, AccountError> {
        query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AccountError::Database(e.to_string()))?
            .map(Account::try_from)
            .transpose()
    }
}

fn select_where(predicate: &str) -> String {
    format!("{} WHERE {}", SELECT_ACCOUNT, predicate)
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    name: String,
    surname: String,
    email: String,
    password_hash: String,
    status: String,
    verification_token: Option<String>,
    verified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AccountError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<AccountStatus>()
            .map_err(AccountError::Database)?;

        Ok(Account {
            id: AccountId(row.id),
            name: PersonName::new(row.name).map_err(AccountError::InvalidName)?,
            surname: PersonName::new(row.surname).map_err(AccountError::InvalidSurname)?,
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            status,
            verification_token: row.verification_token.map(VerificationToken::from_stored),
            verified_at: row.verified_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, name, surname, email, password_hash, status,
                                  verification_token, verified_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(account.id.0)
        .bind(account.name.as_str())
        .bind(account.surname.as_str())
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .bind(account.status.as_str())
        .bind(account.verification_token.as_ref().map(|token| token.as_str()))
        .bind(account.verified_at)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("accounts_email_key") {
                        return AccountError::EmailTaken(account.email.as_str().to_string());
                    }
                    if db_err.constraint() == Some("accounts_verification_token_key") {
                        return AccountError::Internal(
                            "Verification token collision".to_string(),
                        );
                    }
                }
            }
            AccountError::Database(e.to_string())
        })?;

        Ok(account)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        let query = select_where("id = $1");
        self.fetch_optional(sqlx::query_as(&query).bind(id.0))
            .await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        let query = select_where("email = $1");
        self.fetch_optional(sqlx::query_as(&query).bind(email.as_str()))
            .await
    }

    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<Account>, AccountError> {
        let query = select_where("verification_token = $1");
        self.fetch_optional(sqlx::query_as(&query).bind(token))
            .await
    }

    async fn activate(&self, id: &AccountId) -> Result<bool, AccountError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET status = 'ACTIVE', verified_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'PENDING'
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| AccountError::Database(e.to_string()))?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1)")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AccountError::Database(e.to_string()))?;

        if exists {
            Ok(false)
        } else {
            Err(AccountError::NotFound(id.to_string()))
        }
    }
}
