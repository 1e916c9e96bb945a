//! Account service: savings accounts with goals.
//!
//! Balances are a single running total mutated in place; there is no
//! movement ledger behind them.

use anyhow::Result;
use log::info;

use crate::storage::{AccountRepository, DbConnection};
use shared::{
    Account, AccountListResponse, AccountResponse, AccountSummary, AdjustBalanceRequest,
    CreateAccountRequest, UpdateAccountRequest,
};

/// Service for managing savings accounts
#[derive(Clone)]
pub struct AccountService {
    account_repository: AccountRepository,
}

impl AccountService {
    pub fn new(db: DbConnection) -> Self {
        let account_repository = AccountRepository::new(db);
        Self { account_repository }
    }

    pub async fn create_account(&self, request: CreateAccountRequest) -> Result<AccountResponse> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(anyhow::anyhow!("Account name cannot be empty"));
        }
        if request.balance < 0 || request.goal < 0 {
            return Err(anyhow::anyhow!("Balance and goal cannot be negative"));
        }
        if self.account_repository.get_account_by_name(name).await?.is_some() {
            return Err(anyhow::anyhow!("Account '{}' already exists", name));
        }

        let account = self
            .account_repository
            .insert_account(name, request.balance, request.goal)
            .await?;
        info!("Created account '{}' (id {})", account.name, account.id);

        Ok(AccountResponse {
            success_message: format!("Account '{}' added successfully", account.name),
            account,
        })
    }

    pub async fn list_accounts(&self) -> Result<AccountListResponse> {
        let accounts = self.account_repository.list_accounts().await?;
        Ok(AccountListResponse { accounts })
    }

    /// Full-field edit of one account.
    pub async fn update_account(
        &self,
        id: i64,
        request: UpdateAccountRequest,
    ) -> Result<AccountResponse> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(anyhow::anyhow!("Account name cannot be empty"));
        }
        if request.balance < 0 || request.goal < 0 {
            return Err(anyhow::anyhow!("Balance and goal cannot be negative"));
        }

        let updated = self
            .account_repository
            .update_account(id, name, request.balance, request.goal)
            .await?;
        if !updated {
            return Err(anyhow::anyhow!("Account {} not found", id));
        }

        Ok(AccountResponse {
            account: Account {
                id,
                name: name.to_string(),
                balance: request.balance,
                goal: request.goal,
            },
            success_message: format!("Account '{}' updated successfully", name),
        })
    }

    /// Deposit (positive amount) or withdraw (negative amount). The balance
    /// can never go below zero.
    pub async fn adjust_balance(
        &self,
        id: i64,
        request: AdjustBalanceRequest,
    ) -> Result<AccountResponse> {
        let account = self
            .account_repository
            .get_account(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Account {} not found", id))?;

        let new_balance = account.balance + request.amount;
        if new_balance < 0 {
            return Err(anyhow::anyhow!(
                "Cannot withdraw {} from '{}': balance is only {}",
                request.amount.abs(),
                account.name,
                account.balance
            ));
        }

        self.account_repository.update_balance(id, new_balance).await?;
        info!(
            "Adjusted balance of '{}' by {} to {}",
            account.name, request.amount, new_balance
        );

        Ok(AccountResponse {
            account: Account {
                balance: new_balance,
                ..account
            },
            success_message: "Balance updated successfully".to_string(),
        })
    }

    pub async fn delete_account(&self, id: i64) -> Result<()> {
        let deleted = self.account_repository.delete_account(id).await?;
        if !deleted {
            return Err(anyhow::anyhow!("Account {} not found", id));
        }
        info!("Deleted account {}", id);
        Ok(())
    }

    /// Totals across all accounts for the overview.
    pub async fn summary(&self) -> Result<AccountSummary> {
        let accounts = self.account_repository.list_accounts().await?;
        let total_balance: i64 = accounts.iter().map(|a| a.balance).sum();
        let total_goal: i64 = accounts.iter().map(|a| a.goal).sum();
        let overall_progress = if total_goal > 0 {
            Some(total_balance as f64 / total_goal as f64 * 100.0)
        } else {
            None
        };

        Ok(AccountSummary {
            total_balance,
            total_goal,
            overall_progress,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_service() -> AccountService {
        let db = DbConnection::init_test().await.unwrap();
        AccountService::new(db)
    }

    fn create_request(name: &str, balance: i64, goal: i64) -> CreateAccountRequest {
        CreateAccountRequest {
            name: name.to_string(),
            balance,
            goal,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_names() {
        let service = create_test_service().await;

        service.create_account(create_request("Vacation", 0, 1000)).await.unwrap();
        let result = service.create_account(create_request("Vacation", 50, 500)).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_adjust_balance_deposits_and_withdraws() {
        let service = create_test_service().await;
        let account = service
            .create_account(create_request("Bike", 100, 1000))
            .await
            .unwrap()
            .account;

        let after_deposit = service
            .adjust_balance(account.id, AdjustBalanceRequest { amount: 250 })
            .await
            .unwrap();
        assert_eq!(after_deposit.account.balance, 350);

        let after_withdraw = service
            .adjust_balance(account.id, AdjustBalanceRequest { amount: -50 })
            .await
            .unwrap();
        assert_eq!(after_withdraw.account.balance, 300);
    }

    #[tokio::test]
    async fn test_adjust_balance_cannot_go_negative() {
        let service = create_test_service().await;
        let account = service
            .create_account(create_request("Bike", 100, 1000))
            .await
            .unwrap()
            .account;

        let result = service
            .adjust_balance(account.id, AdjustBalanceRequest { amount: -150 })
            .await;
        assert!(result.is_err());

        // Balance is untouched
        let accounts = service.list_accounts().await.unwrap().accounts;
        assert_eq!(accounts[0].balance, 100);
    }

    #[tokio::test]
    async fn test_summary_totals_and_progress() {
        let service = create_test_service().await;
        service.create_account(create_request("A", 500, 1000)).await.unwrap();
        service.create_account(create_request("B", 250, 500)).await.unwrap();

        let summary = service.summary().await.unwrap();
        assert_eq!(summary.total_balance, 750);
        assert_eq!(summary.total_goal, 1500);
        assert_eq!(summary.overall_progress, Some(50.0));
    }

    #[tokio::test]
    async fn test_summary_without_goals_has_no_progress() {
        let service = create_test_service().await;
        service.create_account(create_request("A", 500, 0)).await.unwrap();

        let summary = service.summary().await.unwrap();
        assert_eq!(summary.overall_progress, None);
    }

    #[tokio::test]
    async fn test_update_missing_account_is_not_found() {
        let service = create_test_service().await;
        let result = service
            .update_account(
                42,
                UpdateAccountRequest {
                    name: "Ghost".to_string(),
                    balance: 0,
                    goal: 0,
                },
            )
            .await;
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
