use crate::domain::gateways::{
    BalanceGateway, InterbankAcceptance, InterbankGateway, InterbankIntent,
    RecipientDirectoryGateway, RemoteError,
};
use async_trait::async_trait;
use common::Money;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::info;

/// In-memory `BalanceGateway` for development and testing without standing
/// up the Balance Authority. Balances start at zero and move in plain
/// memory; debits below zero are reported as insufficient funds.
pub struct FakeBalanceGateway {
    individual: Mutex<HashMap<String, Money>>,
    group: Mutex<HashMap<String, Money>>,
}

impl FakeBalanceGateway {
    pub fn new() -> Self {
        Self {
            individual: Mutex::new(HashMap::new()),
            group: Mutex::new(HashMap::new()),
        }
    }

    pub fn seed(&self, user_id: impl Into<String>, amount: Money) {
        self.individual.lock().unwrap().insert(user_id.into(), amount);
    }

    pub fn seed_group(&self, group_id: impl Into<String>, amount: Money) {
        self.group.lock().unwrap().insert(group_id.into(), amount);
    }
}

impl Default for FakeBalanceGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BalanceGateway for FakeBalanceGateway {
    async fn check_funds(&self, user_id: &str, amount: Money) -> Result<(), RemoteError> {
        let balances = self.individual.lock().unwrap();
        let balance = balances.get(user_id).ok_or(RemoteError::NotFound)?;
        if balance.is_sufficient_for(amount) {
            Ok(())
        } else {
            Err(RemoteError::InsufficientFunds)
        }
    }

    async fn credit(&self, user_id: &str, amount: Money) -> Result<(), RemoteError> {
        let mut balances = self.individual.lock().unwrap();
        let entry = balances.entry(user_id.to_string()).or_insert_with(Money::zero);
        *entry = entry.checked_add(amount);
        info!(user_id, %amount, "[FakeBalanceGateway] credited");
        Ok(())
    }

    async fn debit(&self, user_id: &str, amount: Money) -> Result<(), RemoteError> {
        let mut balances = self.individual.lock().unwrap();
        let balance = balances.get(user_id).copied().ok_or(RemoteError::NotFound)?;
        let new_balance = balance.checked_sub(amount).ok_or(RemoteError::InsufficientFunds)?;
        balances.insert(user_id.to_string(), new_balance);
        info!(user_id, %amount, "[FakeBalanceGateway] debited");
        Ok(())
    }

    async fn check_group_funds(&self, group_id: &str, amount: Money) -> Result<(), RemoteError> {
        let balances = self.group.lock().unwrap();
        let balance = balances.get(group_id).ok_or(RemoteError::NotFound)?;
        if balance.is_sufficient_for(amount) {
            Ok(())
        } else {
            Err(RemoteError::InsufficientFunds)
        }
    }

    async fn credit_group(&self, group_id: &str, amount: Money) -> Result<(), RemoteError> {
        let mut balances = self.group.lock().unwrap();
        let entry = balances.entry(group_id.to_string()).or_insert_with(Money::zero);
        *entry = entry.checked_add(amount);
        Ok(())
    }

    async fn debit_group(&self, group_id: &str, amount: Money) -> Result<(), RemoteError> {
        let mut balances = self.group.lock().unwrap();
        let balance = balances.get(group_id).copied().ok_or(RemoteError::NotFound)?;
        let new_balance = balance.checked_sub(amount).ok_or(RemoteError::InsufficientFunds)?;
        balances.insert(group_id.to_string(), new_balance);
        Ok(())
    }
}

/// In-memory `RecipientDirectoryGateway`: a fixed phone -> user id map
/// seeded by the caller.
pub struct FakeRecipientDirectoryGateway {
    directory: Mutex<HashMap<String, String>>,
}

impl FakeRecipientDirectoryGateway {
    pub fn new() -> Self {
        Self {
            directory: Mutex::new(HashMap::new()),
        }
    }

    pub fn register(&self, phone: impl Into<String>, user_id: impl Into<String>) {
        self.directory.lock().unwrap().insert(phone.into(), user_id.into());
    }
}

impl Default for FakeRecipientDirectoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecipientDirectoryGateway for FakeRecipientDirectoryGateway {
    async fn lookup_by_phone(&self, phone: &str) -> Result<String, RemoteError> {
        self.directory
            .lock()
            .unwrap()
            .get(phone)
            .cloned()
            .ok_or(RemoteError::NotFound)
    }
}

/// In-memory `InterbankGateway` that always accepts the transfer. Useful for
/// exercising the LO's sagas without a real remote bank on the other end.
pub struct FakeInterbankGateway;

impl FakeInterbankGateway {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FakeInterbankGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InterbankGateway for FakeInterbankGateway {
    async fn send(&self, intent: InterbankIntent) -> Result<InterbankAcceptance, RemoteError> {
        info!(transaction_id = %intent.transaction_id, "[FakeInterbankGateway] accepted transfer");
        Ok(InterbankAcceptance {
            remote_tx_id: format!("fake-{}", intent.transaction_id),
        })
    }
}
