use crate::domain::entities::{Transaction, TransactionStatus, TransactionType};
use crate::domain::error::LedgerError;
use crate::domain::repository::EventStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Money, WalletRef, WalletKind};
use scylla::batch::Batch;
use scylla::{FromRow, Session, SessionBuilder};
use std::str::FromStr;
use uuid::Uuid;

const KEYSPACE: &str = "pixel_money_ledger";

/// Event Store backed by ScyllaDB. Two wide-column tables hold the same
/// transaction row keyed two different ways (`transactions_by_id` for direct
/// lookup, `transactions_by_user` clustered descending by time for history
/// queries), plus a `pending_transactions` tracking table the reconciliation
/// job scans and an `idempotency_keys` table. `save_new` writes all of these
/// in one logged batch, the store's atomic primitive — there is no
/// equivalent of a SQL transaction to fall back on here, so every write that
/// must be all-or-nothing goes through `Session::batch` (SPEC_FULL.md §4.3).
pub struct ScyllaEventStore {
    session: Session,
}

impl ScyllaEventStore {
    pub async fn connect(known_node: &str, replication_factor: u32) -> Result<Self, LedgerError> {
        let session = SessionBuilder::new()
            .known_node(known_node)
            .build()
            .await
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?;

        Self::setup_schema(&session, replication_factor).await?;
        session
            .use_keyspace(KEYSPACE, false)
            .await
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?;

        Ok(Self { session })
    }

    async fn setup_schema(session: &Session, replication_factor: u32) -> Result<(), LedgerError> {
        session
            .query_unpaged(
                format!(
                    "CREATE KEYSPACE IF NOT EXISTS {KEYSPACE} WITH replication = \
                     {{'class': 'SimpleStrategy', 'replication_factor': {replication_factor}}}"
                ),
                &[],
            )
            .await
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?;

        let statements = [
            format!(
                "CREATE TABLE IF NOT EXISTS {KEYSPACE}.transactions_by_id (
                    id uuid PRIMARY KEY,
                    user_id text,
                    source_kind text,
                    source_id text,
                    destination_kind text,
                    destination_id text,
                    transaction_type text,
                    amount text,
                    currency text,
                    status text,
                    created_at timestamp,
                    updated_at timestamp,
                    metadata text
                )"
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {KEYSPACE}.transactions_by_user (
                    user_id text,
                    created_at timestamp,
                    id uuid,
                    source_kind text,
                    source_id text,
                    destination_kind text,
                    destination_id text,
                    transaction_type text,
                    amount text,
                    currency text,
                    status text,
                    updated_at timestamp,
                    metadata text,
                    PRIMARY KEY (user_id, created_at, id)
                ) WITH CLUSTERING ORDER BY (created_at DESC, id DESC)"
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {KEYSPACE}.pending_transactions (
                    bucket text,
                    created_at timestamp,
                    id uuid,
                    PRIMARY KEY (bucket, created_at, id)
                )"
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {KEYSPACE}.idempotency_keys (
                    key uuid PRIMARY KEY,
                    transaction_id uuid
                )"
            ),
        ];

        for statement in statements {
            session
                .query_unpaged(statement, &[])
                .await
                .map_err(|e| LedgerError::EventStoreError(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl EventStore for ScyllaEventStore {
    async fn save_new(&self, transaction: &Transaction) -> Result<(), LedgerError> {
        let mut batch = Batch::default();
        batch.append_statement(
            "INSERT INTO transactions_by_id (id, user_id, source_kind, source_id, \
             destination_kind, destination_id, transaction_type, amount, currency, status, \
             created_at, updated_at, metadata) VALUES (?,?,?,?,?,?,?,?,?,?,?,?,?)",
        );
        batch.append_statement(
            "INSERT INTO transactions_by_user (user_id, created_at, id, source_kind, \
             source_id, destination_kind, destination_id, transaction_type, amount, currency, \
             status, updated_at, metadata) VALUES (?,?,?,?,?,?,?,?,?,?,?,?,?)",
        );
        batch.append_statement(
            "INSERT INTO pending_transactions (bucket, created_at, id) VALUES ('all', ?, ?)",
        );

        let by_id = by_id_values(transaction);
        let by_user = by_user_values(transaction);
        let pending = (transaction.created_at, transaction.id);

        self.session
            .batch(&batch, (by_id, by_user, pending))
            .await
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?;
        Ok(())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: TransactionStatus,
        metadata: Option<String>,
    ) -> Result<(), LedgerError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| LedgerError::EventStoreError(format!("no transaction {id} to update")))?;

        let metadata = metadata.unwrap_or(existing.metadata.clone());
        let updated_at = Utc::now();
        let status_text = status.to_string();

        self.session
            .query_unpaged(
                "UPDATE transactions_by_id SET status = ?, updated_at = ?, metadata = ? WHERE id = ?",
                (status_text.clone(), updated_at, metadata.clone(), id),
            )
            .await
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?;

        self.session
            .query_unpaged(
                "UPDATE transactions_by_user SET status = ?, updated_at = ?, metadata = ? \
                 WHERE user_id = ? AND created_at = ? AND id = ?",
                (
                    status_text,
                    updated_at,
                    metadata,
                    existing.user_id.clone(),
                    existing.created_at,
                    id,
                ),
            )
            .await
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?;

        if status.is_terminal() {
            self.session
                .query_unpaged(
                    "DELETE FROM pending_transactions WHERE bucket = 'all' AND created_at = ? AND id = ?",
                    (existing.created_at, id),
                )
                .await
                .map_err(|e| LedgerError::EventStoreError(e.to_string()))?;
        }

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, LedgerError> {
        let result = self
            .session
            .query_unpaged(
                "SELECT id, user_id, source_kind, source_id, destination_kind, destination_id, \
                 transaction_type, amount, currency, status, created_at, updated_at, metadata \
                 FROM transactions_by_id WHERE id = ?",
                (id,),
            )
            .await
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?;

        let rows = result
            .into_rows_result()
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?;

        for row in rows
            .rows::<TransactionRow>()
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?
        {
            let row = row.map_err(|e| LedgerError::EventStoreError(e.to_string()))?;
            return Ok(Some(row.into_transaction()?));
        }
        Ok(None)
    }

    async fn find_by_user(&self, user_id: &str, limit: i32) -> Result<Vec<Transaction>, LedgerError> {
        let result = self
            .session
            .query_unpaged(
                "SELECT id, user_id, source_kind, source_id, destination_kind, destination_id, \
                 transaction_type, amount, currency, status, created_at, updated_at, metadata \
                 FROM transactions_by_user WHERE user_id = ? LIMIT ?",
                (user_id, limit),
            )
            .await
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?;

        let rows = result
            .into_rows_result()
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?;

        let mut transactions = Vec::new();
        for row in rows
            .rows::<TransactionRow>()
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?
        {
            let row = row.map_err(|e| LedgerError::EventStoreError(e.to_string()))?;
            transactions.push(row.into_transaction()?);
        }
        Ok(transactions)
    }

    async fn find_pending_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let result = self
            .session
            .query_unpaged(
                "SELECT id FROM pending_transactions WHERE bucket = 'all' AND created_at < ?",
                (cutoff,),
            )
            .await
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?;

        let rows = result
            .into_rows_result()
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?;

        let mut stuck = Vec::new();
        for row in rows
            .rows::<(Uuid,)>()
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?
        {
            let (id,) = row.map_err(|e| LedgerError::EventStoreError(e.to_string()))?;
            if let Some(tx) = self.find_by_id(id).await? {
                if !tx.status.is_terminal() {
                    stuck.push(tx);
                }
            }
        }
        Ok(stuck)
    }

    async fn bind_idempotency_key(&self, key: Uuid, transaction_id: Uuid) -> Result<(), LedgerError> {
        self.session
            .query_unpaged(
                "INSERT INTO idempotency_keys (key, transaction_id) VALUES (?, ?)",
                (key, transaction_id),
            )
            .await
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?;
        Ok(())
    }

    async fn find_idempotency_binding(&self, key: Uuid) -> Result<Option<Uuid>, LedgerError> {
        let result = self
            .session
            .query_unpaged(
                "SELECT transaction_id FROM idempotency_keys WHERE key = ?",
                (key,),
            )
            .await
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?;

        let rows = result
            .into_rows_result()
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?;

        for row in rows
            .rows::<(Uuid,)>()
            .map_err(|e| LedgerError::EventStoreError(e.to_string()))?
        {
            let (transaction_id,) = row.map_err(|e| LedgerError::EventStoreError(e.to_string()))?;
            return Ok(Some(transaction_id));
        }
        Ok(None)
    }
}

type ByIdValues = (
    Uuid,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
    String,
);

fn by_id_values(tx: &Transaction) -> ByIdValues {
    (
        tx.id,
        tx.user_id.clone(),
        wallet_kind_str(tx.source.kind).to_string(),
        tx.source.id.clone(),
        wallet_kind_str(tx.destination.kind).to_string(),
        tx.destination.id.clone(),
        tx.transaction_type.to_string(),
        tx.amount.to_string(),
        tx.currency.clone(),
        tx.status.to_string(),
        tx.created_at,
        tx.updated_at,
        tx.metadata.clone(),
    )
}

type ByUserValues = (
    String,
    DateTime<Utc>,
    Uuid,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    DateTime<Utc>,
    String,
);

fn by_user_values(tx: &Transaction) -> ByUserValues {
    (
        tx.user_id.clone(),
        tx.created_at,
        tx.id,
        wallet_kind_str(tx.source.kind).to_string(),
        tx.source.id.clone(),
        wallet_kind_str(tx.destination.kind).to_string(),
        tx.destination.id.clone(),
        tx.transaction_type.to_string(),
        tx.amount.to_string(),
        tx.currency.clone(),
        tx.status.to_string(),
        tx.updated_at,
        tx.metadata.clone(),
    )
}

fn wallet_kind_str(kind: WalletKind) -> &'static str {
    match kind {
        WalletKind::External => "external",
        WalletKind::Individual => "individual",
        WalletKind::Group => "group",
        WalletKind::ExternalBank => "external_bank",
    }
}

fn wallet_kind_from_str(s: &str) -> WalletKind {
    match s {
        "external" => WalletKind::External,
        "group" => WalletKind::Group,
        "external_bank" => WalletKind::ExternalBank,
        _ => WalletKind::Individual,
    }
}

#[derive(FromRow)]
struct TransactionRow {
    id: Uuid,
    user_id: String,
    source_kind: String,
    source_id: String,
    destination_kind: String,
    destination_id: String,
    transaction_type: String,
    amount: String,
    currency: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    metadata: String,
}

impl TransactionRow {
    fn into_transaction(self) -> Result<Transaction, LedgerError> {
        let transaction_type = match self.transaction_type.as_str() {
            "deposit" => TransactionType::Deposit,
            "transfer" => TransactionType::Transfer,
            "contribution" => TransactionType::Contribution,
            "p2p-sent" => TransactionType::P2pSent,
            "p2p-received" => TransactionType::P2pReceived,
            other => {
                return Err(LedgerError::EventStoreError(format!(
                    "unrecognized transaction_type in event store: {other}"
                )))
            }
        };

        let amount = Money::from_str(&self.amount)
            .map_err(|e| LedgerError::EventStoreError(format!("corrupt amount column: {e}")))?;
        let status = TransactionStatus::from_str(&self.status)
            .map_err(|e| LedgerError::EventStoreError(format!("corrupt status column: {e}")))?;

        Ok(Transaction {
            id: self.id,
            user_id: self.user_id,
            source: WalletRef {
                kind: wallet_kind_from_str(&self.source_kind),
                id: self.source_id,
            },
            destination: WalletRef {
                kind: wallet_kind_from_str(&self.destination_kind),
                id: self.destination_id,
            },
            transaction_type,
            amount,
            currency: self.currency,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            metadata: self.metadata,
        })
    }
}
