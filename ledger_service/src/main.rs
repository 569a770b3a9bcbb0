use dotenvy::dotenv;
use ledger_service::api::http_routes::{routes, AppState};
use ledger_service::config::Config;
use ledger_service::domain::gateways::{BalanceGateway, InterbankGateway, RecipientDirectoryGateway};
use ledger_service::domain::repository::EventStore;
use ledger_service::infrastructure::gateways::http_balance_gateway::HttpBalanceGateway;
use ledger_service::infrastructure::gateways::http_interbank_gateway::HttpInterbankGateway;
use ledger_service::infrastructure::gateways::http_recipient_directory_gateway::HttpRecipientDirectoryGateway;
use ledger_service::infrastructure::persistence::scylla_event_store::ScyllaEventStore;
use ledger_service::jobs::reconciliation::ReconciliationJob;
use ledger_service::use_cases::contribution::ContributionUseCase;
use ledger_service::use_cases::deposit::DepositUseCase;
use ledger_service::use_cases::get_history::GetHistoryUseCase;
use ledger_service::use_cases::interbank_transfer::InterbankTransferUseCase;
use ledger_service::use_cases::p2p_transfer::P2pTransferUseCase;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting Ledger Orchestrator...");

    let config = Config::from_env()?;

    let event_store: Arc<dyn EventStore> = Arc::new(
        ScyllaEventStore::connect(
            &config.event_store_contact_point,
            config.event_store_keyspace_replication_factor,
        )
        .await
        .map_err(|e| format!("failed to connect to event store: {e}"))?,
    );
    tracing::info!("Connected to event store");

    let balance_gateway: Arc<dyn BalanceGateway> = Arc::new(HttpBalanceGateway::new(
        reqwest::Client::builder()
            .timeout(config.ba_client_timeout)
            .build()?,
        config.balance_authority_url.clone(),
    ));

    let recipient_directory: Arc<dyn RecipientDirectoryGateway> =
        Arc::new(HttpRecipientDirectoryGateway::new(
            reqwest::Client::builder()
                .timeout(config.rd_client_timeout)
                .build()?,
            config.recipient_directory_url.clone(),
        ));

    let interbank_gateway: Arc<dyn InterbankGateway> = Arc::new(HttpInterbankGateway::new(
        reqwest::Client::builder()
            .timeout(config.ig_client_timeout)
            .build()?,
        config.interbank_gateway_url.clone(),
        config.interbank_gateway_api_key.clone(),
    ));

    let deposit = Arc::new(DepositUseCase::new(event_store.clone(), balance_gateway.clone()));
    let p2p_transfer = Arc::new(P2pTransferUseCase::new(
        event_store.clone(),
        balance_gateway.clone(),
        recipient_directory.clone(),
    ));
    let contribution = Arc::new(ContributionUseCase::new(
        event_store.clone(),
        balance_gateway.clone(),
    ));
    let interbank_transfer = Arc::new(InterbankTransferUseCase::new(
        event_store.clone(),
        balance_gateway.clone(),
        interbank_gateway.clone(),
    ));
    let get_history = Arc::new(GetHistoryUseCase::new(event_store.clone()));

    let app_state = Arc::new(AppState {
        deposit,
        p2p_transfer,
        contribution,
        interbank_transfer,
        get_history,
    });

    let reconciliation_job = Arc::new(ReconciliationJob::new(
        event_store.clone(),
        chrono::Duration::from_std(config.reconciliation_stuck_after)?,
    ));
    tokio::spawn(reconciliation_job.run_forever(config.reconciliation_interval));
    tracing::info!("Reconciliation job started");

    let app = routes(app_state);
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
