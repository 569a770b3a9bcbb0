use balance_service::api::http_routes::{self, AppState};
use balance_service::config::Config;
use balance_service::infrastructure::persistence::postgres_account_repository::{
    PostgresAccountRepository, PostgresGroupAccountRepository,
};
use balance_service::use_cases::{
    check_funds::CheckFundsUseCase, create_account::CreateAccountUseCase,
    create_group_account::CreateGroupAccountUseCase, credit::CreditUseCase, debit::DebitUseCase,
    get_balance::GetBalanceUseCase, group_operations::GroupAccountUseCases,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let account_repo = Arc::new(PostgresAccountRepository::new(pool.clone()));
    let group_account_repo = Arc::new(PostgresGroupAccountRepository::new(pool));

    let state = AppState {
        create_account: Arc::new(CreateAccountUseCase::new(account_repo.clone())),
        create_group_account: Arc::new(CreateGroupAccountUseCase::new(group_account_repo.clone())),
        get_balance: Arc::new(GetBalanceUseCase::new(account_repo.clone())),
        check_funds: Arc::new(CheckFundsUseCase::new(account_repo.clone())),
        credit: Arc::new(CreditUseCase::new(account_repo.clone())),
        debit: Arc::new(DebitUseCase::new(account_repo)),
        group: Arc::new(GroupAccountUseCases::new(group_account_repo)),
        default_currency: config.default_currency.clone(),
    };

    let app = http_routes::routes(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!(%addr, "balance authority listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
