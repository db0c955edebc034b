#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error("Ingestion failed with: {0}")]
    Ingestion(String),

    #[error("Simulation failed with: {0}")]
    Simulation(String),

    #[error("Invalid amount {amount} for account {account}")]
    InvalidAmount { account: String, amount: f64 },

    #[error("Ledger {ledger} has a non-positive total ({total}), percentages are unavailable")]
    EmptyLedgerAggregation { ledger: String, total: f64 },

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("Chart output failed with: {0}")]
    Chart(String),
}
