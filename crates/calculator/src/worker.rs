use crate::error::CalcError;
use crate::{compound_interest, compound_interest_series, mining_profitability};
use core_types::{ChartPoint, CompoundInterestResult, MiningProfitability, NetworkInfo};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// A unit of work for the background calculation worker.
#[derive(Debug, Clone, PartialEq)]
pub enum CalculationRequest {
    CompoundInterest {
        principal: f64,
        annual_rate: f64,
        years: f64,
        compounds_per_year: u32,
    },
    ChartData {
        principal: f64,
        annual_rate: f64,
        years: f64,
        compounds_per_year: u32,
    },
    MiningProfitability {
        hash_rate_hs: f64,
        power_watts: f64,
        electricity_cost_per_kwh: f64,
        pool_fee_fraction: f64,
        network: NetworkInfo,
    },
}

impl CalculationRequest {
    pub fn label(&self) -> &'static str {
        match self {
            CalculationRequest::CompoundInterest { .. } => "compound-interest",
            CalculationRequest::ChartData { .. } => "chart-data",
            CalculationRequest::MiningProfitability { .. } => "mining-profitability",
        }
    }

    /// Runs the request synchronously on the current thread.
    pub fn execute(self) -> Result<CalculationResponse, CalcError> {
        match self {
            CalculationRequest::CompoundInterest {
                principal,
                annual_rate,
                years,
                compounds_per_year,
            } => compound_interest(principal, annual_rate, years, compounds_per_year)
                .map(CalculationResponse::CompoundInterest),
            CalculationRequest::ChartData {
                principal,
                annual_rate,
                years,
                compounds_per_year,
            } => compound_interest_series(principal, annual_rate, years, compounds_per_year)
                .map(CalculationResponse::ChartData),
            CalculationRequest::MiningProfitability {
                hash_rate_hs,
                power_watts,
                electricity_cost_per_kwh,
                pool_fee_fraction,
                network,
            } => mining_profitability(
                hash_rate_hs,
                power_watts,
                electricity_cost_per_kwh,
                pool_fee_fraction,
                &network,
            )
            .map(CalculationResponse::MiningProfitability),
        }
    }
}

/// The single reply to a [`CalculationRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum CalculationResponse {
    CompoundInterest(CompoundInterestResult),
    ChartData(Vec<ChartPoint>),
    MiningProfitability(MiningProfitability),
}

struct Job {
    request: CalculationRequest,
    reply: oneshot::Sender<Result<CalculationResponse, CalcError>>,
}

/// Runs calculations off the caller's task. Every request gets exactly one reply;
/// the worker exits once all handles are dropped.
pub struct CalculationWorker;

impl CalculationWorker {
    /// Spawns the worker loop on the current tokio runtime.
    pub fn spawn(queue_capacity: usize) -> (WorkerHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let task = tokio::spawn(run_worker(rx));
        (WorkerHandle { tx }, task)
    }
}

async fn run_worker(mut rx: mpsc::Receiver<Job>) {
    tracing::debug!("Calculation worker started.");

    while let Some(Job { request, reply }) = rx.recv().await {
        let label = request.label();
        let result = tokio::task::spawn_blocking(move || request.execute())
            .await
            .unwrap_or_else(|join_err| Err(CalcError::WorkerFailed(label.to_string(), join_err.to_string())));

        if let Err(e) = &result {
            tracing::warn!(request = label, error = %e, "Calculation rejected.");
        }
        if reply.send(result).is_err() {
            tracing::debug!(request = label, "Caller went away before the result was ready.");
        }
    }

    tracing::debug!("Calculation worker stopped: all handles dropped.");
}

/// A cloneable handle for submitting work to a [`CalculationWorker`].
#[derive(Clone)]
pub struct WorkerHandle {
    tx: mpsc::Sender<Job>,
}

impl WorkerHandle {
    pub async fn submit(&self, request: CalculationRequest) -> Result<CalculationResponse, CalcError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Job { request, reply })
            .await
            .map_err(|_| CalcError::WorkerUnavailable)?;
        response.await.map_err(|_| CalcError::WorkerUnavailable)?
    }

    pub async fn compound_interest(
        &self,
        principal: f64,
        annual_rate: f64,
        years: f64,
        compounds_per_year: u32,
    ) -> Result<CompoundInterestResult, CalcError> {
        let request = CalculationRequest::CompoundInterest {
            principal,
            annual_rate,
            years,
            compounds_per_year,
        };
        match self.submit(request).await? {
            CalculationResponse::CompoundInterest(result) => Ok(result),
            _ => Err(CalcError::UnexpectedResponse("compound-interest".to_string())),
        }
    }

    pub async fn chart_data(
        &self,
        principal: f64,
        annual_rate: f64,
        years: f64,
        compounds_per_year: u32,
    ) -> Result<Vec<ChartPoint>, CalcError> {
        let request = CalculationRequest::ChartData {
            principal,
            annual_rate,
            years,
            compounds_per_year,
        };
        match self.submit(request).await? {
            CalculationResponse::ChartData(points) => Ok(points),
            _ => Err(CalcError::UnexpectedResponse("chart-data".to_string())),
        }
    }

    pub async fn mining_profitability(
        &self,
        hash_rate_hs: f64,
        power_watts: f64,
        electricity_cost_per_kwh: f64,
        pool_fee_fraction: f64,
        network: NetworkInfo,
    ) -> Result<MiningProfitability, CalcError> {
        let request = CalculationRequest::MiningProfitability {
            hash_rate_hs,
            power_watts,
            electricity_cost_per_kwh,
            pool_fee_fraction,
            network,
        };
        match self.submit(request).await? {
            CalculationResponse::MiningProfitability(result) => Ok(result),
            _ => Err(CalcError::UnexpectedResponse("mining-profitability".to_string())),
        }
    }
}
