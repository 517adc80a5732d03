use anyhow::{Context, Result, bail};
use api_client::{CoinGeckoClient, MarketDataClient};
use calculator::{CalculationWorker, WorkerHandle, convert_hash_rate_str, total_return_pct};
use chrono::{NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand};
use configuration::Config;
use core_types::{CalculationRecord, Currency, HashRateUnit, InvestmentRecord, MiningRecord, NetworkInfo};
use database::{DbRepository, InvestmentSettings, MiningSettings, connect, run_migrations};
use reports::{DateRange, ReportRow, ReportType, build_report};

mod display;

/// Size of the calculation worker's request queue.
const WORKER_QUEUE_CAPACITY: usize = 32;

/// The main entry point for the crypto calculator.
#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; overrides can also come from the real environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => configuration::load_config_from(path),
        None => configuration::load_config(),
    }
    .context("Failed to load configuration")?;
    let _log_guard = configuration::init_tracing(&config.logging).context("Failed to initialise logging")?;

    let (worker, worker_task) = CalculationWorker::spawn(WORKER_QUEUE_CAPACITY);

    let outcome = match cli.command {
        Commands::Invest(args) => handle_invest(args, &config, &worker).await,
        Commands::Mine(args) => handle_mine(args, &config, &worker).await,
        Commands::Convert(args) => handle_convert(args),
        Commands::Network => handle_network(&config).await,
        Commands::Price(args) => handle_price(args, &config).await,
        Commands::History => handle_history(&config).await,
        Commands::Report(args) => handle_report(args, &config).await,
        Commands::Prefs(command) => handle_prefs(command, &config).await,
    };

    // Dropping the last handle lets the worker drain and exit.
    drop(worker);
    if let Err(e) = worker_task.await {
        tracing::error!(error = ?e, "Calculation worker panicked.");
    }

    outcome
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Investment and Bitcoin mining profitability calculators.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Read settings from this TOML file instead of ./config.toml.
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project the growth of an investment with compound interest.
    Invest(InvestArgs),
    /// Estimate Bitcoin mining rewards, costs and profit.
    Mine(MineArgs),
    /// Convert a hash rate between units.
    Convert(ConvertArgs),
    /// Show the current Bitcoin network snapshot.
    Network,
    /// Show the spot price of a coin.
    Price(PriceArgs),
    /// List the recently saved calculations.
    History,
    /// Filter and summarize the saved calculations.
    Report(ReportArgs),
    /// Show or change stored preferences.
    #[command(subcommand)]
    Prefs(PrefsCommand),
}

#[derive(Args)]
struct InvestArgs {
    /// Amount invested at the start.
    #[arg(long)]
    principal: f64,

    /// Annual interest rate as a fraction (0.05 = 5%).
    #[arg(long)]
    rate: f64,

    /// Length of the investment in years; fractions are allowed.
    #[arg(long)]
    years: f64,

    /// Compounding periods per year.
    #[arg(long, default_value_t = calculator::DEFAULT_COMPOUNDS_PER_YEAR)]
    frequency: u32,

    /// Display currency. Defaults to the stored preference.
    #[arg(long)]
    currency: Option<Currency>,

    /// The coin being invested in (a CoinGecko id).
    #[arg(long, default_value = "bitcoin")]
    coin: String,

    /// Save the projection to the history and remember these inputs.
    #[arg(long)]
    save: bool,

    /// Print the year-by-year growth curve.
    #[arg(long)]
    chart: bool,
}

#[derive(Args)]
struct MineArgs {
    /// Hash rate of the hardware, in `--unit`.
    #[arg(long)]
    hash_rate: f64,

    #[arg(long, default_value = "TH/s")]
    unit: HashRateUnit,

    /// Power draw in watts.
    #[arg(long)]
    power: f64,

    /// Electricity price in USD per kWh.
    #[arg(long)]
    electricity_cost: f64,

    /// Pool fee as a fraction (0.01 = 1%).
    #[arg(long, default_value_t = 0.01)]
    pool_fee: f64,

    /// Show rewards and profit in `usd` or `btc`.
    #[arg(long, default_value = "usd")]
    display: Currency,

    /// Use this BTC price instead of fetching one; network figures come from configuration.
    #[arg(long)]
    btc_price: Option<f64>,

    /// Save the estimate to the history and remember these inputs.
    #[arg(long)]
    save: bool,
}

#[derive(Args)]
struct ConvertArgs {
    value: f64,
    /// Source unit, e.g. `TH/s`.
    from: String,
    /// Target unit, e.g. `GH/s`.
    to: String,
}

#[derive(Args)]
struct PriceArgs {
    /// A CoinGecko coin id, e.g. `bitcoin`.
    coin: String,

    #[arg(long)]
    currency: Option<Currency>,
}

#[derive(Args)]
struct ReportArgs {
    /// day, week, month, quarter, year or all. Ignored when --from or --to is given.
    #[arg(long)]
    range: Option<DateRange>,

    /// Start of a custom range (YYYY-MM-DD, inclusive).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End of a custom range (YYYY-MM-DD, inclusive).
    #[arg(long)]
    to: Option<NaiveDate>,

    /// all, investment or mining.
    #[arg(long = "type")]
    report_type: Option<ReportType>,

    #[arg(long)]
    currency: Option<Currency>,

    /// Only investments in this coin.
    #[arg(long)]
    coin: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    min_profit: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    max_profit: Option<f64>,

    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Forget the stored filters and start from the defaults.
    #[arg(long)]
    reset: bool,
}

#[derive(Subcommand)]
enum PrefsCommand {
    /// Print every stored preference.
    Show,
    /// Set the default display currency.
    SetCurrency { currency: Currency },
    /// Delete all preferences and the calculation history.
    Clear,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn open_repository(config: &Config) -> Result<DbRepository> {
    let pool = connect(&config.database)
        .await
        .context("Failed to connect to the database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    Ok(DbRepository::new(pool))
}

fn market_client(config: &Config) -> Result<CoinGeckoClient> {
    CoinGeckoClient::new(&config.api, &config.network).context("Failed to build the market data client")
}

async fn handle_invest(args: InvestArgs, config: &Config, worker: &WorkerHandle) -> Result<()> {
    let repo = open_repository(config).await?;
    let currency = match args.currency {
        Some(currency) => currency,
        None => repo.load_currency().await?,
    };

    let result = worker
        .compound_interest(args.principal, args.rate, args.years, args.frequency)
        .await?;
    let total_return = total_return_pct(&result);

    println!("{}", display::investment_table(&result, currency, total_return)?);

    if args.chart {
        let points = worker
            .chart_data(args.principal, args.rate, args.years, args.frequency)
            .await?;
        println!("{}", display::growth_table(&points, currency)?);
    }

    if args.save {
        let record = InvestmentRecord {
            coin_name: capitalize(&args.coin),
            coin: args.coin.clone(),
            currency,
            initial_investment: args.principal,
            interest_rate: args.rate,
            years: args.years,
            compound_frequency: args.frequency,
            final_amount: result.final_amount,
            interest_earned: result.interest_earned,
            total_return_pct: total_return.unwrap_or(0.0),
        };
        let saved = repo.save_recent_calculation(CalculationRecord::Investment(record)).await?;
        repo.save_investment_settings(&InvestmentSettings {
            initial_investment: args.principal,
            interest_rate: args.rate,
            years: args.years,
            compound_frequency: args.frequency,
            currency,
            coin: args.coin,
        })
        .await?;
        println!("Saved calculation {}.", saved.id);
    }
    Ok(())
}

async fn handle_mine(args: MineArgs, config: &Config, worker: &WorkerHandle) -> Result<()> {
    if !matches!(args.display, Currency::Usd | Currency::Btc) {
        bail!("--display must be usd or btc");
    }

    let network = match args.btc_price {
        Some(price) => NetworkInfo::new(
            price,
            config.network.hashrate_ths,
            config.network.block_reward,
            config.network.block_time_secs,
        ),
        None => fetch_network_info(config).await?,
    };

    let hash_rate_hs = args.hash_rate * args.unit.multiplier();
    let result = worker
        .mining_profitability(hash_rate_hs, args.power, args.electricity_cost, args.pool_fee, network)
        .await?;

    println!("{}", display::mining_table(&result, args.display)?);
    println!("Break-even: {}", display::break_even_label(&result));

    if args.save {
        let repo = open_repository(config).await?;
        let record = MiningRecord {
            hash_rate: args.hash_rate,
            hash_rate_unit: args.unit,
            power_watts: args.power,
            electricity_cost_per_kwh: args.electricity_cost,
            pool_fee: args.pool_fee,
            profitability: result,
        };
        let saved = repo.save_recent_calculation(CalculationRecord::Mining(record)).await?;
        repo.save_mining_settings(&MiningSettings {
            hash_rate: args.hash_rate,
            hash_rate_unit: args.unit,
            power_watts: args.power,
            electricity_cost_per_kwh: args.electricity_cost,
            pool_fee: args.pool_fee,
            display_currency: args.display,
        })
        .await?;
        println!("Saved calculation {}.", saved.id);
    }
    Ok(())
}

fn handle_convert(args: ConvertArgs) -> Result<()> {
    let converted = convert_hash_rate_str(args.value, &args.from, &args.to)?;
    println!("{} {} = {} {}", args.value, args.from, converted, args.to);
    Ok(())
}

async fn fetch_network_info(config: &Config) -> Result<NetworkInfo> {
    let client = market_client(config)?;
    let spinner = display::spinner("Fetching Bitcoin network data...")?;
    let info = client.bitcoin_network_info().await;
    spinner.finish_and_clear();
    info.context("Failed to fetch Bitcoin network data")
}

async fn handle_network(config: &Config) -> Result<()> {
    let info = fetch_network_info(config).await?;
    println!("{}", display::network_table(&info)?);
    Ok(())
}

async fn handle_price(args: PriceArgs, config: &Config) -> Result<()> {
    let currency = match args.currency {
        Some(currency) => currency,
        None => open_repository(config).await?.load_currency().await?,
    };

    let client = market_client(config)?;
    let spinner = display::spinner(&format!("Fetching {} price...", args.coin))?;
    let price = client.coin_price(&args.coin, currency).await;
    spinner.finish_and_clear();

    let price = price.with_context(|| format!("Failed to fetch the price of {}", args.coin))?;
    let decimals = if currency == Currency::Btc { calculator::BTC_DECIMALS } else { calculator::DEFAULT_DECIMALS };
    println!("{}: {}", args.coin, calculator::format_currency(price, currency, decimals)?);
    Ok(())
}

async fn handle_history(config: &Config) -> Result<()> {
    let repo = open_repository(config).await?;
    let history = repo.load_recent_calculations().await?;
    if history.is_empty() {
        println!("No saved calculations yet. Use --save with invest or mine.");
        return Ok(());
    }

    let rows = history.iter().map(ReportRow::from_saved).collect::<Result<Vec<_>, _>>()?;
    println!("{}", display::rows_table(&rows));
    Ok(())
}

async fn handle_report(args: ReportArgs, config: &Config) -> Result<()> {
    let repo = open_repository(config).await?;
    let mut filters = if args.reset { Default::default() } else { repo.load_report_filters().await? };

    if args.from.is_some() || args.to.is_some() {
        filters.date_range = DateRange::Custom {
            start: args.from.map(|date| date.and_time(NaiveTime::MIN).and_utc()),
            end: args
                .to
                .and_then(|date| date.and_hms_opt(23, 59, 59))
                .map(|end| end.and_utc()),
        };
    } else if let Some(range) = args.range {
        filters.date_range = range;
    }
    if let Some(report_type) = args.report_type {
        filters.report_type = report_type;
    }
    if args.currency.is_some() {
        filters.currency = args.currency;
    }
    if args.coin.is_some() {
        filters.cryptocurrency = args.coin;
    }
    if let Some(min) = args.min_profit {
        filters.min_profit = min;
    }
    if args.max_profit.is_some() {
        filters.max_profit = args.max_profit;
    }

    let history = repo.load_recent_calculations().await?;
    let report = build_report(&history, &filters, args.page, Utc::now())?;
    repo.save_report_filters(&filters).await?;

    println!("{}", display::summary_table(&report));
    if report.page.items.is_empty() {
        println!("No calculations match these filters on page {}.", args.page);
    } else {
        println!("{}", display::rows_table(&report.page.items));
        println!("Page {} of {}", report.page.page, report.page.total_pages);
    }
    Ok(())
}

async fn handle_prefs(command: PrefsCommand, config: &Config) -> Result<()> {
    let repo = open_repository(config).await?;
    match command {
        PrefsCommand::Show => {
            println!("currency: {}", repo.load_currency().await?);
            println!("investment: {:?}", repo.load_investment_settings().await?);
            println!("mining: {:?}", repo.load_mining_settings().await?);
            println!("report filters: {:?}", repo.load_report_filters().await?);
        }
        PrefsCommand::SetCurrency { currency } => {
            repo.save_currency(currency).await?;
            println!("Default currency set to {}.", currency);
        }
        PrefsCommand::Clear => {
            repo.clear_all().await?;
            println!("Preferences and history cleared.");
        }
    }
    Ok(())
}

fn capitalize(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
