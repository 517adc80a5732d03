use chrono::{Duration, Utc};
use core_types::{
    BreakEven, CalculationKind, CalculationRecord, Currency, HashRateUnit, InvestmentRecord,
    MiningProfitability, MiningRecord, PeriodBreakdown, SavedCalculation, ValuePair,
};
use database::{
    DbRepository, InvestmentSettings, MiningSettings, PreferenceKey, RECENT_CALCULATIONS_LIMIT,
    connect_in_memory, run_migrations,
};
use reports::{DateRange, ReportFilters};

async fn repository() -> DbRepository {
    let pool = connect_in_memory().await.unwrap();
    run_migrations(&pool).await.unwrap();
    DbRepository::new(pool)
}

fn investment(principal: f64) -> CalculationRecord {
    CalculationRecord::Investment(InvestmentRecord {
        coin: "bitcoin".to_string(),
        coin_name: "Bitcoin".to_string(),
        currency: Currency::Usd,
        initial_investment: principal,
        interest_rate: 0.05,
        years: 5.0,
        compound_frequency: 12,
        final_amount: principal * 1.2834,
        interest_earned: principal * 0.2834,
        total_return_pct: 28.34,
    })
}

fn unprofitable_mining() -> CalculationRecord {
    let pair = ValuePair { btc: 0.0002, usd: 12.0 };
    let loss = ValuePair { btc: -0.0001, usd: -6.0 };
    CalculationRecord::Mining(MiningRecord {
        hash_rate: 100.0,
        hash_rate_unit: HashRateUnit::THs,
        power_watts: 6000.0,
        electricity_cost_per_kwh: 0.12,
        pool_fee: 0.01,
        profitability: MiningProfitability {
            rewards: PeriodBreakdown { daily: pair, monthly: pair, yearly: pair },
            costs: PeriodBreakdown { daily: 18.0, monthly: 548.0, yearly: 6575.0 },
            profits: PeriodBreakdown { daily: loss, monthly: loss, yearly: loss },
            break_even: BreakEven { days: f64::INFINITY },
        },
    })
}

#[tokio::test]
async fn typed_preferences_fall_back_to_defaults() {
    let repo = repository().await;

    assert_eq!(repo.load_currency().await.unwrap(), Currency::Usd);
    assert_eq!(repo.load_investment_settings().await.unwrap(), InvestmentSettings::default());
    assert_eq!(repo.load_mining_settings().await.unwrap(), MiningSettings::default());

    let filters = repo.load_report_filters().await.unwrap();
    assert_eq!(filters.date_range, DateRange::Month);
    assert_eq!(filters.min_profit, 0.0);
    assert_eq!(filters.max_profit, None);
}

#[tokio::test]
async fn preferences_are_upserted() {
    let repo = repository().await;

    repo.save_currency(Currency::Eur).await.unwrap();
    repo.save_currency(Currency::Gbp).await.unwrap();
    assert_eq!(repo.load_currency().await.unwrap(), Currency::Gbp);

    let settings = MiningSettings { power_watts: 1200.0, display_currency: Currency::Btc, ..Default::default() };
    repo.save_mining_settings(&settings).await.unwrap();
    assert_eq!(repo.load_mining_settings().await.unwrap(), settings);

    let filters = ReportFilters { date_range: DateRange::Year, max_profit: Some(500.0), ..Default::default() };
    repo.save_report_filters(&filters).await.unwrap();
    assert_eq!(repo.load_report_filters().await.unwrap(), filters);
}

#[tokio::test]
async fn unreadable_preference_is_treated_as_unset() {
    let repo = repository().await;

    repo.save_preference(PreferenceKey::Currency, &"doubloons").await.unwrap();
    assert_eq!(repo.load_preference::<Currency>(PreferenceKey::Currency).await.unwrap(), None);
    assert_eq!(repo.load_currency().await.unwrap(), Currency::Usd);
}

#[tokio::test]
async fn remove_preference_reports_whether_anything_was_stored() {
    let repo = repository().await;

    assert!(!repo.remove_preference(PreferenceKey::InvestmentSettings).await.unwrap());
    repo.save_investment_settings(&InvestmentSettings::default()).await.unwrap();
    assert!(repo.remove_preference(PreferenceKey::InvestmentSettings).await.unwrap());
    assert!(repo.load_preference::<InvestmentSettings>(PreferenceKey::InvestmentSettings).await.unwrap().is_none());
}

#[tokio::test]
async fn history_keeps_the_newest_entries_newest_first() {
    let repo = repository().await;

    for i in 0..12 {
        repo.save_recent_calculation(investment(100.0 * (i + 1) as f64)).await.unwrap();
    }

    let history = repo.load_recent_calculations().await.unwrap();
    assert_eq!(history.len(), RECENT_CALCULATIONS_LIMIT as usize);

    let principals: Vec<f64> = history
        .iter()
        .map(|saved| match &saved.record {
            CalculationRecord::Investment(record) => record.initial_investment,
            CalculationRecord::Mining(_) => unreachable!(),
        })
        .collect();
    assert_eq!(principals.first(), Some(&1200.0));
    assert_eq!(principals.last(), Some(&300.0));
}

#[tokio::test]
async fn history_round_trips_unreachable_break_even() {
    let repo = repository().await;

    let saved = repo.save_recent_calculation(unprofitable_mining()).await.unwrap();
    let history = repo.load_recent_calculations().await.unwrap();

    assert_eq!(history, vec![saved.clone()]);
    assert_eq!(history[0].kind(), CalculationKind::Mining);
    match &history[0].record {
        CalculationRecord::Mining(record) => assert!(!record.profitability.break_even.is_reachable()),
        CalculationRecord::Investment(_) => panic!("expected a mining record"),
    }
}

#[tokio::test]
async fn explicit_timestamps_are_preserved() {
    let repo = repository().await;

    let earlier = SavedCalculation::new(investment(1.0), Utc::now() - Duration::days(40));
    repo.save_calculation(&earlier).await.unwrap();

    let history = repo.load_recent_calculations().await.unwrap();
    assert_eq!(history[0].timestamp, earlier.timestamp);
    assert_eq!(history[0].id, earlier.id);
}

#[tokio::test]
async fn clear_all_wipes_preferences_and_history() {
    let repo = repository().await;

    repo.save_currency(Currency::Jpy).await.unwrap();
    repo.save_recent_calculation(investment(500.0)).await.unwrap();

    repo.clear_all().await.unwrap();

    assert_eq!(repo.load_currency().await.unwrap(), Currency::Usd);
    assert!(repo.load_recent_calculations().await.unwrap().is_empty());
}
