use axum::{
    Router,
    extract::{Json, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::{
    DEFAULT_ITERATIONS, DistributionReport, HistogramBin, HistoricalSeries, Inputs,
    MAX_ITERATIONS, MarketPath, PATH_LEN, ReturnSampler, SamplerConfig, Scenario, SimError,
    return_frequency, run_distribution,
};

const MAX_HISTOGRAM_BINS: usize = 1_000;

#[derive(Parser, Debug)]
#[command(
    name = "retire-mc",
    about = "Monte Carlo retirement survival estimator (randomized equity returns, 50/50 rebalanced portfolio)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Repeat the success-rate aggregation per scenario and summarise the spread
    Run {
        #[command(flatten)]
        run: RunArgs,
        #[command(flatten)]
        data: DataArgs,
        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },
    /// Print one sampled return/price path
    Sample {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        json: bool,
    },
    /// Frequency of annual equity returns (historical when available)
    Histogram {
        #[arg(long, default_value_t = 20)]
        bins: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[command(flatten)]
        data: DataArgs,
        #[arg(long)]
        json: bool,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(default_value_t = 8080)]
        port: u16,
        #[command(flatten)]
        data: DataArgs,
    },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CliScenario {
    years: usize,
    withdrawal_rate: f64,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(
        long = "scenario",
        value_parser = parse_scenario,
        help = "Retirement length and initial withdrawal rate in percent, e.g. 30:4 (repeatable; defaults to 30:4 60:4 30:3 60:3)"
    )]
    scenarios: Vec<CliScenario>,
    #[arg(
        long,
        default_value_t = DEFAULT_ITERATIONS,
        help = "Aggregation runs per scenario (at most 10000)"
    )]
    iterations: u32,
    #[arg(
        long,
        default_value_t = 50.0,
        help = "Equity share of the portfolio in percent"
    )]
    equity_allocation: f64,
    #[arg(long, help = "Base seed; drawn from OS entropy when omitted")]
    seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    #[arg(
        long = "data",
        env = "RETIRE_HISTORY_CSV",
        help = "CSV with columns year,dividend,bond_yield,inflation[,equity_return]"
    )]
    data_path: Option<PathBuf>,
    #[arg(
        long,
        default_value_t = 2.5,
        help = "Dividend per share used when no CSV is given"
    )]
    flat_dividend: f64,
    #[arg(
        long,
        default_value_t = 4.5,
        help = "Long bond yield in percent used when no CSV is given"
    )]
    flat_bond_yield: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Annual inflation in percent used when no CSV is given"
    )]
    flat_inflation: f64,
}

fn parse_scenario(raw: &str) -> Result<CliScenario, String> {
    let (years, rate) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected YEARS:RATE_PERCENT, got '{raw}'"))?;
    let years = years
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid years '{years}': {e}"))?;
    let withdrawal_rate = rate
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid withdrawal rate '{rate}': {e}"))?;
    Ok(CliScenario {
        years,
        withdrawal_rate,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DistributionPayload {
    scenarios: Option<Vec<ApiScenario>>,
    years: Option<usize>,
    withdrawal_rate: Option<f64>,
    iterations: Option<u32>,
    equity_allocation: Option<f64>,
    seed: Option<u64>,
}

/// Query-string form of `DistributionPayload`; a scenario list needs POST.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DistributionQuery {
    years: Option<usize>,
    withdrawal_rate: Option<f64>,
    iterations: Option<u32>,
    equity_allocation: Option<f64>,
    seed: Option<u64>,
}

impl From<DistributionQuery> for DistributionPayload {
    fn from(query: DistributionQuery) -> Self {
        Self {
            scenarios: None,
            years: query.years,
            withdrawal_rate: query.withdrawal_rate,
            iterations: query.iterations,
            equity_allocation: query.equity_allocation,
            seed: query.seed,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiScenario {
    years: usize,
    withdrawal_rate: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SamplePathQuery {
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HistogramQuery {
    bins: Option<usize>,
    seed: Option<u64>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
enum HistogramSource {
    Historical,
    Sampled,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistogramResponse {
    source: HistogramSource,
    bins: Vec<HistogramBin>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Clone)]
struct AppState {
    history: Arc<HistoricalSeries>,
}

fn build_inputs(run: RunArgs) -> Result<Inputs, String> {
    if run.iterations == 0 || run.iterations > MAX_ITERATIONS {
        return Err(format!("--iterations must be between 1 and {MAX_ITERATIONS}"));
    }

    if !(0.0..=100.0).contains(&run.equity_allocation) {
        return Err("--equity-allocation must be between 0 and 100".to_string());
    }

    let scenarios = if run.scenarios.is_empty() {
        Scenario::defaults()
    } else {
        let mut scenarios = Vec::with_capacity(run.scenarios.len());
        for scenario in &run.scenarios {
            if scenario.years == 0 || scenario.years >= PATH_LEN {
                return Err(format!(
                    "--scenario years must be between 1 and {}, got {}",
                    PATH_LEN - 1,
                    scenario.years
                ));
            }
            if !(0.0..=100.0).contains(&scenario.withdrawal_rate) {
                return Err(format!(
                    "--scenario withdrawal rate must be between 0 and 100 percent, got {}",
                    scenario.withdrawal_rate
                ));
            }
            scenarios.push(Scenario {
                years: scenario.years,
                withdrawal_rate: scenario.withdrawal_rate / 100.0,
            });
        }
        scenarios
    };

    Ok(Inputs {
        scenarios,
        iterations: run.iterations,
        pct_equity: run.equity_allocation / 100.0,
        seed: run.seed.unwrap_or_else(rand::random),
        sampler: SamplerConfig::default(),
    })
}

fn load_history(data: &DataArgs) -> crate::core::Result<HistoricalSeries> {
    match &data.data_path {
        Some(path) => HistoricalSeries::from_csv_path(path),
        None => {
            log::info!(
                "no historical CSV given; using flat dividend {}, bond yield {}%, inflation {}%",
                data.flat_dividend,
                data.flat_bond_yield,
                data.flat_inflation
            );
            HistoricalSeries::flat(
                PATH_LEN,
                data.flat_dividend,
                data.flat_bond_yield,
                data.flat_inflation / 100.0,
            )
        }
    }
}

/// The server runs every scenario against one series, so it must cover the
/// longest window the aggregator can request.
fn ensure_serving_history(history: &HistoricalSeries) -> crate::core::Result<()> {
    history.ensure_covers(PATH_LEN - 1)
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn sample_path(seed: Option<u64>) -> crate::core::Result<MarketPath> {
    let sampler = ReturnSampler::new(&SamplerConfig::default())?;
    Ok(sampler.sample(&mut seeded_rng(seed)))
}

fn build_histogram(
    history: &HistoricalSeries,
    bins: usize,
    seed: Option<u64>,
) -> Result<HistogramResponse, String> {
    if bins == 0 || bins > MAX_HISTOGRAM_BINS {
        return Err(format!("--bins must be between 1 and {MAX_HISTOGRAM_BINS}"));
    }
    let sampler = ReturnSampler::new(&SamplerConfig::default()).map_err(|e| e.to_string())?;
    let (bins, historical) = return_frequency(history, &sampler, bins, &mut seeded_rng(seed));
    Ok(HistogramResponse {
        source: if historical {
            HistogramSource::Historical
        } else {
            HistogramSource::Sampled
        },
        bins,
    })
}

pub async fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Run { run, data, json } => {
            let inputs = build_inputs(run).map_err(anyhow::Error::msg)?;
            let history = load_history(&data)?;
            let report = run_distribution(&inputs, &history)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Command::Sample { seed, json } => {
            let path = sample_path(seed)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&path)?);
            } else {
                println!("{:>5} {:>9} {:>16}", "year", "return", "price");
                for (year, (ret, price)) in path.returns.iter().zip(&path.prices).enumerate() {
                    println!("{year:>5} {ret:>9.4} {price:>16.2}");
                }
            }
        }
        Command::Histogram {
            bins,
            seed,
            data,
            json,
        } => {
            let history = load_history(&data)?;
            let response = build_histogram(&history, bins, seed).map_err(anyhow::Error::msg)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("Frequency of annual returns ({:?})", response.source);
                for bin in &response.bins {
                    println!(
                        "[{:>7.4}, {:>7.4}] {:>4} {}",
                        bin.lower,
                        bin.upper,
                        bin.count,
                        "#".repeat(bin.count)
                    );
                }
            }
        }
        Command::Serve { port, data } => {
            let history = load_history(&data)?;
            ensure_serving_history(&history)?;
            run_http_server(port, history).await?;
        }
    }
    Ok(())
}

fn print_report(report: &DistributionReport) {
    println!(
        "Probability of portfolio success from randomized returns ({} iterations, {:.0}% equity, seed {})",
        report.iterations,
        report.pct_equity * 100.0,
        report.seed
    );
    println!(
        "{:>6} {:>6} {:>7} {:>6} {:>7} {:>6} {:>6} {:>6} {:>6} {:>6}",
        "years", "wr%", "trials", "mean", "stddev", "min", "p10", "median", "p90", "max"
    );
    for s in &report.scenarios {
        println!(
            "{:>6} {:>6.2} {:>7} {:>6.2} {:>7.4} {:>6.3} {:>6.3} {:>6.3} {:>6.3} {:>6.3}",
            s.years,
            s.withdrawal_rate * 100.0,
            s.trials_per_iteration,
            s.rounded_mean,
            s.std_dev,
            s.min,
            s.p10,
            s.median,
            s.p90,
            s.max
        );
    }
}

pub async fn run_http_server(port: u16, history: HistoricalSeries) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let state = AppState {
        history: Arc::new(history),
    };
    let app = Router::new()
        .route(
            "/api/distribution",
            get(distribution_get_handler).post(distribution_post_handler),
        )
        .route("/api/sample-path", get(sample_path_handler))
        .route("/api/return-histogram", get(histogram_handler))
        .fallback(not_found_handler)
        .with_state(state);

    let listener = TcpListener::bind(addr).await?;
    log::info!("retirement simulation API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/distribution");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn distribution_get_handler(
    State(state): State<AppState>,
    Query(query): Query<DistributionQuery>,
) -> Response {
    distribution_handler_impl(&state, query.into())
}

async fn distribution_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<DistributionPayload>,
) -> Response {
    distribution_handler_impl(&state, payload)
}

fn distribution_handler_impl(state: &AppState, payload: DistributionPayload) -> Response {
    let inputs = match api_request_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    match run_distribution(&inputs, &state.history) {
        Ok(report) => json_response(StatusCode::OK, report),
        Err(e) => error_response(status_for(&e), &e.to_string()),
    }
}

fn status_for(err: &SimError) -> StatusCode {
    match err {
        SimError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn sample_path_handler(Query(query): Query<SamplePathQuery>) -> Response {
    match sample_path(query.seed) {
        Ok(path) => json_response(StatusCode::OK, path),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

async fn histogram_handler(
    State(state): State<AppState>,
    Query(query): Query<HistogramQuery>,
) -> Response {
    match build_histogram(&state.history, query.bins.unwrap_or(20), query.seed) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<Inputs, String> {
    let payload = serde_json::from_str::<DistributionPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: DistributionPayload) -> Result<Inputs, String> {
    let mut run = default_run_args_for_api();

    if let Some(scenarios) = payload.scenarios {
        run.scenarios = scenarios
            .into_iter()
            .map(|s| CliScenario {
                years: s.years,
                withdrawal_rate: s.withdrawal_rate,
            })
            .collect();
    }
    match (payload.years, payload.withdrawal_rate) {
        (Some(years), Some(withdrawal_rate)) => run.scenarios.push(CliScenario {
            years,
            withdrawal_rate,
        }),
        (None, None) => {}
        _ => return Err("years and withdrawalRate must be given together".to_string()),
    }
    if let Some(v) = payload.iterations {
        run.iterations = v;
    }
    if let Some(v) = payload.equity_allocation {
        run.equity_allocation = v;
    }
    if let Some(v) = payload.seed {
        run.seed = Some(v);
    }

    build_inputs(run)
}

fn default_run_args_for_api() -> RunArgs {
    RunArgs {
        scenarios: Vec::new(),
        iterations: DEFAULT_ITERATIONS,
        equity_allocation: 50.0,
        seed: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_run_args() -> RunArgs {
        let mut run = default_run_args_for_api();
        run.seed = Some(7);
        run
    }

    fn flat_data_args() -> DataArgs {
        DataArgs {
            data_path: None,
            flat_dividend: 2.5,
            flat_bond_yield: 4.5,
            flat_inflation: 3.0,
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_parses_repeated_scenarios() {
        let cli = Cli::try_parse_from([
            "retire-mc",
            "run",
            "--scenario",
            "30:4",
            "--scenario",
            "45:3.5",
            "--iterations",
            "10",
            "--seed",
            "3",
        ])
        .expect("valid args");

        let Command::Run { run, .. } = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(run.iterations, 10);
        assert_eq!(run.seed, Some(3));
        assert_eq!(
            run.scenarios,
            vec![
                CliScenario {
                    years: 30,
                    withdrawal_rate: 4.0
                },
                CliScenario {
                    years: 45,
                    withdrawal_rate: 3.5
                },
            ]
        );
    }

    #[test]
    fn parse_scenario_rejects_malformed_values() {
        assert!(parse_scenario("30").is_err());
        assert!(parse_scenario("x:4").is_err());
        assert!(parse_scenario("30:four").is_err());
        assert_eq!(
            parse_scenario(" 60 : 3 ").expect("valid"),
            CliScenario {
                years: 60,
                withdrawal_rate: 3.0
            }
        );
    }

    #[test]
    fn build_inputs_defaults_to_original_scenarios() {
        let inputs = build_inputs(sample_run_args()).expect("valid inputs");
        assert_eq!(inputs.scenarios, Scenario::defaults());
        assert_eq!(inputs.iterations, 100);
        assert_approx(inputs.pct_equity, 0.5);
        assert_eq!(inputs.seed, 7);
    }

    #[test]
    fn build_inputs_converts_percentages() {
        let mut run = sample_run_args();
        run.scenarios = vec![CliScenario {
            years: 40,
            withdrawal_rate: 4.5,
        }];
        run.equity_allocation = 60.0;

        let inputs = build_inputs(run).expect("valid inputs");
        assert_eq!(inputs.scenarios.len(), 1);
        assert_eq!(inputs.scenarios[0].years, 40);
        assert_approx(inputs.scenarios[0].withdrawal_rate, 0.045);
        assert_approx(inputs.pct_equity, 0.6);
    }

    #[test]
    fn build_inputs_rejects_zero_iterations() {
        let mut run = sample_run_args();
        run.iterations = 0;
        let err = build_inputs(run).expect_err("must reject zero iterations");
        assert!(err.contains("--iterations"));
    }

    #[test]
    fn api_request_rejects_oversized_iterations() {
        for json in [
            r#"{ "iterations": 4294967295, "seed": 1 }"#,
            r#"{ "iterations": 10001, "seed": 1 }"#,
        ] {
            let err = api_request_from_json(json).expect_err("must reject huge iteration counts");
            assert!(err.contains("--iterations must be between 1 and 10000"));
        }

        let inputs = api_request_from_json(r#"{ "iterations": 10000, "seed": 1 }"#)
            .expect("upper bound is accepted");
        assert_eq!(inputs.iterations, MAX_ITERATIONS);
    }

    #[test]
    fn serving_history_must_cover_longest_window() {
        let short = HistoricalSeries::flat(100, 2.5, 4.5, 0.03).expect("valid history");
        let err = ensure_serving_history(&short).expect_err("short history must be refused");
        assert!(matches!(
            err,
            SimError::InsufficientHistory {
                required: 141,
                available: 100
            }
        ));
        assert_eq!(status_for(&err), StatusCode::INTERNAL_SERVER_ERROR);

        let history = load_history(&flat_data_args()).expect("flat history");
        assert!(ensure_serving_history(&history).is_ok());
        assert_eq!(
            status_for(&SimError::invalid_parameter("bad")),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn distribution_query_string_maps_single_scenario() {
        let uri: axum::http::Uri = "/api/distribution?years=30&withdrawalRate=4&iterations=3&seed=5"
            .parse()
            .expect("valid uri");
        let Query(query) = Query::<DistributionQuery>::try_from_uri(&uri).expect("query parses");
        let inputs = api_request_from_payload(query.into()).expect("valid inputs");

        assert_eq!(inputs.scenarios.len(), 1);
        assert_eq!(inputs.scenarios[0].years, 30);
        assert_approx(inputs.scenarios[0].withdrawal_rate, 0.04);
        assert_eq!(inputs.iterations, 3);
        assert_eq!(inputs.seed, 5);
    }

    #[test]
    fn build_inputs_rejects_invalid_equity_allocation() {
        let mut run = sample_run_args();
        run.equity_allocation = 120.0;
        let err = build_inputs(run).expect_err("must reject allocation above 100");
        assert!(err.contains("--equity-allocation"));
    }

    #[test]
    fn build_inputs_rejects_out_of_range_scenarios() {
        for scenario in [
            CliScenario {
                years: 0,
                withdrawal_rate: 4.0,
            },
            CliScenario {
                years: PATH_LEN,
                withdrawal_rate: 4.0,
            },
            CliScenario {
                years: 30,
                withdrawal_rate: -1.0,
            },
        ] {
            let mut run = sample_run_args();
            run.scenarios = vec![scenario];
            let err = build_inputs(run).expect_err("must reject scenario");
            assert!(err.contains("--scenario"));
        }
    }

    #[test]
    fn load_history_flat_fallback_converts_inflation_percent() {
        let history = load_history(&flat_data_args()).expect("flat history");
        assert_eq!(history.len(), PATH_LEN);
        assert_approx(history.inflation(0), 0.03);
        assert_approx(history.bond_yield(10), 4.5);
        assert_approx(history.dividend(141), 2.5);
    }

    #[test]
    fn api_request_from_json_parses_web_keys() {
        let json = r#"{
          "scenarios": [
            { "years": 30, "withdrawalRate": 4 },
            { "years": 60, "withdrawalRate": 3.25 }
          ],
          "iterations": 12,
          "equityAllocation": 70,
          "seed": 99
        }"#;
        let inputs = api_request_from_json(json).expect("json should parse");

        assert_eq!(inputs.scenarios.len(), 2);
        assert_eq!(inputs.scenarios[1].years, 60);
        assert_approx(inputs.scenarios[1].withdrawal_rate, 0.0325);
        assert_eq!(inputs.iterations, 12);
        assert_approx(inputs.pct_equity, 0.7);
        assert_eq!(inputs.seed, 99);
    }

    #[test]
    fn api_request_single_scenario_shortcut() {
        let inputs = api_request_from_json(r#"{ "years": 25, "withdrawalRate": 5 }"#)
            .expect("json should parse");
        assert_eq!(inputs.scenarios.len(), 1);
        assert_eq!(inputs.scenarios[0].years, 25);
        assert_approx(inputs.scenarios[0].withdrawal_rate, 0.05);

        let err = api_request_from_json(r#"{ "years": 25 }"#).expect_err("rate is required");
        assert!(err.contains("withdrawalRate"));
    }

    #[test]
    fn distribution_response_serialization_contains_expected_fields() {
        let mut run = sample_run_args();
        run.iterations = 2;
        run.scenarios = vec![CliScenario {
            years: 130,
            withdrawal_rate: 4.0,
        }];
        let inputs = build_inputs(run).expect("valid inputs");
        let history = load_history(&flat_data_args()).expect("flat history");
        let report = run_distribution(&inputs, &history).expect("valid run");

        let json = serde_json::to_string(&report).expect("report should serialize");
        assert!(json.contains("\"seed\":7"));
        assert!(json.contains("\"pctEquity\""));
        assert!(json.contains("\"successRates\""));
        assert!(json.contains("\"roundedMean\""));
        assert!(json.contains("\"trialsPerIteration\":12"));
        assert!(json.contains("\"withdrawalRate\""));
    }

    #[test]
    fn histogram_falls_back_to_sampled_returns() {
        let history = load_history(&flat_data_args()).expect("flat history");
        let response = build_histogram(&history, 10, Some(1)).expect("valid bins");
        assert_eq!(response.source, HistogramSource::Sampled);
        assert_eq!(
            response.bins.iter().map(|b| b.count).sum::<usize>(),
            PATH_LEN
        );

        let json = serde_json::to_string(&response).expect("serialize");
        assert!(json.contains("\"source\":\"sampled\""));
        assert!(build_histogram(&history, 0, None).is_err());
    }

    #[test]
    fn sample_path_is_seed_stable() {
        let a = sample_path(Some(11)).expect("path");
        let b = sample_path(Some(11)).expect("path");
        assert_eq!(a, b);
        assert_eq!(a.prices.len(), PATH_LEN);
    }
}
