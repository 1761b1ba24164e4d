use anyhow::{anyhow, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;

use restaurant_pos_api::{
    benchmarks::{
        available_types, benchmark_scorecard, calculate_adjusted_benchmark, display_name,
        regional_notes, restaurant_profile, Adjustments, CityTier, Region, RestaurantMetrics,
        RestaurantType, Season,
    },
    services::analytics::{compare_metrics, CompareRequest},
};

#[derive(Parser)]
#[command(
    name = "pos-cli",
    about = "Offline access to the restaurant benchmark engine",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List restaurant types with their display names
    Types,
    /// Show the benchmark profile of a restaurant type
    Profile {
        restaurant_type: RestaurantType,
        /// Also print the qualitative notes for a region
        #[arg(long)]
        region: Option<Region>,
    },
    /// Score metrics against a restaurant type
    Scorecard(MetricArgs),
    /// Scorecard plus insights and adjusted expectations
    Compare {
        #[command(flatten)]
        metrics: MetricArgs,
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Midpoint of a core benchmark after city tier and seasonal adjustments
    Adjust {
        restaurant_type: RestaurantType,
        /// Benchmark key, e.g. food_cost_percent_range
        metric: String,
        #[command(flatten)]
        context: ContextArgs,
    },
}

#[derive(Args)]
struct MetricArgs {
    restaurant_type: RestaurantType,
    #[arg(long)]
    food_cost: Option<f64>,
    #[arg(long)]
    staff_cost: Option<f64>,
    #[arg(long)]
    marketing: Option<f64>,
    #[arg(long)]
    rent: Option<f64>,
    #[arg(long)]
    electricity: Option<f64>,
    #[arg(long)]
    waste: Option<f64>,
    #[arg(long)]
    delivery_ratio: Option<f64>,
    #[arg(long)]
    dinein_ratio: Option<f64>,
    #[arg(long)]
    avg_ticket: Option<f64>,
    #[arg(long)]
    monthly_revenue: Option<f64>,
    #[arg(long)]
    profit_margin: Option<f64>,
}

impl MetricArgs {
    fn metrics(&self) -> RestaurantMetrics {
        RestaurantMetrics {
            food_cost_percent: self.food_cost,
            staff_cost_percent: self.staff_cost,
            marketing_percent: self.marketing,
            rent_percent: self.rent,
            electricity_percent: self.electricity,
            waste_percent: self.waste,
            delivery_ratio_percent: self.delivery_ratio,
            dinein_ratio_percent: self.dinein_ratio,
            avg_ticket_size: self.avg_ticket,
            monthly_revenue: self.monthly_revenue,
            profit_margin_percent: self.profit_margin,
        }
    }
}

#[derive(Args)]
struct ContextArgs {
    #[arg(long)]
    city_tier: Option<CityTier>,
    #[arg(long)]
    season: Option<Season>,
    #[arg(long)]
    region: Option<Region>,
}

#[derive(Serialize)]
struct TypeRow {
    id: RestaurantType,
    name: &'static str,
}

#[derive(Serialize)]
struct AdjustedBenchmark {
    restaurant_type: RestaurantType,
    metric: String,
    expected: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Types => {
            let rows: Vec<TypeRow> = available_types()
                .into_iter()
                .map(|id| TypeRow {
                    id,
                    name: display_name(id),
                })
                .collect();
            if cli.json {
                print_json(&rows)?;
            } else {
                for row in rows {
                    println!("{:<14} {}", row.id, row.name);
                }
            }
        }
        Commands::Profile {
            restaurant_type,
            region,
        } => {
            let profile = restaurant_profile(restaurant_type);
            if cli.json {
                print_json(profile)?;
            } else {
                println!("{}", display_name(restaurant_type));
                for (key, value) in profile.core_benchmarks.entries() {
                    println!("  {key:<36} {value}");
                }
                if !profile.common_problems.is_empty() {
                    println!("Common problems:");
                    for problem in &profile.common_problems {
                        println!("  - {problem}");
                    }
                }
                if let Some(region) = region {
                    println!("Regional notes ({region}):");
                    for (key, note) in regional_notes(restaurant_type, region) {
                        println!("  {key}: {note}");
                    }
                }
            }
        }
        Commands::Scorecard(args) => {
            let scorecard = benchmark_scorecard(args.restaurant_type, &args.metrics());
            if cli.json {
                print_json(&scorecard)?;
            } else {
                println!("{}", scorecard.display_name);
                for row in &scorecard.rows {
                    println!(
                        "  {:<24} {:>10.2}  {:<12} {:<7} {}",
                        row.label, row.value, row.benchmark, row.comparison.status, row.tone
                    );
                }
            }
        }
        Commands::Compare { metrics, context } => {
            let report = compare_metrics(&CompareRequest {
                restaurant_type: metrics.restaurant_type,
                metrics: metrics.metrics(),
                city_tier: context.city_tier,
                season: context.season,
                region: context.region,
            });
            if cli.json {
                print_json(&report)?;
            } else {
                for insight in &report.insights {
                    println!("{}", insight.comparison.message);
                    if let Some(recommendation) = &insight.recommendation {
                        println!("  -> {recommendation}");
                    }
                }
                for expectation in &report.adjusted {
                    println!(
                        "{:<24} expected {:.2} ({})",
                        expectation.metric, expectation.expected, expectation.benchmark_key
                    );
                }
            }
        }
        Commands::Adjust {
            restaurant_type,
            metric,
            context,
        } => {
            let adjustments = Adjustments {
                city_tier: context.city_tier,
                season: context.season,
                region: context.region,
            };
            let expected = calculate_adjusted_benchmark(restaurant_type, &metric, &adjustments)
                .ok_or_else(|| {
                    anyhow!("{restaurant_type} has no parseable benchmark named {metric}")
                })?;
            if cli.json {
                print_json(&AdjustedBenchmark {
                    restaurant_type,
                    metric,
                    expected,
                })?;
            } else {
                println!("{metric}: {expected:.2}");
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
