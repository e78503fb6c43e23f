use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use happilens::indicators::ALL_COUNTRIES;
use happilens::mock;
use happilens::stats;
use happilens::{
    Config, Country, CountryState, HappinessProvider, HappinessState, IndicatorObservation,
    IndicatorProvider, YearRange,
};
use num_format::{Locale, ToFormattedString};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "happilens",
    version,
    about = "Country happiness and World Bank indicator statistics"
)]
struct Cli {
    /// Config file (defaults to $HAPPILENS_CONFIG or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Seed for mock data jitter (overrides the config file)
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Print JSON instead of a table
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List countries (aggregates and capital-less entries are dropped).
    Countries(CountriesArgs),
    /// Fetch an indicator series.
    Indicator(IndicatorArgs),
    /// Happiness scores for all countries, or a yearly series for one.
    Happiness(HappinessArgs),
    /// Average happiness per region.
    Regions,
}

#[derive(Args, Debug)]
struct CountriesArgs {
    /// Only countries in this region code (e.g., ECS)
    #[arg(long)]
    region: Option<String>,
    /// Only the country with this ISO3 code
    #[arg(long)]
    code: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Gdp,
    LifeExpectancy,
    Unemployment,
    Education,
}

#[derive(Args, Debug)]
struct IndicatorArgs {
    /// Well-known indicator shortcut
    #[arg(long, value_enum, conflicts_with = "indicator")]
    kind: Option<Kind>,
    /// Raw indicator code (e.g., NY.GDP.PCAP.CD)
    #[arg(short, long)]
    indicator: Option<String>,
    /// Country code, or `all`
    #[arg(short, long, default_value = ALL_COUNTRIES)]
    country: String,
    /// Year (YYYY) or range (YYYY:YYYY)
    #[arg(short = 'd', long, default_value = "2010:2023")]
    date: String,
    /// Print series statistics after the rows.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(Args, Debug)]
struct HappinessArgs {
    #[arg(long, default_value_t = happilens::happiness::DEFAULT_YEAR)]
    year: i32,
    /// Yearly series for this ISO3 code instead of the full table
    #[arg(long)]
    country: Option<String>,
    #[arg(long, default_value_t = 2015)]
    from: i32,
    #[arg(long, default_value_t = 2023)]
    to: i32,
}

fn fmt_value(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Two decimals with thousands separators on the integer part.
            let s = format!("{:.2}", x.abs());
            let (int, frac) = s.split_once('.').unwrap_or((s.as_str(), "00"));
            let sign = if x < 0.0 { "-" } else { "" };
            match int.parse::<u64>() {
                Ok(n) => format!("{}{}.{}", sign, n.to_formatted_string(&Locale::en), frac),
                Err(_) => format!("{}{}", sign, s),
            }
        }
        _ => "NA".to_string(),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.seed.is_some() {
        config.mock_seed = cli.seed;
    }
    match cli.cmd {
        Command::Countries(args) => cmd_countries(&config, args, cli.json).await,
        Command::Indicator(args) => cmd_indicator(&config, args, cli.json).await,
        Command::Happiness(args) => cmd_happiness(&config, args, cli.json).await,
        Command::Regions => cmd_regions(&config, cli.json).await,
    }
}

async fn cmd_countries(config: &Config, args: CountriesArgs, json: bool) -> Result<()> {
    let state = CountryState::new(Arc::new(IndicatorProvider::new(config)?));
    state.load_countries().await;
    let snap = state.snapshot();
    if let Some(err) = snap.error {
        anyhow::bail!(err);
    }

    let countries: Vec<Country> = match (&args.code, &args.region) {
        (Some(code), _) => state.get_country_by_code(code).into_iter().collect(),
        (None, Some(region)) => state.get_countries_by_region(region),
        (None, None) => snap.countries,
    };
    if json {
        return print_json(&countries);
    }
    for c in &countries {
        println!(
            "{}  {:<28} {:<20} {:<28} {}",
            c.id,
            c.name,
            c.capital_city,
            c.region.value.trim(),
            c.income_level.value.trim()
        );
    }
    eprintln!("{} countries", countries.len());
    Ok(())
}

async fn cmd_indicator(config: &Config, args: IndicatorArgs, json: bool) -> Result<()> {
    let provider = IndicatorProvider::new(config)?;
    let range: YearRange = args.date.parse()?;
    let points: Vec<IndicatorObservation> = match (args.kind, args.indicator.as_deref()) {
        (Some(Kind::Gdp), _) => provider.get_gdp_per_capita(&args.country, range).await,
        (Some(Kind::LifeExpectancy), _) => provider.get_life_expectancy(&args.country, range).await,
        (Some(Kind::Unemployment), _) => provider.get_unemployment_rate(&args.country, range).await,
        (Some(Kind::Education), _) => provider.get_education_index(&args.country, range).await,
        (None, Some(code)) => provider.get_indicator_data(code, &args.country, range).await,
        (None, None) => provider.get_gdp_per_capita(&args.country, range).await,
    };

    if json {
        print_json(&points)?;
    } else {
        for p in &points {
            println!(
                "{} {} {}  {}",
                p.country_code,
                p.year,
                fmt_value(p.value),
                p.indicator_name
            );
        }
    }

    if args.stats {
        for s in stats::series_summary(&points) {
            println!(
                "{} • {}  count={} missing={}  min={} max={} mean={} median={}",
                s.key.country_code,
                s.key.indicator_id,
                s.count,
                s.missing,
                fmt_value(s.min),
                fmt_value(s.max),
                fmt_value(s.mean),
                fmt_value(s.median)
            );
        }
    }
    Ok(())
}

async fn cmd_happiness(config: &Config, args: HappinessArgs, json: bool) -> Result<()> {
    let state = HappinessState::new(Arc::new(HappinessProvider::new(config)));

    if let Some(code) = args.country.as_deref() {
        let series = state
            .get_country_happiness(code, YearRange::checked(args.from, args.to)?)
            .await?;
        if json {
            return print_json(&series);
        }
        if series.is_empty() {
            eprintln!("no happiness data for {code}");
        }
        for r in &series {
            println!("{} {} {:.3}", r.country_code, r.year, r.happiness_score);
        }
        return Ok(());
    }

    state.load_happiness_data(args.year).await;
    let snap = state.snapshot();
    if let Some(err) = snap.error {
        anyhow::bail!(err);
    }
    if json {
        return print_json(&snap.happiness);
    }
    if args.year != mock::MOCK_HAPPINESS_YEAR {
        eprintln!(
            "note: only {} happiness data is available",
            mock::MOCK_HAPPINESS_YEAR
        );
    }
    for r in &snap.happiness {
        println!(
            "{}  {:<16} {:.3}  {}",
            r.country_code, r.country, r.happiness_score, r.region
        );
    }
    Ok(())
}

async fn cmd_regions(config: &Config, json: bool) -> Result<()> {
    let state = HappinessState::new(Arc::new(HappinessProvider::new(config)));
    state.load_regional_data().await;
    let snap = state.snapshot();
    if let Some(err) = snap.error {
        anyhow::bail!(err);
    }
    if json {
        return print_json(&snap.regional);
    }
    for r in &snap.regional {
        println!(
            "{:<28} avg={:.4} countries={}",
            r.region, r.average_happiness, r.country_count
        );
    }
    Ok(())
}
