use clap::{Args, Parser, Subcommand};
use rehab_core::config::DefaultsConfig;
use rehab_core::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "rehab")]
#[command(about = "Rule-based rehabilitation plan recommendations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Load configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Patient profile fields; anything omitted comes from `[defaults]` in the config
#[derive(Args, Default)]
struct ProfileArgs {
    /// Age in years (18-80)
    #[arg(long)]
    age: Option<u32>,

    /// Injury type (knee, shoulder, back)
    #[arg(long)]
    injury: Option<InjuryType>,

    /// Pain level (1-10)
    #[arg(long)]
    pain: Option<u32>,

    /// Mobility range in percent (0-100)
    #[arg(long)]
    mobility: Option<u32>,

    /// Weight in kilograms (30-200)
    #[arg(long)]
    weight: Option<f64>,

    /// Activity level (sedentary, moderately-active, very-active)
    #[arg(long)]
    activity: Option<ActivityLevel>,
}

impl ProfileArgs {
    fn resolve(&self, defaults: &DefaultsConfig) -> Result<PatientProfile> {
        PatientProfile::new(
            self.age.unwrap_or(defaults.age),
            self.injury.unwrap_or(defaults.injury_type),
            self.pain.unwrap_or(defaults.pain_level),
            self.mobility.unwrap_or(defaults.mobility_range),
            self.weight.unwrap_or(defaults.weight),
            self.activity.unwrap_or(defaults.activity_level),
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the recommended plan and progress chart (default)
    Plan {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Actual weekly mobility, comma separated (e.g. 12,18,25,30)
        #[arg(long)]
        actual: Option<UserProgress>,

        /// Print profile, recommendation and progress as JSON
        #[arg(long)]
        json: bool,

        /// Chart width in characters (100%), 10-200
        #[arg(long, default_value_t = 40, value_parser = clap::value_parser!(u16).range(10..=200))]
        width: u16,
    },

    /// Export the plan as rehabilitation_plan.txt
    Export {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Directory to write into (defaults to the data directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Write the projected vs actual series as CSV
    Chart {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Actual weekly mobility, comma separated (e.g. 12,18,25,30)
        #[arg(long)]
        actual: Option<UserProgress>,

        /// CSV file to write
        #[arg(long)]
        output: PathBuf,
    },

    /// Manage recorded actual progress
    Progress {
        #[command(subcommand)]
        action: ProgressAction,
    },
}

#[derive(Subcommand)]
enum ProgressAction {
    /// Record actual mobility for weeks 1-4
    Set {
        #[arg(num_args = 4, required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },

    /// Show recorded progress
    Show,

    /// Remove recorded progress
    Clear,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    rehab_core::logging::init_cli(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(cli.config.as_deref())?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Some(Commands::Plan {
            profile,
            actual,
            json,
            width,
        }) => cmd_plan(&data_dir, &profile, actual, json, usize::from(width), &config),
        Some(Commands::Export { profile, output }) => {
            cmd_export(&data_dir, &profile, output, &config)
        }
        Some(Commands::Chart {
            profile,
            actual,
            output,
        }) => cmd_chart(&data_dir, &profile, actual, &output, &config),
        Some(Commands::Progress { action }) => cmd_progress(&data_dir, action),
        None => {
            // Default to "plan" command
            cmd_plan(&data_dir, &ProfileArgs::default(), None, false, 40, &config)
        }
    }
}

/// Explicit `--actual` wins; otherwise fall back to the stored record
fn resolve_progress(
    data_dir: &Path,
    actual: Option<UserProgress>,
) -> Result<Option<UserProgress>> {
    if actual.is_some() {
        return Ok(actual);
    }
    let stored = ProgressRecord::load(&ProgressRecord::path_in(data_dir))?;
    Ok(stored.map(|record| record.values))
}

fn cmd_plan(
    data_dir: &Path,
    profile_args: &ProfileArgs,
    actual: Option<UserProgress>,
    json: bool,
    width: usize,
    config: &Config,
) -> Result<()> {
    let profile = profile_args.resolve(&config.defaults)?;
    let recommendation = compute_recommendation(&profile)?;
    let progress = resolve_progress(data_dir, actual)?;

    if json {
        let output = serde_json::json!({
            "profile": profile,
            "recommendation": recommendation,
            "progress": progress,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    display_plan(&profile, &recommendation);

    let chart = ProgressChart::new(&recommendation, progress.as_ref());
    print!("{}", chart.render_text(width));
    if !chart.has_actual() {
        println!();
        println!("  ℹ Record actual progress with `rehab progress set W1 W2 W3 W4`");
    }
    println!();

    Ok(())
}

fn cmd_export(
    data_dir: &Path,
    profile_args: &ProfileArgs,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let profile = profile_args.resolve(&config.defaults)?;
    let recommendation = compute_recommendation(&profile)?;

    let out_dir = output.unwrap_or_else(|| data_dir.to_path_buf());
    let path = write_plan(&out_dir, &profile, &recommendation)?;

    println!("✓ Plan exported to {}", path.display());
    println!("  Type: {}", PLAN_MIME_TYPE);
    Ok(())
}

fn cmd_chart(
    data_dir: &Path,
    profile_args: &ProfileArgs,
    actual: Option<UserProgress>,
    output: &Path,
    config: &Config,
) -> Result<()> {
    let profile = profile_args.resolve(&config.defaults)?;
    let recommendation = compute_recommendation(&profile)?;
    let progress = resolve_progress(data_dir, actual)?;

    let chart = ProgressChart::new(&recommendation, progress.as_ref());
    chart.write_csv(output)?;

    println!("✓ Chart data written to {}", output.display());
    Ok(())
}

fn cmd_progress(data_dir: &Path, action: ProgressAction) -> Result<()> {
    let path = ProgressRecord::path_in(data_dir);

    match action {
        ProgressAction::Set { values } => {
            let record = ProgressRecord::new(UserProgress::new(&values)?);
            record.save(&path)?;
            println!("✓ Progress saved");
            display_progress(&record);
        }
        ProgressAction::Show => match ProgressRecord::load(&path)? {
            Some(record) => display_progress(&record),
            None => println!("No progress recorded."),
        },
        ProgressAction::Clear => {
            if ProgressRecord::clear(&path)? {
                println!("✓ Progress cleared");
            } else {
                println!("No progress recorded.");
            }
        }
    }

    Ok(())
}

fn display_plan(profile: &PatientProfile, recommendation: &Recommendation) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  RECOMMENDED REHABILITATION PLAN");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Patient: age {}, {} injury, pain {}/10, mobility {}%, {} kg, {}",
        profile.age,
        profile.injury_type,
        profile.pain_level,
        profile.mobility_range,
        profile.weight,
        profile.activity_level
    );
    println!();
    println!("  → Exercise Type: {}", recommendation.exercise);
    println!("  → Frequency: {}", recommendation.frequency_text());
    println!("  → Duration per Session: {}", recommendation.duration_text());
    println!();
}

fn display_progress(record: &ProgressRecord) {
    for (idx, value) in record.values.values().iter().enumerate() {
        println!("  Week {}: {:.1}%", idx + 1, value);
    }
    println!("  Recorded: {}", record.recorded_at.to_rfc3339());
}
