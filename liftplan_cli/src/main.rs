use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use liftplan_core::*;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "liftplan")]
#[command(about = "Workout progression and performance tracking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show this week's targets for an exercise
    Targets {
        #[command(flatten)]
        plan: PlanArgs,

        /// Week to compute (defaults to the week implied by --start-date)
        #[arg(long)]
        week: Option<u32>,
    },

    /// Show targets for every week of a program
    Preview {
        #[command(flatten)]
        plan: PlanArgs,
    },

    /// Estimate a one-rep max from a weight and rep count
    E1rm {
        /// Weight lifted in kg
        weight: f64,

        /// Reps performed
        reps: u32,

        /// Also show what percentage of the estimate this weight is
        #[arg(long)]
        at: Option<f64>,
    },

    /// Log a performed set
    Log {
        /// Exercise id (see the built-in catalog)
        exercise: String,

        /// Weight in kg
        #[arg(long)]
        weight: Option<f64>,

        /// Reps performed
        #[arg(long)]
        reps: Option<u32>,

        /// Mark the set as attempted but not completed
        #[arg(long)]
        incomplete: bool,
    },

    /// Show recent training volume
    Volume {
        /// Limit to one exercise id
        #[arg(long)]
        exercise: Option<String>,

        /// Window size in days (defaults from config)
        #[arg(long)]
        days: Option<i64>,
    },

    /// Roll up journaled sets to CSV
    Rollup {
        /// Clean up processed journal files after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

/// Program shape shared by `targets` and `preview`
#[derive(clap::Args)]
struct PlanArgs {
    /// Exercise id (see the built-in catalog)
    exercise: String,

    /// Base number of sets
    #[arg(long, default_value_t = 3)]
    sets: u32,

    /// Base rep template, e.g. "8-12" or "10"
    #[arg(long, default_value = "8-12")]
    reps: String,

    /// Base weight label, e.g. "moderate" (free text)
    #[arg(long, default_value = "")]
    weight_label: String,

    /// Base rest between sets in seconds
    #[arg(long, default_value_t = 90)]
    rest: u32,

    /// Progression strategy (none, strength, hypertrophy, endurance, linear)
    #[arg(long)]
    progression: Option<String>,

    /// Program length in weeks (defaults from config)
    #[arg(long)]
    total_weeks: Option<u32>,

    /// Program start date (YYYY-MM-DD), used to derive the current week
    #[arg(long)]
    start_date: Option<String>,

    /// Client baseline weight in kg for absolute targets
    #[arg(long)]
    starting_weight: Option<f64>,
}

fn main() -> Result<()> {
    // Initialize logging
    liftplan_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Commands::Targets { plan, week } => cmd_targets(plan, week, &config),
        Commands::Preview { plan } => cmd_preview(plan, &config),
        Commands::E1rm { weight, reps, at } => cmd_e1rm(weight, reps, at),
        Commands::Log {
            exercise,
            weight,
            reps,
            incomplete,
        } => cmd_log(data_dir, exercise, weight, reps, incomplete),
        Commands::Volume { exercise, days } => cmd_volume(data_dir, exercise, days, &config),
        Commands::Rollup { cleanup } => cmd_rollup(data_dir, cleanup),
    }
}

fn resolve_progression(requested: Option<&str>, config: &Config) -> ProgressionType {
    if let Some(text) = requested {
        if let Some(kind) = ProgressionType::parse(text) {
            return kind;
        }
        eprintln!("Unknown progression: {}. Using configured default.", text);
    }
    ProgressionType::parse(&config.program.progression).unwrap_or(ProgressionType::Hypertrophy)
}

fn resolve_exercise<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a Exercise> {
    catalog.get(id).ok_or_else(|| {
        let mut known: Vec<&str> = catalog.exercises.keys().map(String::as_str).collect();
        known.sort_unstable();
        Error::Catalog(format!(
            "Unknown exercise '{}'. Known exercises: {}",
            id,
            known.join(", ")
        ))
    })
}

fn parse_start_date(text: &str) -> Result<chrono::DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| Error::Other(format!("Invalid start date '{}': {}", text, e)))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::Other(format!("Invalid start date '{}'", text)))?;
    Ok(midnight.and_utc())
}

fn plan_inputs(plan: &PlanArgs, config: &Config) -> Result<(ProgressionBase, ProgressionType, u32)> {
    let catalog = get_default_catalog();
    let exercise = resolve_exercise(catalog, &plan.exercise)?;

    if !exercise.uses_weight && plan.starting_weight.is_some() {
        eprintln!(
            "{} is a bodyweight exercise; ignoring --starting-weight.",
            exercise.name
        );
    }

    let base = ProgressionBase {
        target_sets: plan.sets,
        target_reps: plan.reps.clone(),
        target_weight: plan.weight_label.clone(),
        rest_seconds: plan.rest,
    };
    let kind = resolve_progression(plan.progression.as_deref(), config);
    let total_weeks = plan.total_weeks.unwrap_or(config.program.total_weeks);

    Ok((base, kind, total_weeks))
}

fn plan_starting_weight(plan: &PlanArgs) -> Option<f64> {
    let catalog = get_default_catalog();
    match catalog.get(&plan.exercise) {
        Some(exercise) if !exercise.uses_weight => None,
        _ => plan.starting_weight,
    }
}

fn cmd_targets(plan: PlanArgs, week: Option<u32>, config: &Config) -> Result<()> {
    let (base, kind, total_weeks) = plan_inputs(&plan, config)?;
    let starting_weight = plan_starting_weight(&plan);

    let week = match (week, plan.start_date.as_deref()) {
        (Some(week), _) => week.clamp(1, total_weeks.max(1)),
        (None, Some(text)) => {
            liftplan_core::progression::calculate_week_number(parse_start_date(text)?, total_weeks)
        }
        (None, None) => 1,
    };

    let targets = apply_progression(&base, week, kind, total_weeks, starting_weight);
    display_targets(&plan.exercise, week, total_weeks, &targets);
    Ok(())
}

fn cmd_preview(plan: PlanArgs, config: &Config) -> Result<()> {
    let (base, kind, total_weeks) = plan_inputs(&plan, config)?;
    let starting_weight = plan_starting_weight(&plan);

    let preview = generate_progression_preview(&base, kind, total_weeks, starting_weight);

    println!("\n{} ({} week program)", plan.exercise, total_weeks);
    println!("─────────────────────────────────────────");
    for entry in &preview {
        let t = &entry.targets;
        println!(
            "  Wk {:>2}: {} x {:<6} {:<14} rest {}s",
            entry.week,
            t.target_sets,
            t.target_reps,
            if t.target_weight.is_empty() {
                "-"
            } else {
                &t.target_weight
            },
            t.rest_seconds,
        );
        if !t.progression_note.is_empty() {
            println!("         {}", t.progression_note);
        }
    }
    println!();
    Ok(())
}

fn cmd_e1rm(weight: f64, reps: u32, at: Option<f64>) -> Result<()> {
    let e1rm = calculate_e1rm(weight, reps);

    if e1rm == 0.0 {
        println!("Cannot estimate a 1RM from {} kg x {} reps.", weight, reps);
        return Ok(());
    }

    println!("\n  {} kg x {} reps", weight, reps);
    println!("  Estimated 1RM: {:.1} kg", e1rm);

    if let Some(load) = at {
        let pct = liftplan_core::metrics::intensity_percentage(load, e1rm);
        println!("  {} kg is {}% of that estimate", load, pct);
    }

    println!();
    Ok(())
}

fn cmd_log(
    data_dir: PathBuf,
    exercise_id: String,
    weight: Option<f64>,
    reps: Option<u32>,
    incomplete: bool,
) -> Result<()> {
    // Ensure directories exist
    let journal_dir = data_dir.join("journal");
    std::fs::create_dir_all(&journal_dir)?;

    let journal_path = journal_dir.join("sets.jsonl");
    let records_path = journal_dir.join("records.json");

    // Load and sanity-check the catalog
    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Catalog("Invalid catalog".into()));
    }

    let exercise = resolve_exercise(catalog, &exercise_id)?;

    let set = LoggedSet {
        id: uuid::Uuid::new_v4(),
        exercise_id: exercise.id.clone(),
        performed_at: Utc::now(),
        weight,
        reps,
        completed: !incomplete,
    };

    // Append to the journal
    let mut sink = JsonlSink::new(&journal_path);
    sink.append(&set)?;

    println!("\n✓ Set logged: {}", exercise.name);
    if let (Some(w), Some(r)) = (weight, reps) {
        println!("  {} kg x {} reps", w, r);
    }

    // Only completed working sets count toward records
    let counts = set.completed
        && weight.is_some_and(|w| w > 0.0)
        && reps.is_some_and(|r| r > 0);
    if counts {
        let w = weight.unwrap_or(0.0);
        let r = reps.unwrap_or(0);

        let mut check = None;
        RecordBook::update(&records_path, |book| {
            check = Some(book.record_attempt(&exercise_id, w, r));
            Ok(())
        })?;

        if let Some(check) = check {
            if check.is_e1rm_pr {
                println!("  ★ New e1RM record: {:.1} kg", check.new_e1rm);
            }
            if check.is_max_weight_pr {
                println!("  ★ New max weight: {} kg", w);
            }
            if check.is_max_reps_pr {
                println!("  ★ New rep record at {} kg: {} reps", w, r);
            }
        }
    }

    Ok(())
}

fn cmd_volume(
    data_dir: PathBuf,
    exercise: Option<String>,
    days: Option<i64>,
    config: &Config,
) -> Result<()> {
    let journal_path = data_dir.join("journal").join("sets.jsonl");
    let csv_path = data_dir.join("sets.csv");

    let days = days.unwrap_or(config.training.recent_days);
    let now = Utc::now();

    // Load twice the window so the trend has a previous window to compare
    let sets = load_recent_sets(&journal_path, &csv_path, days * 2)?;

    let exercises: BTreeSet<String> = match exercise {
        Some(id) => BTreeSet::from([id]),
        None => sets.iter().map(|s| s.exercise_id.clone()).collect(),
    };

    if exercises.is_empty() {
        println!("No sets logged in the last {} days.", days);
        return Ok(());
    }

    println!("\nVolume, last {} days", days);
    println!("─────────────────────────────────────────");
    for id in &exercises {
        let (current, previous, change) =
            liftplan_core::history::volume_trend(&sets, id, now, days);
        print!("  {:<20} {:>8.0} kg", id, current);
        if previous > 0.0 {
            println!("  ({:+.1}% vs prior {} days)", change, days);
        } else {
            println!();
        }
    }
    println!();
    Ok(())
}

fn cmd_rollup(data_dir: PathBuf, cleanup: bool) -> Result<()> {
    let journal_dir = data_dir.join("journal");
    let journal_path = journal_dir.join("sets.jsonl");
    let csv_path = data_dir.join("sets.csv");

    if !journal_path.exists() {
        println!("No journal file found - nothing to roll up.");
        return Ok(());
    }

    let count = liftplan_core::archive::journal_to_csv_and_archive(&journal_path, &csv_path)?;

    println!("✓ Rolled up {} sets to CSV", count);
    println!("  CSV: {}", csv_path.display());

    if cleanup {
        let cleaned = liftplan_core::archive::cleanup_processed_journals(&journal_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed journal files", cleaned);
        }
    }

    Ok(())
}

fn display_targets(exercise_id: &str, week: u32, total_weeks: u32, targets: &ProgressionResult) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  WEEK {} OF {}", week, total_weeks);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", exercise_id);
    println!("  Sets: {}", targets.target_sets);
    println!("  Reps: {}", targets.target_reps);
    if !targets.target_weight.is_empty() {
        println!("  Weight: {}", targets.target_weight);
    }
    println!("  Rest: {}s", targets.rest_seconds);

    if let Some(ref rpe) = targets.target_rpe {
        println!("  Target RPE: {}", rpe);
    }

    if !targets.progression_note.is_empty() {
        println!();
        println!("  ℹ {}", targets.progression_note);
    }

    println!();
}
