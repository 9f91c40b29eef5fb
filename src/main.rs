//! overload - Progressive overload planner

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use overload::analysis::{Analytics, Formula, one_rep_max, one_rep_max_with_rpe, weight_for_reps};
use overload::config::{ENV_DB, Settings};
use overload::db::{Database, LoggedSet};
use overload::feedback::FeedbackGenerator;
use overload::plates::{PlateInventory, RoundMode};
use overload::progression::{
    Gzclp, GzclpState, LinearProgression, LinearState, Lift, Prescription, TargetStrategy,
    TexasDay, TexasMethod, TexasState, Tier, Wendler531, WendlerState, training_max_from,
};
use overload::session::Session;
use overload::tips::{self, TipCategory};
use overload::units::{Unit, format_weight};
use overload::PlanError;

#[derive(Parser)]
#[command(name = "overload")]
#[command(author, version, about = "Progressive overload planner")]
struct Cli {
    /// SQLite set log
    #[arg(long, global = true, env = ENV_DB)]
    db: Option<String>,

    /// Weight unit (lb or kg)
    #[arg(long, global = true)]
    unit: Option<Unit>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log performed sets
    Log {
        /// Exercise name (e.g., "squat", "bench press", "ohp")
        exercise: String,

        /// Weight on the bar
        weight: f64,

        /// Reps per set
        reps: u32,

        /// Number of identical sets
        #[arg(short, long, default_value = "1")]
        sets: u32,

        /// Reps the plan asked for
        #[arg(short, long)]
        target: Option<u32>,

        /// Rate of perceived exertion (1-10)
        #[arg(long)]
        rpe: Option<f64>,

        /// Optional notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List logged sets
    History {
        /// Filter by exercise name
        exercise: Option<String>,

        /// Number of records to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// List sessions for an exercise with top set and e1RM
    Sessions { exercise: String },

    /// Next-session targets
    Target {
        #[command(subcommand)]
        method: TargetCommand,

        #[command(flatten)]
        options: TargetOptions,
    },

    /// Coaching feedback on the latest session
    Feedback {
        exercise: String,

        /// Reps each set was supposed to hit, when not logged
        #[arg(short, long)]
        target: Option<u32>,
    },

    /// Plates per side for a weight
    Plates {
        weight: f64,

        /// Bar weight (defaults to the unit's standard bar)
        #[arg(long)]
        bar: Option<f64>,

        /// Round to a loadable weight first: nearest, down or up
        #[arg(long)]
        round: Option<RoundMode>,
    },

    /// Estimated one-rep max and rep maxes
    E1rm {
        weight: f64,
        reps: u32,

        #[arg(long)]
        rpe: Option<f64>,

        /// epley, brzycki or lombardi
        #[arg(long)]
        formula: Option<Formula>,
    },

    /// Training statistics
    Stats {
        /// Filter by exercise name
        exercise: Option<String>,
    },

    /// Random coaching tip
    Tip {
        /// technique, programming, recovery or mindset
        category: Option<String>,
    },
}

#[derive(Args)]
struct TargetOptions {
    /// Fold the latest logged session into the state before prescribing
    #[arg(long, global = true)]
    advance: bool,

    /// Round every set to the standard plate set instead of the unit step
    #[arg(long, global = true)]
    plates: bool,
}

#[derive(Subcommand)]
enum TargetCommand {
    /// 5/3/1 percentage waves
    Wendler {
        exercise: String,

        /// Training max (defaults to 90% of --one-rep-max or the best logged e1RM)
        #[arg(long)]
        tm: Option<f64>,

        #[arg(long)]
        one_rep_max: Option<f64>,

        /// Cycle week, 1-4
        #[arg(long, default_value = "1")]
        week: u8,

        #[arg(long, default_value = "1")]
        cycle: u32,

        /// Include 40/50/60% warm-up sets
        #[arg(long)]
        warmups: bool,
    },

    /// Add weight every successful session
    Linear {
        exercise: String,

        /// Current working weight (replayed from history when omitted)
        #[arg(long)]
        weight: Option<f64>,

        #[arg(long, default_value = "3")]
        sets: u32,

        #[arg(long, default_value = "5")]
        reps: u32,

        /// Consecutive missed sessions so far
        #[arg(long, default_value = "0")]
        failures: u32,
    },

    /// Tiered progression with rep-scheme fallbacks
    Gzclp {
        exercise: String,

        /// t1, t2 or t3
        #[arg(long, default_value = "t1")]
        tier: Tier,

        /// Stage, 1-based
        #[arg(long, default_value = "1")]
        stage: usize,

        /// Current weight (latest logged top set when omitted)
        #[arg(long)]
        weight: Option<f64>,
    },

    /// Weekly volume, recovery and intensity days
    Texas {
        exercise: String,

        /// Intensity day 5-rep target (estimated from the best e1RM when omitted)
        #[arg(long)]
        intensity: Option<f64>,

        /// volume, recovery or intensity
        #[arg(long, default_value = "volume")]
        day: TexasDay,
    },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let mut settings = Settings::from_env();
    if let Some(db) = cli.db.clone() {
        settings.db_path = db;
    }
    if let Some(unit) = cli.unit {
        if unit != settings.unit {
            settings.bar = unit.default_bar();
        }
        settings.unit = unit;
    }

    match cli.command {
        Commands::Log { exercise, weight, reps, sets, target, rpe, notes } => {
            if !weight.is_finite() || weight < 0.0 {
                bail!(PlanError::InvalidWeight(weight));
            }
            let db = open_db(&settings)?;
            let now = Utc::now();
            for _ in 0..sets.max(1) {
                let set = LoggedSet {
                    id: None,
                    date: now,
                    exercise: exercise.clone(),
                    weight,
                    reps,
                    target_reps: target,
                    rpe,
                    notes: notes.clone(),
                };
                let id = db.add_set(&set)?;
                info!("Logged set {} for {}", id, exercise);
            }
            println!(
                "Logged: {} - {}x{} @ {} {}",
                exercise,
                sets.max(1),
                reps,
                format_weight(weight),
                settings.unit
            );
        }

        Commands::History { exercise, limit } => {
            let db = open_db(&settings)?;
            let sets = match &exercise {
                Some(name) => db.get_sets_for(name)?,
                None => db.get_sets()?,
            };
            if cli.json {
                print_json(&sets.iter().take(limit).collect::<Vec<_>>())?;
                return Ok(());
            }
            println!("Recent sets:");
            println!("{:-<70}", "");
            for s in sets.iter().take(limit) {
                println!(
                    "{} | {:20} | {:>7} x {:<3} | {} | {}",
                    s.date.format("%Y-%m-%d %H:%M"),
                    s.exercise,
                    format_weight(s.weight),
                    s.reps,
                    s.rpe.map(|r| format!("RPE {}", format_weight(r))).unwrap_or_else(|| "-".to_string()),
                    s.notes.as_deref().unwrap_or("-")
                );
            }
        }

        Commands::Sessions { exercise } => {
            let db = open_db(&settings)?;
            let sessions = db.sessions_for(&exercise)?;
            if cli.json {
                print_json(&sessions)?;
                return Ok(());
            }
            println!("Sessions: {}", exercise);
            println!("{:-<60}", "");
            for s in &sessions {
                let top = s
                    .top_set()
                    .map(|t| format!("{} x {}", format_weight(t.weight), t.reps))
                    .unwrap_or_else(|| "-".to_string());
                let e1rm = s
                    .best_e1rm(settings.formula)
                    .map(format_weight)
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{} | {} sets | top {} | e1RM {} {}",
                    s.local_day(),
                    s.sets.len(),
                    top,
                    e1rm,
                    settings.unit
                );
            }
        }

        Commands::Target { method, options } => {
            let db = open_db(&settings)?;
            let prescription = target(&db, &settings, method, options.advance)?;
            let prescription = if options.plates {
                prescription.rounded(&settings.inventory())
            } else {
                prescription
            };
            if cli.json {
                print_json(&prescription)?;
            } else {
                println!("{}", prescription.format(settings.unit));
            }
        }

        Commands::Feedback { exercise, target } => {
            let db = open_db(&settings)?;
            let mut sessions = db.sessions_for(&exercise)?;
            let Some(mut latest) = sessions.pop() else {
                bail!(PlanError::NoHistory(exercise));
            };
            if let Some(target) = target {
                for set in &mut latest.sets {
                    set.target_reps = set.target_reps.or(Some(target));
                }
            }
            let generator = FeedbackGenerator::new(settings.formula, settings.unit);
            let feedback = generator.generate(&latest, &sessions, None);
            if cli.json {
                print_json(&feedback)?;
            } else {
                println!("{}", feedback.summary());
            }
        }

        Commands::Plates { weight, bar, round } => {
            let inventory = match bar {
                Some(bar) => PlateInventory::standard(settings.unit).with_bar(bar),
                None => settings.inventory(),
            };
            inventory.validate()?;

            let loading = match round {
                Some(mode) => Some(inventory.round(weight, mode)?),
                None => inventory.breakdown(weight),
            };

            match loading {
                Some(loading) if cli.json => print_json(&loading)?,
                Some(loading) => println!("{}", loading.describe(settings.unit)),
                None => {
                    let down = inventory.round(weight, RoundMode::Down)?;
                    let up = inventory.round(weight, RoundMode::Up)?;
                    println!(
                        "{} {} is not loadable. Closest: {} or {}",
                        format_weight(weight),
                        settings.unit,
                        down.describe(settings.unit),
                        up.describe(settings.unit)
                    );
                }
            }
        }

        Commands::E1rm { weight, reps, rpe, formula } => {
            let formula = formula.unwrap_or(settings.formula);
            let estimate = match rpe {
                Some(rpe) => one_rep_max_with_rpe(weight, reps, rpe, formula),
                None => one_rep_max(weight, reps, formula),
            };
            let Some(estimate) = estimate else {
                bail!("cannot estimate a max from {} x {}", weight, reps);
            };

            let table: Vec<(u32, f64)> = (1..=10)
                .filter_map(|r| weight_for_reps(estimate, r, formula).map(|w| (r, w)))
                .collect();

            if cli.json {
                #[derive(Serialize)]
                struct Estimate {
                    formula: Formula,
                    one_rep_max: f64,
                    rep_maxes: Vec<(u32, f64)>,
                }
                print_json(&Estimate { formula, one_rep_max: estimate, rep_maxes: table })?;
                return Ok(());
            }

            println!("e1RM ({}): {} {}", formula, format_weight(estimate), settings.unit);
            for (r, w) in table {
                println!("  {:>2} reps: {} {}", r, format_weight(w), settings.unit);
            }
        }

        Commands::Stats { exercise } => {
            let db = open_db(&settings)?;
            let sets = db.get_sets()?;
            let analytics = Analytics::new(overload::session::group_sessions(&sets));

            println!("Training Statistics");
            println!("{:-<40}", "");

            if let Some(ex) = exercise {
                println!("Exercise: {}", ex);
                println!(
                    "Total volume: {} {}",
                    format_weight(analytics.total_volume(&ex)),
                    settings.unit
                );
                if let Some(best) = analytics.best_e1rm(&ex, settings.formula) {
                    println!("Best e1RM: {} {}", format_weight(best), settings.unit);
                }
            } else {
                println!("Weekly frequency: {:.1} sessions/week", analytics.weekly_frequency());
            }
        }

        Commands::Tip { category } => {
            let tip = match category.as_deref() {
                None => Some(tips::get_random_tip()),
                Some(name) => {
                    let category = TipCategory::all()
                        .iter()
                        .find(|c| c.name().eq_ignore_ascii_case(name))
                        .with_context(|| format!("unknown tip category '{}'", name))?;
                    tips::get_random_tip_by_category(*category)
                }
            };
            if let Some(tip) = tip {
                println!("{}", tips::format_tip(tip));
            }
        }
    }

    Ok(())
}

fn open_db(settings: &Settings) -> Result<Database> {
    Database::open(&settings.db_path)
        .with_context(|| format!("opening set log at {}", settings.db_path))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn latest_top_weight(sessions: &[Session]) -> Option<f64> {
    sessions.last().and_then(|s| s.top_set()).map(|t| t.weight)
}

fn best_e1rm(sessions: &[Session], formula: Formula) -> Option<f64> {
    sessions
        .iter()
        .filter_map(|s| s.best_e1rm(formula))
        .max_by(f64::total_cmp)
}

/// Prescribe `state`, or the state after the latest session when `advance` is set
fn plan<S: TargetStrategy>(
    strategy: &S,
    state: S::State,
    sessions: &[Session],
    advance: bool,
) -> Result<Prescription> {
    if !advance {
        return Ok(strategy.prescribe(&state)?);
    }
    let latest = sessions
        .last()
        .context("--advance needs at least one logged session")?;
    let (_, prescription) = strategy.next(&state, latest)?;
    Ok(prescription)
}

fn target(
    db: &Database,
    settings: &Settings,
    method: TargetCommand,
    advance: bool,
) -> Result<Prescription> {
    match method {
        TargetCommand::Wendler { exercise, tm, one_rep_max, week, cycle, warmups } => {
            let sessions = db.sessions_for(&exercise)?;
            let training_max = tm
                .or_else(|| one_rep_max.map(training_max_from))
                .or_else(|| best_e1rm(&sessions, settings.formula).map(training_max_from))
                .ok_or_else(|| PlanError::NoHistory(exercise.clone()))?;

            let strategy =
                Wendler531::new(Lift::new(&exercise, settings.unit)).with_warmups(warmups);
            let state = WendlerState { training_max, week, cycle };
            plan(&strategy, state, &sessions, advance)
        }

        TargetCommand::Linear { exercise, weight, sets, reps, failures } => {
            let sessions = db.sessions_for(&exercise)?;
            let strategy = LinearProgression::new(Lift::new(&exercise, settings.unit));

            match weight {
                Some(weight) => {
                    let state = LinearState { failures, ..LinearState::new(weight).with_scheme(sets, reps) };
                    plan(&strategy, state, &sessions, advance)
                }
                None => {
                    // Replay the whole log from the first session's top set
                    let first = sessions
                        .first()
                        .and_then(|s| s.top_set())
                        .map(|t| t.weight)
                        .ok_or_else(|| PlanError::NoHistory(exercise.clone()))?;
                    let mut state = LinearState::new(first).with_scheme(sets, reps);
                    for session in &sessions {
                        state = strategy.advance(&state, session)?;
                    }
                    Ok(strategy.prescribe(&state)?)
                }
            }
        }

        TargetCommand::Gzclp { exercise, tier, stage, weight } => {
            let sessions = db.sessions_for(&exercise)?;
            let weight = weight
                .or_else(|| latest_top_weight(&sessions))
                .ok_or_else(|| PlanError::NoHistory(exercise.clone()))?;
            if stage == 0 {
                bail!(PlanError::InvalidStage { tier: tier.to_string(), stage });
            }

            let strategy = Gzclp::new(Lift::new(&exercise, settings.unit))
                .with_formula(settings.formula);
            let state = GzclpState::new(tier, weight).at_stage(stage - 1);
            plan(&strategy, state, &sessions, advance)
        }

        TargetCommand::Texas { exercise, intensity, day } => {
            let sessions = db.sessions_for(&exercise)?;
            let intensity = intensity
                .or_else(|| {
                    best_e1rm(&sessions, settings.formula)
                        .and_then(|e| weight_for_reps(e, 5, settings.formula))
                })
                .ok_or_else(|| PlanError::NoHistory(exercise.clone()))?;

            let lift = Lift::new(&exercise, settings.unit);
            let intensity = lift.round(intensity);
            let strategy = TexasMethod::new(lift);
            let state = TexasState::new(intensity, day);
            plan(&strategy, state, &sessions, advance)
        }
    }
}
