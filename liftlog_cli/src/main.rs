use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use liftlog_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "CSV-backed gym progress tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the workout CSV file
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a new workout entry
    Add {
        /// Entry date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Exercise name
        #[arg(long)]
        exercise: String,

        /// Sets notation, e.g. "3x10x135lb; 2x8x155lb" or "2xfailure"
        #[arg(long)]
        sets: String,

        /// Rate of Perceived Exertion, 1-10
        #[arg(long)]
        rpe: u8,

        /// Muscle group, compound labels allowed (e.g. "Back/Biceps")
        #[arg(long)]
        muscle: String,
    },

    /// Show the workout history
    History {
        /// Filter by muscle group (matches expanded compound labels)
        #[arg(long)]
        muscle: Option<String>,

        /// Filter by exercise name
        #[arg(long)]
        exercise: Option<String>,

        /// Earliest date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Latest date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Sort order: date-desc, date-asc, exercise, rpe, volume
        #[arg(long, default_value = "date-desc")]
        sort: String,

        /// List rows quarantined during load
        #[arg(long)]
        show_rejected: bool,
    },

    /// Overview statistics for the whole log (default)
    Stats,

    /// Balance, recovery, and record insights
    Insights,

    /// Progression summary and series for one exercise
    Progress {
        /// Exercise name
        #[arg(long)]
        exercise: String,

        /// Earliest date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Latest date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Write filtered history to a CSV or JSON file
    Export {
        /// Output path, defaults to workout_history_<date>.<format>
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: csv or json
        #[arg(long, default_value = "csv")]
        format: String,

        /// Filter by muscle group
        #[arg(long)]
        muscle: Option<String>,

        /// Filter by exercise name
        #[arg(long)]
        exercise: Option<String>,

        /// Earliest date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Latest date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    liftlog_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_file = cli
        .data_file
        .unwrap_or_else(|| config.data.data_file.clone());

    match cli.command {
        Some(Commands::Add {
            date,
            exercise,
            sets,
            rpe,
            muscle,
        }) => cmd_add(&data_file, &config, date, &exercise, &sets, rpe, &muscle),
        Some(Commands::History {
            muscle,
            exercise,
            from,
            to,
            sort,
            show_rejected,
        }) => cmd_history(
            &data_file,
            &config,
            EntryFilter {
                muscle_group: muscle,
                exercise,
                from,
                to,
            },
            parse_sort_key(&sort),
            show_rejected,
        ),
        Some(Commands::Insights) => cmd_insights(&data_file, &config),
        Some(Commands::Progress { exercise, from, to }) => {
            cmd_progress(&data_file, &config, &exercise, from, to)
        }
        Some(Commands::Export {
            output,
            format,
            muscle,
            exercise,
            from,
            to,
        }) => cmd_export(
            &data_file,
            &config,
            output,
            &format,
            EntryFilter {
                muscle_group: muscle,
                exercise,
                from,
                to,
            },
        ),
        Some(Commands::Stats) | None => cmd_stats(&data_file, &config),
    }
}

fn parse_sort_key(raw: &str) -> SortKey {
    match raw.to_lowercase().as_str() {
        "date-desc" | "date" => SortKey::DateDesc,
        "date-asc" => SortKey::DateAsc,
        "exercise" => SortKey::Exercise,
        "rpe" => SortKey::Rpe,
        "volume" => SortKey::Volume,
        other => {
            eprintln!("Unknown sort key: {}. Using date-desc.", other);
            SortKey::DateDesc
        }
    }
}

fn cmd_add(
    data_file: &PathBuf,
    config: &Config,
    date: Option<NaiveDate>,
    exercise: &str,
    sets: &str,
    rpe: u8,
    muscle: &str,
) -> Result<()> {
    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let unit = config.units.default;

    let entry = match WorkoutEntry::new(date, exercise, sets, rpe, muscle, unit) {
        Ok(entry) => entry,
        Err(e @ (Error::MalformedEntry { .. } | Error::InvalidEntry(_))) => {
            eprintln!("✗ {}", e);
            std::process::exit(2);
        }
        Err(e) => return Err(e),
    };

    for group in &entry.muscle_groups {
        let known = muscles::MUSCLE_GROUPS
            .iter()
            .any(|name| name.eq_ignore_ascii_case(group));
        if !known {
            eprintln!(
                "⚠ Unrecognized muscle group {:?} (known groups: {})",
                group,
                muscles::MUSCLE_GROUPS.join(", ")
            );
        }
    }

    append_entry(data_file, &entry)?;

    let summary = entry.metrics(unit);
    println!("✓ Workout logged: {} on {}", entry.exercise, entry.date);
    println!("  Sets: {}", format_sets(&entry.sets));
    println!(
        "  Volume: {:.0} {}   Reps: {}   Est. 1RM: {:.1} {}",
        summary.total_volume,
        unit.suffix(),
        summary.total_reps,
        summary.estimated_one_rep_max,
        unit.suffix()
    );

    Ok(())
}

fn cmd_history(
    data_file: &PathBuf,
    config: &Config,
    filter: EntryFilter,
    sort: SortKey,
    show_rejected: bool,
) -> Result<()> {
    let log = WorkoutLog::load(data_file, config)?;
    let unit = config.units.default;

    report_rejected(&log, show_rejected);

    let mut view = filter_entries(&log.entries, &filter);
    sort_entries(&mut view, sort, unit);

    if view.is_empty() {
        println!("No workout entries found.");
        return Ok(());
    }

    println!(
        "{:<12} {:<22} {:<18} {:<28} {:>4} {:>10} {:>8}",
        "Date", "Exercise", "Muscle Group", "Sets x Reps x Weight", "RPE", "Volume", "Avg Wt"
    );
    for entry in &view {
        let summary = entry.metrics(unit);
        println!(
            "{:<12} {:<22} {:<18} {:<28} {:>4} {:>10.0} {:>8.1}",
            entry.date.to_string(),
            entry.exercise,
            entry.muscle_group,
            entry.sets_notation,
            entry.rpe,
            summary.total_volume,
            summary.average_weight
        );
    }
    println!();
    println!("{} entries.", view.len());

    Ok(())
}

fn cmd_stats(data_file: &PathBuf, config: &Config) -> Result<()> {
    let log = WorkoutLog::load(data_file, config)?;
    let unit = config.units.default;

    report_rejected(&log, false);

    if log.is_empty() {
        println!("No workout entries yet. Log one with `liftlog add`.");
        return Ok(());
    }

    let stats = insights::overview(&log.entries);

    println!("╭─────────────────────────────────────────╮");
    println!("│  WORKOUT DASHBOARD");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Workout days:        {}", stats.workout_days);
    println!("  Entries:             {}", stats.total_entries);
    println!("  Entries/day:         {:.1}", stats.entries_per_day);
    println!("  Muscle groups/week:  {:.1}", stats.muscle_groups_per_week);
    println!("  Average RPE:         {:.1}", stats.average_rpe);
    println!();

    // Recent workouts, newest first
    let mut recent = filter_entries(&log.entries, &EntryFilter::default());
    sort_entries(&mut recent, SortKey::DateDesc, unit);
    recent.truncate(10);

    println!("Recent workouts:");
    for entry in &recent {
        let summary = entry.metrics(unit);
        println!(
            "  {}  {:<22} {:<16} RPE {:>2}  volume {:.0} {}",
            entry.date,
            entry.exercise,
            entry.muscle_group,
            entry.rpe,
            summary.total_volume,
            unit.suffix()
        );
    }
    println!();

    println!("Muscle group distribution (grouped):");
    for (group, count) in insights::muscle_distribution(&log.entries, true, config) {
        println!("  {:<18} {}", group, count);
    }

    Ok(())
}

fn cmd_insights(data_file: &PathBuf, config: &Config) -> Result<()> {
    let log = WorkoutLog::load(data_file, config)?;
    let unit = config.units.default;

    report_rejected(&log, false);

    if log.is_empty() {
        println!("No workout entries yet. Log one with `liftlog add`.");
        return Ok(());
    }

    println!("╭─────────────────────────────────────────╮");
    println!("│  TRAINING INSIGHTS");
    println!("╰─────────────────────────────────────────╯");
    println!();

    println!("Muscle balance:");
    for share in insights::muscle_balance(&log.entries, unit, config) {
        println!(
            "  {:<18} {:>5.1}%  {}",
            share.muscle_group,
            share.share_percent,
            remark_label(share.remark)
        );
    }
    println!();

    let report = insights::recovery(&log.entries, config);
    match report.status {
        insights::RecoveryStatus::Warning => {
            println!(
                "⚠ Recovery warning: {} consecutive sessions above RPE {}",
                report.max_consecutive_high_rpe, config.analysis.high_rpe_threshold
            );
            println!("  Consider a rest day or reducing training intensity.");
        }
        insights::RecoveryStatus::Elevated => {
            println!(
                "⚠ High intensity streak: {} consecutive sessions above RPE {}",
                report.max_consecutive_high_rpe, config.analysis.high_rpe_threshold
            );
        }
        insights::RecoveryStatus::Ok => {
            println!("✓ Training intensity looks manageable.");
        }
    }
    println!();

    println!("Intensity zones:");
    for (zone, count) in insights::intensity_zones(&log.entries) {
        println!("  {:<16} {}", zone.label(), count);
    }
    println!();

    let stale = insights::undertrained_exercises(&log.entries, config);
    if stale.is_empty() {
        println!("✓ All exercises trained within the last {} weeks.", config.analysis.undertrained_weeks);
    } else {
        println!(
            "⚠ Not trained in the last {} weeks: {}",
            config.analysis.undertrained_weeks,
            stale.join(", ")
        );
    }
    println!();

    println!("Most trained exercises:");
    for (exercise, count) in insights::top_exercises(&log.entries, 5) {
        println!("  {:<22} {} sessions", exercise, count);
    }
    println!();

    let records = insights::set_rep_records(&log.entries, unit, 10);
    if !records.is_empty() {
        println!("Set & rep records:");
        for record in records {
            println!(
                "  {:<22} {:.0} {} x {} reps",
                record.exercise,
                record.weight,
                unit.suffix(),
                record.max_reps
            );
        }
        println!();
    }

    let lifts = insights::compound_lift_records(&log.entries, unit);
    if !lifts.is_empty() {
        println!("Estimated 1RM (compound lifts):");
        for (exercise, one_rm) in lifts {
            println!("  {:<22} {:.1} {}", exercise, one_rm, unit.suffix());
        }
        println!();
    }

    println!("Weekly volume (last 4 weeks):");
    let weekly = insights::weekly_volume(&log.entries, unit);
    let mut week_totals: std::collections::BTreeMap<NaiveDate, f64> = Default::default();
    for ((week, _group), volume) in &weekly {
        *week_totals.entry(*week).or_insert(0.0) += volume;
    }
    for (week, volume) in week_totals.iter().rev().take(4) {
        println!("  week of {}  {:.0} {}", week, volume, unit.suffix());
    }

    Ok(())
}

fn cmd_progress(
    data_file: &PathBuf,
    config: &Config,
    exercise: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    let log = WorkoutLog::load(data_file, config)?;
    let unit = config.units.default;

    report_rejected(&log, false);

    let filter = EntryFilter {
        exercise: Some(exercise.to_string()),
        from,
        to,
        ..Default::default()
    };
    let view: Vec<WorkoutEntry> = filter_entries(&log.entries, &filter)
        .into_iter()
        .cloned()
        .collect();

    if view.is_empty() {
        println!("No workout entries found for {:?}.", exercise);
        return Ok(());
    }

    let summary = insights::exercise_summary(&view, exercise, unit);
    println!("╭─────────────────────────────────────────╮");
    println!("│  {} PROGRESSION", summary.exercise.to_uppercase());
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Sessions:         {}", summary.sessions);
    println!("  Average RPE:      {:.1}", summary.average_rpe);
    println!(
        "  Best avg weight:  {:.1} {}",
        summary.best_average_weight,
        unit.suffix()
    );
    println!(
        "  Best est. 1RM:    {:.1} {}",
        summary.best_one_rep_max,
        unit.suffix()
    );
    println!(
        "  Total volume:     {:.0} {}",
        summary.total_volume,
        unit.suffix()
    );
    println!();

    let volume = insights::daily_volume_series(&view, unit);
    let rpe = insights::daily_rpe_series(&view);
    let weight = insights::daily_avg_weight_series(&view, unit);

    println!("{:<12} {:>10} {:>8} {:>8}", "Date", "Volume", "Avg Wt", "RPE");
    for (i, (date, daily_volume)) in volume.iter().enumerate() {
        let avg_weight = weight
            .iter()
            .find(|(d, _)| d == date)
            .map_or(0.0, |(_, w)| *w);
        let daily_rpe = rpe.get(i).map_or(0.0, |(_, r)| *r);
        println!(
            "{:<12} {:>10.0} {:>8.1} {:>8.1}",
            date.to_string(),
            daily_volume,
            avg_weight,
            daily_rpe
        );
    }

    Ok(())
}

fn cmd_export(
    data_file: &PathBuf,
    config: &Config,
    output: Option<PathBuf>,
    format: &str,
    filter: EntryFilter,
) -> Result<()> {
    let log = WorkoutLog::load(data_file, config)?;
    let unit = config.units.default;

    report_rejected(&log, false);

    let mut view = filter_entries(&log.entries, &filter);
    sort_entries(&mut view, SortKey::DateAsc, unit);

    let format = format.to_lowercase();
    let output = output.unwrap_or_else(|| {
        let stamp = chrono::Local::now().format("%Y%m%d");
        PathBuf::from(format!("workout_history_{stamp}.{format}"))
    });

    match format.as_str() {
        "csv" => export::write_csv(&output, &view)?,
        "json" => export::write_json(&output, &view)?,
        other => {
            eprintln!("✗ Unknown export format: {}. Use csv or json.", other);
            std::process::exit(2);
        }
    }

    println!("✓ Exported {} entries to {}", view.len(), output.display());
    Ok(())
}

fn remark_label(remark: insights::VolumeRemark) -> &'static str {
    match remark {
        insights::VolumeRemark::VeryHigh => "⚠ very high training volume",
        insights::VolumeRemark::Low => "⚠ low training volume",
        insights::VolumeRemark::Good => "✓ good training volume",
        insights::VolumeRemark::Balanced => "✓ balanced training volume",
    }
}

fn report_rejected(log: &WorkoutLog, show_details: bool) {
    if log.rejected.is_empty() {
        return;
    }

    eprintln!(
        "⚠ {} row(s) in {:?} were quarantined as invalid.",
        log.rejected.len(),
        log.path()
    );
    if show_details {
        for row in &log.rejected {
            eprintln!("  line {}: {}", row.line, row.reason);
        }
    } else {
        eprintln!("  Run `liftlog history --show-rejected` for details.");
    }
}
