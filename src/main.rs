use chrono::{DateTime, Utc};
use env_logger::Env;
use log::info;
use mistake_tracker::analytics::Dashboard;
use mistake_tracker::analytics::dashboard::validate_mistakes;
use mistake_tracker::cli::{Args, Command, TaskCommand, parse_date};
use mistake_tracker::database::{Database, NewMistake};
use mistake_tracker::database_factory::{DatabaseConfig, DatabaseFactory};
use mistake_tracker::date_provider::DateProvider;
use mistake_tracker::error::{Error, Result};
use mistake_tracker::history::{DEFAULT_RECENT_LIMIT, history_page, recent_mistakes, revision_queue};
use mistake_tracker::planner::{DEFAULT_SUGGESTION_LIMIT, plan};
use mistake_tracker::records::MistakeRecord;
use mistake_tracker::report;
use mistake_tracker::source::{JsonSnapshotSource, RecordSource, fetch_records};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = Args::parse_args();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let db_config = args.database_config().map_err(Error::InvalidArgument)?;
    let dashboard = Dashboard::new(args.analytics_config());
    let use_color = !args.no_color;
    let user = args.user.as_str();

    if let Command::Dashboard {
        json,
        from_json: Some(path),
        ..
    } = &args.command
    {
        info!("Reading records from {}", path.display());
        let source = JsonSnapshotSource::from_path(path)?;
        let now = db_config.date_provider().get_current_time();
        return show_dashboard(&source, &dashboard, user, now, *json, use_color);
    }

    let db = open(&db_config)?;
    let now = db.get_current_time();
    let bucketer = dashboard.bucketer();

    match &args.command {
        Command::Log {
            subject,
            chapter,
            mistake_type,
            difficulty,
            notes,
        } => {
            if chapter.trim().is_empty() {
                return Err(Error::InvalidArgument("chapter must not be empty".to_string()));
            }
            let id = db.log_mistake(&NewMistake {
                user_id: user.to_string(),
                subject: *subject,
                chapter: chapter.trim().to_string(),
                mistake_type: *mistake_type,
                difficulty: *difficulty,
                notes: notes.clone(),
            })?;
            println!("Logged mistake {}", id);
        }
        Command::Review { id } => {
            if db.mark_reviewed(id)? {
                println!("Marked {} as reviewed", id);
            } else {
                println!("{} was already reviewed", id);
            }
        }
        Command::Dashboard { json, .. } => {
            show_dashboard(&db, &dashboard, user, now, *json, use_color)?;
        }
        Command::History { .. } => {
            let records = user_mistakes(&db, user)?;
            if let Some((filter, page, page_size)) = args.command.history_query() {
                let page = history_page(&records, &filter, page, page_size);
                print!("{}", report::render_history(&page, now, bucketer, use_color));
            }
        }
        Command::Revise => {
            let records = user_mistakes(&db, user)?;
            let queue = revision_queue(&records);
            print!("{}", report::render_revision_queue(&queue, now, bucketer, use_color));
        }
        Command::Goal { target, text } => {
            if *target <= 0 {
                return Err(Error::InvalidArgument(
                    "goal target must be a positive number".to_string(),
                ));
            }
            let week_start = bucketer.week_start(now);
            let text = text
                .clone()
                .unwrap_or_else(|| format!("Review {} mistakes", target));
            db.set_goal(user, &text, *target, week_start)?;
            println!("Goal for the week of {}: {}", week_start, text);
        }
        Command::Task { action } => match action {
            TaskCommand::Add {
                subject,
                topic,
                minutes,
                date,
            } => {
                let date = match date {
                    Some(value) => parse_date("--date", value).map_err(Error::InvalidArgument)?,
                    None => bucketer.today(now),
                };
                let id = db.add_task(user, *subject, topic, *minutes, date)?;
                println!("Planned task {} for {}", id, date);
            }
            TaskCommand::Done { id } => {
                db.complete_task(id)?;
                println!("Completed task {}", id);
            }
            TaskCommand::Reopen { id } => {
                db.reopen_task(id)?;
                println!("Reopened task {}", id);
            }
            TaskCommand::Remove { id } => {
                db.delete_task(id)?;
                println!("Removed task {}", id);
            }
        },
        Command::Plan { .. } => {
            let tasks = db.fetch_tasks(user)?;
            let records = user_mistakes(&db, user)?;
            let view = plan(
                &tasks,
                &records,
                bucketer.today(now),
                dashboard.config().chapter_grouping,
                DEFAULT_SUGGESTION_LIMIT,
            );
            print!("{}", report::render_planner(&view, use_color));
        }
    }

    Ok(())
}

fn open(config: &DatabaseConfig) -> Result<Database> {
    let db = DatabaseFactory::create(config)?;
    info!("Using database {}", config.get_path());
    Ok(db)
}

fn user_mistakes(db: &Database, user: &str) -> Result<Vec<MistakeRecord>> {
    Ok(validate_mistakes(&db.fetch_mistakes(user)?)?)
}

fn show_dashboard<S: RecordSource + ?Sized>(
    source: &S,
    dashboard: &Dashboard,
    user: &str,
    now: DateTime<Utc>,
    json: bool,
    use_color: bool,
) -> Result<()> {
    let week_start = dashboard.bucketer().week_start(now);
    let (mistakes, goals) = fetch_records(source, user, week_start)?;
    let snapshot = dashboard.compute(&mistakes, &goals, now)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        let recent = recent_mistakes(&mistakes, DEFAULT_RECENT_LIMIT);
        print!(
            "{}",
            report::render_dashboard(&snapshot, &recent, now, dashboard.bucketer(), use_color)
        );
    }
    Ok(())
}
