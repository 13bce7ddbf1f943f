use chrono::{Duration, Utc};
use env_logger::Env;
use mistake_tracker::database::{Database, MistakesRepository, NewMistake};
use mistake_tracker::records::{Difficulty, MistakeType, Subject};
use rand::Rng;
use rand::seq::SliceRandom;
use std::env;

const DEFAULT_USER: &str = "local";
const DEFAULT_COUNT: usize = 60;
const SPREAD_DAYS: i64 = 35;

const NOTES: &[&str] = &[
    "Dropped a negative sign",
    "Used the wrong unit",
    "Mixed up the formula",
    "Ran out of time on the last part",
    "Did not read 'not' in the question",
];

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 4 {
        eprintln!("Usage: {} <database_file> [user_id] [count]", args[0]);
        eprintln!();
        eprintln!("Fills a database with random mistakes spread over the last weeks.");
        eprintln!();
        eprintln!("Example: {} mistake_tracker.db local 60", args[0]);
        std::process::exit(1);
    }

    let db_path = &args[1];
    let user_id = args.get(2).map_or(DEFAULT_USER, String::as_str);
    let count = match args.get(3).map(|raw| raw.parse::<usize>()) {
        Some(Ok(count)) => count,
        Some(Err(_)) => {
            eprintln!("Error: count must be a non-negative number");
            std::process::exit(1);
        }
        None => DEFAULT_COUNT,
    };

    let db = match Database::new(db_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Error opening database: {}", e);
            std::process::exit(1);
        }
    };

    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let mut reviewed = 0;

    for _ in 0..count {
        let subject = *Subject::ALL.choose(&mut rng).unwrap_or(&Subject::Physics);
        let chapter = subject.chapters().choose(&mut rng).unwrap_or(&"General");
        let created_at = now
            - Duration::days(rng.gen_range(0..SPREAD_DAYS))
            - Duration::minutes(rng.gen_range(0..24 * 60));

        let mistake = NewMistake {
            user_id: user_id.to_string(),
            subject,
            chapter: chapter.to_string(),
            mistake_type: *MistakeType::ALL
                .choose(&mut rng)
                .unwrap_or(&MistakeType::SillyMistake),
            difficulty: *Difficulty::ALL.choose(&mut rng).unwrap_or(&Difficulty::Medium),
            notes: NOTES
                .choose(&mut rng)
                .filter(|_| rng.gen_bool(0.4))
                .map(|note| note.to_string()),
        };

        let repo = MistakesRepository::new(&db.conn, Box::new(move || created_at));
        let id = match repo.insert(&mistake) {
            Ok(id) => id,
            Err(e) => {
                eprintln!("Error inserting mistake: {}", e);
                std::process::exit(1);
            }
        };

        if rng.gen_bool(0.3) {
            let reviewed_at = (created_at + Duration::days(rng.gen_range(0..5))).min(now);
            let repo = MistakesRepository::new(&db.conn, Box::new(move || reviewed_at));
            if let Err(e) = repo.mark_reviewed(&id) {
                eprintln!("Error reviewing mistake: {}", e);
                std::process::exit(1);
            }
            reviewed += 1;
        }
    }

    println!(
        "Seeded {} mistake(s) for {} ({} reviewed) into {}",
        count, user_id, reviewed, db_path
    );
}
