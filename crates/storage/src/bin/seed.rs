use std::fmt;

use chrono::{DateTime, Duration, Utc};
use korean_core::Catalog;
use korean_core::model::{LevelProgress, UserId, grade_quiz};
use storage::repository::{ProgressRecord, QuizAttemptRecord, Storage};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    user: UserId,
    lessons: u32,
    attempts: u32,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidUser { raw: String },
    InvalidLessons { raw: String },
    InvalidAttempts { raw: String },
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidUser { raw } => write!(f, "invalid --user value (expected UUID): {raw}"),
            ArgsError::InvalidLessons { raw } => write!(f, "invalid --lessons value: {raw}"),
            ArgsError::InvalidAttempts { raw } => write!(f, "invalid --attempts value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("KOREAN_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut user = std::env::var("KOREAN_USER")
            .ok()
            .and_then(|value| value.parse::<UserId>().ok());
        let mut lessons = std::env::var("KOREAN_SEED_LESSONS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(4);
        let mut attempts = std::env::var("KOREAN_SEED_ATTEMPTS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(2);
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--user" => {
                    let value = require_value(&mut args, "--user")?;
                    let parsed = value
                        .parse::<UserId>()
                        .map_err(|_| ArgsError::InvalidUser { raw: value.clone() })?;
                    user = Some(parsed);
                }
                "--lessons" => {
                    let value = require_value(&mut args, "--lessons")?;
                    lessons = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidLessons { raw: value.clone() })?;
                }
                "--attempts" => {
                    let value = require_value(&mut args, "--attempts")?;
                    attempts = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidAttempts { raw: value.clone() })?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            user: user.unwrap_or_else(UserId::random),
            lessons,
            attempts,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>     SQLite URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --user <uuid>         Learner id to seed (default: random)");
    eprintln!("  --lessons <n>         Lessons to mark completed, in curriculum order (default: 4)");
    eprintln!("  --attempts <n>        Sample quiz attempts to append (default: 2)");
    eprintln!("  --now <rfc3339>       Fixed current time for deterministic seeding");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  KOREAN_DB_URL, KOREAN_USER, KOREAN_SEED_LESSONS, KOREAN_SEED_ATTEMPTS");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let catalog = Catalog::built_in();
    let now = args.now.unwrap_or_else(Utc::now);

    // Walk the curriculum in progression order, completing lessons until the
    // requested count runs out.
    let mut remaining = args.lessons;
    let mut completed = 0u32;
    for level in catalog.levels() {
        if remaining == 0 {
            break;
        }
        let level_lessons = catalog.lessons_for_level(level.id());
        let mut row = match storage.progress.get(args.user, level.id()).await? {
            Some(record) => record.into_progress()?,
            None => LevelProgress::start(args.user, level.id(), now),
        };
        for lesson in &level_lessons {
            if remaining == 0 {
                break;
            }
            row.record_completion(lesson, &level_lessons, 100, now)?;
            remaining -= 1;
            completed += 1;
        }
        storage
            .progress
            .upsert(ProgressRecord::from_progress(&row))
            .await?;
    }

    // Append full-marks attempts against the built-in quiz bank, one per day
    // going backwards so history ordering is visible.
    let questions = catalog.quiz_bank();
    let selections: Vec<Option<usize>> =
        questions.iter().map(|q| Some(q.correct_index())).collect();
    for i in 0..args.attempts {
        let graded = grade_quiz(questions, &selections)?;
        let attempt = QuizAttemptRecord {
            id: None,
            user_id: args.user,
            score: graded.score,
            total_questions: graded.total_questions,
            answers: graded.answers,
            completed_at: now - Duration::days(i64::from(i)),
        };
        let _ = storage.quiz_attempts.append_attempt(attempt).await?;
    }

    println!(
        "Seeded user {} with {} completed lessons and {} quiz attempts into {}",
        args.user, completed, args.attempts, args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
