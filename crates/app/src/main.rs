use std::fmt;
use std::io::{BufRead, Write as _};

use korean_core::model::{LessonId, LevelId, UserId};
use services::auth::{AuthClient, AuthSession};
use services::progress_service::DEFAULT_LESSON_SCORE;
use services::{AppServices, Clock};
use tracing::debug;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidUser { raw: String },
    InvalidLevel { raw: String },
    InvalidLesson { raw: String },
    InvalidScore { raw: String },
    InvalidCount { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidUser { raw } => write!(f, "invalid --user value (expected UUID): {raw}"),
            ArgsError::InvalidLevel { raw } => write!(f, "invalid --level value: {raw}"),
            ArgsError::InvalidLesson { raw } => write!(f, "invalid --lesson value: {raw}"),
            ArgsError::InvalidScore { raw } => write!(f, "invalid --score value: {raw}"),
            ArgsError::InvalidCount { raw } => write!(f, "invalid --count value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Lessons,
    Resume,
    Complete,
    Quiz,
    History,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "lessons" => Some(Self::Lessons),
            "resume" => Some(Self::Resume),
            "complete" => Some(Self::Complete),
            "quiz" => Some(Self::Quiz),
            "history" => Some(Self::History),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    user: Option<UserId>,
    token: Option<String>,
    level: Option<LevelId>,
    lesson: Option<LessonId>,
    score: u32,
    count: usize,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("KOREAN_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://dev.sqlite3".into(), normalize_sqlite_url);
        let mut user = std::env::var("KOREAN_USER")
            .ok()
            .and_then(|value| value.parse::<UserId>().ok());
        let mut token = std::env::var("KOREAN_AUTH_TOKEN").ok();
        let mut level = None;
        let mut lesson = None;
        let mut score = DEFAULT_LESSON_SCORE;
        let mut count = 5usize;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--user" => {
                    let value = require_value(args, "--user")?;
                    let parsed = value
                        .parse::<UserId>()
                        .map_err(|_| ArgsError::InvalidUser { raw: value.clone() })?;
                    user = Some(parsed);
                }
                "--token" => {
                    token = Some(require_value(args, "--token")?);
                }
                "--level" => {
                    let value = require_value(args, "--level")?;
                    let parsed = value
                        .parse::<LevelId>()
                        .map_err(|_| ArgsError::InvalidLevel { raw: value.clone() })?;
                    level = Some(parsed);
                }
                "--lesson" => {
                    let value = require_value(args, "--lesson")?;
                    let parsed = value
                        .parse::<LessonId>()
                        .map_err(|_| ArgsError::InvalidLesson { raw: value.clone() })?;
                    lesson = Some(parsed);
                }
                "--score" => {
                    let value = require_value(args, "--score")?;
                    score = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidScore { raw: value.clone() })?;
                }
                "--count" => {
                    let value = require_value(args, "--count")?;
                    count = value
                        .parse::<usize>()
                        .map_err(|_| ArgsError::InvalidCount { raw: value.clone() })?;
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
            user,
            token,
            level,
            lesson,
            score,
            count,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- lessons  [--level <id>]            list lessons with progress flags");
    eprintln!("  cargo run -p app -- resume                             show where to pick up");
    eprintln!("  cargo run -p app -- complete --lesson <id> [--score n] mark a lesson done");
    eprintln!("  cargo run -p app -- quiz     [--count <n>]             run a practice quiz");
    eprintln!("  cargo run -p app -- history                            show quiz attempts");
    eprintln!();
    eprintln!("Common options:");
    eprintln!("  --db <sqlite_url>   SQLite URL (default: sqlite://dev.sqlite3)");
    eprintln!("  --user <uuid>       local learner id");
    eprintln!("  --token <jwt>       access token, verified against the hosted auth service");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  KOREAN_DB_URL, KOREAN_USER, KOREAN_AUTH_TOKEN,");
    eprintln!("  KOREAN_AUTH_URL, KOREAN_AUTH_ANON_KEY");
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// Resolve the learner session: a verified token wins over a local id; with
/// neither, the session stays anonymous (reads only).
async fn resolve_session(args: &Args) -> Result<AuthSession, Box<dyn std::error::Error>> {
    if let Some(token) = &args.token {
        let client = AuthClient::from_env();
        let session = client.verify_token(token).await?;
        return Ok(session);
    }
    if let Some(user) = args.user {
        return Ok(AuthSession::SignedIn(user));
    }
    Ok(AuthSession::Anonymous)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None | Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    argv.remove(0);

    let mut iter = argv.into_iter();
    let args = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&args.db_url)?;
    let session = resolve_session(&args).await?;
    debug!(signed_in = session.is_signed_in(), "resolved session");

    let services = AppServices::new_sqlite(&args.db_url, Clock::default_clock(), session).await?;
    services.progress().refresh().await?;

    match cmd {
        Command::Lessons => print_lessons(&services, args.level),
        Command::Resume => print_resume(&services),
        Command::Complete => {
            let lesson = args.lesson.ok_or_else(|| {
                eprintln!("complete requires --lesson <id>");
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "missing --lesson")
            })?;
            complete(&services, lesson, args.score).await?;
            Ok(())
        }
        Command::Quiz => run_quiz(&services, args.count).await,
        Command::History => print_history(&services).await,
    }
}

fn print_lessons(
    services: &AppServices,
    only_level: Option<LevelId>,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = services.catalog();
    let progress = services.progress();

    for level in catalog.levels() {
        if only_level.is_some_and(|id| id != level.id()) {
            continue;
        }
        println!(
            "[{}] {} - {}",
            level.id(),
            level.level_name(),
            level.description()
        );
        for status in progress.lessons_for_level(level.id()) {
            let marker = if status.is_completed {
                "done"
            } else if status.is_unlocked {
                "open"
            } else {
                "locked"
            };
            println!(
                "  {:>2}. {:<45} #{:<3} {:>3} min  [{}]",
                status.lesson.lesson_number(),
                status.lesson.title(),
                status.lesson.id(),
                status.lesson.estimated_time_minutes(),
                marker
            );
        }
    }
    Ok(())
}

fn print_resume(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let progress = services.progress();
    let resume = progress.resume_point();
    match resume.lesson {
        Some(lesson) => println!(
            "Resume at {} - lesson {} \"{}\" (#{})",
            resume.level.level_name(),
            lesson.lesson_number(),
            lesson.title(),
            lesson.id()
        ),
        None => println!(
            "Resume at {} - no lesson in progress",
            resume.level.level_name()
        ),
    }
    println!("Total score: {}", progress.total_score());
    Ok(())
}

async fn complete(
    services: &AppServices,
    lesson: LessonId,
    score: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let receipt = services.progress().complete_lesson(lesson, score).await?;
    match receipt.outcome {
        korean_core::model::CompletionOutcome::AlreadyCompleted => {
            println!("Lesson #{lesson} was already completed; nothing changed.");
        }
        korean_core::model::CompletionOutcome::Recorded { level_completed } => {
            println!(
                "Completed lesson #{lesson}. Level score: {}.",
                receipt.level_total_score
            );
            if level_completed {
                println!("Level {} is complete!", receipt.level_id);
            } else if let Some(next) = receipt.current_lesson_id {
                println!("Next up: lesson #{next}.");
            }
        }
    }
    Ok(())
}

async fn run_quiz(
    services: &AppServices,
    count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let quizzes = services.quizzes();
    let questions: Vec<korean_core::model::QuizQuestion> =
        quizzes.practice_set(count).into_iter().cloned().collect();
    if questions.is_empty() {
        println!("No quiz questions available.");
        return Ok(());
    }

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut selections: Vec<Option<usize>> = Vec::with_capacity(questions.len());

    for (i, question) in questions.iter().enumerate() {
        println!();
        println!("{}. {}", i + 1, question.question());
        for (j, option) in question.options().iter().enumerate() {
            println!("   {}) {option}", j + 1);
        }
        print!("> ");
        std::io::stdout().flush()?;

        let selection = lines
            .next()
            .transpose()?
            .and_then(|line| line.trim().parse::<usize>().ok())
            .and_then(|n| n.checked_sub(1))
            .filter(|n| *n < question.options().len());
        selections.push(selection);
    }

    let submitted = quizzes.submit(&questions, &selections).await?;
    println!();
    println!(
        "Score: {}/{}",
        submitted.graded.score, submitted.graded.total_questions
    );
    for (question, answer) in questions.iter().zip(&submitted.graded.answers) {
        if !answer.correct {
            let right = &question.options()[question.correct_index()];
            match question.explanation() {
                Some(explanation) => println!("  ✗ {} → {right} ({explanation})", question.question()),
                None => println!("  ✗ {} → {right}", question.question()),
            }
        }
    }
    Ok(())
}

async fn print_history(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let attempts = services.quizzes().history().await?;
    if attempts.is_empty() {
        println!("No quiz attempts yet.");
        return Ok(());
    }
    for attempt in attempts {
        println!(
            "{}  {}/{}",
            attempt.completed_at.format("%Y-%m-%d %H:%M"),
            attempt.score,
            attempt.total_questions
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
