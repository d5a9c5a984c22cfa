use std::fmt;

use maturity_core::catalog::{self, CATEGORIES};
use maturity_core::model::{MaturityLevel, QuestionId};
use services::{AppServices, AssessmentOverview, AssessmentStore, CategoryDetail};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { name: &'static str },
    UnknownArg(String),
    UnknownCategory(String),
    UnknownQuestion(String),
    InvalidLevel { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { name } => write!(f, "missing <{name}>"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCategory(raw) => write!(f, "unknown category: {raw}"),
            ArgsError::UnknownQuestion(raw) => write!(f, "unknown question: {raw}"),
            ArgsError::InvalidLevel { raw } => {
                write!(f, "invalid level (expected 1-5): {raw}")
            }
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

fn parse_level(raw: String) -> Result<MaturityLevel, ArgsError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|value| MaturityLevel::new(value).ok())
        .ok_or(ArgsError::InvalidLevel { raw })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- overview                     [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- show <category>              [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- answer <question-id> <1-5>   [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- seed [--level <1-5>]         [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Categories:");
    for def in &CATEGORIES {
        eprintln!("  {:<14} {}", def.id, def.title);
    }
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://maturity.sqlite3");
    eprintln!("  --level 1");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MATURITY_DB_URL, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Overview,
    Show { category: &'static catalog::CategoryDef },
    Answer { question: QuestionId, level: MaturityLevel },
    Seed { level: MaturityLevel },
}

#[derive(Debug)]
struct Args {
    db_url: String,
    command: Command,
}

impl Args {
    fn parse(argv: Vec<String>) -> Result<Option<Self>, ArgsError> {
        let mut db_url = std::env::var("MATURITY_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://maturity.sqlite3".into(), normalize_sqlite_url);
        let mut positionals = Vec::new();
        let mut level: Option<MaturityLevel> = None;

        let mut args = argv.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--level" => {
                    level = Some(parse_level(require_value(&mut args, "--level")?)?);
                }
                "--help" | "-h" => return Ok(None),
                other if other.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => positionals.push(arg),
            }
        }

        let mut positionals = positionals.into_iter();
        let command = match positionals.next().as_deref() {
            None | Some("overview") => Command::Overview,
            Some("show") => {
                let raw = positionals
                    .next()
                    .ok_or(ArgsError::MissingArgument { name: "category" })?;
                let category = CATEGORIES
                    .iter()
                    .find(|def| def.id == raw.trim())
                    .ok_or(ArgsError::UnknownCategory(raw))?;
                Command::Show { category }
            }
            Some("answer") => {
                let raw = positionals
                    .next()
                    .ok_or(ArgsError::MissingArgument { name: "question-id" })?;
                let question = QuestionId::new(raw)
                    .map_err(|_| ArgsError::MissingArgument { name: "question-id" })?;
                let level = parse_level(
                    positionals
                        .next()
                        .ok_or(ArgsError::MissingArgument { name: "level" })?,
                )?;
                Command::Answer { question, level }
            }
            Some("seed") => Command::Seed {
                level: level.unwrap_or(MaturityLevel::LOWEST),
            },
            Some(other) => return Err(ArgsError::UnknownArg(other.to_string())),
        };

        if let Some(extra) = positionals.next() {
            return Err(ArgsError::UnknownArg(extra));
        }

        Ok(Some(Self { db_url, command }))
    }
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

fn print_overview(overview: &AssessmentOverview) {
    println!(
        "Overall maturity: {}% ({})  answered {}/{}",
        overview.overall_score,
        overview.overall_band,
        overview.answered_questions,
        overview.total_questions
    );
    for row in &overview.categories {
        println!(
            "  {:<30} {:>3}%  {:<12} {}/{}",
            row.title, row.score, row.band, row.answered_questions, row.total_questions
        );
    }
}

fn print_detail(detail: &CategoryDetail) {
    println!("{} ({}% {})", detail.title, detail.score, detail.band);
    println!("  {}", detail.description);
    for question in &detail.questions {
        let marker = if question.answered { ' ' } else { '*' };
        println!(
            "  [{}]{} {:<11} {}",
            question.selected_level, marker, question.question_id, question.prompt
        );
    }
    println!("  (* not answered yet)");
    println!();
    for level in MaturityLevel::all() {
        println!("  {level} {:<26} {}", level.name(), level.description());
    }
}

fn record(
    store: &AssessmentStore,
    question: QuestionId,
    level: MaturityLevel,
) -> Result<(), Box<dyn std::error::Error>> {
    let def = catalog::category_of(&question)
        .ok_or_else(|| ArgsError::UnknownQuestion(question.to_string()))?;
    let update = store.update_response(question.clone(), def.category_id()?, level)?;
    info!(question = %question, level = %level, ?update, "recorded answer");
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let parsed = match Args::parse(argv) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            return Err(err.into());
        }
    };

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url).await?;
    let store = services.assessment();

    match parsed.command {
        Command::Overview => print_overview(&store.overview()),
        Command::Show { category } => {
            print_detail(&CategoryDetail::from_state(&store.snapshot(), category)?);
        }
        Command::Answer { question, level } => {
            record(&store, question, level)?;
            print_overview(&store.overview());
        }
        Command::Seed { level } => {
            for def in &CATEGORIES {
                for question in def.questions {
                    record(&store, QuestionId::new(question.id)?, level)?;
                }
            }
            print_overview(&store.overview());
        }
    }

    store.flush().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn defaults_to_overview() {
        let parsed = Args::parse(args(&["--db", "sqlite::memory:"]))
            .unwrap()
            .unwrap();
        assert_eq!(parsed.command, Command::Overview);
        assert_eq!(parsed.db_url, "sqlite::memory:");
    }

    #[test]
    fn parses_answer_command() {
        let parsed = Args::parse(args(&["answer", "detect-2", "4"]))
            .unwrap()
            .unwrap();
        assert_eq!(
            parsed.command,
            Command::Answer {
                question: QuestionId::new("detect-2").unwrap(),
                level: MaturityLevel::new(4).unwrap(),
            }
        );
    }

    #[test]
    fn blank_question_id_is_a_missing_argument() {
        let err = Args::parse(args(&["answer", "  ", "3"])).unwrap_err();
        assert!(matches!(
            err,
            ArgsError::MissingArgument {
                name: "question-id"
            }
        ));
    }

    #[test]
    fn rejects_out_of_range_level() {
        let err = Args::parse(args(&["answer", "detect-2", "7"])).unwrap_err();
        assert!(matches!(err, ArgsError::InvalidLevel { .. }));
    }

    #[test]
    fn show_requires_known_category() {
        let err = Args::parse(args(&["show", "marketing"])).unwrap_err();
        assert!(matches!(err, ArgsError::UnknownCategory(_)));

        let parsed = Args::parse(args(&["show", "recovery"])).unwrap().unwrap();
        assert!(matches!(parsed.command, Command::Show { category } if category.id == "recovery"));
    }

    #[test]
    fn seed_level_flag() {
        let parsed = Args::parse(args(&["seed", "--level", "3"])).unwrap().unwrap();
        assert_eq!(
            parsed.command,
            Command::Seed {
                level: MaturityLevel::new(3).unwrap()
            }
        );
    }

    #[test]
    fn normalizes_relative_paths() {
        let url = normalize_sqlite_url("sqlite:data/maturity.sqlite3".to_string());
        assert!(url.starts_with("sqlite://"));
        assert!(url.ends_with("data/maturity.sqlite3"));
    }
}
