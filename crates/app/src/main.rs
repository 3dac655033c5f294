use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use exam_core::model::{
    AdminSettings, DEFAULT_ADMIN_PASSWORD, DEFAULT_DURATION_SECS, ExamSettings,
};
use services::{AdminService, AppServices, Clock, ExamLoopService, LoginService};
use storage::answer_cache::FileAnswerCache;
use storage::question_bank::{import_questions, load_question_bank_file, sample_questions};
use storage::repository::Storage;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://exam.sqlite3";
const DEFAULT_CACHE_DIR: &str = ".exam-cache";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidDuration { raw: String },
    InvalidAdminPassword,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidDuration { raw } => {
                write!(f, "invalid --duration value (expected seconds > 0): {raw}")
            }
            ArgsError::InvalidAdminPassword => write!(f, "--admin-password cannot be empty"),
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

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn login(&self) -> Arc<LoginService> {
        self.services.login()
    }

    fn admin(&self) -> Arc<AdminService> {
        self.services.admin()
    }

    fn exam(&self) -> Arc<ExamLoopService> {
        self.services.exam()
    }
}

#[derive(Debug)]
struct UiArgs {
    db_url: String,
    exam: ExamSettings,
    admin: AdminSettings,
    cache_dir: PathBuf,
}

#[derive(Debug)]
struct SeedArgs {
    db_url: String,
    questions: Option<PathBuf>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui   [--db <sqlite_url>] [--duration <secs>]");
    eprintln!("                           [--cache-dir <path>] [--admin-password <secret>]");
    eprintln!("  cargo run -p app -- seed [--db <sqlite_url>] [--questions <file.json>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --duration {DEFAULT_DURATION_SECS}");
    eprintln!("  --cache-dir {DEFAULT_CACHE_DIR}");
    eprintln!("  --admin-password {DEFAULT_ADMIN_PASSWORD}");
    eprintln!("  --questions <built-in sample bank>");
    eprintln!();
    eprintln!("Environment:");
    eprintln!(
        "  EXAM_DB_URL, EXAM_DURATION_SECS, EXAM_CACHE_DIR, EXAM_ADMIN_PASSWORD, EXAM_QUESTIONS, RUST_LOG"
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

fn parse_duration(raw: String) -> Result<ExamSettings, ArgsError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .and_then(|secs| ExamSettings::new(secs).ok())
        .ok_or(ArgsError::InvalidDuration { raw })
}

fn parse_db_url(raw: String) -> Result<String, ArgsError> {
    if raw.trim().is_empty() {
        return Err(ArgsError::InvalidDbUrl { raw });
    }
    Ok(normalize_sqlite_url(raw))
}

fn default_db_url() -> Result<String, ArgsError> {
    std::env::var("EXAM_DB_URL")
        .ok()
        .map_or_else(|| Ok(DEFAULT_DB_URL.into()), parse_db_url)
}

impl UiArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = default_db_url()?;
        let mut exam = std::env::var("EXAM_DURATION_SECS")
            .ok()
            .map_or_else(|| Ok(ExamSettings::default()), parse_duration)?;
        let mut admin = std::env::var("EXAM_ADMIN_PASSWORD")
            .ok()
            .map_or_else(
                || Ok(AdminSettings::default()),
                |value| AdminSettings::new(value).map_err(|_| ArgsError::InvalidAdminPassword),
            )?;
        let mut cache_dir = std::env::var("EXAM_CACHE_DIR")
            .map_or_else(|_| PathBuf::from(DEFAULT_CACHE_DIR), PathBuf::from);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => db_url = parse_db_url(require_value(args, "--db")?)?,
                "--duration" => exam = parse_duration(require_value(args, "--duration")?)?,
                "--cache-dir" => cache_dir = PathBuf::from(require_value(args, "--cache-dir")?),
                "--admin-password" => {
                    let value = require_value(args, "--admin-password")?;
                    admin =
                        AdminSettings::new(value).map_err(|_| ArgsError::InvalidAdminPassword)?;
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
            exam,
            admin,
            cache_dir,
        })
    }
}

impl SeedArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = default_db_url()?;
        let mut questions = std::env::var("EXAM_QUESTIONS").ok().map(PathBuf::from);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => db_url = parse_db_url(require_value(args, "--db")?)?,
                "--questions" => {
                    questions = Some(PathBuf::from(require_value(args, "--questions")?));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, questions })
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
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    init_tracing();

    let mut iter = argv.into_iter();
    let report = |e: ArgsError| {
        eprintln!("{e}");
        print_usage();
        e
    };

    match cmd {
        Command::Ui => {
            let parsed = UiArgs::parse(&mut iter).map_err(report)?;
            run_ui(parsed).await
        }
        Command::Seed => {
            let parsed = SeedArgs::parse(&mut iter).map_err(report)?;
            run_seed(parsed).await
        }
    }
}

async fn run_ui(args: UiArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&args.db_url)?;
    let cache = Arc::new(FileAnswerCache::new(&args.cache_dir));
    let services = AppServices::new_sqlite(
        &args.db_url,
        Clock::default_clock(),
        args.exam,
        args.admin,
        cache,
    )
    .await?;
    tracing::info!(
        db = %args.db_url,
        duration_secs = args.exam.duration_secs(),
        cache_dir = %args.cache_dir.display(),
        "starting desktop ui"
    );

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Online Test")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

async fn run_seed(args: SeedArgs) -> Result<(), Box<dyn std::error::Error>> {
    prepare_sqlite_file(&args.db_url)?;
    let storage = Storage::sqlite(&args.db_url).await?;
    let questions = match &args.questions {
        Some(path) => load_question_bank_file(path)?,
        None => sample_questions(),
    };
    let count = import_questions(storage.questions.as_ref(), &questions).await?;
    println!("Seeded {count} questions into {}", args.db_url);
    Ok(())
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

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
