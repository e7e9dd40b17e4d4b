use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mc_content::config::{report_fallbacks_from_env_value, DEFAULT_TIMESTAMP_FORMAT};
use mc_content::{
    legacy, read_course_json, ContentConfig, Course, FallbackObserver, NewGlossaryTerm,
    NewRecallNote, Normalizer, Notebook, QuizSession, SilentObserver, TracingObserver,
};

#[derive(Parser)]
#[command(name = "microcourse")]
#[command(about = "Normalize and inspect microcourse content")]
struct Cli {
    /// Log a warning for every payload field that had to be degraded
    #[arg(long, global = true)]
    report_fallbacks: bool,

    /// strftime pattern for timestamps on locally created recall notes
    #[arg(long, global = true, env = "MC_TIMESTAMP_FORMAT")]
    timestamp_format: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the normalized course
    Normalize {
        /// Course document (JSON, as returned by the backend)
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// List quiz questions, or score a set of answers
    Quiz {
        path: PathBuf,
        /// Zero-based answers, one per question (e.g. 0,2,1)
        #[arg(long, value_delimiter = ',')]
        answers: Vec<usize>,
    },
    /// List or search glossary terms
    Glossary {
        path: PathBuf,
        #[arg(long)]
        search: Option<String>,
        /// Preview adding a term (requires --definition)
        #[arg(long, requires = "definition")]
        term: Option<String>,
        #[arg(long, requires = "term")]
        definition: Option<String>,
    },
    /// List or search recall notes
    Notes {
        path: PathBuf,
        #[arg(long)]
        search: Option<String>,
        /// Preview adding a note (requires --section)
        #[arg(long, requires = "section")]
        add: Option<String>,
        /// Id of the section the new note belongs to
        #[arg(long, requires = "add")]
        section: Option<String>,
    },
    /// Parse an old string-encoded payload
    Legacy {
        #[arg(value_enum)]
        kind: LegacyKind,
        path: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LegacyKind {
    Notes,
    Quiz,
    Glossary,
}

/// Entry point for the `microcourse` CLI.
///
/// # Environment Variables
/// - `MC_REPORT_FALLBACKS`: report degraded fields (same as `--report-fallbacks`)
/// - `MC_TIMESTAMP_FORMAT`: strftime pattern for new recall notes
/// - `RUST_LOG`: tracing filter directives
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("microcourse=info".parse()?)
                .add_directive("mc_content=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let tracing_observer = TracingObserver;
    let silent_observer = SilentObserver;
    let observer: &dyn FallbackObserver = if config.report_fallbacks() {
        &tracing_observer
    } else {
        &silent_observer
    };
    let normalizer = Normalizer::new(observer);

    match cli.command {
        Some(Commands::Normalize { path, format }) => {
            let course = load_course(&path, &normalizer)?;
            println!("{}", render(&course, format)?);
        }
        Some(Commands::Quiz { path, answers }) => {
            let course = load_course(&path, &normalizer)?;
            if answers.is_empty() {
                print_questions(&course);
            } else {
                score_answers(course, &answers);
            }
        }
        Some(Commands::Glossary {
            path,
            search,
            term,
            definition,
        }) => {
            let course = load_course(&path, &normalizer)?;
            let mut notebook = Notebook::from_course(&course, config);
            if let (Some(term), Some(definition)) = (term, definition) {
                let request = NewGlossaryTerm::new(&term, &definition, course.id.clone())?;
                let added = notebook.add_term(&term, &definition)?;
                println!("Pending term {}: {}", added.id, added.term);
                println!("{}", serde_json::to_string_pretty(&request)?);
            }
            let terms = notebook.search_terms(search.as_deref().unwrap_or(""));
            if terms.is_empty() {
                println!("No glossary terms found.");
            }
            for term in terms {
                println!("{} | {} | {}", term.id, term.term, term.definition);
            }
        }
        Some(Commands::Notes {
            path,
            search,
            add,
            section,
        }) => {
            let course = load_course(&path, &normalizer)?;
            let mut notebook = Notebook::from_course(&course, config);
            if let (Some(content), Some(section_id)) = (add, section) {
                ensure_section(&course, &section_id)?;
                let request = NewRecallNote::new(&content, section_id)?;
                let added = notebook.add_note(&content)?;
                println!("Pending note {} at {}", added.id, added.timestamp);
                println!("{}", serde_json::to_string_pretty(&request)?);
            }
            let notes = notebook.search_notes(search.as_deref().unwrap_or(""));
            if notes.is_empty() {
                println!("No recall notes found.");
            }
            for note in notes {
                println!("{} | {} | {}", note.id, note.timestamp, note.content);
            }
        }
        Some(Commands::Legacy { kind, path }) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let rendered = match kind {
                LegacyKind::Notes => {
                    serde_json::to_string_pretty(&legacy::parse_recall_notes(&text, &config))?
                }
                LegacyKind::Quiz => serde_json::to_string_pretty(&legacy::parse_quiz(&text))?,
                LegacyKind::Glossary => {
                    serde_json::to_string_pretty(&legacy::parse_glossary(&text))?
                }
            };
            println!("{rendered}");
        }
        None => {
            println!("Use 'microcourse --help' for commands");
        }
    }

    Ok(())
}

/// Resolve configuration once: CLI flags, then environment, then defaults.
fn resolve_config(cli: &Cli) -> anyhow::Result<ContentConfig> {
    let report_fallbacks = cli.report_fallbacks
        || report_fallbacks_from_env_value(std::env::var("MC_REPORT_FALLBACKS").ok())?;
    let timestamp_format = cli
        .timestamp_format
        .clone()
        .unwrap_or_else(|| DEFAULT_TIMESTAMP_FORMAT.to_owned());
    Ok(ContentConfig::new(report_fallbacks, timestamp_format)?)
}

fn load_course(path: &Path, normalizer: &Normalizer<'_>) -> anyhow::Result<Course> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw = read_course_json(&text)
        .with_context(|| format!("failed to parse course document {}", path.display()))?;
    let course = normalizer.course(&raw);
    tracing::info!(
        sections = course.sections.len(),
        questions = course.quiz_questions.len(),
        "loaded course '{}'",
        course.title
    );
    Ok(course)
}

fn ensure_section(course: &Course, section_id: &str) -> anyhow::Result<()> {
    if course.sections.iter().any(|s| s.id == section_id) {
        return Ok(());
    }
    let known: Vec<&str> = course.sections.iter().map(|s| s.id.as_str()).collect();
    anyhow::bail!(
        "no section with id '{section_id}' (known: {})",
        known.join(", ")
    )
}

fn render(course: &Course, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(course)?,
        OutputFormat::Yaml => serde_yaml::to_string(course)?,
    })
}

fn print_questions(course: &Course) {
    if course.quiz_questions.is_empty() {
        println!("No quiz questions found.");
        return;
    }
    for (n, question) in course.quiz_questions.iter().enumerate() {
        println!("{}. {}", n + 1, question.text);
        for (i, option) in question.options.iter().enumerate() {
            let marker = if question.is_correct(i) { "*" } else { " " };
            println!("   {marker} {i}) {option}");
        }
        if question.correct_option().is_none() {
            println!(
                "   ! correct answer index {} matches no option",
                question.correct_answer_index
            );
        }
    }
}

fn score_answers(course: Course, answers: &[usize]) {
    let mut session = QuizSession::new(course.quiz_questions);
    for &answer in answers {
        let Some(question) = session.current() else {
            break;
        };
        let text = question.text.clone();
        session.select(answer);
        if let Some(outcome) = session.submit() {
            let verdict = if outcome.is_correct { "correct" } else { "wrong" };
            println!("Question {}: {text} -> {verdict}", session.position());
        }
        session.next();
    }
    if answers.len() < session.len() {
        tracing::warn!(
            "only {} of {} questions answered",
            answers.len(),
            session.len()
        );
    }
    println!(
        "You scored {} out of {} questions correctly.",
        session.score(),
        session.len()
    );
}
