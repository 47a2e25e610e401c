use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fundmatch::answers::{AnswerValue, UserAnswers};
use fundmatch::catalog::ProgramCatalog;
use fundmatch::config::AppConfig;
use fundmatch::criteria::CriteriaMatcher;
use fundmatch::error::AppError;
use fundmatch::question::{EngineState, QuestionEngine, SymptomQuestion};
use fundmatch::scoring::{Eligibility, EnhancedProgramResult, ScoringEngine, ScoringWeights};
use fundmatch::telemetry;
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "fundmatch",
    about = "Find funding programs through a short adaptive questionnaire",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer questions on the terminal, then print recommendations (default command)
    Interview(InterviewArgs),
    /// List every question the catalog supports, ranked by information value
    Questions(CatalogArgs),
    /// Show the next question for a set of answers
    Next(SessionArgs),
    /// Score and rank programs for a set of answers
    Recommend(RecommendArgs),
}

#[derive(Args, Debug, Default, Clone)]
struct CatalogArgs {
    /// Program catalog JSON (defaults to FUNDMATCH_CATALOG_PATH)
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Args, Debug, Default, Clone)]
struct SessionArgs {
    #[command(flatten)]
    catalog: CatalogArgs,
    /// JSON object of answers keyed by question id
    #[arg(long)]
    answers: Option<PathBuf>,
    /// Inline answer as question=value; separate multiple selections with commas
    #[arg(long = "answer", value_parser = parse_answer)]
    inline: Vec<(String, AnswerValue)>,
    /// Reference date for deadline checks (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct RecommendArgs {
    #[command(flatten)]
    session: SessionArgs,
    /// Only print the best N programs
    #[arg(long)]
    limit: Option<usize>,
    /// Hide programs below the eligibility threshold
    #[arg(long)]
    eligible_only: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct InterviewArgs {
    #[command(flatten)]
    catalog: CatalogArgs,
    /// Reference date for deadline checks (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    /// Number of recommendations printed at the end
    #[arg(long, default_value_t = 5)]
    limit: usize,
}

impl Default for InterviewArgs {
    fn default() -> Self {
        Self {
            catalog: CatalogArgs::default(),
            today: None,
            limit: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Debug, Serialize)]
struct RecommendationRow<'a> {
    rank: usize,
    id: &'a str,
    name: &'a str,
    score: u8,
    eligibility: &'static str,
    confidence: &'static str,
    gaps: usize,
    reason: &'a str,
}

#[derive(Debug, Serialize)]
struct NextQuestionView<'a> {
    question: Option<&'a SymptomQuestion>,
    state: &'a EngineState,
    remaining_programs: usize,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Interview(InterviewArgs::default()));

    match command {
        Command::Interview(args) => run_interview(&config, args),
        Command::Questions(args) => run_questions(&config, args),
        Command::Next(args) => run_next(&config, args),
        Command::Recommend(args) => run_recommend(&config, args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn parse_answer(raw: &str) -> Result<(String, AnswerValue), String> {
    let (question, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected question=value, got '{raw}'"))?;
    let question = question.trim();
    if question.is_empty() {
        return Err(format!("missing question id in '{raw}'"));
    }

    Ok((question.to_string(), answer_from_text(value)))
}

fn answer_from_text(raw: &str) -> AnswerValue {
    let selections: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect();

    match selections.as_slice() {
        [single] => AnswerValue::from(*single),
        _ => AnswerValue::from(selections),
    }
}

fn load_catalog(config: &AppConfig, args: &CatalogArgs) -> Result<ProgramCatalog, AppError> {
    let path = args
        .catalog
        .as_ref()
        .or(config.catalog_path.as_ref())
        .ok_or_else(|| {
            AppError::Input("no catalog given; pass --catalog or set FUNDMATCH_CATALOG_PATH".to_string())
        })?;

    let catalog = ProgramCatalog::from_path(path)?;
    info!(?config.environment, programs = catalog.len(), "catalog ready");
    Ok(catalog)
}

fn load_answers(args: &SessionArgs) -> Result<UserAnswers, AppError> {
    let mut answers = match &args.answers {
        Some(path) => read_answers(path)?,
        None => UserAnswers::new(),
    };

    for (question, value) in &args.inline {
        answers.insert(question.clone(), value.clone());
    }
    Ok(answers)
}

fn read_answers(path: &Path) -> Result<UserAnswers, AppError> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw)
        .map_err(|err| AppError::Input(format!("answers file {} is not a JSON object: {err}", path.display())))
}

fn matcher_for(today: Option<NaiveDate>) -> CriteriaMatcher {
    CriteriaMatcher::as_of(today.unwrap_or_else(|| Local::now().date_naive()))
}

fn run_questions(config: &AppConfig, args: CatalogArgs) -> Result<(), AppError> {
    let catalog = load_catalog(config, &args)?;
    let engine = QuestionEngine::new(catalog.programs(), config.questions.clone());

    println!("Questions for {} programs", catalog.len());
    for question in engine.get_all_questions() {
        let marker = if question.metadata.core { "core" } else { "overlay" };
        println!(
            "- {} [{}] affects {} programs, information value {}, rank {}",
            question.id,
            marker,
            question.metadata.programs_affected,
            question.metadata.information_value,
            question.metadata.rank_score
        );
        println!("  {}", question.prompt);
        let values: Vec<&str> = question
            .options
            .iter()
            .map(|option| option.value.as_str())
            .collect();
        println!("  options: {}", values.join(", "));
    }

    Ok(())
}

fn run_next(config: &AppConfig, args: SessionArgs) -> Result<(), AppError> {
    let catalog = load_catalog(config, &args.catalog)?;
    let answers = load_answers(&args)?;
    let mut engine = QuestionEngine::with_matcher(
        catalog.programs(),
        config.questions.clone(),
        matcher_for(args.today),
    );

    let question = engine.get_next_question(&answers);
    let view = NextQuestionView {
        question: question.as_ref(),
        state: engine.state(),
        remaining_programs: engine.get_remaining_program_count(),
    };

    serde_json::to_writer_pretty(io::stdout().lock(), &view).map_err(io::Error::from)?;
    println!();
    Ok(())
}

fn run_recommend(config: &AppConfig, args: RecommendArgs) -> Result<(), AppError> {
    let catalog = load_catalog(config, &args.session.catalog)?;
    let answers = load_answers(&args.session)?;
    let scorer = ScoringEngine::with_matcher(ScoringWeights::default(), matcher_for(args.session.today));

    let results: Vec<EnhancedProgramResult> = scorer
        .score_programs(&answers, &catalog.programs())
        .into_iter()
        .filter(|result| !args.eligible_only || result.eligibility == Eligibility::Eligible)
        .take(args.limit.unwrap_or(usize::MAX))
        .collect();

    match args.format {
        OutputFormat::Text => render_recommendations(&answers, &results),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(io::stdout().lock(), &results).map_err(io::Error::from)?;
            println!();
        }
        OutputFormat::Csv => write_csv(&results)?,
    }

    Ok(())
}

fn run_interview(config: &AppConfig, args: InterviewArgs) -> Result<(), AppError> {
    let catalog = load_catalog(config, &args.catalog)?;
    let matcher = matcher_for(args.today);
    let mut engine = QuestionEngine::with_matcher(catalog.programs(), config.questions.clone(), matcher);
    let mut answers = UserAnswers::new();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(question) = engine.get_next_question(&answers) {
        println!(
            "\n{} ({} programs remaining)",
            question.prompt,
            engine.get_remaining_program_count()
        );
        for (index, option) in question.options.iter().enumerate() {
            println!("  {}. {}", index + 1, option.label);
        }
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let value = interpret_choice(&question, &line);
        if value.is_empty() {
            println!("Skipping the remaining questions.");
            break;
        }
        answers.insert(question.id.clone(), value);
    }

    let survivors: Vec<_> = engine.get_remaining_programs().into_iter().cloned().collect();
    let results: Vec<EnhancedProgramResult> = ScoringEngine::with_matcher(ScoringWeights::default(), matcher)
        .score_programs(&answers, &survivors)
        .into_iter()
        .take(args.limit)
        .collect();

    render_recommendations(&answers, &results);
    Ok(())
}

/// Maps "2", "1,3" or a literal option value to the answer stored for `question`.
fn interpret_choice(question: &SymptomQuestion, line: &str) -> AnswerValue {
    let mut selections: Vec<String> = line
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<usize>()
                .ok()
                .and_then(|index| index.checked_sub(1))
                .and_then(|index| question.options.get(index))
                .map(|option| option.value.clone())
                .unwrap_or_else(|| token.to_string())
        })
        .collect();

    match selections.len() {
        1 => AnswerValue::Text(selections.remove(0)),
        _ => AnswerValue::List(selections),
    }
}

fn render_recommendations(answers: &UserAnswers, results: &[EnhancedProgramResult]) {
    println!("Funding recommendations");
    println!("Answered questions: {}", answers.len());

    if results.is_empty() {
        println!("\nMatching programs: none");
        return;
    }

    println!("\nRanked programs");
    for (rank, result) in results.iter().enumerate() {
        println!(
            "- {}. {} ({}): score {}, {} / {} confidence",
            rank + 1,
            result.program.name,
            result.program.id,
            result.score,
            result.eligibility.as_str(),
            result.confidence.as_str()
        );
        println!("  {}", result.reason);
        for gap in &result.gaps {
            println!("  gap [{}]: {}", gap.key, gap.description);
        }
    }
}

fn write_csv(results: &[EnhancedProgramResult]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(io::stdout().lock());
    for (rank, result) in results.iter().enumerate() {
        writer
            .serialize(RecommendationRow {
                rank: rank + 1,
                id: &result.program.id,
                name: &result.program.name,
                score: result.score,
                eligibility: result.eligibility.as_str(),
                confidence: result.confidence.as_str(),
                gaps: result.gaps.len(),
                reason: &result.reason,
            })
            .map_err(io::Error::from)?;
    }
    writer.flush()?;
    Ok(())
}
