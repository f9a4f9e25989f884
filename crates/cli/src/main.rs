use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scandalscope_core::config::Config;
use scandalscope_core::history::History;
use scandalscope_core::types::{AnalysisResult, Personality, RiskLevel, RoastMode, RoastResult};
use scandalscope_core::{AnalyzeOptions, ScandalScope};

#[derive(Parser, Debug)]
#[command(
    name = "scandalscope",
    version,
    about = "Cancel-risk scoring with a roast and an apology on the side"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long)]
        personality: Option<PersonalityArg>,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        history: Option<PathBuf>,

        #[arg(long, default_value = "line")]
        output_format: OutputFormat,

        /// Exit with code 2 when the risk level reaches this level.
        #[arg(long)]
        fail_on: Option<LevelArg>,
    },
    Roast {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, default_value = "savage")]
        mode: ModeArg,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "line")]
        output_format: OutputFormat,
    },
    History {
        #[arg(long)]
        history: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        clear: bool,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Text to analyze (reads stdin when neither --text nor --file is given)
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum OutputFormat {
    Line,
    Json,
    Markdown,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum PersonalityArg {
    Sarcastic,
    Witty,
    Brutal,
    Friendly,
}

impl From<PersonalityArg> for Personality {
    fn from(p: PersonalityArg) -> Self {
        match p {
            PersonalityArg::Sarcastic => Personality::Sarcastic,
            PersonalityArg::Witty => Personality::Witty,
            PersonalityArg::Brutal => Personality::Brutal,
            PersonalityArg::Friendly => Personality::Friendly,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ModeArg {
    Genz,
    Hr,
    Therapist,
    Savage,
    Friendly,
}

impl From<ModeArg> for RoastMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Genz => RoastMode::Genz,
            ModeArg::Hr => RoastMode::Hr,
            ModeArg::Therapist => RoastMode::Therapist,
            ModeArg::Savage => RoastMode::Savage,
            ModeArg::Friendly => RoastMode::Friendly,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum LevelArg {
    Mild,
    Moderate,
    High,
    Extreme,
}

impl From<LevelArg> for RiskLevel {
    fn from(l: LevelArg) -> Self {
        match l {
            LevelArg::Mild => RiskLevel::Mild,
            LevelArg::Moderate => RiskLevel::Moderate,
            LevelArg::High => RiskLevel::High,
            LevelArg::Extreme => RiskLevel::Extreme,
        }
    }
}

struct Style {
    bold: &'static str,
    dim: &'static str,
    red: &'static str,
    green: &'static str,
    yellow: &'static str,
    orange: &'static str,
    reset: &'static str,
}

const COLOR: Style = Style {
    bold: "\x1b[1m",
    dim: "\x1b[2m",
    red: "\x1b[31m",
    green: "\x1b[32m",
    yellow: "\x1b[33m",
    orange: "\x1b[38;5;208m",
    reset: "\x1b[0m",
};

const PLAIN: Style = Style {
    bold: "",
    dim: "",
    red: "",
    green: "",
    yellow: "",
    orange: "",
    reset: "",
};

fn style() -> &'static Style {
    if std::env::var_os("NO_COLOR").is_some() {
        &PLAIN
    } else {
        &COLOR
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let res = match cli.cmd {
        Commands::Analyze {
            input,
            personality,
            config,
            history,
            output_format,
            fail_on,
        } => {
            let cfg = load_config(config.as_deref());
            run_analyze(
                cfg,
                &input,
                personality.map(Into::into),
                history,
                &output_format,
                fail_on.map(Into::into),
            )
            .await
        }
        Commands::Roast {
            input,
            mode,
            config,
            output_format,
        } => {
            let cfg = load_config(config.as_deref());
            run_roast(cfg, &input, mode.into(), &output_format).await
        }
        Commands::History {
            history,
            config,
            clear,
        } => {
            let cfg = load_config(config.as_deref());
            run_history(&cfg, history, clear)
        }
    };

    match res {
        Ok(code) => code,
        Err(e) => {
            let s = style();
            eprintln!(
                "{}{red}error:{reset} {:#}",
                s.bold,
                e,
                red = s.red,
                reset = s.reset
            );
            std::process::ExitCode::from(1)
        }
    }
}

fn print_banner() {
    let s = style();
    eprintln!(
        "\n  {bold}scandal{reset}{orange}|{reset}{dim}scope{reset}  {dim}cancel-risk meter{reset}\n",
        bold = s.bold,
        orange = s.orange,
        dim = s.dim,
        reset = s.reset,
    );
}

fn risk_color(level: RiskLevel) -> &'static str {
    let s = style();
    match level {
        RiskLevel::Safe => s.green,
        RiskLevel::Mild | RiskLevel::Moderate => s.yellow,
        RiskLevel::High => s.orange,
        RiskLevel::Extreme => s.red,
    }
}

/// Ten-cell gauge for a 0-100 score.
fn meter(score: u8) -> String {
    let filled = (score as usize).div_ceil(10).min(10);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(10 - filled))
}

fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(p) => Config::load(p).unwrap_or_else(|e| {
            eprintln!(
                "{}{}warning:{} failed to load config {}: {:#}",
                style().bold,
                style().yellow,
                style().reset,
                p.display(),
                e
            );
            Config::default()
        }),
        None => Config::discover().unwrap_or_default(),
    }
}

fn read_input(input: &InputArgs) -> anyhow::Result<String> {
    if let Some(text) = &input.text {
        return Ok(text.clone());
    }
    if let Some(path) = &input.file {
        return std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("read stdin")?;
    Ok(buf)
}

fn history_path(flag: Option<PathBuf>, cfg: &Config) -> Option<PathBuf> {
    flag.or_else(|| cfg.history.path.clone())
}

fn print_result(result: &AnalysisResult) {
    let s = style();
    let rc = risk_color(result.risk_level);

    eprintln!(
        "  {dim}cancel_score  {reset}{rc}{bold}{} {}{reset}",
        result.cancel_score,
        meter(result.cancel_score),
        dim = s.dim,
        rc = rc,
        bold = s.bold,
        reset = s.reset
    );
    eprintln!(
        "  {dim}risk_level    {reset}{rc}{bold}{}{reset}",
        result.risk_level,
        dim = s.dim,
        rc = rc,
        bold = s.bold,
        reset = s.reset
    );
    eprintln!(
        "  {dim}confidence    {reset}{:.2}",
        result.confidence,
        dim = s.dim,
        reset = s.reset
    );
    eprintln!();
    eprintln!(
        "  {bold}roast{reset}    {}",
        result.roast,
        bold = s.bold,
        reset = s.reset
    );
    eprintln!(
        "  {bold}apology{reset}  {}",
        result.apology,
        bold = s.bold,
        reset = s.reset
    );
    eprintln!();
    for r in &result.recommendations {
        eprintln!("  {dim}-{reset} {}", r, dim = s.dim, reset = s.reset);
    }
    eprintln!();
}

async fn run_analyze(
    cfg: Config,
    input: &InputArgs,
    personality: Option<Personality>,
    history: Option<PathBuf>,
    output_format: &OutputFormat,
    fail_on: Option<RiskLevel>,
) -> anyhow::Result<std::process::ExitCode> {
    let s = style();

    print_banner();

    let text = read_input(input)?;
    let history_path = history_path(history, &cfg);
    let max_entries = cfg.history.max_entries;

    let engine = ScandalScope::from_env(cfg)?;
    tracing::debug!(
        classifier = engine.classifier_name(),
        llm = engine.has_llm(),
        "analyzing {} chars",
        text.chars().count()
    );
    let opts = AnalyzeOptions {
        personality,
        ..AnalyzeOptions::default()
    };
    let result = engine.analyze_text(&text, &opts).await?;

    if let Some(path) = &history_path {
        let mut history = History::load(path, max_entries)?;
        history.push(result.clone());
        history.save(path)?;
    }

    match output_format {
        // Machine-parseable line on stdout
        OutputFormat::Line => println!(
            "cancel_score={} risk_level={} confidence={:.2}",
            result.cancel_score, result.risk_level, result.confidence
        ),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&result).context("serialize result json")?
        ),
        OutputFormat::Markdown => print!("{}", result.to_markdown()),
    }

    // Human-readable output on stderr
    print_result(&result);

    let exit = match fail_on {
        Some(level) if result.risk_level >= level => {
            eprintln!(
                "  {red}{bold}TOO SPICY{reset}  {dim}({} >= {}){reset}",
                result.risk_level,
                level,
                red = s.red,
                bold = s.bold,
                dim = s.dim,
                reset = s.reset,
            );
            std::process::ExitCode::from(2)
        }
        _ => {
            eprintln!(
                "  {green}{bold}POST AT WILL{reset}",
                green = s.green,
                bold = s.bold,
                reset = s.reset
            );
            std::process::ExitCode::from(0)
        }
    };

    eprintln!();

    Ok(exit)
}

async fn run_roast(
    cfg: Config,
    input: &InputArgs,
    mode: RoastMode,
    output_format: &OutputFormat,
) -> anyhow::Result<std::process::ExitCode> {
    let text = read_input(input)?;
    let engine = ScandalScope::from_env(cfg)?;
    let roast: RoastResult = engine.generate_roast(&text, mode).await?;

    match output_format {
        OutputFormat::Line => println!("{}", roast.content),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&roast).context("serialize roast json")?
        ),
        OutputFormat::Markdown => print!("{}", roast.to_markdown()),
    }

    Ok(std::process::ExitCode::from(0))
}

fn run_history(
    cfg: &Config,
    flag: Option<PathBuf>,
    clear: bool,
) -> anyhow::Result<std::process::ExitCode> {
    let s = style();
    let path = history_path(flag, cfg)
        .context("no history file: pass --history or set history.path in the config")?;

    let mut history = History::load(&path, cfg.history.max_entries)?;
    if clear {
        history.clear();
        history.save(&path)?;
        eprintln!("  {dim}history cleared{reset}", dim = s.dim, reset = s.reset);
        return Ok(std::process::ExitCode::from(0));
    }

    for entry in history.entries() {
        println!(
            "{} {:>3} {:<8} {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.cancel_score,
            entry.risk_level,
            entry.text
        );
    }

    let stats = history.stats();
    eprintln!(
        "  {dim}{} entries, average score {:.1}{reset}",
        stats.count,
        stats.average_score,
        dim = s.dim,
        reset = s.reset
    );

    Ok(std::process::ExitCode::from(0))
}
