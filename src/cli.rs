//! CLI: for-each macro families plus the variadic helper tables.
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Args, Parser, Subcommand};

use crate::arity::{ArityRequest, MAX_ARITY};
use crate::cap::STRICT_PARAM_LIMIT;
use crate::codegen;
use crate::config::{GeneratorConfig, GeneratorSettings, Layout};
use crate::error::ConfigResult;
use crate::interval::{Interval, Substitute, Target, compute_targets};
use crate::ir::Document;
use crate::logger::Logger;
use crate::naming;
use crate::output::{CreateCondition, Decision, OverwritePolicy, RunSummary, Status, WritePolicy};
use crate::plan;
use crate::varg::{GetArg, HasArgs, Inc, VargCount};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate C preprocessor for-each macro families and variadic helper tables
#[derive(Parser, Debug)]
#[command(name = "foreach-gen", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate D_FOR_EACH* macro families (plain, separator, pair, triple, tuples, data)
    ForEach(ForEachOut),
    /// generate D_VARG_COUNT and its helper
    VargCount(VargCountOut),
    /// generate D_VARG_GET_ARG_XX accessors
    GetArg(GetArgOut),
    /// generate D_HAS_ARGS
    HasArgs(HasArgsOut),
    /// generate increment/decrement lookup macros
    Inc(IncOut),
}

#[derive(Args, Debug, Clone)]
struct OutputSettings {
    /// always overwrite existing files
    #[arg(long, conflicts_with = "no_overwrite")]
    overwrite: bool,

    /// never overwrite existing files
    #[arg(long)]
    no_overwrite: bool,

    /// only write files that already exist
    #[arg(long, conflicts_with = "if_not_exists")]
    if_exists: bool,

    /// only write files that do not exist yet
    #[arg(long)]
    if_not_exists: bool,

    /// debug output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// errors only
    #[arg(short, long)]
    quiet: bool,

    /// prefix log lines with [HH:MM:SS]
    #[arg(long)]
    timestamps: bool,

    /// show per-file durations
    #[arg(long)]
    durations: bool,

    /// print a summary and the total time at the end
    #[arg(long)]
    total_time: bool,

    /// write a JSON report of every outcome to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct ForEachOut {
    /// output file name pattern; `#` is replaced by N, `%` by the tuple arity
    #[arg(long)]
    name: String,

    /// output directory
    #[arg(long, default_value = ".")]
    outdir: PathBuf,

    /// maximum N (127 under --msvc when neither --max nor --intervals is given)
    #[arg(long)]
    max: Option<usize>,

    /// one or more "(start,end,step)" progressions
    #[arg(long, num_args = 1..)]
    intervals: Vec<String>,

    /// count substituted for `#` from each interval
    #[arg(long, value_enum, default_value_t = Substitute::Max)]
    substitute: Substitute,

    /// emit only the separator base family and tuple families
    #[arg(long, conflicts_with = "pure_tuples")]
    tuples_only: bool,

    /// emit only tuple families
    #[arg(long)]
    pure_tuples: bool,

    /// omit the convenience wrappers
    #[arg(long, conflicts_with = "wrappers")]
    no_wrappers: bool,

    /// emit the convenience wrappers even under --msvc
    #[arg(long)]
    wrappers: bool,

    /// cap every signature at 127 parameters
    #[arg(long)]
    msvc: bool,

    /// lowest tuple arity when none is selected explicitly
    #[arg(long, default_value_t = 4)]
    tuple_min: usize,

    /// highest tuple arity when none is selected explicitly
    #[arg(long, default_value_t = MAX_ARITY)]
    tuple_max: usize,

    /// explicit tuple arities; replaces --K-tuple flags and --tuple-range
    #[arg(long, num_args = 1..)]
    tuple_arities: Vec<usize>,

    /// inclusive arity range like 4-9 (repeatable)
    #[arg(long)]
    tuple_range: Vec<String>,

    /// no tuple families at all
    #[arg(long)]
    no_tuples: bool,

    #[command(flatten)]
    tuple_flags: TupleFlags,

    /// one file per tuple arity
    #[arg(long)]
    tuple_per_file: bool,

    /// with --tuple-per-file: each file includes the previous one and emits only its own range
    #[arg(long)]
    cascade: bool,

    /// tuple macro naming; `%` = arity, `#` = N
    #[arg(long, default_value = naming::DEFAULT_TUPLE_NAMING)]
    tuple_naming_convention: String,

    /// emit the N = 0 case for tuple families
    #[arg(long)]
    include_zero_arg: bool,

    /// families or tuple arities to generate (e.g. pair tuple3)
    #[arg(long, num_args = 1..)]
    only: Vec<String>,

    /// families or tuple arities to skip
    #[arg(long, num_args = 1..)]
    exclude: Vec<String>,

    /// SELECTOR=ALIAS renaming (repeatable)
    #[arg(long)]
    alias: Vec<String>,

    /// SELECTOR=DIR destination override (repeatable)
    #[arg(long)]
    dest: Vec<String>,

    #[command(flatten)]
    output_settings: OutputSettings,
}

#[derive(clap::Parser, Debug)]
struct VargCountOut {
    #[command(flatten)]
    generator: VargCount,

    /// output header (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    output_settings: OutputSettings,
}

#[derive(clap::Parser, Debug)]
struct GetArgOut {
    #[command(flatten)]
    generator: GetArg,

    /// output header (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    output_settings: OutputSettings,
}

#[derive(clap::Parser, Debug)]
struct HasArgsOut {
    #[command(flatten)]
    generator: HasArgs,

    /// output header (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    output_settings: OutputSettings,
}

#[derive(clap::Parser, Debug)]
struct IncOut {
    #[command(flatten)]
    generator: Inc,

    /// output header (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    output_settings: OutputSettings,
}

/// `--1-tuple` … `--16-tuple`.
#[derive(Debug, Clone, Default)]
struct TupleFlags {
    arities: Vec<usize>,
}

const TUPLE_FLAG_IDS: [&str; MAX_ARITY] = [
    "1-tuple", "2-tuple", "3-tuple", "4-tuple", "5-tuple", "6-tuple", "7-tuple", "8-tuple",
    "9-tuple", "10-tuple", "11-tuple", "12-tuple", "13-tuple", "14-tuple", "15-tuple", "16-tuple",
];

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl clap::FromArgMatches for TupleFlags {
    fn from_arg_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let arities = TUPLE_FLAG_IDS
            .iter()
            .enumerate()
            .filter(|(_, id)| matches.get_flag(id))
            .map(|(i, _)| i + 1)
            .collect();
        Ok(Self { arities })
    }

    fn update_from_arg_matches(&mut self, matches: &ArgMatches) -> Result<(), clap::Error> {
        *self = Self::from_arg_matches(matches)?;
        Ok(())
    }
}

impl clap::Args for TupleFlags {
    fn augment_args(cmd: clap::Command) -> clap::Command {
        TUPLE_FLAG_IDS.iter().enumerate().fold(cmd, |cmd, (i, id)| {
            cmd.arg(
                Arg::new(*id)
                    .long(*id)
                    .action(ArgAction::SetTrue)
                    .help(format!("generate {}-tuple macros", i + 1)),
            )
        })
    }

    fn augment_args_for_update(cmd: clap::Command) -> clap::Command {
        Self::augment_args(cmd)
    }
}

impl OutputSettings {
    fn logger(&self) -> Logger {
        Logger {
            verbose: self.verbose,
            quiet: self.quiet,
            timestamps: self.timestamps,
            durations: self.durations,
        }
    }

    fn write_policy(&self) -> WritePolicy {
        let overwrite = if self.overwrite {
            OverwritePolicy::Always
        } else if self.no_overwrite {
            OverwritePolicy::Never
        } else {
            OverwritePolicy::Unspecified
        };
        let condition = if self.if_exists {
            CreateCondition::IfExists
        } else if self.if_not_exists {
            CreateCondition::IfNotExists
        } else {
            CreateCondition::Any
        };
        WritePolicy { overwrite, condition }
    }
}

impl ForEachOut {
    fn settings(&self) -> GeneratorSettings {
        let layout = if self.pure_tuples {
            Layout::PureTuples
        } else if self.tuples_only {
            Layout::TuplesOnly
        } else {
            Layout::Full
        };
        GeneratorSettings {
            strict: self.msvc,
            layout,
            no_wrappers: self.no_wrappers,
            force_wrappers: self.wrappers,
            include_zero_tuple: self.include_zero_arg,
            arities: ArityRequest {
                no_tuples: self.no_tuples,
                flags: self.tuple_flags.arities.clone(),
                ranges: self.tuple_range.clone(),
                explicit: (!self.tuple_arities.is_empty()).then(|| self.tuple_arities.clone()),
                fallback_min: self.tuple_min,
                fallback_max: self.tuple_max,
            },
            tuple_naming: self.tuple_naming_convention.clone(),
            tuple_per_file: self.tuple_per_file,
            cascade: self.cascade,
            only: self.only.clone(),
            exclude: self.exclude.clone(),
            aliases: self.alias.clone(),
            destinations: self.dest.clone(),
        }
    }

    fn targets(&self) -> ConfigResult<Vec<Target>> {
        let intervals = self
            .intervals
            .iter()
            .map(|src| Interval::parse(src))
            .collect::<ConfigResult<Vec<_>>>()?;
        let fallback_max = self.max.or(self.msvc.then_some(STRICT_PARAM_LIMIT));
        compute_targets(&self.name, &self.outdir, &intervals, self.substitute, fallback_max)
    }

    fn execute(&self, run: &mut Run) -> anyhow::Result<()> {
        let config = GeneratorConfig::build(&self.settings()).context("invalid configuration")?;
        let targets = self.targets().context("invalid configuration")?;
        for warning in &config.warnings {
            run.logger.warn(warning);
        }
        let jobs = plan::plan_jobs(&config, &targets).context("invalid configuration")?;
        for job in jobs {
            let stubs = job.document.defines().filter(|d| d.is_error()).count();
            run.logger.debug(&format!(
                "Generating {} ({}; {} macros, {stubs} error stubs)",
                job.path.display(),
                job.summary,
                job.document.defines().count()
            ));
            run.write(&job.path, &codegen::render(&job.document), &job.summary);
        }
        Ok(())
    }
}

impl Command {
    fn output_settings(&self) -> &OutputSettings {
        match self {
            Command::ForEach(target) => &target.output_settings,
            Command::VargCount(target) => &target.output_settings,
            Command::GetArg(target) => &target.output_settings,
            Command::HasArgs(target) => &target.output_settings,
            Command::Inc(target) => &target.output_settings,
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> ExitCode {
        let logger = self.cmd.output_settings().logger();
        match self.execute() {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(error) => {
                logger.error(&format!("{error:#}"));
                ExitCode::FAILURE
            }
        }
    }

    /// `Ok(false)` when any file failed to write.
    fn execute(&self) -> anyhow::Result<bool> {
        let settings = self.cmd.output_settings();
        let mut run = Run::new(settings);
        match &self.cmd {
            Command::ForEach(target) => target.execute(&mut run)?,
            Command::VargCount(target) => {
                let doc = target.generator.document()?;
                run.emit(target.out.as_deref(), &doc, &target.generator.summary());
            }
            Command::GetArg(target) => {
                let doc = target.generator.document()?;
                run.emit(target.out.as_deref(), &doc, &target.generator.summary());
            }
            Command::HasArgs(target) => {
                let doc = target.generator.document()?;
                run.emit(target.out.as_deref(), &doc, &target.generator.summary());
            }
            Command::Inc(target) => {
                let doc = target.generator.document()?;
                run.emit(target.out.as_deref(), &doc, &target.generator.summary());
            }
        }
        run.finish(settings)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Per-run state: policy, outcomes, and the clock for --total-time.
struct Run {
    logger: Logger,
    policy: WritePolicy,
    summary: RunSummary,
    started: Instant,
}

impl Run {
    fn new(settings: &OutputSettings) -> Self {
        Self {
            logger: settings.logger(),
            policy: settings.write_policy(),
            summary: RunSummary::default(),
            started: Instant::now(),
        }
    }

    /// Write to `out`, or print to stdout when no path was given.
    fn emit(&mut self, out: Option<&Path>, doc: &Document, summary: &str) {
        let text = codegen::render(doc);
        match out {
            Some(path) => self.write(path, &text, summary),
            None => print!("{text}"),
        }
    }

    fn write(&mut self, path: &Path, content: &str, summary: &str) {
        let decision = self.policy.decide(path);
        if decision == (Decision::Write { replacing: true }) {
            self.logger.debug(&format!("File exists, overwriting: {}", path.display()));
        }
        let outcome = crate::output::write_file(path, content, &decision);
        match &outcome.status {
            Status::Written => self
                .logger
                .info_timed(&format!("Wrote {} ({summary})", path.display()), outcome.duration_ms),
            Status::Skipped { reason } => {
                self.logger.info(&format!("Skipped {}: {reason}", path.display()));
            }
            Status::Failed { error } => {
                self.logger.error(&format!("Failed to write {}: {error}", path.display()));
            }
        }
        self.summary.record(outcome);
    }

    fn finish(mut self, settings: &OutputSettings) -> anyhow::Result<bool> {
        self.summary.total_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        if settings.total_time && !settings.quiet {
            println!();
            self.logger.info(&format!(
                "Summary: {} written, {} skipped, {} failed",
                self.summary.written, self.summary.skipped, self.summary.failed
            ));
            self.logger.info(&format!("Total time: {:.1}ms", self.summary.total_ms));
        }
        if let Some(report) = &settings.report {
            self.summary.write_report(report)?;
        }
        Ok(self.summary.succeeded())
    }
}

// ------------------------------- Tests ------------------------------------ //
