// SPDX-License-Identifier: MIT
//
// lumen: the OKLCH design-token pipeline.
//
// This binary turns lumen-tokens (anchors, derivation, palette store,
// integrity, contrast; all built on lumen-color's OKLCH math) into
// CI-facing commands.
//
// Every command reads `lumen.toml` (or the built-in defaults) to find the
// palette file and the contrast policy. Exit status is the contract:
//
//   0  everything passed
//   1  the palette failed a check (integrity mismatch, contrast failure)
//   2  the tool could not run (bad arguments, unreadable or malformed data)
//
// Diagnostics go to stderr; command output (tables, exported JSON) goes to
// stdout unless `--output` names a file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use lumen_tokens::{
    AnchorSet, Config, DerivationEngine, IntegrityError, Mode, Palette, Reporter, Verbosity, audit,
    gamut_report, verify,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: lumen [OPTIONS] <COMMAND>

Commands:
  generate   Re-derive every token and write the palette file
  verify     Fail if any derived token differs from its derivation
  audit      Check WCAG contrast of the policy's token pairs
  check      verify + audit, as one CI gate
  gamut      List color tokens that clip to sRGB
  export     Print the resolved palette (hex, RGB, CSS names) as JSON

Options:
  -c, --config <FILE>   Config file [default: lumen.toml]
  -o, --output <FILE>   Write generate/export output here instead
      --builtin         generate: start from the built-in anchors
  -v, --verbose         Show passing checks; repeat for debug logs
  -q, --quiet           Show failures only
  -h, --help            Print this help

Logging: LUMEN_LOG=<filter> overrides the log level (e.g. LUMEN_LOG=debug).
";

const DEFAULT_CONFIG: &str = "lumen.toml";

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Generate,
    Verify,
    Audit,
    Check,
    Gamut,
    Export,
}

impl Command {
    fn parse(name: &str) -> Result<Self> {
        Ok(match name {
            "generate" => Self::Generate,
            "verify" => Self::Verify,
            "audit" => Self::Audit,
            "check" => Self::Check,
            "gamut" => Self::Gamut,
            "export" => Self::Export,
            other => bail!("unknown command `{other}`"),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Options {
    command: Command,
    config: PathBuf,
    output: Option<PathBuf>,
    builtin: bool,
    verbose: u8,
    quiet: bool,
}

impl Options {
    const fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose > 0 {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "error",
            1 => "info",
            _ => "debug",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Invocation {
    Help,
    Run(Options),
}

fn parse_args(mut args: pico_args::Arguments) -> Result<Invocation> {
    if args.contains(["-h", "--help"]) {
        return Ok(Invocation::Help);
    }

    let config = args
        .opt_value_from_str(["-c", "--config"])?
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let output = args.opt_value_from_str(["-o", "--output"])?;
    let builtin = args.contains("--builtin");
    let quiet = args.contains(["-q", "--quiet"]);
    let mut verbose = 0u8;
    while args.contains(["-v", "--verbose"]) {
        verbose = verbose.saturating_add(1);
    }

    let free = args.finish();
    let [name] = free.as_slice() else {
        bail!("expected exactly one command, got {}", free.len());
    };
    let name = name.to_str().context("command is not valid UTF-8")?;
    let command = Command::parse(name)?;
    if builtin && command != Command::Generate {
        bail!("--builtin only applies to `generate`");
    }

    Ok(Invocation::Run(Options {
        command,
        config,
        output,
        builtin,
        verbose,
        quiet,
    }))
}

// ─── Commands ───────────────────────────────────────────────────────────────

/// Whether the palette passed the command's checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Pass,
    Fail,
}

fn run(options: &Options, out: &mut impl Write, err: &mut impl Write) -> Result<Outcome> {
    let config = Config::load_or_default(&options.config)
        .with_context(|| format!("loading {}", options.config.display()))?;
    info!(command = ?options.command, palette = %config.palette.display(), "running");
    let engine = DerivationEngine::default();
    let mut reporter = Reporter::new(options.verbosity());

    match options.command {
        Command::Generate => {
            let anchors = if options.builtin || !config.palette.exists() {
                AnchorSet::builtin()
            } else {
                let stored = load_palette(&config.palette)?;
                AnchorSet::from_palette(&stored)
                    .with_context(|| format!("reading anchors from {}", config.palette.display()))?
            };
            let target = options.output.as_deref().unwrap_or(&config.palette);
            engine
                .generate(&anchors)
                .save(target)
                .with_context(|| format!("writing {}", target.display()))?;
            writeln!(err, "wrote {}", target.display())?;
            Ok(Outcome::Pass)
        }

        Command::Verify => {
            let palette = load_palette(&config.palette)?;
            let outcome = run_verify(&palette, &engine, &mut reporter, err)?;
            reporter.flush_on_error(err)?;
            Ok(outcome)
        }

        Command::Audit => {
            let palette = load_palette(&config.palette)?;
            let outcome = run_audit(&palette, &config, &mut reporter, err)?;
            reporter.flush_on_error(err)?;
            Ok(outcome)
        }

        Command::Check => {
            let palette = load_palette(&config.palette)?;
            let integrity = run_verify(&palette, &engine, &mut reporter, err)?;
            let contrast = run_audit(&palette, &config, &mut reporter, err)?;
            reporter.flush_on_error(err)?;
            if integrity == Outcome::Pass && contrast == Outcome::Pass {
                Ok(Outcome::Pass)
            } else {
                Ok(Outcome::Fail)
            }
        }

        Command::Gamut => {
            let palette = load_palette(&config.palette)?;
            let clipped = gamut_report(&palette);
            for token in &clipped {
                writeln!(
                    out,
                    "{:<5} {:<18} {:<24} excess {:.4}  in gamut: {}",
                    token.mode.as_str(),
                    token.key.as_str(),
                    token.color.to_string(),
                    token.excess,
                    token.suggestion
                )?;
            }
            writeln!(err, "{} color tokens clip to sRGB", clipped.len())?;
            Ok(Outcome::Pass)
        }

        Command::Export => {
            let palette = load_palette(&config.palette)?;
            let mut json = serde_json::to_string_pretty(&palette.resolve_all())?;
            json.push('\n');
            match &options.output {
                Some(path) => {
                    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
                    writeln!(err, "wrote {}", path.display())?;
                }
                None => out.write_all(json.as_bytes())?,
            }
            Ok(Outcome::Pass)
        }
    }
}

fn load_palette(path: &Path) -> Result<Palette> {
    let palette = Palette::load(path).with_context(|| format!("loading palette {}", path.display()))?;
    if !palette.keys_symmetric() {
        bail!("{}: light and dark define different keys", path.display());
    }
    Ok(palette)
}

fn run_verify(
    palette: &Palette,
    engine: &DerivationEngine,
    reporter: &mut Reporter,
    err: &mut impl Write,
) -> Result<Outcome> {
    match verify(palette, engine, reporter) {
        Ok(checked) => {
            writeln!(err, "integrity: {checked} tokens match their derivation")?;
            Ok(Outcome::Pass)
        }
        Err(mismatch @ IntegrityError::Mismatch { .. }) => {
            writeln!(err, "integrity: {mismatch}")?;
            Ok(Outcome::Fail)
        }
        Err(IntegrityError::Anchors(source)) => Err(source).context("palette anchors cannot be derived from"),
    }
}

fn run_audit(palette: &Palette, config: &Config, reporter: &mut Reporter, err: &mut impl Write) -> Result<Outcome> {
    let report = audit(palette, &config.contrast, reporter);
    if report.passed() {
        writeln!(err, "contrast: {} rules passed in {} modes", report.checked, Mode::ALL.len())?;
        return Ok(Outcome::Pass);
    }
    writeln!(err, "contrast: {} of {} rules failed", report.failures.len(), report.checked)?;
    for finding in &report.failures {
        writeln!(err, "  {finding}")?;
    }
    Ok(Outcome::Fail)
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn init_tracing(options: &Options) {
    let filter = EnvFilter::try_from_env("LUMEN_LOG").unwrap_or_else(|_| EnvFilter::new(options.log_level()));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
    if let Err(e) = installed {
        eprintln!("lumen: logging disabled: {e}");
    }
}

fn main() -> ExitCode {
    let options = match parse_args(pico_args::Arguments::from_env()) {
        Ok(Invocation::Help) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Run(options)) => options,
        Err(e) => {
            eprintln!("lumen: {e:#}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    init_tracing(&options);

    match run(&options, &mut io::stdout().lock(), &mut io::stderr().lock()) {
        Ok(Outcome::Pass) => ExitCode::SUCCESS,
        Ok(Outcome::Fail) => ExitCode::from(1),
        Err(e) => {
            eprintln!("lumen: {e:#}");
            ExitCode::from(2)
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
