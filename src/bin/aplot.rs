// src/bin/aplot.rs

//! Driver program _aplot_ drives the [_aplotlib_].
//!
//! Processes user-passed command-line arguments into a datetime window.
//! Then an [`AtopProcessor`] finds the atop raw log files for the window,
//! runs the atop command for each, and parses the printed lines into a
//! [`Series`]. The `Series` is printed in the chosen mode.
//!
//! If passed CLI option `--summary`, a summary of the processing is printed
//! to stderr.
//!
//! [_aplotlib_]: aplotlib
//! [`AtopProcessor`]: aplotlib::readers::atopprocessor::AtopProcessor
//! [`Series`]: aplotlib::data::series::Series

#![allow(non_camel_case_types)]

// first setup the custom global allocator
use ::aplotlib::common::AllocatorChosen;

cfg_if::cfg_if! {
    if #[cfg(feature = "jemalloc")] {
        use ::tikv_jemallocator::Jemalloc;
        #[global_allocator]
        static GLOBAL: Jemalloc = Jemalloc;
        const ALLOCATOR_CHOSEN: AllocatorChosen = AllocatorChosen::Jemalloc;
        const CLI_HELP_AFTER_ALLOCATOR: &str = "jemalloc";
    }
    else if #[cfg(feature = "mimalloc")] {
        use ::mimalloc::MiMalloc;
        #[global_allocator]
        static GLOBAL: MiMalloc = MiMalloc;
        const ALLOCATOR_CHOSEN: AllocatorChosen = AllocatorChosen::Mimalloc;
        const CLI_HELP_AFTER_ALLOCATOR: &str = "mimalloc";
    }
    else {
        const ALLOCATOR_CHOSEN: AllocatorChosen = AllocatorChosen::System;
        const CLI_HELP_AFTER_ALLOCATOR: &str = "system";
    }
}

use std::process::ExitCode;
use std::time::Instant;

use ::anyhow::{anyhow, Context};
use ::clap::{Parser, ValueEnum};
use ::const_format::concatcp;

use ::aplotlib::common::FPath;
use ::aplotlib::data::datetime::{
    datetime_now_minute,
    datetime_parse_from_str_user,
    local_now_offset,
    tz_offset_parse_from_str,
    DateTimeL,
    Duration,
    FixedOffset,
};
use ::aplotlib::data::series::Series;
use ::aplotlib::debug::printers::e_err;
use ::aplotlib::printer::diagram::render_diagram;
use ::aplotlib::printer::printers::{
    print_colored_stderr,
    write_stdout,
    ColorChoice,
    COLOR_ERROR,
    COLOR_SUMMARY,
};
use ::aplotlib::printer::renderers::{
    render_csv,
    render_gnuplot,
    render_json,
    render_metrics,
    render_table,
    GNUPLOT_PROGRAM,
};
use ::aplotlib::readers::atopcommand::{AtopCommand, COMMAND_TEMPLATE_DEFAULT};
use ::aplotlib::readers::atopprocessor::{AtopProcessor, ProcessError, SummaryAtopProcessor};
use ::aplotlib::readers::sourceselector::SourceSelector;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// --------------------
// command-line parsing

/// default `--path`
const CLI_PATH_TEMPLATE_DEFAULT: &str = "/var/log/atop/atop_%Y%m%d";

/// default `METRIC`
const CLI_METRIC_DEFAULT: &str = "CPL.avg5";

/// Printed when no sample was found within the window.
const EMPTY_RESULT: &str = "empty result";

/// CLI enum of the output modes.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    ValueEnum, // from `clap`
)]
enum CLI_Mode {
    /// print a braille line diagram per metric
    diagram,
    /// plot per metric using a gnuplot subprocess
    gnuplot,
    /// print an aligned table
    table,
    /// print comma-separated values
    csv,
    /// print one JSON object
    json,
    /// print every available metric path
    metrics,
}

/// CLI enum that maps to [`termcolor::ColorChoice`].
///
/// [`termcolor::ColorChoice`]: https://docs.rs/termcolor/1.1.3/termcolor/enum.ColorChoice.html
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    ValueEnum, // from `clap`
)]
enum CLI_Color_Choice {
    always,
    auto,
    never,
}

impl From<CLI_Color_Choice> for ColorChoice {
    fn from(choice: CLI_Color_Choice) -> Self {
        match choice {
            CLI_Color_Choice::always => ColorChoice::Always,
            CLI_Color_Choice::auto => ColorChoice::Auto,
            CLI_Color_Choice::never => ColorChoice::Never,
        }
    }
}

#[cfg(debug_assertions)]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "\nDEBUG BUILD";
#[cfg(not(debug_assertions))]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "";

/// `--help` _afterword_ message.
const CLI_HELP_AFTER: &str = concatcp!(
    r#"MODE must precede METRIC, e.g. "aplot table CPL.avg5 MEM.free".

A METRIC is a dotted path, e.g. "CPL.avg5", "MEM.free", "DSK.sda.busy",
"NET.eth0.pcki". Use mode "metrics" to list the available metric paths.

The window of samples is from END minus RANGE hours to END, inclusive.

The PATH template names atop raw log files with strftime specifiers, e.g.
"/var/log/atop/atop_%Y%m%d". The files needed for the window are found by the
datetime each file name represents.

The CMD is run by "sh -c" for each raw log file, in datetime order.
"{path}" is replaced with the shell-escaped file path.

END may be passed as RFC 3339, e.g. "2023-01-02T12:00:00+01:00", or without
a timezone, e.g. "2023-01-02T12:00", "2023-01-02 12:00:00", "2023-01-02".
Without a timezone, END is presumed to be in TZ_OFFSET.

DateTime strftime specifiers are described at
https://docs.rs/chrono/latest/chrono/format/strftime/

---

Version: "#, env!("CARGO_PKG_VERSION"), r#"
MSRV: "#, env!("CARGO_PKG_RUST_VERSION"), r#"
Allocator: "#, CLI_HELP_AFTER_ALLOCATOR, r#"
License: "#, env!("CARGO_PKG_LICENSE"), r#"
"#,
    CLI_HELP_AFTER_NOTE_DEBUG,
);

/// clap command-line arguments build-time definitions.
//
// Note:
// * the `about` is taken from `Cargo.toml:[package]:description`.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    name = "aplot",
    // write expanded information for the `--version` output
    version = concatcp!(
        "\n",
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "Allocator: ", CLI_HELP_AFTER_ALLOCATOR , "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Output mode.
    #[clap(
        required = false,
        verbatim_doc_comment,
        value_enum,
        default_value_t = CLI_Mode::diagram,
    )]
    mode: CLI_Mode,

    /// Metric paths to print. Ignored by mode "metrics".
    #[clap(
        required = false,
        verbatim_doc_comment,
        default_values_t = [String::from(CLI_METRIC_DEFAULT)],
    )]
    metrics: Vec<String>,

    /// Latest datetime of the window.
    /// If not passed then now, without seconds.
    #[clap(
        short = 'e',
        long,
        verbatim_doc_comment,
    )]
    end: Option<String>,

    /// Hours of the window, backwards from END.
    #[clap(
        short = 'r',
        long,
        verbatim_doc_comment,
        default_value_t = 6,
    )]
    range: u32,

    /// Width in characters of a diagram or gnuplot graph.
    #[clap(
        short = 'x',
        long,
        verbatim_doc_comment,
        default_value_t = 59,
        value_parser = clap::value_parser!(u16).range(1..),
    )]
    width: u16,

    /// Height in characters of a diagram or gnuplot graph.
    #[clap(
        short = 'y',
        long,
        verbatim_doc_comment,
        default_value_t = 9,
        value_parser = clap::value_parser!(u16).range(1..),
    )]
    height: u16,

    /// Path template of atop raw log files.
    #[clap(
        short = 'p',
        long,
        verbatim_doc_comment,
        default_value_t = String::from(CLI_PATH_TEMPLATE_DEFAULT),
    )]
    path: String,

    /// Command printing a raw log file as text.
    #[clap(
        short = 'c',
        long,
        verbatim_doc_comment,
        default_value_t = String::from(COMMAND_TEMPLATE_DEFAULT),
    )]
    cmd: String,

    /// Timezone offset of the datetimes printed by atop, and of END if END
    /// has no timezone.
    /// Example values, "+12", "-0800", "+02:00", or "UTC".
    /// To pass a value with leading "-" use "=" notation, e.g. "-t=-0800".
    /// If not passed then the local system timezone offset is used.
    #[clap(
        short = 't',
        long,
        verbatim_doc_comment,
        value_parser = cli_process_tz_offset,
        default_value_t = local_now_offset(),
    )]
    tz_offset: FixedOffset,

    /// Choose to print errors using colors.
    #[clap(
        required = false,
        long = "color",
        verbatim_doc_comment,
        value_enum,
        default_value_t = CLI_Color_Choice::auto,
    )]
    color_choice: CLI_Color_Choice,

    /// Print a summary of files processed to stderr.
    /// Most useful for developers.
    #[clap(
        short,
        long,
        verbatim_doc_comment,
    )]
    summary: bool,
}

/// `clap` argument processor for `--tz-offset`.
fn cli_process_tz_offset(tzo: &str) -> std::result::Result<FixedOffset, String> {
    match tz_offset_parse_from_str(tzo) {
        Some(tz_offset) => Ok(tz_offset),
        None => Err(format!("Unable to parse a timezone offset for --tz-offset {:?}", tzo)),
    }
}

/// Process the user-passed `--end` and `--range` into the window
/// `(begin, end)`.
fn cli_process_window(
    end: Option<&str>,
    range: u32,
    tz_offset: &FixedOffset,
) -> anyhow::Result<(DateTimeL, DateTimeL)> {
    defn!("({:?}, {:?}, {:?})", end, range, tz_offset);
    let dt_end: DateTimeL = match end {
        Some(end) => match datetime_parse_from_str_user(end, tz_offset) {
            Some(dt) => dt,
            None => {
                return Err(anyhow!("Unable to parse a datetime for --end {:?}", end));
            }
        },
        None => datetime_now_minute(tz_offset),
    };
    let range_duration: Duration = Duration::try_hours(range as i64)
        .ok_or_else(|| anyhow!("--range {} is too large", range))?;
    let dt_begin: DateTimeL = dt_end
        .checked_sub_signed(range_duration)
        .ok_or_else(|| anyhow!("--range {} is too large for --end {}", range, dt_end))?;
    defx!("return ({:?}, {:?})", dt_begin, dt_end);

    Ok((dt_begin, dt_end))
}

/// Print the `series` per `args`.
fn print_series(
    args: &CLI_Args,
    series: &Series,
) -> anyhow::Result<()> {
    let width = args.width as usize;
    let height = args.height as usize;
    let mut buffer: Vec<u8> = Vec::with_capacity(4096);
    match args.mode {
        CLI_Mode::metrics => render_metrics(series, &mut buffer)?,
        CLI_Mode::table => render_table(series, &args.metrics, &mut buffer)?,
        CLI_Mode::csv => render_csv(series, &args.metrics, &mut buffer)?,
        CLI_Mode::json => render_json(series, &args.metrics, &mut buffer)?,
        CLI_Mode::diagram => render_diagram(series, &args.metrics, width, height, &mut buffer)?,
        CLI_Mode::gnuplot => {
            // gnuplot prints the graphs itself
            return render_gnuplot(series, &args.metrics, width, height, GNUPLOT_PROGRAM)
                .with_context(|| format!("{} mode failed", GNUPLOT_PROGRAM));
        }
    }
    write_stdout(&buffer)?;

    Ok(())
}

/// Print the `--summary` to stderr.
fn print_summary(
    summary: &SummaryAtopProcessor,
    dt_begin: &DateTimeL,
    dt_end: &DateTimeL,
    series: &Series,
    color_choice: ColorChoice,
    start_time: Instant,
) {
    let text: String = format!(
        "\nSummary:\n  window {} to {}\n  samples {}\n  {}\n  allocator {}\n  duration {:?}\n",
        dt_begin,
        dt_end,
        series.len(),
        summary.to_string().replace('\n', "\n  "),
        ALLOCATOR_CHOSEN,
        start_time.elapsed(),
    );
    if let Err(err) = print_colored_stderr(COLOR_SUMMARY, Some(color_choice), text.as_bytes()) {
        e_err!("print_colored_stderr failed {}", err);
    }
}

/// Process the user-passed command-line arguments, derive the `Series`, and
/// print it.
fn run(
    args: &CLI_Args,
    start_time: Instant,
) -> anyhow::Result<()> {
    defn!();
    let (dt_begin, dt_end) = cli_process_window(args.end.as_deref(), args.range, &args.tz_offset)?;
    let selector = SourceSelector::new(FPath::from(args.path.as_str()), args.tz_offset);
    let command = AtopCommand::new(args.cmd.clone());
    let processor = AtopProcessor::new(selector, command, args.tz_offset, dt_begin, dt_end);
    let (series, summary) = processor.process()?;
    defo!("series of {}", series.len());
    print_series(args, &series)?;
    if args.summary {
        print_summary(&summary, &dt_begin, &dt_end, &series, args.color_choice.into(), start_time);
    }
    defx!();

    Ok(())
}

/// Process the user-passed command-line arguments.
/// Determine a process return code.
pub fn main() -> ExitCode {
    let start_time = Instant::now();
    defn!();
    let args = CLI_Args::parse();
    defo!("args {:?}", args);
    let color_choice: ColorChoice = args.color_choice.into();

    let exitcode = match run(&args, start_time) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ProcessError>() {
                Some(ProcessError::EmptyResult) => {
                    eprintln!("{}", EMPTY_RESULT);
                }
                _ => {
                    let text: String = format!("ERROR: {:#}\n", err);
                    if print_colored_stderr(COLOR_ERROR, Some(color_choice), text.as_bytes()).is_err() {
                        e_err!("{:#}", err);
                    }
                }
            }
            ExitCode::FAILURE
        }
    };
    defx!("exitcode {:?}", exitcode);

    exitcode
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
