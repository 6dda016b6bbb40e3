//! pdf2msgpack - dump the geometry of every page of a PDF as MessagePack.
//!
//! Output is one array per document holding one array per page: path
//! records (`--mode paths`) or glyph records (`--mode text`).

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use pdf2msgpack_core::sandbox::{self, install_syscall_filter};
use pdf2msgpack_core::{
    DocumentDriver, ExtractError, ExtractMode, ExtractOptions, LAParams, StreamEncoder,
};

/// Exit status for usage errors.
const EXIT_USAGE: u8 = 1;
/// Exit status for output failures outside the extractor.
const EXIT_IO: u8 = 74;

/// What each page array holds.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Mode {
    /// Glyph boxes and text, with spaces between words (default)
    #[default]
    Text,
    /// Line and curve records of painted paths
    Paths,
    /// Interpret pages without emitting records
    Nop,
}

impl From<Mode> for ExtractMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Text => ExtractMode::Text,
            Mode::Paths => ExtractMode::Paths,
            Mode::Nop => ExtractMode::Nop,
        }
    }
}

/// Dump the vector paths or glyph boxes of a PDF as MessagePack.
#[derive(Parser, Debug)]
#[command(name = "pdf2msgpack")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the PDF file
    file: PathBuf,

    /// Records to emit
    #[arg(short = 't', long, value_enum, default_value_t = Mode::Text)]
    mode: Mode,

    /// Text encoding of emitted strings
    #[arg(short = 'c', long, default_value = "UTF-8")]
    codec: String,

    /// Do not restrict system calls once the document is loaded
    #[arg(long = "no-sandbox", action = ArgAction::SetTrue)]
    no_sandbox: bool,

    /// Line overlap ratio (relative to character height)
    #[arg(long = "line-overlap", default_value = "0.5")]
    line_overlap: f64,

    /// Character margin (relative to character width)
    #[arg(short = 'M', long = "char-margin", default_value = "2.0")]
    char_margin: f64,

    /// Word margin (relative to character size)
    #[arg(short = 'W', long = "word-margin", default_value = "0.1")]
    word_margin: f64,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

impl Args {
    fn options(&self) -> ExtractOptions {
        ExtractOptions {
            mode: self.mode.into(),
            laparams: LAParams {
                line_overlap: self.line_overlap,
                char_margin: self.char_margin,
                word_margin: self.word_margin,
            },
            codec: self.codec.clone(),
        }
    }
}

fn init_logging(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .without_time()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn open_output(outfile: &str) -> anyhow::Result<Box<dyn Write>> {
    if outfile == "-" {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }
    let file = File::create(outfile).with_context(|| format!("failed to create output file {outfile}"))?;
    Ok(Box::new(BufWriter::new(file)))
}

fn run(args: &Args) -> anyhow::Result<()> {
    let mut driver = DocumentDriver::open(&args.file, args.options())?;
    let output = open_output(&args.outfile)?;
    if args.no_sandbox {
        tracing::debug!("syscall filter disabled");
    } else if sandbox::AVAILABLE {
        install_syscall_filter()?;
    } else {
        tracing::warn!("syscall filtering is unavailable on this platform");
    }
    let mut out = StreamEncoder::new(output);
    driver
        .dump_document(&mut out)
        .with_context(|| format!("failed to dump {}", args.file.display()))?;
    Ok(())
}

/// Exit status for a failed run: the extractor's own code, or the I/O code
/// for failures around it.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<ExtractError>()
        .and_then(|e| u8::try_from(e.exit_code()).ok())
        .unwrap_or(EXIT_IO)
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_logging(args.debug);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["pdf2msgpack", "in.pdf"]).unwrap();
        let options = args.options();
        assert_eq!(options.mode, ExtractMode::Text);
        assert_eq!(options.laparams, LAParams::default());
        assert_eq!(options.codec, "UTF-8");
        assert_eq!(args.outfile, "-");
        assert!(!args.no_sandbox);
    }

    #[test]
    fn test_sandbox_opt_out() {
        let args = Args::try_parse_from(["pdf2msgpack", "--no-sandbox", "in.pdf"]).unwrap();
        assert!(args.no_sandbox);
    }

    #[test]
    fn test_missing_file_argument() {
        let err = Args::try_parse_from(["pdf2msgpack"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn test_mode_and_margins() {
        let args = Args::try_parse_from([
            "pdf2msgpack",
            "--mode",
            "paths",
            "--word-margin",
            "0.3",
            "in.pdf",
        ])
        .unwrap();
        let options = args.options();
        assert_eq!(options.mode, ExtractMode::Paths);
        assert_eq!(options.laparams.word_margin, 0.3);
    }

    #[test]
    fn test_exit_code_of_wrapped_error() {
        let err = anyhow::Error::from(ExtractError::NoPageTree).context("while dumping");
        assert_eq!(exit_code(&err), 64);
        let io = anyhow::Error::from(io::Error::other("disk full"));
        assert_eq!(exit_code(&io), EXIT_IO);
    }
}
