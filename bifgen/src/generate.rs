use crate::config::Options;
use crate::diag::InternalError;
use crate::frontend;
use crate::ir::Tables;
use crate::targ3t;
use crate::targ3t::Provenance;
use anyhow::Context;
use anyhow::Result;
use std::fmt;
use std::fmt::Display;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use tracing::info;
use tracing::subscriber::SetGlobalDefaultError;
use tracing::warn;
use tracing::Level;

/// Initialize logging with the given level.
pub fn init_subscriber(level: Level) -> Result<(), SetGlobalDefaultError> {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_test_writer()
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

/// Process exit codes, one per failure class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Ok = 0,
    BadArgs = 1,
    NoBif = 2,
    NoOvld = 3,
    NoHeader = 4,
    NoInit = 5,
    NoDefines = 6,
    ParseBif = 7,
    ParseOvld = 8,
    WriteHeader = 9,
    WriteInit = 10,
    WriteDefines = 11,
    InternalError = 12,
}

impl ExitCode {
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

/// A failed run: the error and the exit code it maps to.
#[derive(Debug)]
pub struct Failure {
    pub code: ExitCode,
    pub error: anyhow::Error,
}

impl Failure {
    /// Wrap `error`, unless it is an internal error which always gets its own
    /// code regardless of the phase that raised it.
    pub fn new(code: ExitCode, error: anyhow::Error) -> Self {
        let code = if error.downcast_ref::<InternalError>().is_some() {
            ExitCode::InternalError
        } else {
            code
        };
        Failure { code, error }
    }
}

impl Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.error)
    }
}

/// The two inputs and three outputs of a run.
#[derive(Clone, Debug)]
pub struct Paths {
    pub bif: PathBuf,
    pub ovld: PathBuf,
    pub header: PathBuf,
    pub init: PathBuf,
    pub defines: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub builtins: usize,
    pub overloads: usize,
    pub overload_stanzas: usize,
    pub fntypes: usize,
}

/// Builds the tables from the definition files and writes the outputs.
///
/// The builtin file has to be parsed before the overload file.
pub struct Generator {
    options: Options,
    tables: Tables,
}

impl Generator {
    pub fn new(options: Options) -> Self {
        Generator {
            options,
            tables: Tables::new(),
        }
    }
    pub fn options(&self) -> &Options {
        &self.options
    }
    pub fn tables(&self) -> &Tables {
        &self.tables
    }
    pub fn parse_bif<R: BufRead>(&mut self, reader: R, origin: &str) -> Result<()> {
        frontend::parse_bif(reader, origin, &mut self.tables, &self.options)
    }
    pub fn parse_ovld<R: BufRead>(&mut self, reader: R, origin: &str) -> Result<()> {
        frontend::parse_ovld(reader, origin, &mut self.tables, &self.options)
    }
    pub fn write_header<W: Write>(&self, out: &mut W, provenance: &Provenance) -> Result<()> {
        targ3t::write_header(out, &self.tables, &self.options, provenance)
    }
    pub fn write_init<W: Write>(&self, out: &mut W, provenance: &Provenance) -> Result<()> {
        targ3t::write_init(out, &self.tables, &self.options, provenance)
    }
    pub fn write_defines<W: Write>(&self, out: &mut W) -> Result<()> {
        targ3t::write_defines(out, &self.tables.ovlds)
    }
    pub fn summary(&self) -> Summary {
        Summary {
            builtins: self.tables.bifs.entries.len(),
            overloads: self.tables.ovlds.entries.len(),
            overload_stanzas: self.tables.ovlds.stanzas.len(),
            fntypes: self.tables.fntypes.len(),
        }
    }
}

fn open_input(path: &Path, code: ExitCode, what: &str) -> Result<BufReader<File>, Failure> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) => {
            let msg = format!("Cannot find input {what} file '{}'", path.display());
            Err(Failure::new(code, anyhow::Error::new(e).context(msg)))
        }
    }
}

fn create_output(path: &Path, code: ExitCode, what: &str) -> Result<BufWriter<File>, Failure> {
    match File::create(path) {
        Ok(file) => Ok(BufWriter::new(file)),
        Err(e) => {
            let msg = format!("Cannot open {what} file '{}' for output", path.display());
            Err(Failure::new(code, anyhow::Error::new(e).context(msg)))
        }
    }
}

fn remove_outputs(paths: &[&Path]) {
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => debug!("removed '{}'", path.display()),
            Err(e) => warn!("could not remove '{}': {e}", path.display()),
        }
    }
}

/// The three output files, removed again unless the run succeeds.
struct Outputs<'a, W: Write> {
    paths: &'a Paths,
    header: W,
    init: W,
    defines: W,
}

impl<'a, W: Write> Outputs<'a, W> {
    fn create<F>(paths: &'a Paths, open: F) -> Result<Self, Failure>
    where
        F: Fn(&Path, ExitCode, &str) -> Result<W, Failure>,
    {
        let header = open(&paths.header, ExitCode::NoHeader, "header")?;
        let init = match open(&paths.init, ExitCode::NoInit, "init") {
            Ok(init) => init,
            Err(failure) => {
                drop(header);
                remove_outputs(&[&paths.header]);
                return Err(failure);
            }
        };
        let defines = match open(&paths.defines, ExitCode::NoDefines, "defines") {
            Ok(defines) => defines,
            Err(failure) => {
                drop(header);
                drop(init);
                remove_outputs(&[&paths.header, &paths.init]);
                return Err(failure);
            }
        };
        Ok(Outputs {
            paths,
            header,
            init,
            defines,
        })
    }
    /// Close and delete all outputs so that a build does not pick up partial
    /// files.
    fn discard(self) {
        let paths = self.paths;
        drop(self.header);
        drop(self.init);
        drop(self.defines);
        remove_outputs(&[&paths.header, &paths.init, &paths.defines]);
    }
}

fn parse_failed(path: &Path) -> String {
    format!("Parsing of '{}' failed, aborting", path.display())
}

fn output_failed(path: &Path) -> String {
    format!("Output to '{}' failed, aborting", path.display())
}

fn run<W: Write>(
    generator: &mut Generator,
    inputs: (BufReader<File>, BufReader<File>),
    outputs: &mut Outputs<W>,
    provenance: &Provenance,
) -> Result<Summary, Failure> {
    let paths = outputs.paths;
    let (bif, ovld) = inputs;
    generator
        .parse_bif(bif, &paths.bif.display().to_string())
        .with_context(|| parse_failed(&paths.bif))
        .map_err(|e| Failure::new(ExitCode::ParseBif, e))?;
    generator
        .parse_ovld(ovld, &paths.ovld.display().to_string())
        .with_context(|| parse_failed(&paths.ovld))
        .map_err(|e| Failure::new(ExitCode::ParseOvld, e))?;

    generator
        .write_header(&mut outputs.header, provenance)
        .with_context(|| output_failed(&paths.header))
        .map_err(|e| Failure::new(ExitCode::WriteHeader, e))?;
    generator
        .write_init(&mut outputs.init, provenance)
        .with_context(|| output_failed(&paths.init))
        .map_err(|e| Failure::new(ExitCode::WriteInit, e))?;
    generator
        .write_defines(&mut outputs.defines)
        .with_context(|| output_failed(&paths.defines))
        .map_err(|e| Failure::new(ExitCode::WriteDefines, e))?;
    Ok(generator.summary())
}

/// Run the generator on the files in `paths`.
///
/// Both inputs are opened before any output is created. On failure, every
/// output file that was created is removed again.
pub fn generate(program: &str, paths: &Paths, options: Options) -> Result<Summary, Failure> {
    generate_to(program, paths, options, create_output)
}

/// Like [generate], with `open` creating each output writer.
fn generate_to<W, F>(
    program: &str,
    paths: &Paths,
    options: Options,
    open: F,
) -> Result<Summary, Failure>
where
    W: Write,
    F: Fn(&Path, ExitCode, &str) -> Result<W, Failure>,
{
    let bif = open_input(&paths.bif, ExitCode::NoBif, "built-in")?;
    let ovld = open_input(&paths.ovld, ExitCode::NoOvld, "overload")?;
    let mut outputs = Outputs::create(paths, open)?;

    let header_name = match paths.header.file_name() {
        Some(name) => name.to_string_lossy().to_string(),
        None => paths.header.display().to_string(),
    };
    let provenance = Provenance {
        program: program.to_string(),
        bif_path: paths.bif.display().to_string(),
        ovld_path: paths.ovld.display().to_string(),
        header_name,
    };
    let mut generator = Generator::new(options);
    match run(&mut generator, (bif, ovld), &mut outputs, &provenance) {
        Ok(summary) => {
            info!(
                "generated '{}', '{}' and '{}'",
                paths.header.display(),
                paths.init.display(),
                paths.defines.display()
            );
            Ok(summary)
        }
        Err(failure) => {
            outputs.discard();
            Err(failure)
        }
    }
}
