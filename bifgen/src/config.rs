use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::ValueEnum;

/// How the text of a builtin stanza header is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum StanzaMode {
    /// The header must be one of the known stanza names, each of which maps
    /// to an `ENB_*` enable token.
    #[default]
    Closed,
    /// The header is kept verbatim as the gating condition.
    FreeForm,
}

/// What to do when the overload file ends where the second line of an entry
/// is expected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OverloadEof {
    #[default]
    Fatal,
    /// Drop the partial entry and stop reading.
    Clean,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub stanza_mode: StanzaMode,
    pub overload_eof: OverloadEof,
    /// Maximum number of restricted arguments per prototype (1 or 2).
    pub max_restricted_operands: usize,
    pub max_builtins: Option<usize>,
    pub max_overloads: Option<usize>,
    pub max_overload_stanzas: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            stanza_mode: StanzaMode::default(),
            overload_eof: OverloadEof::default(),
            max_restricted_operands: 2,
            max_builtins: None,
            max_overloads: None,
            max_overload_stanzas: None,
        }
    }
}

fn limit(matches: &ArgMatches, id: &str) -> Result<Option<usize>> {
    match matches.get_one::<u64>(id) {
        Some(n) => Ok(Some(usize::try_from(*n)?)),
        None => Ok(None),
    }
}

impl Options {
    /// Read the options defined by [default_arguments] from parsed matches.
    pub fn from_matches(matches: &ArgMatches) -> Result<Options> {
        let defaults = Options::default();
        let stanza_mode = matches
            .get_one::<StanzaMode>("stanza-mode")
            .copied()
            .unwrap_or(defaults.stanza_mode);
        let overload_eof = matches
            .get_one::<OverloadEof>("overload-eof")
            .copied()
            .unwrap_or(defaults.overload_eof);
        let max_restricted_operands = match matches.get_one::<u64>("max-restricted-operands") {
            Some(n) => usize::try_from(*n)?,
            None => defaults.max_restricted_operands,
        };
        Ok(Options {
            stanza_mode,
            overload_eof,
            max_restricted_operands,
            max_builtins: limit(matches, "max-builtins")?,
            max_overloads: limit(matches, "max-overloads")?,
            max_overload_stanzas: limit(matches, "max-overload-stanzas")?,
        })
    }
}

/// Arguments that configure the generator.
///
/// `--debug` is not included so that the binary decides how to log.
pub fn default_arguments() -> Vec<Arg> {
    vec![
        Arg::new("stanza-mode")
            .long("stanza-mode")
            .help("How builtin stanza headers are interpreted")
            .value_parser(value_parser!(StanzaMode))
            .default_value("closed"),
        Arg::new("overload-eof")
            .long("overload-eof")
            .help("Whether the overload file may end in the middle of an entry")
            .value_parser(value_parser!(OverloadEof))
            .default_value("fatal"),
        Arg::new("max-restricted-operands")
            .long("max-restricted-operands")
            .help("Maximum number of restricted arguments per prototype")
            .value_parser(value_parser!(u64).range(1..=2))
            .default_value("2"),
        Arg::new("max-builtins")
            .long("max-builtins")
            .help("Maximum number of builtin functions")
            .value_parser(value_parser!(u64))
            .action(ArgAction::Set),
        Arg::new("max-overloads")
            .long("max-overloads")
            .help("Maximum number of overload entries")
            .value_parser(value_parser!(u64))
            .action(ArgAction::Set),
        Arg::new("max-overload-stanzas")
            .long("max-overload-stanzas")
            .help("Maximum number of overload stanzas")
            .value_parser(value_parser!(u64))
            .action(ArgAction::Set),
    ]
}
