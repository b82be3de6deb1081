use anyhow::Result;
use bifgen::ExitCode;
use bifgen::Options;
use bifgen::Paths;
use clap::error::ErrorKind;
use clap::ArgMatches;
use clap::Args;
use clap::Command;
use clap::FromArgMatches;
use std::path::PathBuf;
use tracing::Level;

/// Generate the rs6000 builtin function tables from the builtin and overload
/// definition files.
#[derive(Args, Debug)]
#[command(version, about)]
struct GenArgs {
    /// The builtin definition file
    bif: PathBuf,
    /// The overload definition file
    ovld: PathBuf,
    /// The header file to generate
    header: PathBuf,
    /// The init source file to generate
    init: PathBuf,
    /// The defines file to generate
    defines: PathBuf,
    /// Print debug information
    #[arg(long)]
    debug: bool,
}

fn cli() -> Command {
    let cli = Command::new("rs6000-gen-builtins").args(bifgen::default_arguments());
    GenArgs::augment_args(cli)
}

fn paths(args: GenArgs) -> Paths {
    Paths {
        bif: args.bif,
        ovld: args.ovld,
        header: args.header,
        init: args.init,
        defines: args.defines,
    }
}

fn run(program: &str, matches: &ArgMatches) -> Result<ExitCode> {
    let args = GenArgs::from_arg_matches(matches)?;
    let options = Options::from_matches(matches)?;
    let level = if args.debug { Level::DEBUG } else { Level::WARN };
    match bifgen::init_subscriber(level) {
        Ok(_) => (),
        Err(e) => eprintln!("warning: logging is disabled: {e}"),
    }

    match bifgen::generate(program, &paths(args), options) {
        Ok(_) => Ok(ExitCode::Ok),
        Err(failure) => {
            eprintln!("{failure}.");
            Ok(failure.code)
        }
    }
}

fn main() {
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "rs6000-gen-builtins".to_string());
    let matches = match cli().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(ExitCode::BadArgs.code());
            }
        },
    };
    let code = match run(&program, &matches) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::BadArgs
        }
    };
    std::process::exit(code.code());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn run_app(args: Vec<&str>) -> Result<ExitCode> {
        let matches = cli().try_get_matches_from(args)?;
        run("rs6000-gen-builtins", &matches)
    }

    #[test]
    fn test_help() {
        let err = cli()
            .try_get_matches_from(["rs6000-gen-builtins", "--help"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        let help = err.to_string();
        assert!(help.contains("Usage: rs6000-gen-builtins"));
        assert!(help.contains("--stanza-mode"));
    }

    #[test]
    fn test_wrong_argument_count() {
        let err = cli()
            .try_get_matches_from(["rs6000-gen-builtins", "bif.def", "ovld.def"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let args = ["rs6000-gen-builtins", "a", "b", "c", "d", "e", "f"];
        assert!(cli().try_get_matches_from(args).is_err());
    }

    #[test]
    fn test_subscriber_already_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = |name: &str| dir.path().join(name).display().to_string();
        fs::write(path("bif.def"), "").unwrap();
        fs::write(path("ovld.def"), "").unwrap();
        let (b, o, h, i, d) = (
            path("bif.def"),
            path("ovld.def"),
            path("h"),
            path("c"),
            path("d"),
        );
        // Either this call or another test sets the global subscriber first.
        match bifgen::init_subscriber(Level::WARN) {
            Ok(_) => (),
            Err(_e) => (),
        }
        assert!(bifgen::init_subscriber(Level::WARN).is_err());

        let args = vec!["rs6000-gen-builtins", "--debug", &b, &o, &h, &i, &d];
        let code = run_app(args).unwrap();
        assert_eq!(code, ExitCode::Ok);
    }

    #[test]
    fn test_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = |name: &str| dir.path().join(name).display().to_string();
        let bif = "[always]\n  void __builtin_nop ();\n    NOP nop {}\n";
        let ovld = "[VEC_NOP, vec_nop, __builtin_vec_nop]\n  void __builtin_vec_nop ();\n    NOP\n";
        fs::write(path("bif.def"), bif).unwrap();
        fs::write(path("ovld.def"), ovld).unwrap();
        let (b, o, h, i, d) = (
            path("bif.def"),
            path("ovld.def"),
            path("rs6000-builtins.h"),
            path("rs6000-builtins.c"),
            path("rs6000-vecdefines.h"),
        );

        let code = run_app(vec!["rs6000-gen-builtins", &b, &o, &h, &i, &d]).unwrap();
        assert_eq!(code, ExitCode::Ok);
        let defines = fs::read_to_string(&d).unwrap();
        assert_eq!(defines, "#define vec_nop __builtin_vec_nop\n");

        let args = vec!["rs6000-gen-builtins", "--stanza-mode", "free-form", &b, &o, &h, &i, &d];
        let code = run_app(args).unwrap();
        assert_eq!(code, ExitCode::Ok);
        let init = fs::read_to_string(&i).unwrap();
        assert!(init.contains(".enable = (always);"));

        let missing = path("missing.def");
        let code = run_app(vec!["rs6000-gen-builtins", &missing, &o, &h, &i, &d]).unwrap();
        assert_eq!(code, ExitCode::NoBif);
    }
}
