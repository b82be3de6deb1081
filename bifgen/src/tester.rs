use crate::config::Options;
use crate::diag::Diagnostic;
use crate::init_subscriber;
use crate::ir::Tables;
use crate::targ3t::Provenance;
use crate::Generator;
use anyhow::Result;
use std::cmp::max;
use std::io::Cursor;
use std::panic::Location;
use tracing::info;

/// The three generated files of an in-memory run.
pub struct Generated {
    pub header: String,
    pub init: String,
    pub defines: String,
}

pub struct Tester;

impl Tester {
    /// Initialize the subscriber for the tests.
    ///
    /// Cannot pass options, since the tests run concurrently.
    pub fn init_tracing() {
        let level = tracing::Level::INFO;
        match init_subscriber(level) {
            Ok(_) => (),
            Err(_e) => (),
        }
    }
    fn point_to_missing_line(expected: &str, index: usize) -> String {
        let mut result = String::new();
        result.push_str("A line is missing from the output:\n");
        result.push_str("```");
        for (i, line) in expected.lines().enumerate() {
            if i == index {
                let msg = format!("{line}   <== missing");
                result.push_str(&format!("\n{msg}"));
            } else {
                result.push_str(&format!("\n{line}"));
            }
        }
        result.push_str("\n```");
        result
    }
    pub fn check_lines_exact(actual: &str, expected: &str, caller: &Location<'_>) {
        let actual = actual.trim();
        let expected = expected.trim();
        let l = max(actual.lines().count(), expected.lines().count());
        for i in 0..l {
            let actual_line = match actual.lines().nth(i) {
                None => {
                    panic!("Expected line {i} not found in output: called from {caller}");
                }
                Some(actual_line) => actual_line,
            };
            let expected_line = match expected.lines().nth(i) {
                None => {
                    panic!("Unexpected line {i} in output: called from {caller}");
                }
                Some(expected_line) => expected_line,
            };
            assert_eq!(actual_line, expected_line, "called from {}", caller);
        }
    }
    /// Check whether the expected lines are present in the actual output.
    ///
    /// The actual output may contain additional lines that are not in the
    /// expected output, but the expected lines must appear in order.
    pub fn check_lines_contain(actual: &str, expected: &str, caller: &Location<'_>) {
        let actual = actual.trim();
        let expected = expected.trim();
        let mut actual_index = 0;
        'outer: for (i, expected_line) in expected.lines().enumerate() {
            let expected_line = expected_line.trim();
            // An empty line would match any line.
            if expected_line.is_empty() {
                continue;
            }
            for (j, actual_line) in actual.lines().enumerate().skip(actual_index) {
                if actual_line.contains(expected_line) {
                    actual_index = j + 1;
                    continue 'outer;
                }
            }
            let msg = Self::point_to_missing_line(expected, i);
            panic!("{msg}\nwhen called from {caller}");
        }
    }
    fn print_heading(msg: &str, src: &str) {
        info!("{msg}:\n```\n{src}\n```\n");
    }
    fn provenance() -> Provenance {
        Provenance {
            program: "rs6000-gen-builtins".to_string(),
            bif_path: "bif.def".to_string(),
            ovld_path: "ovld.def".to_string(),
            header_name: "rs6000-builtins.h".to_string(),
        }
    }
    fn generator(bif: &str, ovld: &str, options: &Options) -> Result<Generator> {
        Self::print_heading("Builtins", bif);
        Self::print_heading("Overloads", ovld);
        let mut generator = Generator::new(options.clone());
        generator.parse_bif(Cursor::new(bif.to_string()), "bif.def")?;
        generator.parse_ovld(Cursor::new(ovld.to_string()), "ovld.def")?;
        Ok(generator)
    }
    /// Parse both definition files with the default options.
    pub fn parse(bif: &str, ovld: &str) -> Result<Tables> {
        Self::parse_with(bif, ovld, &Options::default())
    }
    pub fn parse_with(bif: &str, ovld: &str, options: &Options) -> Result<Tables> {
        let generator = Self::generator(bif, ovld, options)?;
        Ok(generator.tables().clone())
    }
    /// Parse both definition files and render all outputs in memory.
    pub fn generate(bif: &str, ovld: &str) -> Result<Generated> {
        Self::generate_with(bif, ovld, &Options::default())
    }
    pub fn generate_with(bif: &str, ovld: &str, options: &Options) -> Result<Generated> {
        let generator = Self::generator(bif, ovld, options)?;
        let provenance = Self::provenance();
        let mut header = vec![];
        generator.write_header(&mut header, &provenance)?;
        let mut init = vec![];
        generator.write_init(&mut init, &provenance)?;
        let mut defines = vec![];
        generator.write_defines(&mut defines)?;
        let generated = Generated {
            header: String::from_utf8(header)?,
            init: String::from_utf8(init)?,
            defines: String::from_utf8(defines)?,
        };
        Self::print_heading("Header", &generated.header);
        Ok(generated)
    }
    /// Return the diagnostic that `err` carries.
    ///
    /// Panics if the error is not a user input error.
    pub fn diagnostic(err: &anyhow::Error) -> &Diagnostic {
        match err.downcast_ref::<Diagnostic>() {
            Some(diag) => diag,
            None => panic!("expected a diagnostic, got: {err:#}"),
        }
    }
}
