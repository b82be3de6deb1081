//! bifgen generates the builtin function tables of the rs6000 back end.
//!
//! It reads two definition files:
//!
//! - the builtin file, which lists every builtin function grouped in stanzas
//!   that share an enable condition, and
//! - the overload file, which lists for every overloaded name the builtins
//!   that implement it.
//!
//! From these it builds three symbol tables (builtin identifiers, overload
//! identifiers and function type signatures) and writes a C header with the
//! enumerations and declarations, an init source that fills the tables at
//! startup and a defines file that maps the external overload names to the
//! internal ones.
//!
//! ```text
//! [altivec]
//!   const vsc __builtin_altivec_abs_v16qi (vsc);
//!     ABS_V16QI absv16qi2 {}
//! ```
//!
//! Every entry spans two lines: the prototype and, on the next line, the
//! identifier, the insn pattern and the attributes. The prototype maps to a
//! type signature identifier such as `v16qi_ftype_v16qi`; see [fntype_id].

pub mod config;
pub mod diag;
mod fntype;
pub mod frontend;
mod generate;
pub mod ir;
pub mod targ3t;
#[cfg(feature = "test-utils")]
pub mod tester;

pub use config::default_arguments;
pub use config::Options;
pub use fntype::fntype_id;
pub use generate::generate;
pub use generate::init_subscriber;
pub use generate::ExitCode;
pub use generate::Failure;
pub use generate::Generator;
pub use generate::Paths;
pub use generate::Summary;
