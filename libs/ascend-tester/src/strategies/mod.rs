//! Built-in language strategies
//!
//! Each strategy owns only what differs per tester image: the file layout it
//! expects, the report schema it writes, and how its failures read. The
//! shared pipeline does the rest.

mod csharp;
mod go;
mod python;
mod typescript;

pub use csharp::CSharpStrategy;
pub use go::GoStrategy;
pub use python::PythonStrategy;
pub use typescript::TypeScriptStrategy;
