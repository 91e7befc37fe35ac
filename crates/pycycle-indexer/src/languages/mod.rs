//! Language extractors

pub mod python;

pub use python::PythonExtractor;
