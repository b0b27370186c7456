pub mod aggregate;
pub mod codec;
pub mod config;
mod error;
pub mod formats;
pub mod registry;
pub mod source;
pub mod types;

pub use aggregate::{aggregate, Job, Validator};
pub use codec::{decode_int, Endianness, HexView};
pub use config::ValidationConfig;
pub use error::{Result, ValidatorError};
pub use formats::Detector;
pub use registry::{resolve, DetectorKind, Registry};
pub use source::{DatastreamSource, DirectorySource, MemorySource};
pub use types::{DetectorParameters, Finding, FormatTag, Origin, Outcome, ValidationReport};
