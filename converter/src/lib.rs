//! @ai:module:intent Convert Swagger 1.x annotations into OpenAPI 3 annotations on a Java declaration tree
//! @ai:module:layer infrastructure
//! @ai:module:public_api tree, walker, session, render, output, config, error
//! @ai:module:stateless true
//!
//! # Swagger to OpenAPI
//!
//! Rewrites `io.swagger.annotations` usages (`@Api`, `@ApiOperation`,
//! `@ApiParam`, `@ApiModelProperty`, `@ApiResponses`) into their
//! `io.swagger.v3.oas.annotations` counterparts. The input is a resolved
//! declaration tree serialized as JSON by a Java front end.
//!
//! ## Example
//!
//! ```rust,no_run
//! use swagger_to_openapi::{session, output, render, ConverterConfig};
//! use std::path::Path;
//!
//! // Convert one tree file in memory and print the resulting Java source
//! let mut source = session::load_source(Path::new("UserResource.json")).unwrap();
//! let report = swagger_to_openapi::convert_file(&mut source, &ConverterConfig::default()).unwrap();
//! println!("{} annotation(s) replaced", report.converted);
//! println!("{}", render::render_unit(&source.unit));
//!
//! // Convert a directory on disk
//! let config = ConverterConfig::default();
//! let paths = session::discover(Path::new("trees"), &config.files).unwrap();
//! let summary = session::convert_paths(
//!     &paths,
//!     &config,
//!     false,
//!     &session::CancellationToken::new(),
//!     &session::LogProgress,
//! );
//! println!("{}", output::format_summary(&summary, output::OutputFormat::Text));
//! ```

pub mod config;
pub mod error;
pub mod mapping;
pub mod names;
pub mod output;
pub mod postprocess;
pub mod render;
pub mod resolve;
pub mod rewrite;
pub mod session;
pub mod tree;
pub mod vocabulary;
pub mod walker;

pub use config::{ConverterConfig, FileConfig, PostProcessConfig};
pub use error::{Error, Result};
pub use output::{format_scan, format_summary, to_json, OutputFormat};
pub use postprocess::{CodeStyle, DefaultCodeStyle, ImportUsage};
pub use session::{
    CancellationToken, ConversionSummary, FileOutcome, FileStatus, LogProgress, ProgressSink,
};
pub use tree::{CompilationUnit, SourceFile};
pub use walker::{convert_file, convert_unit, scan_unit, ConversionReport};
