//! Plugin system for document processors.
//!
//! A processor turns a [`Document`](crate::Document) of one MIME type into
//! text. Processors implement [`Plugin`] for identity and lifecycle, and
//! [`DocumentProcessor`] for the actual work. They are registered on a client
//! (see [`DocExtract::register_processor`](crate::DocExtract::register_processor))
//! and stored in a [`ProcessorRegistry`](registry::ProcessorRegistry).

mod processor;
pub mod registry;
mod traits;

pub use processor::DocumentProcessor;
pub use registry::ProcessorRegistry;
pub use traits::Plugin;
