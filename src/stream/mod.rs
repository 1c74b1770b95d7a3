//! Streaming adapters over async byte channels.

pub mod reader;
pub mod writer;

pub use reader::TermReader;
pub use writer::TermWriter;
