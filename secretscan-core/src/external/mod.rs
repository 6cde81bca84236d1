pub mod command;
pub mod console;
pub mod traits;

pub use command::{CommandEngine, CommandFetcher};
pub use console::ConsoleSink;
pub use traits::{ArtifactFetcher, DocumentSink, SecretEngine};
