mod base;
mod context;
mod extended;
mod id;
mod parser;
mod streaming;
mod values;
mod worksheet;
mod write;

pub use base::*;
pub use context::*;
pub use extended::*;
pub use id::*;
pub use parser::*;
pub use streaming::*;
pub use worksheet::*;
pub use write::*;
