mod engine;
mod error;
mod name_table;
mod types;

pub use engine::Engine;
pub use error::{CoreError, CoreErrorCode};
pub use name_table::{DEFAULT_NAME_TABLE_PATH, NameTable};
pub use types::{Base, Coords, Guild, Pal};
