//! Storage engines driven by the console commands.

mod digest;
mod duplicate;
mod migrate;
mod transfer;
mod walk;

pub use digest::md5_file;
pub use duplicate::{suffixed_name, unique_destination};
pub use migrate::{MigrationReport, migrate};
pub use transfer::{
    ChunkStats, READ_BUFFER_SIZE, WRITE_BUFFER_SIZE, WriteSession, read_chunks, read_to_end,
    write_chunk,
};
pub use walk::{DirWalk, WalkEntry};
