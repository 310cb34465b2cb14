//! Collision-free destination names.
//!
//! Candidates run `name`, `name_1`, `name_2`, ... with the counter placed before
//! a file's extension (`notes.txt` -> `notes_1.txt`). Directories and dotfiles
//! (`.env`) take the counter at the end. Names are kept within
//! `MAX_NAME_LENGTH` bytes by shortening the stem.

use tracing::trace;

use crate::errors::{FsError, FsResult};
use crate::storage::{MAX_NAME_LENGTH, Storage, join_path};

/// Split `name` into stem and extension (without the dot).
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(0) | None => (name, None),
        Some(idx) => (&name[..idx], Some(&name[idx + 1..])),
    }
}

/// Longest prefix of `s` that fits in `budget` bytes on a char boundary.
fn truncate_to(s: &str, budget: usize) -> &str {
    if s.len() <= budget {
        return s;
    }
    let mut end = budget;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Candidate number `n` for `name`; `n == 0` is the name itself.
pub fn suffixed_name(name: &str, n: u64, is_dir: bool) -> String {
    if n == 0 {
        return name.to_string();
    }
    let suffix = format!("_{n}");
    let (stem, ext) = if is_dir {
        (name, None)
    } else {
        split_extension(name)
    };

    let overhead = suffix.len() + ext.map_or(0, |e| e.len() + 1);
    let mut stem = truncate_to(stem, MAX_NAME_LENGTH.saturating_sub(overhead));
    if stem.is_empty() {
        stem = "f";
    }

    match ext {
        Some(ext) => format!("{stem}{suffix}.{ext}"),
        None => format!("{stem}{suffix}"),
    }
}

/// First candidate path in `dir` that the storage reports as missing.
///
/// Only `NotExist` counts as free; any other stat failure is returned.
pub fn unique_destination(
    storage: &dyn Storage,
    dir: &str,
    name: &str,
    is_dir: bool,
) -> FsResult<String> {
    let mut n: u64 = 0;
    loop {
        let candidate = join_path(dir, &suffixed_name(name, n, is_dir));
        match storage.stat(&candidate) {
            Err(FsError::NotExist) => return Ok(candidate),
            Err(e) => return Err(e),
            Ok(_) => {
                if n == 3 {
                    trace!(name, dir, "duplicate: multiple collisions, still searching");
                }
                n = n.checked_add(1).ok_or(FsError::Internal)?;
            }
        }
    }
}
