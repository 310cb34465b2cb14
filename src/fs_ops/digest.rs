//! MD5 digest of a stored file.

use md5::{Digest, Md5};

use crate::errors::FsResult;
use crate::storage::{AccessMode, OpenMode, Storage};

const DIGEST_BLOCK_SIZE: usize = 512;

/// Stream the file at `path` through MD5 and return the lowercase hex digest.
pub fn md5_file(storage: &dyn Storage, path: &str) -> FsResult<String> {
    let mut file = storage.open_file(path, AccessMode::Read, OpenMode::OpenExisting)?;
    let mut hasher = Md5::new();
    let mut block = [0u8; DIGEST_BLOCK_SIZE];
    loop {
        let n = file.read(&mut block)?;
        if n == 0 {
            break;
        }
        hasher.update(&block[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
