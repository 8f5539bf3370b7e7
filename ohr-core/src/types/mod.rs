//! Library metadata: folders contain books, books contain typed files

mod book;
mod codec;
mod file;
mod folder;

pub use book::{BookFiles, BookInfo};
pub use file::{BookFile, FileType, SHA512_DIGEST_LEN};
pub use folder::{BookFolder, FolderWalk};
