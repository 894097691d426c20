use std::{collections::LinkedList, io};

use tokio::sync::oneshot;

use crate::ArcPath;

/// Messages that can be sent to a [`super::Fs`] actor.
#[derive(Debug)]
pub enum Message {
    /// Reads a whole file into a string
    ReadToString {
        /// Channel to send the result back to the caller
        tx: oneshot::Sender<io::Result<String>>,
        /// The path of the file to read
        path: ArcPath,
    },
    /// Truncates a file and writes new contents
    Write {
        /// Channel to send the result back to the caller
        tx: oneshot::Sender<io::Result<()>>,
        /// The path of the file to write
        path: ArcPath,
        /// The new contents
        contents: String,
    },
    /// Appends contents to a file
    Append {
        /// Channel to send the result back to the caller
        tx: oneshot::Sender<io::Result<()>>,
        /// The path of the file to append to
        path: ArcPath,
        /// The contents to append
        contents: String,
    },
    /// Removes a file from the filesystem
    RemoveFile {
        /// Channel to send the result back to the caller
        tx: oneshot::Sender<io::Result<()>>,
        /// The path of the file to remove
        path: ArcPath,
    },
    /// Reads the entries of a directory
    ReadDir {
        /// Channel to send the result back to the caller
        tx: oneshot::Sender<io::Result<LinkedList<ArcPath>>>,
        /// The path of the directory to read
        path: ArcPath,
    },
    /// Creates a directory and its parents
    MkDir {
        /// Channel to send the result back to the caller
        tx: oneshot::Sender<io::Result<()>>,
        /// The path of the directory to create
        path: ArcPath,
    },
}
