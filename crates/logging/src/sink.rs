// crates/logging/src/sink.rs
use std::fs::File;
use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::writer::{EitherWriter, MakeWriter};

use crate::flags::StderrMode;

/// Console writer routing events to stderr according to [`StderrMode`].
pub(crate) struct LogWriter {
    pub(crate) mode: StderrMode,
}

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = EitherWriter<io::Stderr, io::Sink>;

    fn make_writer(&'a self) -> Self::Writer {
        match self.mode {
            StderrMode::Off => EitherWriter::B(io::sink()),
            StderrMode::Errors | StderrMode::All => EitherWriter::A(io::stderr()),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        match self.mode {
            StderrMode::All => EitherWriter::A(io::stderr()),
            StderrMode::Errors if *meta.level() <= Level::WARN => EitherWriter::A(io::stderr()),
            StderrMode::Errors | StderrMode::Off => EitherWriter::B(io::sink()),
        }
    }
}

/// Append-only log file. Each event is written with a single unbuffered
/// `write`, so lines from forked children interleave whole.
pub(crate) struct FileWriter {
    pub(crate) file: File,
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = &'a File;

    fn make_writer(&'a self) -> Self::Writer {
        &self.file
    }
}
