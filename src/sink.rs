//! Archive write channel.
//!
//! Wraps the zip writer behind a small state machine: at most one entry is
//! open at a time, and opening a new entry implicitly closes the previous
//! one (the same contract the zip crate's `start_file` enforces). The
//! closed state is unrepresentable: finishing consumes the sink.
//!
//! A sink can also run in diagnostic mode, where entry framing is a no-op
//! and written bytes go to a caller-supplied stream instead of an archive —
//! useful for inspecting generated markup without producing a file.

use std::io::{Seek, Write};

use tracing::trace;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{Error, Result};

enum Mode<W: Write + Seek> {
    Archive(ZipWriter<W>),
    Diagnostic(Box<dyn Write>),
}

pub(crate) struct ArchiveSink<W: Write + Seek> {
    mode: Mode<W>,
    entry_open: bool,
    compression_level: Option<i64>,
}

impl<W: Write + Seek> ArchiveSink<W> {
    /// Open an archive sink over `writer` and emit the fixed `mimetype`
    /// entry: first in the archive, stored uncompressed, so readers can
    /// discover the container type at a fixed byte offset.
    pub fn archive(writer: W, compression_level: Option<i64>) -> Result<Self> {
        let mut zip = ZipWriter::new(writer);

        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file("mimetype", stored)?;
        zip.write_all(b"application/epub+zip")?;

        Ok(Self {
            mode: Mode::Archive(zip),
            entry_open: false,
            compression_level,
        })
    }

    /// Open a diagnostic sink: no archive is produced and no `mimetype`
    /// entry exists; entry bytes pass straight through to `out`.
    pub fn diagnostic(out: Box<dyn Write>) -> Self {
        Self {
            mode: Mode::Diagnostic(out),
            entry_open: false,
            compression_level: None,
        }
    }

    pub fn is_diagnostic(&self) -> bool {
        matches!(self.mode, Mode::Diagnostic(_))
    }

    /// Begin a deflate-compressed entry at `path`, implicitly closing any
    /// entry still open.
    pub fn open_entry(&mut self, path: &str) -> Result<()> {
        if self.entry_open {
            self.close_entry()?;
        }
        trace!(path, "open archive entry");
        if let Mode::Archive(zip) = &mut self.mode {
            let deflated = SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(self.compression_level);
            zip.start_file(path, deflated)?;
        }
        self.entry_open = true;
        Ok(())
    }

    /// Append bytes to the currently open entry.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        if !self.entry_open {
            return Err(Error::NoOpenEntry);
        }
        match &mut self.mode {
            Mode::Archive(zip) => zip.write_all(data)?,
            Mode::Diagnostic(out) => out.write_all(data)?,
        }
        Ok(())
    }

    /// Close the open entry. Checksum and size bookkeeping happen when the
    /// zip writer starts the next entry or finishes the archive.
    pub fn close_entry(&mut self) -> Result<()> {
        if !self.entry_open {
            return Err(Error::NoOpenEntry);
        }
        trace!("close archive entry");
        self.entry_open = false;
        Ok(())
    }

    /// Finish the archive and flush the underlying writer.
    pub fn finish(mut self) -> Result<()> {
        if self.entry_open {
            self.close_entry()?;
        }
        match self.mode {
            Mode::Archive(zip) => {
                zip.finish()?;
            }
            Mode::Diagnostic(mut out) => out.flush()?,
        }
        Ok(())
    }
}
