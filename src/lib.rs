//! # quire
//!
//! An incremental EPUB assembly library.
//!
//! An [`EpubBuilder`] accumulates metadata, content documents, auxiliary
//! resources, endnotes, and table-of-contents entries in any order while
//! streaming content bytes straight into the output archive. A single
//! finalize call then emits the three interlocking generated documents —
//! package manifest (OPF), navigation map (NCX), and container descriptor —
//! with mutually consistent identifiers, and closes the archive.
//!
//! ## Quick Start
//!
//! ```no_run
//! use quire::{EpubBuilder, MetaKey};
//!
//! let mut epub = EpubBuilder::create("book.epub")?;
//! epub.add_metadata(MetaKey::Title, "An Example");
//! epub.add_metadata(MetaKey::Creator, "A. Author");
//!
//! // stream a content document, then register it in reading order
//! epub.new_file("chapter1.xhtml")?;
//! epub.write(b"<html>...</html>")?;
//! epub.close_file()?;
//! epub.add_part("chapter1.xhtml", false);
//!
//! epub.add_toc_entry("Chapter 1", "chapter1.xhtml", 1);
//! epub.make_cover()?;
//! epub.finalize()?;
//! # Ok::<(), quire::Error>(())
//! ```
//!
//! ## Endnotes
//!
//! Registering an endnote returns the reference link to embed at the
//! citation site; the matching back-link is spliced into the stored body,
//! and the whole endnotes document is written at finalize time:
//!
//! ```no_run
//! # use quire::EpubBuilder;
//! # let mut epub = EpubBuilder::create("book.epub")?;
//! let link = epub.add_endnote("<p>See the appendix.</p>", "chapter1.xhtml");
//! // `link` is XHTML like `&nbsp;<a href="endnotes.xhtml#en1" ...>[1]</a>`
//! # Ok::<(), quire::Error>(())
//! ```
//!
//! ## Dry runs
//!
//! A builder opened with [`EpubBuilder::diagnostic`] produces no archive;
//! generated markup passes through to a caller-supplied stream instead.

mod builder;
mod cover;
mod endnotes;
mod error;
mod media;
mod metadata;
mod records;
mod registry;
mod sink;
mod toc;
mod xml;

pub use builder::{EpubBuilder, EpubConfig};
pub use error::{Error, Result};
pub use metadata::MetaKey;
