//! Incremental package builder and finalizer.
//!
//! Registration calls (metadata, parts, resources, endnotes, TOC entries)
//! may be interleaved in any order; content bytes are streamed through the
//! [`new_file`](EpubBuilder::new_file) / [`write`](EpubBuilder::write) /
//! [`close_file`](EpubBuilder::close_file) protocol; a single
//! [`finalize`](EpubBuilder::finalize) call emits the generated documents
//! and closes the archive.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Read, Seek, Write};
use std::path::Path;

use tracing::debug;

use crate::cover::{COVER_DOC, render_cover};
use crate::endnotes::{ENDNOTES_DOC, Endnotes};
use crate::error::{Error, Result};
use crate::metadata::{MetaKey, Metadata};
use crate::registry::Registry;
use crate::sink::ArchiveSink;
use crate::toc::TocBuilder;
use crate::xml::escape_xml;

/// Directory inside the archive holding all content documents.
const CONTENT_DIR: &str = "OEBPS";
/// Package manifest document, relative to the content directory.
const ROOT_DOC: &str = "content.opf";
/// Navigation document, relative to the content directory.
const NCX_DOC: &str = "toc.ncx";

/// Read buffer size for copying external files into the archive.
const COPY_BUF_SIZE: usize = 64 * 1024;

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

/// Configuration for package assembly.
#[derive(Debug, Clone, Default)]
pub struct EpubConfig {
    /// Compression level for deflate (0-9; the zip crate's default when unset).
    pub compression_level: Option<u32>,
}

/// Assembles an EPUB package incrementally.
///
/// One builder per package: created by [`create`](EpubBuilder::create),
/// [`from_writer`](EpubBuilder::from_writer), or
/// [`diagnostic`](EpubBuilder::diagnostic); mutated by registration calls in
/// any order; consumed by [`finalize`](EpubBuilder::finalize).
///
/// Not safe for concurrent registration — a builder is exclusively owned
/// mutable state, serialized by `&mut self` throughout.
pub struct EpubBuilder<W: Write + Seek> {
    sink: ArchiveSink<W>,
    meta: Metadata,
    registry: Registry,
    toc: TocBuilder,
    endnotes: Endnotes,
}

impl<W: Write + Seek> fmt::Debug for EpubBuilder<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EpubBuilder").finish_non_exhaustive()
    }
}

impl EpubBuilder<BufWriter<File>> {
    /// Begin a package written to a file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::create_with(path, EpubConfig::default())
    }

    /// Begin a package written to a file at `path` with custom settings.
    pub fn create_with(path: impl AsRef<Path>, config: EpubConfig) -> Result<Self> {
        let file = File::create(path).map_err(Error::Create)?;
        Self::from_writer_with(BufWriter::new(file), config)
    }
}

impl EpubBuilder<io::Empty> {
    /// Begin a package in diagnostic mode: no archive is produced, entry
    /// framing is a no-op, and every written byte goes to `out` instead —
    /// for inspecting generated markup without building a file.
    pub fn diagnostic(out: impl Write + 'static) -> Self {
        Self::with_sink(ArchiveSink::diagnostic(Box::new(out)))
    }
}

impl<W: Write + Seek> EpubBuilder<W> {
    /// Begin a package written to any [`Write`] + [`Seek`] destination.
    pub fn from_writer(writer: W) -> Result<Self> {
        Self::from_writer_with(writer, EpubConfig::default())
    }

    /// Begin a package written to `writer` with custom settings.
    pub fn from_writer_with(writer: W, config: EpubConfig) -> Result<Self> {
        let level = config.compression_level.map(i64::from);
        Ok(Self::with_sink(ArchiveSink::archive(writer, level)?))
    }

    fn with_sink(sink: ArchiveSink<W>) -> Self {
        Self {
            sink,
            meta: Metadata::default(),
            registry: Registry::default(),
            toc: TocBuilder::new(),
            endnotes: Endnotes::default(),
        }
    }

    /// Register a metadata value. Scalar keys replace any prior value;
    /// repeatable keys accumulate in call order.
    pub fn add_metadata(&mut self, key: MetaKey, value: &str) {
        self.meta.set(key, value);
    }

    /// Register a content document in the manifest. Its bytes should also
    /// be written via [`new_file`](Self::new_file)/[`write`](Self::write)/
    /// [`close_file`](Self::close_file) or [`copy_file`](Self::copy_file);
    /// the registry and the byte stream are not cross-checked.
    ///
    /// Auxiliary parts are reachable only via hyperlink (endnotes and the
    /// like) and are marked non-linear in the spine.
    pub fn add_part(&mut self, filename: &str, auxiliary: bool) {
        self.registry.add_part(filename, auxiliary);
    }

    /// Register a non-document resource (image, stylesheet, ...). When
    /// `media_type` is `None` it is inferred from the filename suffix.
    pub fn add_other(&mut self, filename: &str, media_type: Option<&str>) {
        self.registry.add_other(filename, media_type);
    }

    /// Enumerate resources registered via [`add_other`](Self::add_other) as
    /// (filename, media type) pairs, for external content-copying loops.
    pub fn others(&self) -> impl Iterator<Item = (&str, &str)> {
        self.registry.others()
    }

    /// Create a new file in the package. `filename` is placed inside the
    /// content directory unless it starts with `/`, which roots it at the
    /// archive top level. An entry still open from a previous call is
    /// implicitly closed.
    pub fn new_file(&mut self, filename: &str) -> Result<()> {
        self.sink.open_entry(&archive_path(filename))
    }

    /// Append data to the file opened by [`new_file`](Self::new_file).
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.sink.write(data)
    }

    /// Close the file opened by [`new_file`](Self::new_file).
    pub fn close_file(&mut self) -> Result<()> {
        self.sink.close_entry()
    }

    /// Copy an external file into the package under `filename`, streaming
    /// through a fixed-size buffer. In diagnostic mode the copy is skipped.
    pub fn copy_file(&mut self, filename: &str, path: impl AsRef<Path>) -> Result<()> {
        if self.sink.is_diagnostic() {
            return Ok(());
        }
        let path = path.as_ref();
        let mut source = File::open(path).map_err(|e| Error::Source {
            path: path.to_path_buf(),
            source: e,
        })?;

        self.new_file(filename)?;
        let mut buf = vec![0u8; COPY_BUF_SIZE];
        loop {
            let n = match source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    // terminate the entry so the archive is not left mid-entry
                    let _ = self.close_file();
                    return Err(Error::Source {
                        path: path.to_path_buf(),
                        source: e,
                    });
                }
            };
            if let Err(e) = self.write(&buf[..n]) {
                let _ = self.close_file();
                return Err(e);
            }
        }
        self.close_file()
    }

    /// Register an endnote; returns the reference link to embed at the
    /// citation site in `citing_doc`. The accumulated endnotes document is
    /// written and registered as an auxiliary part at finalize time.
    pub fn add_endnote(&mut self, body: &str, citing_doc: &str) -> String {
        self.endnotes.register(body, citing_doc)
    }

    /// Append a table-of-contents entry. `url` is relative to the content
    /// directory, with an optional fragment; `level` is 1 for top-level
    /// entries, 2 for subentries, and so on.
    pub fn add_toc_entry(&mut self, title: &str, url: &str, level: usize) {
        self.toc.add_entry(title, url, level);
    }

    /// Use `filename` as the cover image. The file is also copied into the
    /// archive from that same path, so no separate
    /// [`add_other`](Self::add_other)/[`copy_file`](Self::copy_file) round
    /// is needed.
    pub fn set_cover_image(&mut self, filename: &str) -> Result<()> {
        self.registry.cover_image = Some(filename.to_string());
        self.copy_file(filename, filename)
    }

    /// Write the cover document and register it as the package cover: an
    /// image page when a cover image was set, an SVG placeholder otherwise.
    pub fn make_cover(&mut self) -> Result<()> {
        let doc = render_cover(&self.meta, self.registry.cover_image.as_deref());
        self.write_generated(COVER_DOC, &doc)?;
        self.registry.cover = Some(COVER_DOC.to_string());
        Ok(())
    }

    /// Finish the package: write the endnotes document (when any endnotes
    /// were registered), the package manifest, the navigation document, and
    /// the container descriptor, in that order, then close the archive.
    pub fn finalize(mut self) -> Result<()> {
        self.write_endnotes()?;

        debug!("writing package manifest");
        let opf = generate_opf(&self.meta, &self.registry);
        self.write_generated(ROOT_DOC, &opf)?;

        debug!(depth = self.toc.max_depth(), entries = self.toc.len(), "writing navigation document");
        let ncx = generate_ncx(&self.meta, &self.toc);
        self.write_generated(NCX_DOC, &ncx)?;

        self.write_generated("/META-INF/container.xml", CONTAINER_XML)?;

        self.sink.finish()
    }

    fn write_endnotes(&mut self) -> Result<()> {
        if self.endnotes.is_empty() {
            return Ok(());
        }
        debug!(notes = self.endnotes.len(), "writing endnotes document");
        let doc = self.endnotes.render_document();
        self.write_generated(ENDNOTES_DOC, &doc)?;
        self.registry.add_part(ENDNOTES_DOC, true);
        Ok(())
    }

    fn write_generated(&mut self, filename: &str, contents: &str) -> Result<()> {
        self.new_file(filename)?;
        self.write(contents.as_bytes())?;
        self.close_file()
    }
}

/// Resolve a caller filename to its archive path: inside the content
/// directory unless root-anchored with a leading `/`.
fn archive_path(filename: &str) -> String {
    match filename.strip_prefix('/') {
        Some(rooted) => rooted.to_string(),
        None => format!("{CONTENT_DIR}/{filename}"),
    }
}

/// Generate the package manifest document (OPF).
fn generate_opf(meta: &Metadata, registry: &Registry) -> String {
    let mut opf = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <package xmlns=\"http://www.idpf.org/2007/opf\" version=\"2.0\" unique-identifier=\"BookId\">\n\
         \x20 <metadata xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\n",
    );

    opf.push_str(&format!(
        "    <dc:identifier id=\"BookId\">{}</dc:identifier>\n",
        escape_xml(&meta.identifier)
    ));
    opf.push_str(&format!(
        "    <dc:title>{}</dc:title>\n",
        escape_xml(&meta.title)
    ));
    for creator in meta.creators.iter() {
        opf.push_str(&format!(
            "    <dc:creator>{}</dc:creator>\n",
            escape_xml(creator)
        ));
    }
    for subject in meta.subjects.iter() {
        opf.push_str(&format!(
            "    <dc:subject>{}</dc:subject>\n",
            escape_xml(subject)
        ));
    }
    if let Some(ref description) = meta.description {
        opf.push_str(&format!(
            "    <dc:description>{}</dc:description>\n",
            escape_xml(description)
        ));
    }
    if let Some(ref publisher) = meta.publisher {
        opf.push_str(&format!(
            "    <dc:publisher>{}</dc:publisher>\n",
            escape_xml(publisher)
        ));
    }
    if let Some(ref date) = meta.date {
        opf.push_str(&format!("    <dc:date>{}</dc:date>\n", escape_xml(date)));
    }
    if let Some(ref source) = meta.source {
        opf.push_str(&format!(
            "    <dc:source>{}</dc:source>\n",
            escape_xml(source)
        ));
    }
    if meta.languages.is_empty() {
        opf.push_str("    <dc:language>en</dc:language>\n");
    } else {
        for language in meta.languages.iter() {
            opf.push_str(&format!(
                "    <dc:language>{}</dc:language>\n",
                escape_xml(language)
            ));
        }
    }
    if let Some(ref rights) = meta.rights {
        opf.push_str(&format!(
            "    <dc:rights>{}</dc:rights>\n",
            escape_xml(rights)
        ));
    }
    if registry.cover_image.is_some() {
        opf.push_str("    <meta name=\"cover\" content=\"cover-image\"/>\n");
    }

    opf.push_str("  </metadata>\n  <manifest>\n");
    opf.push_str(
        "    <item id=\"ncx\" href=\"toc.ncx\" media-type=\"application/x-dtbncx+xml\"/>\n",
    );
    for item in registry.manifest_items() {
        opf.push_str(&format!(
            "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"/>\n",
            escape_xml(&item.id),
            escape_xml(&item.href),
            escape_xml(&item.media_type)
        ));
    }

    opf.push_str("  </manifest>\n  <spine toc=\"ncx\">\n");
    for spine_ref in registry.spine_refs() {
        if spine_ref.linear {
            opf.push_str(&format!("    <itemref idref=\"{}\"/>\n", spine_ref.idref));
        } else {
            opf.push_str(&format!(
                "    <itemref idref=\"{}\" linear=\"no\"/>\n",
                spine_ref.idref
            ));
        }
    }
    opf.push_str("  </spine>\n");

    if let Some(ref cover) = registry.cover {
        opf.push_str(&format!(
            "  <guide>\n    <reference type=\"cover\" title=\"Cover\" href=\"{}\"/>\n  </guide>\n",
            escape_xml(cover)
        ));
    }

    opf.push_str("</package>\n");
    opf
}

/// Generate the navigation document (NCX).
fn generate_ncx(meta: &Metadata, toc: &TocBuilder) -> String {
    let mut ncx = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <!DOCTYPE ncx PUBLIC \"-//NISO//DTD ncx 2005-1//EN\" \"http://www.daisy.org/z3986/2005/ncx-2005-1.dtd\">\n\
         <ncx xmlns=\"http://www.daisy.org/z3986/2005/ncx/\" version=\"2005-1\">\n\
         \x20 <head>\n",
    );

    ncx.push_str(&format!(
        "    <meta name=\"dtb:uid\" content=\"{}\"/>\n",
        escape_xml(&meta.identifier)
    ));
    ncx.push_str(&format!(
        "    <meta name=\"dtb:depth\" content=\"{}\"/>\n",
        toc.max_depth()
    ));
    ncx.push_str(
        "    <meta name=\"dtb:totalPageCount\" content=\"0\"/>\n\
         \x20   <meta name=\"dtb:maxPageNumber\" content=\"0\"/>\n\
         \x20 </head>\n",
    );
    ncx.push_str(&format!(
        "  <docTitle>\n    <text>{}</text>\n  </docTitle>\n",
        escape_xml(&meta.title)
    ));
    ncx.push_str("  <navMap>\n");
    ncx.push_str(&toc.nav_map());
    ncx.push_str("  </navMap>\n</ncx>\n");
    ncx
}
