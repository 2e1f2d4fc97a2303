use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use quire::{EpubBuilder, MetaKey};

/// A clonable capture buffer so tests can read what the builder wrote.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn diagnostic_mode_passes_generated_markup_through() {
    let out = SharedBuf::default();
    let mut epub = EpubBuilder::diagnostic(out.clone());
    epub.add_metadata(MetaKey::Title, "Dry Run");
    epub.new_file("ch1.xhtml").unwrap();
    epub.write(b"<html>chapter one</html>").unwrap();
    epub.close_file().unwrap();
    epub.add_part("ch1.xhtml", false);
    epub.add_toc_entry("Chapter 1", "ch1.xhtml", 1);
    epub.finalize().unwrap();

    let text = out.contents();
    // streamed content and all three generated documents, no archive framing
    assert!(text.contains("<html>chapter one</html>"));
    assert!(text.contains("<dc:title>Dry Run</dc:title>"));
    assert!(text.contains("<navPoint id=\"navPoint-1\""));
    assert!(text.contains("urn:oasis:names:tc:opendocument:xmlns:container"));
}

#[test]
fn diagnostic_mode_skips_external_file_copies() {
    let out = SharedBuf::default();
    let mut epub = EpubBuilder::diagnostic(out.clone());
    // the source path does not exist; in diagnostic mode it is never opened
    epub.set_cover_image("cover.png").unwrap();
    epub.make_cover().unwrap();
    epub.finalize().unwrap();

    let text = out.contents();
    assert!(text.contains("<img src=\"cover.png\" alt=\"Cover\"/>"));
    assert!(text.contains("<meta name=\"cover\" content=\"cover-image\"/>"));
    assert!(text.contains("<item id=\"cover-image\" href=\"cover.png\" media-type=\"image/png\"/>"));
    assert!(text.contains("<reference type=\"cover\" title=\"Cover\" href=\"cover.xhtml\"/>"));
}
