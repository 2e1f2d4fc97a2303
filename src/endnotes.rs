//! Endnote accumulation and cross-linking.
//!
//! Each registered endnote produces a pair of mutually pointing anchors:
//! a reference link for the citation site and a back-link spliced into the
//! stored endnote body.

use memchr::memchr3;

use crate::records::RecordList;

/// Name of the generated endnotes document inside the content directory.
pub(crate) const ENDNOTES_DOC: &str = "endnotes.xhtml";

/// Accumulates endnote bodies into one running document.
#[derive(Debug, Default)]
pub(crate) struct Endnotes {
    doc: RecordList,
    count: usize,
}

impl Endnotes {
    /// Register an endnote body cited from `citing_doc`.
    ///
    /// Returns the reference link to embed at the citation site: an inline
    /// anchor targeting `#enN` in the endnotes document, with its own id
    /// `enRefN` so the stored back-link can point at it.
    ///
    /// When the body begins with a paragraph-opening tag, the back-link is
    /// spliced just after that tag so it sits inside the first paragraph of
    /// prose; any other leading content (a `<pre>` block, say) is left
    /// untouched behind a back-link paragraph of its own.
    pub fn register(&mut self, body: &str, citing_doc: &str) -> String {
        self.count += 1;
        let n = self.count;

        let ref_link =
            format!("&nbsp;<a href=\"{ENDNOTES_DOC}#en{n}\" id=\"enRef{n}\">[{n}]</a>");
        let back_link = format!("<a href=\"{citing_doc}#enRef{n}\">[{n}]</a>");

        self.doc
            .append_raw(&format!("<div class=\"endnote\" id=\"en{n}\">\n"));
        match paragraph_open_end(body) {
            Some(tag_end) => {
                self.doc.append_raw(&body[..tag_end]);
                self.doc.append_raw(&back_link);
                self.doc.append_raw(" ");
                self.doc.append_raw(&body[tag_end..]);
            }
            None => {
                self.doc.append_raw("<p>");
                self.doc.append_raw(&back_link);
                self.doc.append_raw("</p>\n");
                self.doc.append_raw(body);
            }
        }
        self.doc.append_raw("</div>\n");

        ref_link
    }

    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    /// The complete endnotes document, wrapped in its XHTML shell.
    pub fn render_document(&self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n\
             <!DOCTYPE html PUBLIC\n\
             \x20\"-//W3C//DTD XHTML 1.1//EN\"\n\
             \x20\"http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd\">\n\
             <html xmlns=\"http://www.w3.org/1999/xhtml\">\n\
             <head>\n\
             <title>End Notes</title>\n\
             <style type=\"text/css\">\n\
             div.endnote {{page-break-before: always}}\n\
             </style>\n\
             </head>\n\
             <body>\n\
             {}</body>\n\
             </html>\n",
            self.doc.concat()
        )
    }
}

/// Quote-aware scan for the end of a leading paragraph-opening tag.
///
/// Returns the index just past the tag's closing `>`, or `None` when the
/// body does not begin with a `<p ...>` tag. `>` inside single- or
/// double-quoted attribute values does not terminate the tag; a tag that
/// never closes yields the body length.
fn paragraph_open_end(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    if !(bytes.len() >= 2 && bytes[0] == b'<' && bytes[1] == b'p') {
        return None;
    }
    // rule out <pre>, <param>, and friends
    if bytes.get(2).is_some_and(|b| b.is_ascii_alphabetic()) {
        return None;
    }

    #[derive(Clone, Copy)]
    enum Scan {
        Outside,
        InDouble,
        InSingle,
    }

    let mut state = Scan::Outside;
    let mut pos = 2;
    while let Some(offset) = memchr3(b'"', b'\'', b'>', &bytes[pos..]) {
        let at = pos + offset;
        match (state, bytes[at]) {
            (Scan::Outside, b'"') => state = Scan::InDouble,
            (Scan::InDouble, b'"') => state = Scan::Outside,
            (Scan::Outside, b'\'') => state = Scan::InSingle,
            (Scan::InSingle, b'\'') => state = Scan::Outside,
            (Scan::Outside, b'>') => return Some(at + 1),
            // quotes and '>' inside a quoted attribute value
            _ => {}
        }
        pos = at + 1;
    }
    Some(bytes.len())
}
