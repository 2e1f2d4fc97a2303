//! Table-of-contents builder.

use crate::records::RecordList;
use crate::xml::escape_xml;

/// Accumulates navMap entries one navPoint at a time.
///
/// Entries are emitted as siblings in call order; the nesting level feeds
/// only the declared depth. The entry counter doubles as the stable id
/// suffix and the 1-based play order.
#[derive(Debug)]
pub(crate) struct TocBuilder {
    entries: RecordList,
    count: usize,
    max_depth: usize,
}

impl TocBuilder {
    pub fn new() -> Self {
        Self {
            entries: RecordList::new(),
            count: 0,
            max_depth: 1,
        }
    }

    /// Append one entry. `url` is relative to the content directory and may
    /// carry a fragment; `level` is 1 for top-level entries, 2 for
    /// subentries, and so on.
    pub fn add_entry(&mut self, title: &str, url: &str, level: usize) {
        self.count += 1;
        if level > self.max_depth {
            self.max_depth = level;
        }

        self.entries.append_raw(&format!(
            "    <navPoint id=\"navPoint-{n}\" playOrder=\"{n}\">\n\
             \x20     <navLabel><text>{title}</text></navLabel>\n\
             \x20     <content src=\"{url}\"/>\n\
             \x20   </navPoint>\n",
            n = self.count,
            title = escape_xml(title),
            url = escape_xml(url),
        ));
    }

    /// Maximum nesting level seen so far; at least 1.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn len(&self) -> usize {
        self.count
    }

    /// The accumulated navMap contents.
    pub fn nav_map(&self) -> String {
        self.entries.concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_orders_follow_call_order() {
        let mut toc = TocBuilder::new();
        toc.add_entry("One", "ch1.xhtml", 1);
        toc.add_entry("Two", "ch2.xhtml", 1);
        toc.add_entry("Three", "ch2.xhtml#sec", 2);

        let nav = toc.nav_map();
        assert_eq!(toc.len(), 3);
        assert!(nav.contains("id=\"navPoint-1\" playOrder=\"1\""));
        assert!(nav.contains("id=\"navPoint-2\" playOrder=\"2\""));
        assert!(nav.contains("id=\"navPoint-3\" playOrder=\"3\""));
        assert!(nav.contains("<content src=\"ch2.xhtml#sec\"/>"));
    }

    #[test]
    fn depth_tracks_the_running_maximum() {
        let mut toc = TocBuilder::new();
        assert_eq!(toc.max_depth(), 1);
        for (i, level) in [1, 2, 1, 3].into_iter().enumerate() {
            toc.add_entry(&format!("Entry {i}"), "doc.xhtml", level);
        }
        assert_eq!(toc.max_depth(), 3);
        assert_eq!(toc.len(), 4);
    }

    #[test]
    fn entries_are_siblings_regardless_of_level() {
        let mut toc = TocBuilder::new();
        toc.add_entry("Top", "a.xhtml", 1);
        toc.add_entry("Sub", "b.xhtml", 2);

        // no navPoint is nested inside another
        let nav = toc.nav_map();
        let opens = nav.matches("<navPoint").count();
        let closes = nav.matches("</navPoint>").count();
        assert_eq!(opens, 2);
        assert_eq!(closes, 2);
        let first_close = nav.find("</navPoint>").unwrap();
        let second_open = nav.rfind("<navPoint").unwrap();
        assert!(first_close < second_open);
    }

    #[test]
    fn titles_are_escaped() {
        let mut toc = TocBuilder::new();
        toc.add_entry("War & Peace", "ch.xhtml", 1);
        assert!(toc.nav_map().contains("<text>War &amp; Peace</text>"));
    }
}
