//! Generated cover document.

use crate::metadata::Metadata;
use crate::xml::escape_xml;

/// Name of the generated cover document inside the content directory.
pub(crate) const COVER_DOC: &str = "cover.xhtml";

/// Render the cover document.
///
/// With a registered cover image, the document simply embeds it. Without
/// one, an inline SVG placeholder is produced instead — fixed canvas, solid
/// background, the title and creator overlaid as text — so every package
/// gets a visually distinct cover even with no supplied artwork.
pub(crate) fn render_cover(meta: &Metadata, cover_image: Option<&str>) -> String {
    let mut doc = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n\
         <!DOCTYPE html PUBLIC\n\
         \x20\"-//W3C//DTD XHTML 1.1//EN\"\n\
         \x20\"http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd\">\n\
         <html xmlns=\"http://www.w3.org/1999/xhtml\">\n\
         <head>\n\
         <title>Cover</title>\n\
         <style type=\"text/css\">img {max-width: 100%;}</style>\n\
         </head>\n\
         <body class=\"cover\">\n",
    );

    match cover_image {
        Some(image) => {
            doc.push_str(&format!(
                "<div><img src=\"{}\" alt=\"Cover\"/></div>",
                escape_xml(image)
            ));
        }
        None => {
            doc.push_str(
                "<svg version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\"\n\
                 \x20xmlns:xlink=\"http://www.w3.org/1999/xlink\"\n\
                 \x20width=\"100%\" height=\"100%\" viewBox=\"0 0 500 656\">\n\
                 <rect x=\"0\" y=\"0\" fill=\"blue\" width=\"500\" height=\"656\"/>\n",
            );
            doc.push_str(&format!(
                "<text font-family=\"Helvetica\" font-size=\"36\" fill=\"white\" x=\"100\" y=\"350\">{}</text>\n",
                escape_xml(&meta.title)
            ));
            let creators: Vec<&str> = meta.creators.iter().collect();
            if !creators.is_empty() {
                doc.push_str(&format!(
                    "<text font-family=\"Helvetica\" font-size=\"24\" fill=\"white\" x=\"100\" y=\"250\">{}</text>\n",
                    escape_xml(&creators.join(", "))
                ));
            }
            doc.push_str("</svg>\n");
        }
    }

    doc.push_str("</body>\n</html>\n");
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetaKey;

    #[test]
    fn cover_embeds_a_registered_image() {
        let meta = Metadata::default();
        let doc = render_cover(&meta, Some("cover.png"));
        assert!(doc.contains("<img src=\"cover.png\" alt=\"Cover\"/>"));
        assert!(!doc.contains("<svg"));
    }

    #[test]
    fn placeholder_overlays_title_and_creator() {
        let mut meta = Metadata::default();
        meta.set(MetaKey::Title, "Wuthering Heights");
        meta.set(MetaKey::Creator, "Emily Bront\u{eb}");
        let doc = render_cover(&meta, None);
        assert!(doc.contains("viewBox=\"0 0 500 656\""));
        assert!(doc.contains(">Wuthering Heights</text>"));
        assert!(doc.contains(">Emily Bront\u{eb}</text>"));
    }

    #[test]
    fn placeholder_title_is_escaped() {
        let mut meta = Metadata::default();
        meta.set(MetaKey::Title, "Crime & Punishment");
        let doc = render_cover(&meta, None);
        assert!(doc.contains(">Crime &amp; Punishment</text>"));
    }

    #[test]
    fn placeholder_without_creator_still_shows_title() {
        let meta = Metadata::default();
        let doc = render_cover(&meta, None);
        assert!(doc.contains(">Untitled</text>"));
        assert!(!doc.contains("font-size=\"24\""));
    }
}
