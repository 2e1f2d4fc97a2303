//! Resource registry: reading-order parts, auxiliary parts, cover, and
//! other resources with their media types.

use crate::media::guess_media_type;
use crate::records::RecordList;

/// One manifest entry: sequential id, href, resolved media type.
#[derive(Debug, Clone)]
pub(crate) struct ManifestItem {
    pub id: String,
    pub href: String,
    pub media_type: String,
}

/// One spine reference: manifest id plus reading-order flag.
#[derive(Debug, Clone)]
pub(crate) struct SpineRef {
    pub idref: String,
    pub linear: bool,
}

/// Tracks everything the manifest will enumerate.
///
/// Registration and content writing are independent: a part can be
/// registered without its bytes ever being streamed, and vice versa. That
/// contract is the caller's to uphold; the registry does not cross-check.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    parts: RecordList,
    aux_parts: RecordList,
    /// Alternating filename / media-type records, one pair per resource.
    other: RecordList,
    pub cover: Option<String>,
    pub cover_image: Option<String>,
}

impl Registry {
    /// Register a content document. Auxiliary parts are reachable only via
    /// hyperlink and are marked non-linear in the spine.
    pub fn add_part(&mut self, filename: &str, auxiliary: bool) {
        if auxiliary {
            self.aux_parts.push(filename);
        } else {
            self.parts.push(filename);
        }
    }

    /// Register a non-document resource (image, stylesheet, ...). The media
    /// type is inferred from the filename suffix when not supplied.
    pub fn add_other(&mut self, filename: &str, media_type: Option<&str>) {
        let media_type = media_type.unwrap_or_else(|| guess_media_type(filename));
        self.other.push(filename);
        self.other.push(media_type);
    }

    /// (filename, media type) pairs in registration order.
    pub fn others(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut records = self.other.iter();
        std::iter::from_fn(move || Some((records.next()?, records.next()?)))
    }

    /// Content documents in spine order: cover, then reading-order parts,
    /// then auxiliary parts.
    fn content_docs(&self) -> impl Iterator<Item = &str> {
        self.cover
            .as_deref()
            .into_iter()
            .chain(self.parts.iter())
            .chain(self.aux_parts.iter())
    }

    /// The canonical manifest traversal: content documents, then other
    /// resources, then the cover image. Ids `id1..idN` are assigned along
    /// the way; [`spine_refs`](Self::spine_refs) walks the same prefix, so
    /// the manifest and the spine can never disagree on an id.
    pub fn manifest_items(&self) -> Vec<ManifestItem> {
        let mut items = Vec::new();

        for href in self.content_docs() {
            items.push(ManifestItem {
                id: format!("id{}", items.len() + 1),
                href: href.to_string(),
                media_type: "application/xhtml+xml".to_string(),
            });
        }
        for (href, media_type) in self.others() {
            items.push(ManifestItem {
                id: format!("id{}", items.len() + 1),
                href: href.to_string(),
                media_type: media_type.to_string(),
            });
        }
        if let Some(image) = &self.cover_image {
            items.push(ManifestItem {
                id: "cover-image".to_string(),
                href: image.clone(),
                media_type: guess_media_type(image).to_string(),
            });
        }

        items
    }

    /// Spine references for every content document, ids matching
    /// [`manifest_items`](Self::manifest_items). The cover and auxiliary
    /// parts are non-linear; reading-order parts are linear.
    pub fn spine_refs(&self) -> Vec<SpineRef> {
        let cover = self.cover.as_deref().into_iter().map(|h| (h, false));
        let parts = self.parts.iter().map(|h| (h, true));
        let aux = self.aux_parts.iter().map(|h| (h, false));

        cover
            .chain(parts)
            .chain(aux)
            .enumerate()
            .map(|(i, (_, linear))| SpineRef {
                idref: format!("id{}", i + 1),
                linear,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_traversal_order_and_ids() {
        let mut reg = Registry::default();
        reg.add_part("ch1.xhtml", false);
        reg.add_part("notes.xhtml", true);
        reg.add_part("ch2.xhtml", false);
        reg.add_other("style.css", None);
        reg.cover = Some("cover.xhtml".to_string());
        reg.cover_image = Some("cover.png".to_string());

        let items = reg.manifest_items();
        let hrefs: Vec<_> = items.iter().map(|i| i.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec![
                "cover.xhtml",
                "ch1.xhtml",
                "ch2.xhtml",
                "notes.xhtml",
                "style.css",
                "cover.png"
            ]
        );

        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["id1", "id2", "id3", "id4", "id5", "cover-image"]);
        assert_eq!(items[4].media_type, "text/css");
        assert_eq!(items[5].media_type, "image/png");
    }

    #[test]
    fn spine_ids_are_a_prefix_of_manifest_ids() {
        let mut reg = Registry::default();
        reg.cover = Some("cover.xhtml".to_string());
        reg.add_part("ch1.xhtml", false);
        reg.add_part("notes.xhtml", true);
        reg.add_other("style.css", None);

        let manifest_ids: Vec<_> = reg.manifest_items().into_iter().map(|i| i.id).collect();
        let spine = reg.spine_refs();
        let spine_ids: Vec<_> = spine.iter().map(|s| s.idref.clone()).collect();

        assert_eq!(spine_ids, manifest_ids[..spine_ids.len()]);
        assert_eq!(
            spine.iter().map(|s| s.linear).collect::<Vec<_>>(),
            vec![false, true, false]
        );
    }

    #[test]
    fn explicit_media_type_wins_over_inference() {
        let mut reg = Registry::default();
        reg.add_other("data.bin", Some("application/octet-stream"));
        reg.add_other("image.png", None);

        let pairs: Vec<_> = reg.others().collect();
        assert_eq!(
            pairs,
            vec![
                ("data.bin", "application/octet-stream"),
                ("image.png", "image/png")
            ]
        );
    }

    #[test]
    fn empty_registry_produces_no_items() {
        let reg = Registry::default();
        assert!(reg.manifest_items().is_empty());
        assert!(reg.spine_refs().is_empty());
    }
}
