//! Descriptive metadata for the package.

use crate::records::RecordList;

/// Kind of metadata registered through
/// [`EpubBuilder::add_metadata`](crate::EpubBuilder::add_metadata).
///
/// Scalar kinds (title, identifier, description, publisher, date, source,
/// rights) are replaced wholesale on each write; repeatable kinds (creator,
/// language, subject) accumulate one record per write in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKey {
    /// Book title.
    Title,
    /// Creator (author); may be given multiple times.
    Creator,
    /// Unique identifier (ISBN, reversed domain name, etc.).
    Identifier,
    /// Language (RFC 3066; en, fr, de, ...); may be given multiple times.
    Language,
    /// Subject; may be given multiple times.
    Subject,
    /// Description.
    Description,
    /// Publisher.
    Publisher,
    /// Date (YYYY or YYYY-MM or YYYY-MM-DD).
    Date,
    /// Source.
    Source,
    /// Copyright notice.
    Rights,
}

/// The ten recognized descriptive fields.
///
/// Title and identifier always carry a value, so the finalizer never emits
/// an empty required element. No content validation is performed; the
/// caller's values are trusted.
#[derive(Debug, Clone)]
pub(crate) struct Metadata {
    pub title: String,
    pub identifier: String,
    pub creators: RecordList,
    pub languages: RecordList,
    pub subjects: RecordList,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub date: Option<String>,
    pub source: Option<String>,
    pub rights: Option<String>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            identifier: "no-identifier".to_string(),
            creators: RecordList::new(),
            languages: RecordList::new(),
            subjects: RecordList::new(),
            description: None,
            publisher: None,
            date: None,
            source: None,
            rights: None,
        }
    }
}

impl Metadata {
    /// Route a value to its field according to the key's cardinality.
    pub fn set(&mut self, key: MetaKey, value: &str) {
        match key {
            MetaKey::Title => self.title = value.to_string(),
            MetaKey::Creator => self.creators.push(value),
            MetaKey::Identifier => self.identifier = value.to_string(),
            MetaKey::Language => self.languages.push(value),
            MetaKey::Subject => self.subjects.push(value),
            MetaKey::Description => self.description = Some(value.to_string()),
            MetaKey::Publisher => self.publisher = Some(value.to_string()),
            MetaKey::Date => self.date = Some(value.to_string()),
            MetaKey::Source => self.source = Some(value.to_string()),
            MetaKey::Rights => self.rights = Some(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_have_defaults() {
        let meta = Metadata::default();
        assert_eq!(meta.title, "Untitled");
        assert_eq!(meta.identifier, "no-identifier");
    }

    #[test]
    fn scalar_fields_keep_the_last_write() {
        let mut meta = Metadata::default();
        meta.set(MetaKey::Title, "First");
        meta.set(MetaKey::Title, "Second");
        assert_eq!(meta.title, "Second");

        meta.set(MetaKey::Date, "2010");
        meta.set(MetaKey::Date, "2011-05");
        assert_eq!(meta.date.as_deref(), Some("2011-05"));
    }

    #[test]
    fn repeatable_fields_accumulate_in_call_order() {
        let mut meta = Metadata::default();
        meta.set(MetaKey::Creator, "First Author");
        meta.set(MetaKey::Creator, "Second Author");
        meta.set(MetaKey::Subject, "Fiction");
        assert_eq!(
            meta.creators.iter().collect::<Vec<_>>(),
            vec!["First Author", "Second Author"]
        );
        assert_eq!(meta.subjects.iter().collect::<Vec<_>>(), vec!["Fiction"]);
    }
}
