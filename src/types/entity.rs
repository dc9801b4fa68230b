/// A host database record that carries a free-text annotation block.
///
/// Implement this for the host's own actor records so they can be fed to
/// [`RuleRepository::from_entities`](crate::RuleRepository::from_entities)
/// without copying their notes.
pub trait Annotated {
    /// Stable identifier of the record. Level-up rules are scoped to it.
    fn id(&self) -> u32;

    /// The raw annotation text.
    fn note(&self) -> &str;
}

impl<T: Annotated + ?Sized> Annotated for &T {
    fn id(&self) -> u32 {
        (**self).id()
    }

    fn note(&self) -> &str {
        (**self).note()
    }
}

/// An owned id/note pair, for hosts without a record type of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: u32,
    pub note: String,
}

impl Entity {
    #[must_use]
    pub fn new(id: u32, note: impl Into<String>) -> Self {
        Self {
            id,
            note: note.into(),
        }
    }
}

impl Annotated for Entity {
    fn id(&self) -> u32 {
        self.id
    }

    fn note(&self) -> &str {
        &self.note
    }
}
