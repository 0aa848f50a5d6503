use ahash::AHashMap;
use tracing::{debug, info, warn};
use crate::entry::{CorpusEntry, DescriptionRecord, EmbeddingRecord};
use crate::provider::EmbeddingProvider;
use crate::{Error, Result, SchemaError, Vector};

/// The immutable catalogue of item vectors and their display metadata.
///
/// Built once from an embeddings document and a descriptions document joined by
/// identifier. There are no mutation operations: a rebuilt corpus replaces the
/// whole index.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    entries: Vec<CorpusEntry>,
    by_id: AHashMap<String, usize>,
    dim: Option<usize>,
    degraded_descriptions: usize,
}

impl CorpusIndex {
    /// Validate and join the two source documents.
    ///
    /// Fails on the first malformed embeddings row: missing or empty identifier,
    /// missing or empty vector, non-finite component, inconsistent dimension or
    /// duplicate identifier. A known identifier without a description does not
    /// fail the load; it is counted in
    /// [`degraded_descriptions`](Self::degraded_descriptions) and reads back as
    /// [`NO_DESCRIPTION`](crate::NO_DESCRIPTION).
    pub fn load(
        embeddings: Vec<EmbeddingRecord>,
        descriptions: Vec<DescriptionRecord>,
    ) -> Result<Self> {
        // Later rows win, matching a plain map built from the document.
        let mut description_map: AHashMap<String, String> = AHashMap::new();
        for record in descriptions {
            if let (Some(id), Some(text)) = (record.identifier, record.description) {
                description_map.insert(id, text);
            }
        }

        let mut entries = Vec::with_capacity(embeddings.len());
        let mut by_id = AHashMap::with_capacity(embeddings.len());
        let mut dim: Option<usize> = None;
        let mut degraded = 0usize;

        for (position, record) in embeddings.into_iter().enumerate() {
            let identifier = record
                .identifier
                .ok_or(SchemaError::MissingIdentifier(position))?;
            if identifier.is_empty() {
                return Err(SchemaError::EmptyIdentifier(position).into());
            }

            let data = match record.embedding {
                Some(data) if !data.is_empty() => data,
                _ => return Err(SchemaError::MissingVector(identifier).into()),
            };
            let vector = Vector::new(data);
            if !vector.is_finite() {
                return Err(SchemaError::NonFiniteComponent(identifier).into());
            }

            match dim {
                None => dim = Some(vector.dim()),
                Some(expected) if expected != vector.dim() => {
                    return Err(SchemaError::DimensionMismatch {
                        identifier,
                        expected,
                        actual: vector.dim(),
                    }
                    .into());
                }
                Some(_) => {}
            }

            if by_id.contains_key(&identifier) {
                return Err(SchemaError::DuplicateIdentifier(identifier).into());
            }

            if (vector.norm() - 1.0).abs() > 1e-3 {
                debug!("Corpus vector '{}' is not unit-norm ({})", identifier, vector.norm());
            }

            let description = description_map.remove(&identifier);
            if description.is_none() {
                degraded += 1;
                debug!("No description for corpus entry '{}'", identifier);
            }

            by_id.insert(identifier.clone(), entries.len());
            entries.push(CorpusEntry::new(identifier, vector, description));
        }

        if degraded > 0 {
            warn!("{} corpus entries have no description", degraded);
        }
        if !description_map.is_empty() {
            debug!(
                "{} descriptions refer to identifiers without embeddings",
                description_map.len()
            );
        }
        info!(
            "Corpus loaded: {} entries, dimension {}",
            entries.len(),
            dim.map(|d| d.to_string()).unwrap_or_else(|| "n/a".to_string())
        );

        Ok(Self {
            entries,
            by_id,
            dim,
            degraded_descriptions: degraded,
        })
    }

    /// Like [`load`](Self::load), additionally checking the corpus dimension
    /// against the provider that will embed queries.
    pub fn load_for(
        provider: &dyn EmbeddingProvider,
        embeddings: Vec<EmbeddingRecord>,
        descriptions: Vec<DescriptionRecord>,
    ) -> Result<Self> {
        let index = Self::load(embeddings, descriptions)?;
        if let Some(dim) = index.dim {
            if dim != provider.dimensions() {
                return Err(Error::InvalidDimension {
                    expected: provider.dimensions(),
                    actual: dim,
                });
            }
        }
        Ok(index)
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shared vector dimension, `None` for an empty corpus.
    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    pub fn get(&self, identifier: &str) -> Option<&CorpusEntry> {
        self.by_id.get(identifier).map(|&i| &self.entries[i])
    }

    /// Entries in source-document order.
    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CorpusEntry> {
        self.entries.iter()
    }

    /// Number of entries that fell back to the sentinel description.
    pub fn degraded_descriptions(&self) -> usize {
        self.degraded_descriptions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NO_DESCRIPTION;

    fn records() -> Vec<EmbeddingRecord> {
        vec![
            EmbeddingRecord::new("a.jpg", vec![1.0, 0.0]),
            EmbeddingRecord::new("b.jpg", vec![0.0, 1.0]),
        ]
    }

    #[test]
    fn test_load_and_lookup() {
        let index = CorpusIndex::load(
            records(),
            vec![
                DescriptionRecord::new("a.jpg", "Sunlit kitchen"),
                DescriptionRecord::new("b.jpg", "Dark study"),
            ],
        )
        .unwrap();

        assert_eq!(index.size(), 2);
        assert_eq!(index.dim(), Some(2));
        assert_eq!(index.get("a.jpg").unwrap().description(), "Sunlit kitchen");
        assert!(index.get("missing.jpg").is_none());
        assert_eq!(index.degraded_descriptions(), 0);
    }

    #[test]
    fn test_missing_description_uses_sentinel() {
        let index = CorpusIndex::load(
            records(),
            vec![DescriptionRecord::new("a.jpg", "Sunlit kitchen")],
        )
        .unwrap();

        assert_eq!(index.get("b.jpg").unwrap().description(), NO_DESCRIPTION);
        assert_eq!(index.degraded_descriptions(), 1);
    }

    #[test]
    fn test_last_description_wins() {
        let index = CorpusIndex::load(
            records(),
            vec![
                DescriptionRecord::new("a.jpg", "first"),
                DescriptionRecord::new("a.jpg", "second"),
            ],
        )
        .unwrap();
        assert_eq!(index.get("a.jpg").unwrap().description(), "second");
    }

    #[test]
    fn test_missing_identifier_is_schema_error() {
        let mut rows = records();
        rows.push(EmbeddingRecord {
            identifier: None,
            embedding_input: None,
            embedding: Some(vec![1.0, 1.0]),
        });
        let err = CorpusIndex::load(rows, vec![]).unwrap_err();
        assert!(matches!(err, Error::Schema(SchemaError::MissingIdentifier(2))));
    }

    #[test]
    fn test_missing_vector_is_schema_error() {
        let rows = vec![EmbeddingRecord {
            identifier: Some("a.jpg".into()),
            embedding_input: None,
            embedding: None,
        }];
        let err = CorpusIndex::load(rows, vec![]).unwrap_err();
        assert!(matches!(err, Error::Schema(SchemaError::MissingVector(ref id)) if id == "a.jpg"));
    }

    #[test]
    fn test_dimension_mismatch_is_schema_error() {
        let mut rows = records();
        rows.push(EmbeddingRecord::new("c.jpg", vec![1.0, 0.0, 0.0]));
        let err = CorpusIndex::load(rows, vec![]).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::DimensionMismatch { expected: 2, actual: 3, .. })
        ));
    }

    #[test]
    fn test_duplicate_and_empty_identifiers_rejected() {
        let mut rows = records();
        rows.push(EmbeddingRecord::new("a.jpg", vec![1.0, 1.0]));
        assert!(matches!(
            CorpusIndex::load(rows, vec![]).unwrap_err(),
            Error::Schema(SchemaError::DuplicateIdentifier(_))
        ));

        let rows = vec![EmbeddingRecord::new("", vec![1.0])];
        assert!(matches!(
            CorpusIndex::load(rows, vec![]).unwrap_err(),
            Error::Schema(SchemaError::EmptyIdentifier(0))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let rows = vec![EmbeddingRecord::new("a.jpg", vec![f32::NAN, 1.0])];
        assert!(matches!(
            CorpusIndex::load(rows, vec![]).unwrap_err(),
            Error::Schema(SchemaError::NonFiniteComponent(_))
        ));
    }

    struct FixedDim(usize);

    impl EmbeddingProvider for FixedDim {
        fn embed(&self, _text: &str) -> Result<Vector> {
            Ok(Vector::zeros(self.0))
        }

        fn dimensions(&self) -> usize {
            self.0
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_load_for_checks_provider_dimension() {
        assert!(CorpusIndex::load_for(&FixedDim(2), records(), vec![]).is_ok());
        let err = CorpusIndex::load_for(&FixedDim(512), records(), vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { expected: 512, actual: 2 }));
    }

    #[test]
    fn test_empty_corpus() {
        let index = CorpusIndex::load(vec![], vec![]).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.dim(), None);
    }
}
