//! Result normalization: raw store rows → canonical image records.
//!
//! Every strategy returns rows in its own shape; this module maps them onto
//! one canonical record, derives the display filename, and collapses
//! duplicate paths (a store may hold a full and a partial embedding row for
//! the same image). First occurrence wins and relative order is preserved,
//! so normalization is idempotent.

use std::collections::HashSet;

use inkdex_core::{synthesize_id, ImageRecord, ImageRow};

/// Last `/`-delimited segment of a canonical path.
pub fn filename_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn to_record(row: ImageRow) -> ImageRecord {
    let ImageRow {
        id,
        path,
        attributes,
        similarity,
        embedding_kind,
    } = row;

    let id = id.unwrap_or_else(|| synthesize_id(&path));
    let filename = filename_of(&path).to_string();

    ImageRecord {
        id,
        path,
        filename,
        attributes,
        similarity,
        embedding_kind,
    }
}

/// Normalize raw rows into canonical records, deduplicated by path.
pub fn normalize(rows: Vec<ImageRow>) -> Vec<ImageRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|row| seen.insert(row.path.clone()))
        .map(to_record)
        .collect()
}

/// Re-normalize already-normalized records. A no-op apart from re-deriving
/// the filename; exists so callers composing record lists from several
/// sources can enforce the path-uniqueness invariant again.
pub fn normalize_records(records: Vec<ImageRecord>) -> Vec<ImageRecord> {
    normalize(records.into_iter().map(ImageRow::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkdex_core::{EmbeddingKind, ImageAttributes};

    fn row(path: &str, kind: EmbeddingKind) -> ImageRow {
        ImageRow {
            id: None,
            path: path.to_string(),
            attributes: ImageAttributes::default(),
            similarity: None,
            embedding_kind: Some(kind),
        }
    }

    #[test]
    fn test_filename_derivation() {
        assert_eq!(filename_of("minio:photos/clients/a.jpg"), "a.jpg");
        assert_eq!(filename_of("minio:a.jpg"), "minio:a.jpg");
        assert_eq!(filename_of("nested/deep/path/file.png"), "file.png");
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let rows = vec![
            row("minio:photos/a.jpg", EmbeddingKind::Full),
            row("minio:photos/b.jpg", EmbeddingKind::Full),
            row("minio:photos/a.jpg", EmbeddingKind::Partial),
            row("minio:photos/a.jpg", EmbeddingKind::Partial),
        ];

        let records = normalize(rows);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].path, "minio:photos/a.jpg");
        assert_eq!(records[0].embedding_kind, Some(EmbeddingKind::Full));
        assert_eq!(records[1].path, "minio:photos/b.jpg");
    }

    #[test]
    fn test_dedup_preserves_relative_order() {
        let rows = vec![
            row("c", EmbeddingKind::Full),
            row("a", EmbeddingKind::Full),
            row("b", EmbeddingKind::Full),
            row("a", EmbeddingKind::Partial),
        ];

        let paths: Vec<String> = normalize(rows).into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_id_synthesized_when_missing_and_kept_when_present() {
        let mut with_id = row("minio:photos/a.jpg", EmbeddingKind::Full);
        with_id.id = Some("row-7".to_string());

        let records = normalize(vec![with_id, row("minio:photos/b.jpg", EmbeddingKind::Full)]);
        assert_eq!(records[0].id, "row-7");
        assert!(!records[1].id.is_empty());
        // Synthesis is stable per path
        assert_eq!(
            records[1].id,
            normalize(vec![row("minio:photos/b.jpg", EmbeddingKind::Full)])[0].id
        );
    }

    #[test]
    fn test_similarity_copied_only_when_present() {
        let mut scored = row("a", EmbeddingKind::Full);
        scored.similarity = Some(0.83);

        let records = normalize(vec![scored, row("b", EmbeddingKind::Full)]);
        assert_eq!(records[0].similarity, Some(0.83));
        assert_eq!(records[1].similarity, None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let rows = vec![
            row("minio:photos/a.jpg", EmbeddingKind::Full),
            row("minio:photos/a.jpg", EmbeddingKind::Partial),
            row("minio:photos/b.jpg", EmbeddingKind::Full),
        ];

        let once = normalize(rows);
        let twice = normalize_records(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize(Vec::new()).is_empty());
    }
}
