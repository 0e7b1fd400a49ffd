use std::path::Path;

use osc_snapshot::{read_records, write_records_to_file, SnapshotResult};
use osc_types::{EntityKind, EntityRecord, RawEntity};
use tracing::info;

use crate::error::RewriteResult;

/// What a rewriter decided for one record.
#[derive(Clone, Debug, PartialEq)]
pub enum RewriteOutcome {
    /// Pass the record through untouched.
    Keep(EntityRecord),
    /// Pass the record through with changed content.
    Modified(EntityRecord),
    /// Remove the record from the stream.
    Drop,
}

/// A per-record stream transformation.
pub trait Rewriter {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Decide what happens to one record. Rewriters may record extra
    /// counts in `stats`; seen/modified/dropped are counted by the driver.
    fn rewrite(&self, record: EntityRecord, stats: &mut RewriteStats) -> RewriteOutcome;
}

/// Per-kind record counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KindCounts {
    pub seen: usize,
    pub modified: usize,
    pub dropped: usize,
}

/// Counts accumulated over one rewrite pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub points: KindCounts,
    pub polylines: KindCounts,
    pub relations: KindCounts,
    /// Polylines carrying a `highway` tag.
    pub highway_polylines: usize,
}

impl RewriteStats {
    pub fn kind(&self, kind: EntityKind) -> &KindCounts {
        match kind {
            EntityKind::Point => &self.points,
            EntityKind::Polyline => &self.polylines,
            EntityKind::Relation => &self.relations,
        }
    }

    pub fn kind_mut(&mut self, kind: EntityKind) -> &mut KindCounts {
        match kind {
            EntityKind::Point => &mut self.points,
            EntityKind::Polyline => &mut self.polylines,
            EntityKind::Relation => &mut self.relations,
        }
    }
}

/// Run a rewriter over a raw record stream, preserving order.
///
/// Every record is normalized first; the first stream or normalization
/// error aborts the pass. Kept records are written back as read. Modified
/// records are re-encoded from their normalized form, so a missing
/// `version` comes out as `0`. Fields outside the record format are not
/// carried in either case.
pub fn rewrite_records<I, R>(
    records: I,
    rewriter: &R,
) -> RewriteResult<(Vec<RawEntity>, RewriteStats)>
where
    I: IntoIterator<Item = SnapshotResult<RawEntity>>,
    R: Rewriter + ?Sized,
{
    let mut stats = RewriteStats::default();
    let mut out = Vec::new();

    for raw in records {
        let raw = raw?;
        let record = raw
            .clone()
            .normalize()
            .map_err(osc_snapshot::SnapshotError::from)?;
        let kind = record.kind();
        stats.kind_mut(kind).seen += 1;
        match rewriter.rewrite(record, &mut stats) {
            RewriteOutcome::Keep(_) => out.push(raw),
            RewriteOutcome::Modified(record) => {
                stats.kind_mut(kind).modified += 1;
                out.push(RawEntity::from(&record));
            }
            RewriteOutcome::Drop => stats.kind_mut(kind).dropped += 1,
        }
    }

    info!(
        rewriter = rewriter.name(),
        written = out.len(),
        polylines_modified = stats.polylines.modified,
        relations_dropped = stats.relations.dropped,
        "rewrite complete"
    );
    Ok((out, stats))
}

/// Rewrite a record stream file into another. The output only appears once
/// the whole pass has succeeded.
pub fn rewrite_file<R>(input: &Path, output: &Path, rewriter: &R) -> RewriteResult<RewriteStats>
where
    R: Rewriter + ?Sized,
{
    info!(
        rewriter = rewriter.name(),
        input = %input.display(),
        output = %output.display(),
        "rewriting"
    );
    let (records, stats) = rewrite_records(read_records(input)?, rewriter)?;
    write_records_to_file(output, &records)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use osc_snapshot::SnapshotError;

    /// Drops relations, bumps nothing else.
    struct DropRelations;

    impl Rewriter for DropRelations {
        fn name(&self) -> &'static str {
            "drop-relations"
        }

        fn rewrite(&self, record: EntityRecord, _stats: &mut RewriteStats) -> RewriteOutcome {
            match record {
                EntityRecord::Relation(_) => RewriteOutcome::Drop,
                other => RewriteOutcome::Keep(other),
            }
        }
    }

    fn raw(kind: EntityKind, id: u64) -> RawEntity {
        let mut raw = RawEntity::new(kind);
        raw.id = Some(id);
        raw.version = Some(1);
        raw.tags = Some(Default::default());
        match kind {
            EntityKind::Point => {
                raw.lat = Some(1.0);
                raw.lon = Some(2.0);
            }
            EntityKind::Polyline => raw.nodes = Some(vec![1]),
            EntityKind::Relation => raw.members = Some(vec![]),
        }
        raw
    }

    #[test]
    fn driver_counts_and_preserves_order() {
        let input = vec![
            Ok(raw(EntityKind::Relation, 1)),
            Ok(raw(EntityKind::Point, 2)),
            Ok(raw(EntityKind::Polyline, 3)),
        ];
        let (out, stats) = rewrite_records(input, &DropRelations).unwrap();
        let ids: Vec<Option<u64>> = out.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![Some(2), Some(3)]);
        assert_eq!(stats.relations.seen, 1);
        assert_eq!(stats.relations.dropped, 1);
        assert_eq!(stats.points.seen, 1);
        assert_eq!(stats.kind(EntityKind::Polyline).modified, 0);
    }

    #[test]
    fn kept_records_are_written_as_read() {
        let mut bare = raw(EntityKind::Point, 4);
        bare.version = None;
        let (out, _) = rewrite_records(vec![Ok(bare.clone())], &DropRelations).unwrap();
        assert_eq!(out, vec![bare]);
        assert_eq!(out[0].version, None);
    }

    #[test]
    fn malformed_record_aborts() {
        let mut bad = raw(EntityKind::Point, 9);
        bad.lat = None;
        let err = rewrite_records(vec![Ok(bad)], &DropRelations).unwrap_err();
        assert!(matches!(
            err,
            crate::RewriteError::Stream(SnapshotError::Malformed(_))
        ));
    }

    #[test]
    fn rewrite_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.jsonl");
        let output = dir.path().join("out.jsonl");
        std::fs::write(
            &input,
            "{\"type\":\"node\",\"id\":1,\"tags\":{},\"lat\":0.5,\"lon\":0.5}\n\
             {\"type\":\"relation\",\"id\":2,\"tags\":{},\"members\":[]}\n",
        )
        .unwrap();

        let stats = rewrite_file(&input, &output, &DropRelations).unwrap();
        assert_eq!(stats.relations.dropped, 1);
        let text = std::fs::read_to_string(&output).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("\"type\":\"node\""));
    }
}
