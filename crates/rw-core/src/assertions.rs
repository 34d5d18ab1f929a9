//! ConceptNet assertion joining.
//!
//! Relation dumps arrive as one file per relation, `cn_<relation>.txt`, each
//! line a tab-separated `word_a\tword_b` pair. Joining maps every relation
//! to its natural-language phrase and writes a single TSV of
//! `word_a\tword_b\tphrase` rows, the input format of the walk sampler.
//! Symmetric relations are written in both directions.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use rw_common::{Error, Result, SCHEMA_VERSION};
use rw_config::RelationVocabulary;

use crate::writer::write_atomic;

const RELATION_FILE_PATTERN: &str = r"^cn_(.+)\.txt$";

/// One `(head, tail, phrase)` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    pub head: String,
    pub tail: String,
    pub phrase: String,
}

impl Assertion {
    pub fn to_tsv_line(&self) -> String {
        format!("{}\t{}\t{}\n", self.head, self.tail, self.phrase)
    }
}

/// Result of a join run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionReport {
    pub schema_version: String,
    pub output_path: PathBuf,
    pub files: usize,
    /// Rows written, including reversed rows for symmetric relations.
    pub total: usize,
    /// Input lines per relation phrase.
    pub counts: BTreeMap<String, usize>,
}

/// Joins per-relation pair files into one assertion table.
pub struct AssertionJoiner {
    vocabulary: RelationVocabulary,
    file_pattern: Regex,
}

impl AssertionJoiner {
    pub fn new(vocabulary: RelationVocabulary) -> Self {
        Self {
            vocabulary,
            file_pattern: Regex::new(RELATION_FILE_PATTERN).expect("relation file pattern is valid"),
        }
    }

    /// Expected relation files for every relation in the vocabulary.
    pub fn relation_files(&self, dir: &Path) -> Vec<PathBuf> {
        self.vocabulary
            .relations()
            .map(|rel| dir.join(format!("cn_{rel}.txt")))
            .collect()
    }

    /// Extract the relation name from a `cn_<relation>.txt` path.
    pub fn relation_for(&self, path: &Path) -> Result<String> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidRelationFile {
                path: path.to_path_buf(),
                reason: "file name is not valid UTF-8".to_string(),
            })?;
        self.file_pattern
            .captures(name)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| Error::InvalidRelationFile {
                path: path.to_path_buf(),
                reason: "expected a file named cn_<relation>.txt".to_string(),
            })
    }

    /// Parse one relation file's contents.
    pub fn parse_relation(
        &self,
        relation: &str,
        content: &str,
        path: &Path,
    ) -> Result<(Vec<Assertion>, usize)> {
        let phrase = self
            .vocabulary
            .phrase(relation)
            .ok_or_else(|| Error::UnknownRelation(relation.to_string()))?;
        let symmetric = RelationVocabulary::is_symmetric(relation);

        let mut assertions = Vec::new();
        let mut lines = 0;
        for (n, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let (Some(head), Some(tail), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(Error::MalformedAssertion {
                    path: path.to_path_buf(),
                    line: n + 1,
                    reason: "expected exactly two tab-separated fields".to_string(),
                });
            };

            lines += 1;
            assertions.push(Assertion {
                head: head.to_string(),
                tail: tail.to_string(),
                phrase: phrase.to_string(),
            });
            if symmetric {
                assertions.push(Assertion {
                    head: tail.to_string(),
                    tail: head.to_string(),
                    phrase: phrase.to_string(),
                });
            }
        }
        Ok((assertions, lines))
    }

    /// Read every file, then write the joined table to `output`.
    ///
    /// All inputs are validated before anything is written.
    pub fn join(&self, paths: &[PathBuf], output: &Path) -> Result<AssertionReport> {
        let mut all = Vec::new();
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();

        for path in paths {
            let relation = self.relation_for(path)?;
            let content = fs::read_to_string(path).map_err(|e| Error::io_at(path, e))?;
            let (assertions, lines) = self.parse_relation(&relation, &content, path)?;
            debug!(
                path = %path.display(),
                relation = %relation,
                lines,
                rows = assertions.len(),
                "relation file parsed"
            );

            let phrase = self
                .vocabulary
                .phrase(&relation)
                .unwrap_or(relation.as_str())
                .to_string();
            *counts.entry(phrase).or_default() += lines;
            all.extend(assertions);
        }

        let table: String = all.iter().map(Assertion::to_tsv_line).collect();
        write_atomic(output, table.as_bytes())?;

        info!(
            files = paths.len(),
            total = all.len(),
            output = %output.display(),
            "assertions joined"
        );
        Ok(AssertionReport {
            schema_version: SCHEMA_VERSION.to_string(),
            output_path: output.to_path_buf(),
            files: paths.len(),
            total: all.len(),
            counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_relation_from_file_name() {
        let joiner = AssertionJoiner::new(RelationVocabulary::Lama);
        assert_eq!(
            joiner.relation_for(Path::new("data/relations/cn_usedFor.txt")).unwrap(),
            "usedFor"
        );
        assert!(joiner.relation_for(Path::new("usedFor.txt")).is_err());
        assert!(joiner.relation_for(Path::new("cn_usedFor.tsv")).is_err());
    }

    #[test]
    fn test_relation_files_follow_vocabulary() {
        let joiner = AssertionJoiner::new(RelationVocabulary::Default);
        let files = joiner.relation_files(Path::new("rel"));
        assert_eq!(files.len(), 4);
        assert_eq!(files[0], PathBuf::from("rel/cn_antonyms.txt"));
    }

    #[test]
    fn test_symmetric_relation_doubles_rows() {
        let joiner = AssertionJoiner::new(RelationVocabulary::Default);
        let (rows, lines) = joiner
            .parse_relation("synonyms", "big\tlarge\n", Path::new("cn_synonyms.txt"))
            .unwrap();
        assert_eq!(lines, 1);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].head, "large");
        assert_eq!(rows[1].to_tsv_line(), "large\tbig\tis a synonym of\n");
    }

    #[test]
    fn test_unknown_relation() {
        let joiner = AssertionJoiner::new(RelationVocabulary::Default);
        let err = joiner
            .parse_relation("usedFor", "a\tb\n", Path::new("cn_usedFor.txt"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownRelation(r) if r == "usedFor"));
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let joiner = AssertionJoiner::new(RelationVocabulary::Lama);
        let err = joiner
            .parse_relation("isA", "dog\tanimal\njust-one-field\n", Path::new("cn_isA.txt"))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedAssertion { line: 2, .. }));
    }

    #[test]
    fn test_join_writes_table_and_counts() {
        let dir = tempdir().unwrap();
        let is_a = dir.path().join("cn_isA.txt");
        let ant = dir.path().join("cn_antonyms.txt");
        fs::write(&is_a, "dog\tanimal\ncat\tanimal\n").unwrap();
        fs::write(&ant, "hot\tcold\n").unwrap();
        let out = dir.path().join("out/assertions.tsv");

        let joiner = AssertionJoiner::new(RelationVocabulary::Default);
        let report = joiner.join(&[is_a, ant], &out).unwrap();

        assert_eq!(report.files, 2);
        assert_eq!(report.total, 4);
        assert_eq!(report.counts["is a"], 2);
        assert_eq!(report.counts["is an antonym of"], 1);
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "dog\tanimal\tis a\ncat\tanimal\tis a\nhot\tcold\tis an antonym of\ncold\thot\tis an antonym of\n"
        );
    }

    #[test]
    fn test_join_fails_before_writing() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("cn_isA.txt");
        fs::write(&good, "dog\tanimal\n").unwrap();
        let missing = dir.path().join("cn_mannerOf.txt");
        let out = dir.path().join("assertions.tsv");

        let joiner = AssertionJoiner::new(RelationVocabulary::Default);
        assert!(joiner.join(&[good, missing], &out).is_err());
        assert!(!out.exists());
    }
}
