use serde::Serialize;

/// Why a substitution could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FailureReason {
    /// The recorded text is no longer at any matching site.
    TextNotFound,
    /// The edit overlaps another edit of the same file.
    Overlap,
    /// The file could not be read or parsed.
    Unreadable { message: String },
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::TextNotFound => write!(f, "text not found"),
            FailureReason::Overlap => write!(f, "overlaps another substitution"),
            FailureReason::Unreadable { message } => write!(f, "unreadable file: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SubstitutionStatus {
    Applied,
    Failed { reason: FailureReason },
    Skipped { reason: String },
}

/// One attempted replacement of an occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Substitution {
    pub location_key: String,
    pub key: String,
    pub text: String,
    pub line: usize,
    /// Source text that was (or would be) replaced.
    pub old: String,
    pub replacement: String,
    #[serde(flatten)]
    pub status: SubstitutionStatus,
}

impl Substitution {
    pub fn is_applied(&self) -> bool {
        self.status == SubstitutionStatus::Applied
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, SubstitutionStatus::Failed { .. })
    }
}

/// Outcome of rewriting one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteRecord {
    pub file: String,
    pub modified: bool,
    pub import_inserted: bool,
    pub substitutions: Vec<Substitution>,
}

impl RewriteRecord {
    pub fn failures(&self) -> impl Iterator<Item = &Substitution> {
        self.substitutions.iter().filter(|s| s.is_failed())
    }
}

/// Aggregated outcome of a rewrite run.
#[derive(Debug, Default)]
pub struct RewriteSummary {
    pub records: Vec<RewriteRecord>,
    pub backup_dir: Option<std::path::PathBuf>,
    pub pending_report: Option<std::path::PathBuf>,
    pub preview: bool,
}

impl RewriteSummary {
    pub fn files_modified(&self) -> usize {
        self.records.iter().filter(|r| r.modified).count()
    }

    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Substitution) -> bool,
    {
        self.records
            .iter()
            .flat_map(|r| &r.substitutions)
            .filter(|s| predicate(*s))
            .count()
    }

    pub fn applied(&self) -> usize {
        self.count(Substitution::is_applied)
    }

    pub fn failed(&self) -> usize {
        self.count(Substitution::is_failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s.status, SubstitutionStatus::Skipped { .. }))
    }
}
