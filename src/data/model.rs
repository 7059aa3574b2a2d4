use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// ClusterId – the categorical cluster assigned to a posting
// ---------------------------------------------------------------------------

/// A cluster identifier as found in the source file.
///
/// Clustering tools usually emit integer labels, but the column is treated as
/// categorical so text labels are accepted too. Integers sort before labels.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClusterId {
    Integer(i64),
    Label(String),
}

impl ClusterId {
    /// Interpret a raw cell. `"3"` and `"3.0"` both become `Integer(3)` since
    /// dataframe writers turn integer columns with gaps into floats.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if let Ok(i) = s.parse::<i64>() {
            return ClusterId::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                return ClusterId::Integer(f as i64);
            }
        }
        ClusterId::Label(s.to_string())
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterId::Integer(i) => write!(f, "{i}"),
            ClusterId::Label(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// JobPosting – one row of the source table
// ---------------------------------------------------------------------------

/// A single job posting with its precomputed cluster and 2-D embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct JobPosting {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Comma-separated keyword list, kept raw.
    pub keywords: Option<String>,
    pub cluster: ClusterId,
    pub x: f64,
    pub y: f64,
}

// ---------------------------------------------------------------------------
// JobDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All postings in file order with pre-computed lookup indices.
#[derive(Debug, Clone, Default)]
pub struct JobDataset {
    pub jobs: Vec<JobPosting>,
    /// Sorted unique non-null titles.
    pub titles: Vec<String>,
    /// Sorted unique cluster ids.
    pub clusters: BTreeSet<ClusterId>,
}

impl JobDataset {
    /// Build the title and cluster indices from loaded postings.
    pub fn from_jobs(jobs: Vec<JobPosting>) -> Self {
        let mut titles: BTreeSet<String> = BTreeSet::new();
        let mut clusters: BTreeSet<ClusterId> = BTreeSet::new();

        for job in &jobs {
            if let Some(title) = &job.title {
                titles.insert(title.clone());
            }
            clusters.insert(job.cluster.clone());
        }

        JobDataset {
            jobs,
            titles: titles.into_iter().collect(),
            clusters,
        }
    }

    /// Number of postings.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
