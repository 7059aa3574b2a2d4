use std::collections::HashMap;

use super::model::{ClusterId, JobDataset};

// ---------------------------------------------------------------------------
// Value counts
// ---------------------------------------------------------------------------

/// A distinct value and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Rank distinct items by descending frequency, keeping at most `limit`.
///
/// Ties keep the order in which the items first appeared, so the ranking is
/// deterministic for a given input order.
pub fn value_counts<I, S>(items: I, limit: usize) -> Vec<ValueCount>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ranked: Vec<ValueCount> = Vec::new();
    let mut slot: HashMap<String, usize> = HashMap::new();
    for item in items {
        let value = item.as_ref();
        match slot.get(value) {
            Some(&i) => ranked[i].count += 1,
            None => {
                slot.insert(value.to_string(), ranked.len());
                ranked.push(ValueCount {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    // `sort_by` is stable, so equal counts stay in first-seen order.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

// ---------------------------------------------------------------------------
// Row lookups
// ---------------------------------------------------------------------------

/// Sorted unique non-null titles, as offered by the title picker.
pub fn unique_titles(dataset: &JobDataset) -> &[String] {
    &dataset.titles
}

/// Index of the first posting whose title equals `title` exactly.
pub fn find_by_title(dataset: &JobDataset, title: &str) -> Option<usize> {
    dataset
        .jobs
        .iter()
        .position(|job| job.title.as_deref() == Some(title))
}

/// Indices of all postings assigned to `cluster`, in file order.
pub fn jobs_in_cluster(dataset: &JobDataset, cluster: &ClusterId) -> Vec<usize> {
    dataset
        .jobs
        .iter()
        .enumerate()
        .filter(|(_, job)| job.cluster == *cluster)
        .map(|(i, _)| i)
        .collect()
}

/// Comma-split keyword tokens of the given postings, trimmed, empties dropped.
pub fn keyword_tokens<'a>(dataset: &'a JobDataset, indices: &[usize]) -> Vec<&'a str> {
    indices
        .iter()
        .filter_map(|&i| dataset.jobs.get(i)?.keywords.as_deref())
        .flat_map(|kw| kw.split(','))
        .map(str::trim)
        .filter(|tok| !tok.is_empty())
        .collect()
}

/// Most frequent keyword tokens across a cluster.
pub fn top_keywords(dataset: &JobDataset, cluster: &ClusterId, limit: usize) -> Vec<ValueCount> {
    let indices = jobs_in_cluster(dataset, cluster);
    value_counts(keyword_tokens(dataset, &indices), limit)
}

/// Title frequencies within a cluster. The selected title is not excluded.
pub fn cluster_title_counts(
    dataset: &JobDataset,
    cluster: &ClusterId,
    limit: usize,
) -> Vec<ValueCount> {
    let titles = dataset
        .jobs
        .iter()
        .filter(|job| job.cluster == *cluster)
        .filter_map(|job| job.title.as_deref());
    value_counts(titles, limit)
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Everything the dashboard shows about one chosen title.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Row of the first posting carrying the title.
    pub index: usize,
    pub title: String,
    pub cluster: ClusterId,
    pub top_keywords: Vec<ValueCount>,
    pub other_titles: Vec<ValueCount>,
}

/// Resolve a title to its cluster and the cluster's rankings.
pub fn select(dataset: &JobDataset, title: &str, limit: usize) -> Option<Selection> {
    let index = find_by_title(dataset, title)?;
    let cluster = dataset.jobs[index].cluster.clone();
    Some(Selection {
        index,
        title: title.to_string(),
        top_keywords: top_keywords(dataset, &cluster, limit),
        other_titles: cluster_title_counts(dataset, &cluster, limit),
        cluster,
    })
}

// ---------------------------------------------------------------------------
// Search & hover helpers
// ---------------------------------------------------------------------------

/// Case-insensitive substring match over `titles`, at most `limit` results.
/// An empty (or all-whitespace) query matches everything.
pub fn matching_titles<'a>(titles: &'a [String], query: &str, limit: usize) -> Vec<&'a str> {
    let needle = query.trim().to_lowercase();
    titles
        .iter()
        .filter(|t| needle.is_empty() || t.to_lowercase().contains(&needle))
        .take(limit)
        .map(String::as_str)
        .collect()
}

/// Index of the posting closest to `(x, y)`, if one lies within `max_dist`.
pub fn nearest_job(dataset: &JobDataset, x: f64, y: f64, max_dist: f64) -> Option<usize> {
    dataset
        .jobs
        .iter()
        .enumerate()
        .map(|(i, job)| (i, (job.x - x).hypot(job.y - y)))
        .filter(|(_, d)| *d <= max_dist)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}
