use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// One output row, in the column order the viewer expects.
#[derive(Debug, Serialize)]
struct JobRow {
    title: String,
    description: String,
    keywords: String,
    cluster: i64,
    x: f64,
    y: f64,
}

/// A synthetic cluster: where it sits in the embedding and what it contains.
struct ClusterSpec {
    center: (f64, f64),
    spread: f64,
    titles: &'static [&'static str],
    skills: &'static [&'static str],
}

const CLUSTERS: &[ClusterSpec] = &[
    ClusterSpec {
        center: (-6.0, 4.0),
        spread: 0.9,
        titles: &["Data Engineer", "Data Analyst", "Machine Learning Engineer", "BI Developer"],
        skills: &["python", "sql", "spark", "airflow", "tableau", "statistics", "pandas"],
    },
    ClusterSpec {
        center: (5.0, 5.5),
        spread: 1.1,
        titles: &["Registered Nurse", "Nurse Practitioner", "Medical Assistant"],
        skills: &["patient care", "triage", "EMR", "medication administration", "CPR"],
    },
    ClusterSpec {
        center: (0.5, -5.0),
        spread: 1.0,
        titles: &["Accountant", "Financial Analyst", "Payroll Specialist", "Auditor"],
        skills: &["excel", "GAAP", "reconciliation", "forecasting", "tax", "SAP"],
    },
    ClusterSpec {
        center: (-4.0, -3.0),
        spread: 0.8,
        titles: &["Backend Developer", "DevOps Engineer", "Site Reliability Engineer"],
        skills: &["rust", "kubernetes", "docker", "linux", "terraform", "go", "sql"],
    },
    ClusterSpec {
        center: (7.0, -2.0),
        spread: 1.2,
        titles: &["Warehouse Associate", "Forklift Operator", "Logistics Coordinator"],
        skills: &["inventory", "forklift", "shipping", "safety", "scheduling"],
    },
];

const ROWS_PER_CLUSTER: usize = 60;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<JobRow> {
    let mut rows = Vec::with_capacity(CLUSTERS.len() * ROWS_PER_CLUSTER);

    for (cluster, spec) in CLUSTERS.iter().enumerate() {
        for _ in 0..ROWS_PER_CLUSTER {
            let title = spec.titles[rng.below(spec.titles.len())];

            let n_skills = 2 + rng.below(3);
            let mut skills: Vec<&str> = Vec::with_capacity(n_skills);
            while skills.len() < n_skills {
                let skill = spec.skills[rng.below(spec.skills.len())];
                if !skills.contains(&skill) {
                    skills.push(skill);
                }
            }

            rows.push(JobRow {
                title: title.to_string(),
                description: format!("{title} role requiring {}.", skills.join(" and ")),
                keywords: skills.join(", "),
                cluster: cluster as i64,
                x: rng.gauss(spec.center.0, spec.spread),
                y: rng.gauss(spec.center.1, spec.spread),
            });
        }
    }

    rows
}

fn write_csv(rows: &[JobRow], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[JobRow], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("title", DataType::Utf8, false),
        Field::new("description", DataType::Utf8, false),
        Field::new("keywords", DataType::Utf8, false),
        Field::new("cluster", DataType::Int64, false),
        Field::new("x", DataType::Float64, false),
        Field::new("y", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.title.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.description.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.keywords.as_str()))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.cluster))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.x))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.y))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_csv(&rows, "clustered_jobs.csv")?;
    write_parquet(&rows, "clustered_jobs.parquet")?;

    println!(
        "Wrote {} jobs in {} clusters to clustered_jobs.csv and clustered_jobs.parquet",
        rows.len(),
        CLUSTERS.len()
    );
    Ok(())
}
