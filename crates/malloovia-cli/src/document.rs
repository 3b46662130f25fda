//! YAML problem/solution document format (§6), grounded on `util.py`'s
//! `read_problems_from_yaml`/`problems_from_dict`/`preprocess_yaml`.
//!
//! A document is a set of top-level sections (`Apps`, `Limiting_sets`,
//! `Instance_classes`, `Workloads`, `Performances`, `Problems`) that
//! cross-reference each other through YAML anchors/aliases. Anchor
//! dereferencing to object identity is handled by `serde_yaml` itself — a
//! `*ref` alias is expanded to the full aliased node before we ever see it,
//! so the `ProblemDoc` fields below simply see fully-inlined objects, with
//! no id-interning pass of our own required.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use malloovia_core::{
    AppId, InstanceClass, InstanceClassId, LimitingSet, LimitingSetId, MallooviaError,
    PerformanceTable, Problem, TimeUnit, Workload,
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing '{path}': {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{0}")]
    Problem(#[from] MallooviaError),
    #[error("'Problems_from_file' in '{0}' has no target path")]
    MissingIncludeTarget(String),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

#[derive(Debug, Clone, Deserialize)]
struct AppDoc {
    id: String,
    #[serde(default)]
    #[allow(dead_code)]
    name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct LimitingSetDoc {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    max_vms: u32,
    #[serde(default)]
    max_cores: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct InstanceClassDoc {
    id: String,
    #[serde(default)]
    name: Option<String>,
    limiting_sets: Vec<LimitingSetDoc>,
    #[serde(default)]
    max_vms: u32,
    price: f64,
    time_unit: String,
    #[serde(default)]
    is_reserved: bool,
    #[serde(default = "default_cores")]
    cores: u32,
    #[serde(default)]
    is_private: bool,
}

fn default_cores() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
struct WorkloadDoc {
    app: AppDoc,
    #[serde(default)]
    values: Vec<f64>,
    #[serde(default)]
    filename: Option<String>,
    time_unit: String,
}

#[derive(Debug, Clone, Deserialize)]
struct PerfEntryDoc {
    instance_class: InstanceClassDoc,
    app: AppDoc,
    value: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct PerformanceSetDoc {
    values: Vec<PerfEntryDoc>,
    time_unit: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ProblemDoc {
    id: String,
    #[serde(default)]
    name: Option<String>,
    workloads: Vec<WorkloadDoc>,
    instance_classes: Vec<InstanceClassDoc>,
    performances: PerformanceSetDoc,
}

/// Top-level document sections. `apps`/`limiting_sets`/`instance_classes`/
/// `workloads`/`performances` exist only so a document can declare anchors
/// once; every problem inlines its own (anchor-expanded) copies, which is
/// what `problems_from` actually reads.
#[derive(Debug, Clone, Deserialize, Default)]
struct Document {
    #[serde(rename = "Apps", default)]
    #[allow(dead_code)]
    apps: Vec<AppDoc>,
    #[serde(rename = "Limiting_sets", default)]
    #[allow(dead_code)]
    limiting_sets: Vec<LimitingSetDoc>,
    #[serde(rename = "Instance_classes", default)]
    #[allow(dead_code)]
    instance_classes: Vec<InstanceClassDoc>,
    #[serde(rename = "Workloads", default)]
    #[allow(dead_code)]
    workloads: Vec<WorkloadDoc>,
    #[serde(rename = "Performances", default)]
    #[allow(dead_code)]
    performances: Vec<PerformanceSetDoc>,
    #[serde(rename = "Problems", default)]
    problems: Vec<ProblemDoc>,
}

/// Reads every `Problem` declared in the file at `path`, after expanding any
/// `Problems_from_file` inclusion directive and transparently decompressing
/// `.yaml.gz`.
pub fn load_problems(path: &Path) -> DocumentResult<HashMap<String, Problem>> {
    let text = preprocess(path)?;
    let document: Document = serde_yaml::from_str(&text).map_err(|source| DocumentError::Yaml {
        path: path.display().to_string(),
        source,
    })?;
    document
        .problems
        .into_iter()
        .map(|doc| problem_from_doc(doc, path))
        .map(|result| result.map(|problem| (problem.id.clone(), problem)))
        .collect()
}

/// Reads the raw document text without building `Problem`s, for
/// `validate`'s `--problems-only` short-circuit and general schema checks.
pub fn load_document_text(path: &Path) -> DocumentResult<String> {
    preprocess(path)
}

pub(crate) fn parse_document(text: &str, path: &Path) -> DocumentResult<()> {
    serde_yaml::from_str::<Document>(text)
        .map(|_| ())
        .map_err(|source| DocumentError::Yaml {
            path: path.display().to_string(),
            source,
        })
}

fn preprocess(path: &Path) -> DocumentResult<String> {
    let raw = read_file(path)?;
    expand_includes(&raw, path)
}

/// Reads a file's bytes as UTF-8 text, decompressing on the fly if its name
/// ends in `.gz` (`util.py` has no analogue for this — it is an addition
/// noted in DESIGN.md).
fn read_file(path: &Path) -> DocumentResult<String> {
    let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
        path: path.display().to_string(),
        source,
    })?;
    if path.extension().and_then(|ext| ext.to_str()) == Some("gz") {
        let mut decoder = GzDecoder::new(&bytes[..]);
        let mut text = String::new();
        decoder
            .read_to_string(&mut text)
            .map_err(|source| DocumentError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Ok(text)
    } else {
        String::from_utf8(bytes).map_err(|e| DocumentError::Io {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })
    }
}

/// Mirrors `preprocess_yaml`: a line starting with `Problems_from_file`
/// names a sibling file (relative to `path`'s directory) whose contents
/// replace that line verbatim, before the result is parsed as YAML.
fn expand_includes(text: &str, path: &Path) -> DocumentResult<String> {
    let mut output = String::with_capacity(text.len());
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("Problems_from_file") {
            let filename = rest
                .trim_start_matches(':')
                .trim()
                .trim_matches(|c| c == '"' || c == '\'');
            if filename.is_empty() {
                return Err(DocumentError::MissingIncludeTarget(
                    path.display().to_string(),
                ));
            }
            let included = path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(filename);
            output.push_str(&read_file(&included)?);
        } else {
            output.push_str(line);
            output.push('\n');
        }
    }
    Ok(output)
}

fn problem_from_doc(doc: ProblemDoc, path: &Path) -> DocumentResult<Problem> {
    let limiting_sets = collect_limiting_sets(&doc.instance_classes);
    let instance_classes = doc
        .instance_classes
        .iter()
        .map(instance_class_from_doc)
        .collect::<DocumentResult<Vec<_>>>()?;

    let mut performances = HashMap::new();
    let perf_time_unit = TimeUnit::parse(&doc.performances.time_unit)?;
    for entry in &doc.performances.values {
        performances.insert(
            (
                InstanceClassId(entry.instance_class.id.clone()),
                AppId(entry.app.id.clone()),
            ),
            entry.value,
        );
    }

    let workloads = doc
        .workloads
        .iter()
        .map(|w| workload_from_doc(w, path))
        .collect::<DocumentResult<Vec<_>>>()?;

    Ok(Problem {
        id: doc.id,
        name: doc.name.unwrap_or_default(),
        workloads,
        instance_classes,
        limiting_sets,
        performances: PerformanceTable::new(perf_time_unit, performances),
    })
}

fn collect_limiting_sets(instance_classes: &[InstanceClassDoc]) -> Vec<LimitingSet> {
    let mut seen = std::collections::HashSet::new();
    let mut sets = Vec::new();
    for ic in instance_classes {
        for ls in &ic.limiting_sets {
            if seen.insert(ls.id.clone()) {
                sets.push(LimitingSet {
                    id: LimitingSetId(ls.id.clone()),
                    name: ls.name.clone().unwrap_or_else(|| ls.id.clone()),
                    max_vms: ls.max_vms,
                    max_cores: ls.max_cores,
                });
            }
        }
    }
    sets
}

fn instance_class_from_doc(doc: &InstanceClassDoc) -> DocumentResult<InstanceClass> {
    Ok(InstanceClass {
        id: InstanceClassId(doc.id.clone()),
        name: doc.name.clone().unwrap_or_else(|| doc.id.clone()),
        limiting_sets: doc
            .limiting_sets
            .iter()
            .map(|ls| LimitingSetId(ls.id.clone()))
            .collect(),
        max_vms: doc.max_vms,
        price: doc.price,
        price_time_unit: TimeUnit::parse(&doc.time_unit)?,
        cores: doc.cores,
        is_reserved: doc.is_reserved,
        is_private: doc.is_private,
    })
}

fn workload_from_doc(doc: &WorkloadDoc, path: &Path) -> DocumentResult<Workload> {
    let values = match &doc.filename {
        Some(filename) => read_workload_values(filename, path)?,
        None => doc.values.clone(),
    };
    Ok(Workload {
        app: AppId(doc.app.id.clone()),
        values,
        time_unit: TimeUnit::parse(&doc.time_unit)?,
    })
}

/// Mirrors `read_from_relative_csv`: one floating-point value per line,
/// blank lines skipped, relative to the document's own directory.
fn read_workload_values(filename: &str, path: &Path) -> DocumentResult<Vec<f64>> {
    let target = path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(filename);
    let text = read_file(&target)?;
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.trim()
                .parse::<f64>()
                .map_err(|e| DocumentError::Io {
                    path: target.display().to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        dir
    }

    const SAMPLE: &str = r#"
Limiting_sets:
  - &ls0
    id: ls0
    name: region
    max_vms: 20
Instance_classes:
  - &reserved
    id: m1.reserved
    name: m1.reserved
    limiting_sets: [*ls0]
    price: 80.0
    time_unit: h
    is_reserved: true
  - &demand
    id: m1.demand
    name: m1.demand
    limiting_sets: [*ls0]
    price: 100.0
    time_unit: h
Apps:
  - &app0
    id: app0
Workloads:
  - &wl0
    app: *app0
    values: [2000.0, 2000.0]
    time_unit: h
Performances:
  - &perfs
    time_unit: h
    values:
      - instance_class: *reserved
        app: *app0
        value: 1000.0
      - instance_class: *demand
        app: *app0
        value: 1000.0
Problems:
  - id: a
    name: scenario-a
    workloads: [*wl0]
    instance_classes: [*reserved, *demand]
    performances: *perfs
"#;

    #[test]
    fn loads_a_single_problem_with_anchors() {
        let dir = write_temp("problem.yaml", SAMPLE);
        let problems = load_problems(&dir.path().join("problem.yaml")).unwrap();
        let problem = problems.get("a").unwrap();
        assert_eq!(problem.instance_classes.len(), 2);
        assert_eq!(problem.limiting_sets.len(), 1);
        assert_eq!(problem.workloads[0].values, vec![2000.0, 2000.0]);
        problem.check_valid().unwrap();
    }

    #[test]
    fn expands_problems_from_file_directive() {
        let dir = write_temp("included.yaml", SAMPLE);
        let main = "Problems_from_file: included.yaml\n";
        std::fs::write(dir.path().join("main.yaml"), main).unwrap();
        let problems = load_problems(&dir.path().join("main.yaml")).unwrap();
        assert!(problems.contains_key("a"));
    }

    #[test]
    fn reads_workload_values_from_sibling_file() {
        let dir = write_temp("values.csv", "10\n20\n30\n");
        let yaml = SAMPLE.replace("values: [2000.0, 2000.0]", "filename: values.csv");
        std::fs::write(dir.path().join("problem.yaml"), yaml).unwrap();
        let problems = load_problems(&dir.path().join("problem.yaml")).unwrap();
        let problem = problems.get("a").unwrap();
        assert_eq!(problem.workloads[0].values, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn decompresses_yaml_gz() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        let dir = tempfile::tempdir().unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(SAMPLE.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();
        std::fs::write(dir.path().join("problem.yaml.gz"), compressed).unwrap();
        let problems = load_problems(&dir.path().join("problem.yaml.gz")).unwrap();
        assert!(problems.contains_key("a"));
    }
}
