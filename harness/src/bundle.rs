//! In-memory artifact bundle: the output of a harness run.
//!
//! No file I/O in this module. The bundle is a deterministic in-memory
//! representation that can be inspected programmatically.
//!
//! # Normative vs observational artifacts
//!
//! Each artifact is tagged `normative` (participates in bundle digest)
//! or observational (present in the manifest but excluded from digest).
//!
//! `metrics.json` is observational because it carries wall-clock time. Its
//! deterministic counters are repeated in the normative `search_trace.json`.
//!
//! The bundle digest is computed over the **digest basis**: a canonical
//! JSON projection of normative artifact hashes only.

use std::collections::BTreeMap;

use waymark_search::digest::{
    canonical_json_bytes, content_hash, ContentHash, DOMAIN_BUNDLE_ARTIFACT, DOMAIN_BUNDLE_DIGEST,
};

/// Report fields that bind an artifact's content hash, as
/// `(report field, artifact name)`.
pub const REPORT_BINDINGS: &[(&str, &str)] = &[
    ("fixture_digest", "fixture.json"),
    ("policy_digest", "search_policy.json"),
    ("solution_digest", "solution.json"),
    ("trace_digest", "search_trace.json"),
];

/// A single artifact in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleArtifact {
    /// Logical filename (e.g., `"search_trace.json"`).
    pub name: String,
    /// Raw bytes of the artifact.
    pub content: Vec<u8>,
    /// Content hash: `content_hash(DOMAIN_BUNDLE_ARTIFACT, content)`.
    pub content_hash: ContentHash,
    /// Whether this artifact participates in the bundle digest.
    pub normative: bool,
}

/// The complete artifact bundle from a harness run.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    /// Artifacts indexed by logical name, in sorted order (`BTreeMap`).
    pub artifacts: BTreeMap<String, BundleArtifact>,
    /// Full manifest: canonical JSON listing all artifacts with normative flags.
    pub manifest: Vec<u8>,
    /// Digest basis: canonical JSON listing normative artifact hashes only.
    pub digest_basis: Vec<u8>,
    /// Bundle digest: `content_hash(DOMAIN_BUNDLE_DIGEST, digest_basis)`.
    pub digest: ContentHash,
}

impl ArtifactBundle {
    /// Look up an artifact by name.
    #[must_use]
    pub fn artifact(&self, name: &str) -> Option<&BundleArtifact> {
        self.artifacts.get(name)
    }

    /// Parse a JSON artifact.
    #[must_use]
    pub fn json(&self, name: &str) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.artifact(name)?.content).ok()
    }
}

/// Error building a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleBuildError {
    /// Canonical JSON serialization failed.
    CanonError { detail: String },
    /// Two inputs share a name.
    DuplicateArtifact { name: String },
}

impl std::fmt::Display for BundleBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CanonError { detail } => write!(f, "canonical JSON failed: {detail}"),
            Self::DuplicateArtifact { name } => write!(f, "duplicate artifact {name}"),
        }
    }
}

impl std::error::Error for BundleBuildError {}

/// Input for bundle assembly: `(name, content, normative)`.
pub type ArtifactInput = (String, Vec<u8>, bool);

/// Build an [`ArtifactBundle`] from a list of artifact inputs.
///
/// Computes content hashes, builds the sorted manifest and digest basis,
/// and derives the bundle digest.
///
/// # Errors
///
/// Returns [`BundleBuildError`] if canonical JSON serialization fails or two
/// inputs share a name.
pub fn build_bundle(artifacts: Vec<ArtifactInput>) -> Result<ArtifactBundle, BundleBuildError> {
    let mut artifact_map = BTreeMap::new();

    for (name, content, normative) in artifacts {
        if artifact_map.contains_key(&name) {
            return Err(BundleBuildError::DuplicateArtifact { name });
        }
        let content_hash = content_hash(DOMAIN_BUNDLE_ARTIFACT, &content);
        artifact_map.insert(
            name.clone(),
            BundleArtifact {
                name,
                content,
                content_hash,
                normative,
            },
        );
    }

    let manifest = compute_manifest_bytes(&artifact_map)
        .map_err(|detail| BundleBuildError::CanonError { detail })?;

    let digest_basis = compute_digest_basis_bytes(&artifact_map)
        .map_err(|detail| BundleBuildError::CanonError { detail })?;

    let digest = content_hash(DOMAIN_BUNDLE_DIGEST, &digest_basis);

    Ok(ArtifactBundle {
        artifacts: artifact_map,
        manifest,
        digest_basis,
        digest,
    })
}

/// Error from bundle integrity verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleVerifyError {
    /// An artifact's stored `content_hash` does not match recomputed hash.
    ContentHashMismatch {
        artifact: String,
        expected: String,
        actual: String,
    },
    /// Stored `manifest` bytes do not match recomputed manifest from artifacts.
    ManifestMismatch,
    /// Stored `manifest` bytes are not in canonical JSON form.
    ManifestNotCanonical,
    /// Stored `digest_basis` bytes do not match recomputed normative projection.
    DigestBasisMismatch,
    /// Stored `digest_basis` bytes are not in canonical JSON form.
    DigestBasisNotCanonical,
    /// Stored `digest` does not match recomputed hash of `digest_basis`.
    DigestMismatch { expected: String, actual: String },
    /// A normative JSON artifact is not in canonical JSON form.
    ArtifactNotCanonical { artifact: String },
    /// A JSON artifact the verifier reads does not parse.
    ArtifactParseError { artifact: String, detail: String },
    /// Report is missing a required field.
    ReportFieldMissing { field: String },
    /// Report declares a digest for an artifact the bundle lacks.
    BoundArtifactMissing { field: String, artifact: String },
    /// A report digest does not match the bound artifact's `content_hash`.
    DigestBindingMismatch {
        field: String,
        declared: String,
        recomputed: String,
    },
    /// `world_id` differs between the report and `fixture.json`.
    WorldIdMismatch { in_report: String, in_fixture: String },
    /// `solution.json` and `search_trace.json` disagree on the run.
    TraceSolutionMismatch { detail: String },
    /// Canonical JSON error during verification.
    CanonError { detail: String },
}

impl std::fmt::Display for BundleVerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContentHashMismatch {
                artifact,
                expected,
                actual,
            } => write!(f, "{artifact}: content hash {actual}, expected {expected}"),
            Self::ManifestMismatch => f.write_str("manifest does not match artifacts"),
            Self::ManifestNotCanonical => f.write_str("manifest is not canonical JSON"),
            Self::DigestBasisMismatch => f.write_str("digest basis does not match artifacts"),
            Self::DigestBasisNotCanonical => f.write_str("digest basis is not canonical JSON"),
            Self::DigestMismatch { expected, actual } => {
                write!(f, "bundle digest {actual}, expected {expected}")
            }
            Self::ArtifactNotCanonical { artifact } => {
                write!(f, "{artifact} is not canonical JSON")
            }
            Self::ArtifactParseError { artifact, detail } => {
                write!(f, "{artifact} does not parse: {detail}")
            }
            Self::ReportFieldMissing { field } => write!(f, "report is missing {field}"),
            Self::BoundArtifactMissing { field, artifact } => {
                write!(f, "report declares {field} but {artifact} is absent")
            }
            Self::DigestBindingMismatch {
                field,
                declared,
                recomputed,
            } => write!(f, "report {field} is {declared}, artifact hash is {recomputed}"),
            Self::WorldIdMismatch {
                in_report,
                in_fixture,
            } => write!(f, "report world_id {in_report}, fixture world_id {in_fixture}"),
            Self::TraceSolutionMismatch { detail } => {
                write!(f, "solution and trace disagree: {detail}")
            }
            Self::CanonError { detail } => write!(f, "canonical JSON failed: {detail}"),
        }
    }
}

impl std::error::Error for BundleVerifyError {}

/// Verify the internal consistency of a bundle.
///
/// This is a pure integrity check; it does NOT rerun the search. It proves:
///
/// 1. Each artifact's `content_hash` matches `content_hash(DOMAIN_BUNDLE_ARTIFACT, content)`.
/// 2. `manifest` bytes match the canonical JSON projection recomputed from all artifacts.
/// 3. `digest_basis` bytes match the canonical JSON projection recomputed from normative
///    artifacts only.
/// 4. `digest` matches `content_hash(DOMAIN_BUNDLE_DIGEST, digest_basis)`.
/// 5. `manifest` and `digest_basis` are in canonical JSON form.
/// 6. Normative JSON artifacts (`.json` extension + `normative: true`) are in canonical form.
/// 7. If `verification_report.json` exists: every [`REPORT_BINDINGS`] digest it
///    declares matches the bound artifact's `content_hash`, and every bound
///    artifact present has its digest declared.
/// 8. The report's `world_id` matches `fixture.json`'s.
/// 9. `solution.json` agrees with the trace metadata on goal and expansions.
///
/// # Errors
///
/// Returns the first [`BundleVerifyError`] encountered.
pub fn verify_bundle(bundle: &ArtifactBundle) -> Result<(), BundleVerifyError> {
    // Step 1: Verify each artifact's content_hash.
    for artifact in bundle.artifacts.values() {
        let recomputed = content_hash(DOMAIN_BUNDLE_ARTIFACT, &artifact.content);
        if recomputed != artifact.content_hash {
            return Err(BundleVerifyError::ContentHashMismatch {
                artifact: artifact.name.clone(),
                expected: artifact.content_hash.as_str().to_string(),
                actual: recomputed.as_str().to_string(),
            });
        }
    }

    // Step 2: Recompute manifest from artifacts and compare byte-for-byte.
    let expected_manifest = compute_manifest_bytes(&bundle.artifacts)
        .map_err(|detail| BundleVerifyError::CanonError { detail })?;
    if expected_manifest != bundle.manifest {
        return Err(BundleVerifyError::ManifestMismatch);
    }

    // Step 3: Verify manifest is canonical JSON.
    if !is_canonical_json(&bundle.manifest) {
        return Err(BundleVerifyError::ManifestNotCanonical);
    }

    // Step 4: Recompute digest_basis from normative artifacts and compare.
    let expected_basis = compute_digest_basis_bytes(&bundle.artifacts)
        .map_err(|detail| BundleVerifyError::CanonError { detail })?;
    if expected_basis != bundle.digest_basis {
        return Err(BundleVerifyError::DigestBasisMismatch);
    }

    // Step 5: Verify digest_basis is canonical JSON.
    if !is_canonical_json(&bundle.digest_basis) {
        return Err(BundleVerifyError::DigestBasisNotCanonical);
    }

    // Step 6: Verify bundle digest.
    let recomputed_digest = content_hash(DOMAIN_BUNDLE_DIGEST, &bundle.digest_basis);
    if recomputed_digest != bundle.digest {
        return Err(BundleVerifyError::DigestMismatch {
            expected: bundle.digest.as_str().to_string(),
            actual: recomputed_digest.as_str().to_string(),
        });
    }

    // Step 7: Verify normative JSON artifacts are canonical.
    for artifact in bundle.artifacts.values() {
        let is_json = std::path::Path::new(&artifact.name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if artifact.normative && is_json && !is_canonical_json(&artifact.content) {
            return Err(BundleVerifyError::ArtifactNotCanonical {
                artifact: artifact.name.clone(),
            });
        }
    }

    // Steps 8-9: Report bindings, then cross-artifact coherence.
    verify_report_bindings(bundle)?;
    verify_trace_solution_coherence(bundle)?;

    Ok(())
}

/// Recompute manifest bytes from the artifact map.
fn compute_manifest_bytes(artifacts: &BTreeMap<String, BundleArtifact>) -> Result<Vec<u8>, String> {
    let manifest_artifacts: Vec<serde_json::Value> = artifacts
        .values()
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
                "normative": a.normative,
            })
        })
        .collect();

    let manifest_value = serde_json::json!({
        "artifacts": manifest_artifacts,
        "schema_version": "bundle.v1",
    });

    canonical_json_bytes(&manifest_value).map_err(|e| e.to_string())
}

/// Recompute digest basis bytes from normative artifacts only.
fn compute_digest_basis_bytes(
    artifacts: &BTreeMap<String, BundleArtifact>,
) -> Result<Vec<u8>, String> {
    let normative_artifacts: Vec<serde_json::Value> = artifacts
        .values()
        .filter(|a| a.normative)
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
            })
        })
        .collect();

    let digest_basis_value = serde_json::json!({
        "artifacts": normative_artifacts,
        "schema_version": "bundle_digest_basis.v1",
    });

    canonical_json_bytes(&digest_basis_value).map_err(|e| e.to_string())
}

/// Whether JSON bytes are in canonical form (parse, re-canonicalize, compare).
fn is_canonical_json(bytes: &[u8]) -> bool {
    serde_json::from_slice::<serde_json::Value>(bytes)
        .ok()
        .and_then(|value| canonical_json_bytes(&value).ok())
        .is_some_and(|recanonized| recanonized == bytes)
}

fn parse_artifact(artifact: &BundleArtifact) -> Result<serde_json::Value, BundleVerifyError> {
    serde_json::from_slice(&artifact.content).map_err(|e| BundleVerifyError::ArtifactParseError {
        artifact: artifact.name.clone(),
        detail: e.to_string(),
    })
}

/// If `verification_report.json` exists, check each digest binding in both
/// directions and the `world_id` binding against `fixture.json`.
fn verify_report_bindings(bundle: &ArtifactBundle) -> Result<(), BundleVerifyError> {
    let Some(report_artifact) = bundle.artifacts.get("verification_report.json") else {
        return Ok(());
    };
    let report = parse_artifact(report_artifact)?;

    for &(field, name) in REPORT_BINDINGS {
        let declared = report[field].as_str();
        match (declared, bundle.artifacts.get(name)) {
            (None, None) => {}
            (None, Some(_)) => {
                return Err(BundleVerifyError::ReportFieldMissing {
                    field: field.into(),
                });
            }
            (Some(_), None) => {
                return Err(BundleVerifyError::BoundArtifactMissing {
                    field: field.into(),
                    artifact: name.into(),
                });
            }
            (Some(declared), Some(artifact)) => {
                if artifact.content_hash.as_str() != declared {
                    return Err(BundleVerifyError::DigestBindingMismatch {
                        field: field.into(),
                        declared: declared.to_string(),
                        recomputed: artifact.content_hash.as_str().to_string(),
                    });
                }
            }
        }
    }

    if let Some(fixture_artifact) = bundle.artifacts.get("fixture.json") {
        let fixture = parse_artifact(fixture_artifact)?;
        let in_report =
            report["world_id"]
                .as_str()
                .ok_or_else(|| BundleVerifyError::ReportFieldMissing {
                    field: "world_id".into(),
                })?;
        let in_fixture = fixture["world_id"].as_str().unwrap_or_default();
        if in_report != in_fixture {
            return Err(BundleVerifyError::WorldIdMismatch {
                in_report: in_report.to_string(),
                in_fixture: in_fixture.to_string(),
            });
        }
    }

    Ok(())
}

/// If both `solution.json` and `search_trace.json` exist, the solution's
/// goal flag and expansion count must match the trace metadata.
fn verify_trace_solution_coherence(bundle: &ArtifactBundle) -> Result<(), BundleVerifyError> {
    let (Some(solution_artifact), Some(trace_artifact)) = (
        bundle.artifacts.get("solution.json"),
        bundle.artifacts.get("search_trace.json"),
    ) else {
        return Ok(());
    };
    let solution = parse_artifact(solution_artifact)?;
    let trace = parse_artifact(trace_artifact)?;
    let metadata = &trace["metadata"];

    let goal_in_trace = !metadata["goal_node"].is_null();
    if solution["goal_reached"].as_bool() != Some(goal_in_trace) {
        return Err(BundleVerifyError::TraceSolutionMismatch {
            detail: format!(
                "goal_reached {} vs trace goal_node {}",
                solution["goal_reached"], metadata["goal_node"]
            ),
        });
    }

    let recorded = trace["expansions"].as_array().map(Vec::len);
    let declared = metadata["total_expansions"]
        .as_u64()
        .and_then(|n| usize::try_from(n).ok());
    if recorded != declared || solution["nodes_expanded"] != metadata["total_expansions"] {
        return Err(BundleVerifyError::TraceSolutionMismatch {
            detail: format!(
                "nodes_expanded {} vs trace total_expansions {} with {recorded:?} events",
                solution["nodes_expanded"], metadata["total_expansions"]
            ),
        });
    }

    Ok(())
}
