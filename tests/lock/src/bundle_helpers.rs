//! Shared test helpers for mutating and rebuilding artifact bundles.
//!
//! These helpers maintain digest consistency when modifying bundle artifacts,
//! preventing tests from accidentally testing digest mismatch instead of the
//! semantic mismatch they intend to exercise.

use waymark_harness::bundle::{build_bundle, ArtifactBundle, REPORT_BINDINGS};
use waymark_search::digest::{canonical_json_bytes, content_hash, DOMAIN_BUNDLE_ARTIFACT};

/// Modify a JSON artifact and rebuild with the report's digest for it
/// updated, so that digest-binding checks pass and only the semantic check
/// under test fires.
///
/// This is the **only** sanctioned way to mutate a bundle for negative tests.
/// Call sites must NOT manually patch report digests.
///
/// # Panics
///
/// Panics if the bundle is missing `name` or `verification_report.json`,
/// or if their contents are not valid JSON. These are test-only invariants.
pub fn rebuild_with_modified_artifact(
    bundle: &ArtifactBundle,
    name: &str,
    modify: impl FnOnce(&mut serde_json::Value),
) -> ArtifactBundle {
    let artifact = bundle.artifacts.get(name).unwrap();
    let mut json: serde_json::Value = serde_json::from_slice(&artifact.content).unwrap();
    modify(&mut json);
    let modified_bytes = canonical_json_bytes(&json).unwrap();
    let new_hash = content_hash(DOMAIN_BUNDLE_ARTIFACT, &modified_bytes);

    let report_artifact = bundle.artifacts.get("verification_report.json").unwrap();
    let mut report_json: serde_json::Value =
        serde_json::from_slice(&report_artifact.content).unwrap();
    if let Some(&(field, _)) = REPORT_BINDINGS.iter().find(|&&(_, bound)| bound == name) {
        report_json[field] = serde_json::json!(new_hash.as_str());
    }
    let modified_report_bytes = canonical_json_bytes(&report_json).unwrap();

    let artifacts: Vec<(String, Vec<u8>, bool)> = bundle
        .artifacts
        .values()
        .map(|a| {
            if a.name == name {
                (a.name.clone(), modified_bytes.clone(), a.normative)
            } else if a.name == "verification_report.json" {
                (a.name.clone(), modified_report_bytes.clone(), a.normative)
            } else {
                (a.name.clone(), a.content.clone(), a.normative)
            }
        })
        .collect();
    build_bundle(artifacts).unwrap()
}

/// Rebuild the report itself after `modify`.
///
/// # Panics
///
/// Panics if the report is missing or not valid JSON.
pub fn rebuild_with_modified_report(
    bundle: &ArtifactBundle,
    modify: impl FnOnce(&mut serde_json::Value),
) -> ArtifactBundle {
    rebuild_with_modified_artifact(bundle, "verification_report.json", modify)
}

/// Rebuild a bundle with one artifact dropped and nothing else changed.
///
/// # Panics
///
/// Panics if the rebuilt bundle cannot be assembled.
pub fn rebuild_without_artifact(bundle: &ArtifactBundle, name: &str) -> ArtifactBundle {
    let artifacts: Vec<(String, Vec<u8>, bool)> = bundle
        .artifacts
        .values()
        .filter(|a| a.name != name)
        .map(|a| (a.name.clone(), a.content.clone(), a.normative))
        .collect();
    build_bundle(artifacts).unwrap()
}

/// Rebuild a bundle with raw replacement bytes for one artifact, leaving
/// the report untouched.
///
/// # Panics
///
/// Panics if the rebuilt bundle cannot be assembled.
pub fn rebuild_with_raw_artifact(bundle: &ArtifactBundle, name: &str, content: Vec<u8>) -> ArtifactBundle {
    let artifacts: Vec<(String, Vec<u8>, bool)> = bundle
        .artifacts
        .values()
        .map(|a| {
            if a.name == name {
                (a.name.clone(), content.clone(), a.normative)
            } else {
                (a.name.clone(), a.content.clone(), a.normative)
            }
        })
        .collect();
    build_bundle(artifacts).unwrap()
}
