//! End-to-end check of the bucket replace sequence against a live backend.
//!
//! Uploads two small test files with a delete-all in between and checks
//! that only the second one remains, then removes it again.

use crate::payload::Payload;
use crate::storage::{ObjectStore, UploadOptions};
use chrono::Utc;
use serde::Serialize;

/// First test object
pub const FIRST_TEST_OBJECT: &str = "test-v1.apk";

/// Second test object, the only one expected at the end
pub const SECOND_TEST_OBJECT: &str = "test-v2.apk";

/// Outcome of one verification step
#[derive(Debug, Clone, Serialize)]
pub struct VerificationStep {
    /// Step name
    pub name: String,
    /// Whether the step succeeded
    pub ok: bool,
    /// Human-readable detail
    pub detail: String,
}

/// Full verification run
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationReport {
    /// Steps in execution order
    pub steps: Vec<VerificationStep>,
    /// Object names listed after the second upload
    pub final_listing: Vec<String>,
    /// Whether the bucket ended up holding exactly the second object
    pub passed: bool,
}

impl VerificationReport {
    fn step(&mut self, name: &str, ok: bool, detail: impl Into<String>) -> bool {
        let detail = detail.into();
        if ok {
            log::info!("{name}: {detail}");
        } else {
            log::error!("{name}: {detail}");
        }
        self.steps.push(VerificationStep {
            name: name.to_string(),
            ok,
            detail,
        });
        ok
    }
}

fn test_payload(name: &str) -> Payload {
    Payload::new(
        name,
        format!("Test APK content - {}", Utc::now().to_rfc3339()).into_bytes(),
    )
}

async fn list_names(store: &dyn ObjectStore, report: &mut VerificationReport, step: &str) -> Option<Vec<String>> {
    match store.list().await {
        Ok(objects) => {
            let names: Vec<String> = objects.into_iter().map(|o| o.name).collect();
            let detail = if names.is_empty() {
                "(empty bucket)".to_string()
            } else {
                names.join(", ")
            };
            report.step(step, true, detail);
            Some(names)
        }
        Err(e) => {
            report.step(step, false, e.user_message());
            None
        }
    }
}

async fn upload(store: &dyn ObjectStore, report: &mut VerificationReport, name: &str) -> bool {
    let payload = test_payload(name);
    match store.upload(&payload, &UploadOptions::overwrite()).await {
        Ok(()) => report.step(
            &format!("upload {name}"),
            true,
            format!("public URL {}", store.public_url(name)),
        ),
        Err(e) => report.step(&format!("upload {name}"), false, e.user_message()),
    }
}

/// Run the list/upload/delete/upload/list/verify/cleanup sequence
pub async fn run_verification(store: &dyn ObjectStore) -> VerificationReport {
    let mut report = VerificationReport::default();

    match store.ping().await {
        Ok(status) => report.step("connectivity", true, format!("status {status}")),
        Err(e) => {
            report.step("connectivity", false, e.user_message());
            return report;
        }
    };

    list_names(store, &mut report, "initial listing").await;

    if !upload(store, &mut report, FIRST_TEST_OBJECT).await {
        return report;
    }
    list_names(store, &mut report, "listing after first upload").await;

    match store.list().await {
        Ok(objects) if objects.is_empty() => {
            report.step("delete all", true, "no files to delete");
        }
        Ok(objects) => {
            let names: Vec<String> = objects.into_iter().map(|o| o.name).collect();
            match store.remove(&names).await {
                Ok(()) => report.step("delete all", true, format!("deleted {} file(s)", names.len())),
                Err(e) => report.step("delete all", false, e.user_message()),
            };
        }
        Err(e) => {
            report.step("delete all", false, e.user_message());
        }
    }

    if !upload(store, &mut report, SECOND_TEST_OBJECT).await {
        return report;
    }

    let final_listing = list_names(store, &mut report, "final listing")
        .await
        .unwrap_or_default();
    report.passed = final_listing.len() == 1 && final_listing[0] == SECOND_TEST_OBJECT;
    report.step(
        "single object remains",
        report.passed,
        format!(
            "expected [{SECOND_TEST_OBJECT}], got {} file(s)",
            final_listing.len()
        ),
    );
    report.final_listing = final_listing;

    match store.remove(&[SECOND_TEST_OBJECT.to_string()]).await {
        Ok(()) => report.step("cleanup", true, format!("removed {SECOND_TEST_OBJECT}")),
        Err(e) => report.step("cleanup", false, e.user_message()),
    };

    report
}
