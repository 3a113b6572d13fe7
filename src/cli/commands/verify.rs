//! Verify command: exercise the bucket replace sequence end to end.

use super::helpers::storage_client;
use crate::cli::{RuntimeConfig, StorageArgs};
use crate::error::Result;
use crate::verify::{SECOND_TEST_OBJECT, run_verification};

/// Execute verify command
pub(super) async fn execute_verify(storage: &StorageArgs, config: &RuntimeConfig) -> Result<i32> {
    let store = storage_client(storage)?;
    let _ = config.output().section(&format!("Verifying bucket '{}'", storage.bucket));

    let report = run_verification(&*store).await;
    for step in &report.steps {
        if step.ok {
            config.success_println(&format!("{}: {}", step.name, step.detail));
        } else {
            config.error_println(&format!("{}: {}", step.name, step.detail));
        }
    }

    if report.passed {
        config.success_println(&format!("Only {SECOND_TEST_OBJECT} remained; replace works"));
        Ok(0)
    } else {
        config.error_println("Verification failed");
        Ok(1)
    }
}
