//! Elapsed time reporting

use std::time::Duration;

/// Render a run duration as `M minute(s), S second(s)`
///
/// Both parts are truncated to whole units. The singular is used only for
/// exactly one.
#[must_use]
#[inline]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let minutes = total / 60;
    let seconds = total % 60;
    format!(
        "{minutes} {}, {seconds} {}",
        unit(minutes, "minute"),
        unit(seconds, "second")
    )
}

fn unit(count: u64, singular: &str) -> String {
    if count == 1 {
        singular.to_owned()
    } else {
        format!("{singular}s")
    }
}
