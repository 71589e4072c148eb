//! Shared scanner for the tagged `"Field":value` message shape.
//!
//! A message is a comma-separated list of fragments; each fragment is a
//! quoted tag and a scalar value separated by the first colon (values such
//! as timestamps may themselves contain colons). Dispatch goes through a
//! lookup table mapping tag names to setter functions, which keeps the
//! "unknown tag is ignored" policy in exactly one place.

use tracing::trace;

/// Setter applied when a fragment's tag matches a table entry.
pub(crate) type Setter<T> = fn(&mut T, &str);

/// Scan `payload` and apply every recognized tag to `record`.
///
/// Fragments without a tag/value separator are skipped individually;
/// decoding continues with the remaining fragments. Tags absent from the
/// table are silently ignored.
pub(crate) fn apply_tagged<T>(payload: &str, record: &mut T, table: &[(&str, Setter<T>)]) {
    let body = payload.trim().trim_start_matches('{').trim_end_matches('}');

    for fragment in body.split(',') {
        let Some((tag, value)) = fragment.split_once(':') else {
            if !fragment.trim().is_empty() {
                trace!(fragment, "fragment without separator, skipping");
            }
            continue;
        };

        let tag = tag.trim().trim_matches('"');
        let value = value.trim().trim_matches('"');

        if let Some((_, setter)) = table.iter().find(|(name, _)| *name == tag) {
            setter(record, value);
        }
    }
}

/// Parse a float value into `target`, leaving it untouched on failure.
pub(crate) fn set_f64(target: &mut f64, value: &str) {
    if let Ok(parsed) = value.parse::<f64>() {
        *target = parsed;
    }
}

/// Parse an unsigned value into `target`, leaving it untouched on failure.
///
/// The wire sometimes renders integers with a trailing fraction; those are
/// accepted by truncation.
pub(crate) fn set_u32(target: &mut u32, value: &str) {
    if let Ok(parsed) = value.parse::<u32>() {
        *target = parsed;
    } else if let Ok(parsed) = value.parse::<f64>() {
        if parsed >= 0.0 && parsed <= u32::MAX as f64 {
            *target = parsed as u32;
        }
    }
}

/// Parse a boolean value into `target`, leaving it untouched on failure.
pub(crate) fn set_bool(target: &mut bool, value: &str) {
    match value {
        "true" => *target = true,
        "false" => *target = false,
        _ => {}
    }
}
