//! Lifecycle markers carried in the `event` field of operation logs
//!
//! An operation emits `start` once, then exactly one of `end` or `end_error`.

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_are_distinct() {
        let markers = [EVENT_START, EVENT_END, EVENT_END_ERROR];
        for (i, a) in markers.iter().enumerate() {
            for b in &markers[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
