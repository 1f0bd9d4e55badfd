//! Restore-time options (SPEC_FULL.md §B "Configuration").

/// Options controlling how [`crate::load`] splices restored nodes onto
/// caller-supplied targets.
///
/// Mirrors the teacher workspace's `WorldConfig`/`AsyncConfig` pattern: a
/// plain struct with a `Default` impl, one field per caller-tunable
/// behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestoreOptions {
    /// When `true` (the default), every target's kind is checked against
    /// its built root *before* any target is overwritten, so a
    /// [`TargetKindMismatch`](splice_core::RestoreError::TargetKindMismatch)
    /// on target `k` leaves targets `0..k` (and everything after) untouched.
    ///
    /// When `false`, targets are checked and overwritten one at a time, in
    /// order — matching the source's documented partial-overwrite
    /// limitation (spec §4.4, §9 "Target splice atomicity"): a mismatch on
    /// target `k` leaves targets `0..k` already overwritten.
    pub validate_before_splice: bool,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            validate_before_splice: true,
        }
    }
}
