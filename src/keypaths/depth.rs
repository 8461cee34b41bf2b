/// Bound used when the caller does not pick one.
pub const DEFAULT_DEPTH: u32 = 10;

/// Largest bound the legacy countdown table knows about.
pub const MAX_DEPTH: u32 = 20;

/// Hard cap for `DepthCeiling::Unbounded`. Enumeration recurses once per level,
/// so the bound must stay well inside a thread's stack.
pub const UNBOUNDED_MAX_DEPTH: u32 = 256;

/// How bounds above `MAX_DEPTH` are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DepthCeiling {
    /// Bounds above `MAX_DEPTH` are not extended: they behave like a bound of 0.
    #[default]
    Legacy,
    /// Plain countdown; bounds up to `UNBOUNDED_MAX_DEPTH` are honoured and
    /// larger ones are clamped to it.
    Unbounded,
}

/// Remaining recursion budget.
///
/// `remaining == None` means the counter is exhausted: the node it guards is not
/// traversed at all. A counter at `Some(0)` still lets the current node list its
/// own fields; only its children are cut off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Depth {
    remaining: Option<u32>,
    ceiling: DepthCeiling,
}

impl Depth {
    pub fn new(bound: u32) -> Self {
        Self::with_ceiling(bound, DepthCeiling::Legacy)
    }

    pub fn unbounded(bound: u32) -> Self {
        Self::with_ceiling(bound, DepthCeiling::Unbounded)
    }

    pub fn with_ceiling(bound: u32, ceiling: DepthCeiling) -> Self {
        let bound = match ceiling {
            DepthCeiling::Legacy => bound,
            DepthCeiling::Unbounded => bound.min(UNBOUNDED_MAX_DEPTH),
        };
        Self { remaining: Some(bound), ceiling }
    }

    pub fn exhausted() -> Self {
        Self { remaining: None, ceiling: DepthCeiling::Legacy }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_none()
    }

    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    /// True when a legacy counter was handed a bound past the table.
    pub fn exceeds_ceiling(&self) -> bool {
        self.ceiling == DepthCeiling::Legacy && self.remaining.is_some_and(|n| n > MAX_DEPTH)
    }

    /// The counter one level down.
    pub fn descend(self) -> Self {
        let remaining = match self.remaining {
            None | Some(0) => None,
            Some(_) if self.exceeds_ceiling() => None,
            Some(n) => Some(n - 1),
        };
        Self { remaining, ..self }
    }
}

impl Default for Depth {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_then_exhausts() {
        let d = Depth::new(2);
        assert_eq!(d.descend().remaining(), Some(1));
        assert_eq!(d.descend().descend().remaining(), Some(0));
        assert!(d.descend().descend().descend().is_exhausted());
        assert!(Depth::exhausted().descend().is_exhausted());
    }

    #[test]
    fn legacy_ceiling_truncates_past_twenty() {
        assert_eq!(Depth::new(MAX_DEPTH).descend().remaining(), Some(MAX_DEPTH - 1));
        let past = Depth::new(MAX_DEPTH + 1);
        assert!(past.exceeds_ceiling());
        assert!(!past.is_exhausted());
        assert!(past.descend().is_exhausted());
    }

    #[test]
    fn unbounded_ignores_ceiling() {
        let d = Depth::unbounded(50);
        assert!(!d.exceeds_ceiling());
        assert_eq!(d.descend().remaining(), Some(49));
    }

    #[test]
    fn unbounded_is_clamped_to_cap() {
        assert_eq!(Depth::unbounded(UNBOUNDED_MAX_DEPTH).remaining(), Some(UNBOUNDED_MAX_DEPTH));
        assert_eq!(Depth::unbounded(5_000).remaining(), Some(UNBOUNDED_MAX_DEPTH));
        assert_eq!(Depth::unbounded(u32::MAX).remaining(), Some(UNBOUNDED_MAX_DEPTH));
        // the legacy counter keeps its own quirk instead
        assert_eq!(Depth::new(5_000).remaining(), Some(5_000));
    }
}
