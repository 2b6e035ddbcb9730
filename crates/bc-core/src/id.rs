use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide interner backing every `BlockId`.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Process-wide sequence for generated IDs. Never rewinds, so an ID that
/// has been handed out is never produced again, even after its block is removed.
static SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// A lightweight, interned identifier for blocks in the tree.
/// A `Spur` into the block-id interner; `Copy` and cheap to hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(Spur);

impl BlockId {
    /// Intern a string as a BlockId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        BlockId(INTERNER.get_or_intern(s))
    }

    /// The id for `s` if it was ever interned. Never grows the interner,
    /// so host-supplied strings that name no block cost nothing.
    pub fn lookup(s: &str) -> Option<Self> {
        INTERNER.get(s).map(BlockId)
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a fresh ID with a kind prefix (e.g. `button_7`, `circle_12`).
    pub fn with_prefix(prefix: &str) -> Self {
        loop {
            let n = SEQUENCE.fetch_add(1, Ordering::Relaxed);
            let candidate = format!("{prefix}_{n}");
            // Skip names someone interned by hand (fixtures, imported canvases).
            if INTERNER.get(&candidate).is_none() {
                return Self::intern(&candidate);
            }
        }
    }

    /// Generate a fresh ID with the generic `block` prefix.
    pub fn generate() -> Self {
        Self::with_prefix("block")
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BlockId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BlockId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(BlockId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = BlockId::intern("hero_section");
        let b = BlockId::intern("hero_section");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "hero_section");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = BlockId::with_prefix("card");
        let b = BlockId::with_prefix("card");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("card_"));
    }

    #[test]
    fn generated_ids_skip_hand_interned_names() {
        // Reserve the next few names, then make sure generation steps past them.
        let next = SEQUENCE.load(Ordering::Relaxed);
        for n in next..next + 3 {
            BlockId::intern(&format!("taken_{n}"));
        }
        let fresh = BlockId::with_prefix("taken");
        let n: u64 = fresh.as_str()["taken_".len()..].parse().unwrap();
        assert!(n >= next + 3, "reused a hand-interned name: {fresh}");
    }

    #[test]
    fn lookup_does_not_intern() {
        assert_eq!(BlockId::lookup("stale_host_id"), None);
        // A second miss proves the first one did not intern.
        assert_eq!(BlockId::lookup("stale_host_id"), None);

        let id = BlockId::intern("looked_up_later");
        assert_eq!(BlockId::lookup("looked_up_later"), Some(id));
    }
}
