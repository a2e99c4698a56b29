//! Node id generation.
//!
//! Mutations never invent ids themselves; callers hand them an [`IdSource`].
//! Tests use [`SequentialIds`] or a seeded [`RandomIds`] for reproducible trees.

use crc32fast::Hasher;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

const RANDOM_SUFFIX_LEN: usize = 8;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const MAX_ATTEMPTS: usize = 16;

/// Stable short hash of a document id, used to seed sequential ids
pub fn get_document_id(document: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(document.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub trait IdSource {
    /// A new id starting with `prefix` (usually the node type name)
    fn next_id(&mut self, prefix: &str) -> String;
}

impl<F> IdSource for F
where
    F: FnMut(&str) -> String,
{
    fn next_id(&mut self, prefix: &str) -> String {
        self(prefix)
    }
}

/// `{prefix}-{seed}-{n}` with a per-document seed
#[derive(Debug, Clone)]
pub struct SequentialIds {
    seed: String,
    count: u32,
}

impl SequentialIds {
    pub fn for_document(document: &str) -> Self {
        Self::from_seed(get_document_id(document))
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        self.count += 1;
        format!("{}-{}-{}", prefix, self.seed, self.count)
    }
}

/// `{prefix}_{8 base36 chars}`
#[derive(Debug, Clone)]
pub struct RandomIds<R: RngCore> {
    rng: R,
}

impl<R: RngCore> RandomIds<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomIds<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: RngCore> IdSource for RandomIds<R> {
    fn next_id(&mut self, prefix: &str) -> String {
        let suffix: String = (0..RANDOM_SUFFIX_LEN)
            .map(|_| BASE36[self.rng.gen_range(0..BASE36.len())] as char)
            .collect();
        format!("{}_{}", prefix, suffix)
    }
}

/// Draw ids until one is not `taken`.
///
/// Falls back to a numeric suffix on the last draw so a misbehaving source
/// (constant closures in tests) still terminates.
pub fn fresh_id<S, F>(ids: &mut S, prefix: &str, taken: F) -> String
where
    S: IdSource + ?Sized,
    F: Fn(&str) -> bool,
{
    let mut candidate = String::new();
    for _ in 0..MAX_ATTEMPTS {
        candidate = ids.next_id(prefix);
        if !taken(&candidate) {
            return candidate;
        }
    }

    let mut n = 2;
    let mut suffixed = format!("{}-{}", candidate, n);
    while taken(&suffixed) {
        n += 1;
        suffixed = format!("{}-{}", candidate, n);
    }
    suffixed
}
