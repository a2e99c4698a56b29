//! # Post-Effect System
//!
//! Normalizations run after every committed mutation.
//!
//! ## Design
//!
//! Each [`PostEffect`] inspects the tree and proposes follow-up mutations.
//! The engine applies them and asks again until nothing is proposed, so an
//! effect only needs to see one level of debris at a time. For example,
//! pruning an empty auto row can leave its auto column parent empty, which
//! the next round prunes.
//!
//! Effects are:
//! - **Deterministic**: same tree, same proposals
//! - **Convergent**: running the engine on its own output changes nothing

use crate::mutations::{Mutation, MutationResult};
use crate::operations::Chain;
use pagecraft_schema::{IdSource, Node, PageSchema, SequentialIds};
use tracing::debug;

/// Normalization triggered after a mutation
pub trait PostEffect: std::fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Follow-up mutations needed to normalize `tree`
    fn analyze(&self, tree: &PageSchema) -> Vec<Mutation>;
}

/// Remove empty containers the editor created on its own (drop wrappers).
/// Containers with `origin: user` are kept even when empty.
#[derive(Debug, Default)]
pub struct PruneEmptyAutoContainers;

impl PruneEmptyAutoContainers {
    fn is_debris(node: &Node, root_id: &str) -> bool {
        node.id != root_id
            && !node.origin.is_user()
            && node.is_container()
            && node.children().is_empty()
    }
}

impl PostEffect for PruneEmptyAutoContainers {
    fn name(&self) -> &'static str {
        "prune_empty_auto_containers"
    }

    fn analyze(&self, tree: &PageSchema) -> Vec<Mutation> {
        tree.nodes
            .values()
            .filter(|node| Self::is_debris(node, &tree.root_id))
            .map(|node| Mutation::Remove {
                node_id: node.id.clone(),
            })
            .collect()
    }
}

/// Applies its effects to a fixpoint
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Engine with the default cleanup effects
    pub fn new() -> Self {
        Self {
            effects: vec![Box::new(PruneEmptyAutoContainers)],
        }
    }

    /// Proposals from every effect for `tree`
    pub fn analyze(&self, tree: &PageSchema) -> Vec<Mutation> {
        let mut secondary_mutations = Vec::new();

        for effect in &self.effects {
            let mut effect_mutations = effect.analyze(tree);
            if !effect_mutations.is_empty() {
                debug!(effect = effect.name(), count = effect_mutations.len(), "Post-effect proposals");
            }
            secondary_mutations.append(&mut effect_mutations);
        }

        secondary_mutations
    }

    /// Normalize `tree`; a no-op when it is already clean
    pub fn run<'a>(&self, tree: &'a PageSchema, ids: &mut dyn IdSource) -> MutationResult<'a> {
        let mut chain = Chain::new(tree);

        // Every productive round removes at least one node
        for _ in 0..=tree.nodes.len() {
            let proposals = self.analyze(chain.tree());
            let mut progressed = false;
            for mutation in &proposals {
                progressed |= chain.step(|current| mutation.apply(current, &mut *ids));
            }
            if !progressed {
                break;
            }
        }

        chain.finish()
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the default cleanup pass on `tree`
pub fn cleanup(tree: &PageSchema) -> MutationResult<'_> {
    let mut ids = SequentialIds::from_seed("cleanup");
    PostEffectEngine::new().run(tree, &mut ids)
}
