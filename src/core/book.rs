use crate::core::mutations::MutationOrchestrator;
use crate::core::queries::QueryService;
use crate::core::relations::RelationshipResolver;
use crate::domain::ports::DocumentStore;
use std::sync::Arc;

/// Entry point wiring every component to one document store.
pub struct RecipeBook<S: DocumentStore + ?Sized> {
    relations: Arc<RelationshipResolver<S>>,
    queries: QueryService<S>,
    mutations: MutationOrchestrator<S>,
}

impl<S: DocumentStore + ?Sized> RecipeBook<S> {
    pub fn new(store: Arc<S>) -> Self {
        let relations = Arc::new(RelationshipResolver::new(Arc::clone(&store)));
        Self {
            queries: QueryService::new(Arc::clone(&store), Arc::clone(&relations)),
            mutations: MutationOrchestrator::new(store),
            relations,
        }
    }

    pub fn queries(&self) -> &QueryService<S> {
        &self.queries
    }

    pub fn mutations(&self) -> &MutationOrchestrator<S> {
        &self.mutations
    }

    pub fn relations(&self) -> &RelationshipResolver<S> {
        &self.relations
    }
}
