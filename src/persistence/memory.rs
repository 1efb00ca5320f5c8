use crate::error::{Result, RosterError};
use crate::persistence::{Entity, EntityId, Filter, Mutation, Repository, ensure_active};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Process-lifetime store keyed by id.
///
/// Ids start at 1 and are never reused. Iteration follows id order, which is
/// also insertion order. Writes take the map's write lock for their whole
/// read-modify-write, so concurrent updates to one id are serialized.
pub struct InMemoryRepository<E: Entity> {
    entities: RwLock<BTreeMap<EntityId, E>>,
    next_id: AtomicI32,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(BTreeMap::new()),
            next_id: AtomicI32::new(1),
        }
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn insert(&self, mut entity: E, cancel: &CancellationToken) -> Result<E> {
        ensure_active(cancel)?;
        let mut entities = self.entities.write().await;
        let id = self
            .next_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |id| id.checked_add(1))
            .map_err(|_| RosterError::IdSpaceExhausted { entity: E::NAME })?;
        entity.assign_id(id);
        entities.insert(id, entity.clone());
        tracing::debug!(entity = E::NAME, id, "Inserted");
        Ok(entity)
    }

    async fn get(&self, id: EntityId, cancel: &CancellationToken) -> Result<Option<E>> {
        ensure_active(cancel)?;
        Ok(self.entities.read().await.get(&id).cloned())
    }

    async fn find(&self, filter: Filter<E>, cancel: &CancellationToken) -> Result<Vec<E>> {
        ensure_active(cancel)?;
        let entities = self.entities.read().await;
        Ok(entities.values().filter(|entity| filter(*entity)).cloned().collect())
    }

    async fn page(&self, skip: usize, take: usize, cancel: &CancellationToken) -> Result<Vec<E>> {
        ensure_active(cancel)?;
        let entities = self.entities.read().await;
        Ok(entities.values().skip(skip).take(take).cloned().collect())
    }

    async fn update_with(
        &self,
        id: EntityId,
        mutation: Mutation<E>,
        cancel: &CancellationToken,
    ) -> Result<Option<E>> {
        ensure_active(cancel)?;
        let mut entities = self.entities.write().await;
        let Some(entity) = entities.get_mut(&id) else {
            return Ok(None);
        };
        mutation(&mut *entity);
        // The id is not the mutation's to change.
        entity.assign_id(id);
        tracing::debug!(entity = E::NAME, id, "Updated");
        Ok(Some(entity.clone()))
    }

    async fn remove(&self, id: EntityId, cancel: &CancellationToken) -> Result<Option<E>> {
        ensure_active(cancel)?;
        let removed = self.entities.write().await.remove(&id);
        if removed.is_some() {
            tracing::debug!(entity = E::NAME, id, "Removed");
        }
        Ok(removed)
    }

    async fn count(&self, cancel: &CancellationToken) -> Result<usize> {
        ensure_active(cancel)?;
        Ok(self.entities.read().await.len())
    }

    async fn exists(&self, id: EntityId, cancel: &CancellationToken) -> Result<bool> {
        ensure_active(cancel)?;
        Ok(self.entities.read().await.contains_key(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: EntityId,
        text: String,
    }

    impl Entity for Note {
        const NAME: &'static str = "Note";

        fn id(&self) -> EntityId {
            self.id
        }

        fn assign_id(&mut self, id: EntityId) {
            self.id = id;
        }
    }

    fn note(text: &str) -> Note {
        Note {
            id: 0,
            text: text.to_string(),
        }
    }

    async fn seeded(texts: &[&str]) -> InMemoryRepository<Note> {
        let repo = InMemoryRepository::new();
        let cancel = CancellationToken::new();
        for text in texts {
            repo.insert(note(text), &cancel).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let repo = seeded(&["a", "b"]).await;
        let cancel = CancellationToken::new();
        let stored = repo.insert(note("c"), &cancel).await.unwrap();
        assert_eq!(stored.id(), 3);
        assert_eq!(repo.count(&cancel).await.unwrap(), 3);
        assert!(repo.exists(3, &cancel).await.unwrap());
    }

    #[tokio::test]
    async fn exhausted_id_space_never_overwrites() {
        let repo = InMemoryRepository::<Note> {
            entities: RwLock::new(BTreeMap::new()),
            next_id: AtomicI32::new(i32::MAX - 1),
        };
        let cancel = CancellationToken::new();

        assert_eq!(repo.insert(note("a"), &cancel).await.unwrap().id(), i32::MAX - 1);
        let err = repo.insert(note("b"), &cancel).await.unwrap_err();
        assert!(matches!(err, RosterError::IdSpaceExhausted { entity: "Note" }));
        assert!(repo.insert(note("c"), &cancel).await.is_err());

        assert_eq!(repo.count(&cancel).await.unwrap(), 1);
        let stored = repo.get(i32::MAX - 1, &cancel).await.unwrap().unwrap();
        assert_eq!(stored.text, "a");
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_remove() {
        let repo = seeded(&["a", "b"]).await;
        let cancel = CancellationToken::new();
        assert_eq!(repo.remove(2, &cancel).await.unwrap().unwrap().text, "b");
        assert_eq!(repo.insert(note("c"), &cancel).await.unwrap().id(), 3);
    }

    #[tokio::test]
    async fn page_skips_and_takes_in_id_order() {
        let repo = seeded(&["a", "b", "c", "d", "e"]).await;
        let cancel = CancellationToken::new();
        let page = repo.page(2, 2, &cancel).await.unwrap();
        let texts: Vec<_> = page.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, ["c", "d"]);
        assert!(repo.page(10, 2, &cancel).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_with_keeps_id() {
        let repo = seeded(&["a"]).await;
        let cancel = CancellationToken::new();
        let updated = repo
            .update_with(
                1,
                Box::new(|n: &mut Note| {
                    n.text = "z".to_string();
                    n.id = 99;
                }),
                &cancel,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated, Note { id: 1, text: "z".to_string() });
        assert!(repo
            .update_with(2, Box::new(|_n: &mut Note| {}), &cancel)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn find_applies_filter() {
        let repo = seeded(&["apple", "banana", "avocado"]).await;
        let cancel = CancellationToken::new();
        let found = repo
            .find(Box::new(|n: &Note| n.text.starts_with('a')), &cancel)
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn cancelled_token_fails_fast_without_writing() {
        let repo = seeded(&[]).await;
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(matches!(
            repo.insert(note("a"), &cancel).await,
            Err(RosterError::Cancelled)
        ));
        assert_eq!(repo.count(&CancellationToken::new()).await.unwrap(), 0);
    }
}
