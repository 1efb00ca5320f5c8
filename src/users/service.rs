use crate::Injectable;
use crate::error::Result;
use crate::persistence::{EntityId, Repository};
use crate::users::{UpdateOutcome, User};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Typed operations over the user store.
///
/// Absence is never an error here: lookups return `Option`, updates return
/// [`UpdateOutcome`]. Deciding whether absence is a failure is left to the
/// calling use case.
#[derive(Injectable)]
pub struct UserService {
    repository: Arc<dyn Repository<User>>,
}

impl UserService {
    pub fn new(repository: Arc<dyn Repository<User>>) -> Self {
        Self { repository }
    }

    /// The user with `id`, contact detail included.
    pub async fn get(&self, id: EntityId, cancel: &CancellationToken) -> Result<Option<User>> {
        self.repository.get(id, cancel).await
    }

    /// Users whose given names equal `given_names` OR whose last name equals
    /// `last_name`. A filter that is not supplied matches nothing.
    pub async fn find(
        &self,
        given_names: Option<&str>,
        last_name: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Vec<User>> {
        let given_names = given_names.map(str::to_owned);
        let last_name = last_name.map(str::to_owned);
        self.repository
            .find(
                Box::new(move |user: &User| {
                    given_names.as_deref() == Some(user.given_names.as_str())
                        || last_name.as_deref() == Some(user.last_name.as_str())
                }),
                cancel,
            )
            .await
    }

    /// One 1-based page of users in store order.
    pub async fn get_paginated(
        &self,
        page: u32,
        page_size: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<User>> {
        let take = page_size as usize;
        let skip = (page.saturating_sub(1) as usize).saturating_mul(take);
        self.repository.page(skip, take, cancel).await
    }

    /// Store a new user together with its contact detail.
    pub async fn add(&self, user: User, cancel: &CancellationToken) -> Result<User> {
        self.repository.insert(user, cancel).await
    }

    /// Overwrite names and contact fields of the stored user with `user.id`.
    pub async fn update(&self, user: User, cancel: &CancellationToken) -> Result<UpdateOutcome> {
        let id = user.id;
        let updated = self
            .repository
            .update_with(
                id,
                Box::new(move |stored: &mut User| {
                    stored.given_names = user.given_names;
                    stored.last_name = user.last_name;
                    stored.contact_detail.email_address = user.contact_detail.email_address;
                    stored.contact_detail.mobile_number = user.contact_detail.mobile_number;
                }),
                cancel,
            )
            .await?;

        Ok(match updated {
            Some(user) => UpdateOutcome::Updated(user),
            None => UpdateOutcome::NotFound,
        })
    }

    /// Remove the user and its contact detail, returning what was removed.
    pub async fn delete(&self, id: EntityId, cancel: &CancellationToken) -> Result<Option<User>> {
        self.repository.remove(id, cancel).await
    }

    pub async fn count(&self, cancel: &CancellationToken) -> Result<usize> {
        self.repository.count(cancel).await
    }

    pub async fn exists_by_id(&self, id: EntityId, cancel: &CancellationToken) -> Result<bool> {
        self.repository.exists(id, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;
    use crate::persistence::InMemoryRepository;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryRepository::<User>::new()))
    }

    async fn seed(service: &UserService, count: usize) {
        let cancel = CancellationToken::new();
        for i in 0..count {
            let user = User::new(
                format!("Given{i}"),
                format!("Last{i}"),
                format!("user{i}@example.com"),
                format!("04{i:08}"),
            );
            service.add(user, &cancel).await.unwrap();
        }
    }

    #[tokio::test]
    async fn add_assigns_id_to_user_and_contact_detail() {
        let service = service();
        let cancel = CancellationToken::new();
        let stored = service
            .add(User::new("Ada", "Lovelace", "ada@example.com", "0400000001"), &cancel)
            .await
            .unwrap();
        assert_eq!(stored.id, 1);
        assert_eq!(stored.contact_detail.user_id, 1);

        let fetched = service.get(1, &cancel).await.unwrap().unwrap();
        assert_eq!(fetched, stored);
    }

    #[tokio::test]
    async fn update_overwrites_all_fields() {
        let service = service();
        seed(&service, 2).await;
        let cancel = CancellationToken::new();

        let outcome = service
            .update(User::new("A", "B", "a@b.com", "123").with_id(2), &cancel)
            .await
            .unwrap();
        let expected = User::new("A", "B", "a@b.com", "123").with_id(2);
        assert_eq!(outcome, UpdateOutcome::Updated(expected.clone()));
        assert_eq!(service.get(2, &cancel).await.unwrap(), Some(expected));
    }

    #[tokio::test]
    async fn update_of_missing_user_is_not_found() {
        let service = service();
        seed(&service, 1).await;
        let cancel = CancellationToken::new();

        let outcome = service
            .update(User::new("A", "B", "a@b.com", "123").with_id(5), &cancel)
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::NotFound);
        assert_eq!(service.count(&cancel).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_missing_user_is_a_no_op() {
        let service = service();
        seed(&service, 3).await;
        let cancel = CancellationToken::new();

        assert_eq!(service.delete(42, &cancel).await.unwrap(), None);
        assert_eq!(service.count(&cancel).await.unwrap(), 3);

        let removed = service.delete(2, &cancel).await.unwrap().unwrap();
        assert_eq!(removed.given_names, "Given1");
        assert!(!service.exists_by_id(2, &cancel).await.unwrap());
    }

    #[tokio::test]
    async fn find_matches_either_field_exactly() {
        let service = service();
        seed(&service, 4).await;
        let cancel = CancellationToken::new();

        let found = service
            .find(Some("Given0"), Some("Last3"), &cancel)
            .await
            .unwrap();
        let ids: Vec<_> = found.iter().map(|u| u.id).collect();
        assert_eq!(ids, [1, 4]);

        assert!(service.find(Some("Given"), None, &cancel).await.unwrap().is_empty());
        assert!(service.find(None, None, &cancel).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn paginates_with_one_based_pages() {
        let service = service();
        seed(&service, 15).await;
        let cancel = CancellationToken::new();

        assert_eq!(service.get_paginated(1, 10, &cancel).await.unwrap().len(), 10);
        let second = service.get_paginated(2, 10, &cancel).await.unwrap();
        assert_eq!(second.len(), 5);
        assert_eq!(second[0].id, 11);
        assert!(service.get_paginated(3, 10, &cancel).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_leave_exactly_one_writer() {
        let service = Arc::new(service());
        seed(&service, 1).await;

        let submitted: Vec<User> = (0..16)
            .map(|i| {
                User::new(
                    format!("G{i}"),
                    format!("L{i}"),
                    format!("w{i}@example.com"),
                    format!("{i:04}"),
                )
                .with_id(1)
            })
            .collect();

        let writers = submitted.iter().cloned().map(|user| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                let cancel = CancellationToken::new();
                service.update(user, &cancel).await
            })
        });
        for outcome in futures::future::join_all(writers).await {
            assert!(matches!(outcome.unwrap(), Ok(UpdateOutcome::Updated(_))));
        }

        let cancel = CancellationToken::new();
        let stored = service.get(1, &cancel).await.unwrap().unwrap();
        assert!(submitted.contains(&stored), "mixed write: {stored:?}");
        assert_eq!(service.count(&cancel).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn cancelled_calls_leave_store_untouched() {
        let service = service();
        seed(&service, 1).await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = service
            .update(User::new("A", "B", "a@b.com", "123").with_id(1), &cancel)
            .await;
        assert!(matches!(result, Err(RosterError::Cancelled)));

        let fresh = CancellationToken::new();
        let stored = service.get(1, &fresh).await.unwrap().unwrap();
        assert_eq!(stored.given_names, "Given0");
    }
}
