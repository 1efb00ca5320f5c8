use crate::lifecycle::{LifecycleError, OnModuleInit};
use crate::users::{User, UserService};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const GIVEN_NAMES: [&str; 8] = [
    "Ada", "Grace", "Alan", "Edsger", "Barbara", "Donald", "Frances", "Ken",
];
const LAST_NAMES: [&str; 8] = [
    "Lovelace", "Hopper", "Turing", "Dijkstra", "Liskov", "Knuth", "Allen", "Thompson",
];

/// Fills an empty store with sample users at startup.
pub struct UserSeeder {
    users: Arc<UserService>,
    count: usize,
}

impl UserSeeder {
    pub fn new(users: Arc<UserService>, count: usize) -> Self {
        Self { users, count }
    }

    fn sample(index: usize) -> User {
        let given = GIVEN_NAMES[index % GIVEN_NAMES.len()];
        let last = LAST_NAMES[(index / GIVEN_NAMES.len() + index) % LAST_NAMES.len()];
        User::new(
            given,
            last,
            format!("{}.{}{}@example.com", given, last, index + 1).to_lowercase(),
            format!("04{:08}", index + 1),
        )
    }
}

#[async_trait]
impl OnModuleInit for UserSeeder {
    async fn on_module_init(&mut self) -> Result<(), LifecycleError> {
        let cancel = CancellationToken::new();
        let existing = self.users.count(&cancel).await?;
        if existing > 0 {
            tracing::info!("Store already holds {} users, skipping seed", existing);
            return Ok(());
        }

        for index in 0..self.count {
            self.users.add(Self::sample(index), &cancel).await?;
        }
        tracing::info!("Seeded {} users", self.count);
        Ok(())
    }
}
