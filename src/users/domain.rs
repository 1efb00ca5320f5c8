use crate::persistence::{Entity, EntityId};

/// Contact information owned by exactly one [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactDetail {
    pub user_id: EntityId,
    pub email_address: String,
    pub mobile_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct User {
    pub id: EntityId,
    pub given_names: String,
    pub last_name: String,
    pub contact_detail: ContactDetail,
}

impl User {
    /// A user not yet stored; the store assigns the id.
    pub fn new(
        given_names: impl Into<String>,
        last_name: impl Into<String>,
        email_address: impl Into<String>,
        mobile_number: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            given_names: given_names.into(),
            last_name: last_name.into(),
            contact_detail: ContactDetail {
                user_id: 0,
                email_address: email_address.into(),
                mobile_number: mobile_number.into(),
            },
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.assign_id(id);
        self
    }
}

impl Entity for User {
    const NAME: &'static str = "User";

    fn id(&self) -> EntityId {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = id;
        self.contact_detail.user_id = id;
    }
}

/// Result of [`UserService::update`](crate::users::UserService::update).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(User),
    NotFound,
}
