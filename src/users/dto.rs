use crate::persistence::EntityId;
use crate::users::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub user_id: EntityId,
    pub given_names: String,
    pub last_name: String,
    pub email_address: String,
    pub mobile_number: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            given_names: user.given_names,
            last_name: user.last_name,
            email_address: user.contact_detail.email_address,
            mobile_number: user.contact_detail.mobile_number,
        }
    }
}

pub(crate) fn to_dtos(users: Vec<User>) -> Vec<UserDto> {
    users.into_iter().map(UserDto::from).collect()
}
