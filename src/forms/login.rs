use serde::{Deserialize, Serialize};
use serde_valid::Validate;

#[derive(Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(min_length = 3)]
    #[validate(max_length = 254)]
    pub email: String,
    #[validate(min_length = 1)]
    #[validate(max_length = 1024)]
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}
