use tracing::info;

use dearbaby_core::now_rfc3339;
use dearbaby_sql::Value;

use crate::identity::Identity;
use crate::model::{CreateProfile, UpdateProfile, User};
use crate::service::{BoardError, BoardService, required};

const USER_SELECT: &str =
    "SELECT id, email, name, profile_image, created_at, updated_at FROM users";

impl BoardService {
    /// Get a user profile by id.
    pub fn get_user(&self, id: &str) -> Result<User, BoardError> {
        let sql = format!("{} WHERE id = ?1", USER_SELECT);
        let row = self
            .sql
            .query_opt(&sql, &[Value::from(id)])?
            .ok_or_else(|| BoardError::NotFound("User not found".into()))?;
        Ok(User::from_row(&row)?)
    }

    /// Create the profile row for a freshly signed-up identity.
    ///
    /// The id is the identity's subject; the email comes from the token
    /// when it carries one.
    pub fn create_profile(&self, caller: &Identity, input: CreateProfile) -> Result<User, BoardError> {
        let email = required(caller.email.clone()).or(required(input.email));
        let (Some(name), Some(email)) = (required(input.name), email) else {
            return Err(BoardError::Validation("Missing required fields".into()));
        };

        let now = now_rfc3339();
        let user = User {
            id: caller.id.clone(),
            email,
            name,
            profile_image: input.profile_image,
            created_at: now.clone(),
            updated_at: now,
        };

        self.sql
            .exec(
                "INSERT INTO users (id, email, name, profile_image, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                &[
                    Value::from(user.id.as_str()),
                    Value::from(user.email.as_str()),
                    Value::from(user.name.as_str()),
                    Value::from(user.profile_image.clone()),
                    Value::from(user.created_at.as_str()),
                    Value::from(user.updated_at.as_str()),
                ],
            )
            .map_err(|e| {
                if e.is_unique_violation() {
                    BoardError::Conflict("User already exists".into())
                } else {
                    BoardError::from(e)
                }
            })?;

        info!(user_id = %user.id, "profile created");
        Ok(user)
    }

    /// Replace the caller's display name and profile image.
    pub fn update_profile(&self, caller: &Identity, input: UpdateProfile) -> Result<User, BoardError> {
        let name = required(input.name)
            .ok_or_else(|| BoardError::Validation("Missing required fields".into()))?;

        let affected = self.sql.exec(
            "UPDATE users SET name = ?1, profile_image = ?2, updated_at = ?3 WHERE id = ?4",
            &[
                Value::from(name),
                Value::from(input.profile_image),
                Value::from(now_rfc3339()),
                Value::from(caller.id.as_str()),
            ],
        )?;
        if affected == 0 {
            return Err(BoardError::NotFound("User not found".into()));
        }

        info!(user_id = %caller.id, "profile updated");
        self.get_user(&caller.id)
    }

    /// Total number of registered users.
    pub fn count_users(&self) -> Result<u64, BoardError> {
        self.count_rows("users")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::service;

    fn identity(id: &str, email: Option<&str>) -> Identity {
        Identity {
            id: id.into(),
            email: email.map(Into::into),
        }
    }

    fn profile(name: &str) -> CreateProfile {
        CreateProfile {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    #[test]
    fn create_uses_token_email_and_subject() {
        let svc = service();
        let user = svc
            .create_profile(&identity("sub-1", Some("a@example.com")), profile("Alice"))
            .unwrap();
        assert_eq!(user.id, "sub-1");
        assert_eq!(user.email, "a@example.com");
        assert_eq!(svc.get_user("sub-1").unwrap(), user);
        assert_eq!(svc.count_users().unwrap(), 1);
    }

    #[test]
    fn create_falls_back_to_body_email() {
        let svc = service();
        let user = svc
            .create_profile(
                &identity("sub-1", None),
                CreateProfile {
                    name: Some("Alice".into()),
                    email: Some("body@example.com".into()),
                    profile_image: Some("https://img/a.png".into()),
                },
            )
            .unwrap();
        assert_eq!(user.email, "body@example.com");
        assert_eq!(user.profile_image.as_deref(), Some("https://img/a.png"));
    }

    #[test]
    fn create_without_email_or_name_is_rejected() {
        let svc = service();
        let err = svc.create_profile(&identity("sub-1", None), profile("Alice")).unwrap_err();
        assert!(matches!(err, BoardError::Validation(_)));
        let err = svc
            .create_profile(&identity("sub-1", Some("a@example.com")), CreateProfile::default())
            .unwrap_err();
        assert!(matches!(err, BoardError::Validation(_)));
    }

    #[test]
    fn create_twice_conflicts() {
        let svc = service();
        let caller = identity("sub-1", Some("a@example.com"));
        svc.create_profile(&caller, profile("Alice")).unwrap();
        let err = svc.create_profile(&caller, profile("Alice")).unwrap_err();
        assert!(matches!(err, BoardError::Conflict(ref m) if m == "User already exists"));
    }

    #[test]
    fn update_replaces_name_and_image() {
        let svc = service();
        let caller = identity("sub-1", Some("a@example.com"));
        let created = svc.create_profile(&caller, profile("Alice")).unwrap();

        let updated = svc
            .update_profile(
                &caller,
                UpdateProfile {
                    name: Some("Alice W.".into()),
                    profile_image: Some("data:image/png;base64,AAAA".into()),
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Alice W.");
        assert_eq!(updated.profile_image.as_deref(), Some("data:image/png;base64,AAAA"));
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn update_unknown_user_is_not_found() {
        let svc = service();
        let err = svc
            .update_profile(
                &identity("ghost", None),
                UpdateProfile {
                    name: Some("Ghost".into()),
                    profile_image: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, BoardError::NotFound(ref m) if m == "User not found"));
    }
}
