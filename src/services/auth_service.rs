use crate::{
    auth::{
        Role, SessionTokens,
        jwt::{JwtKeys, encode_token, make_access_claims},
        password::verify_password,
    },
    db::entities::user,
    error::AppError,
};

use super::user_service::UserService;

const SESSION_TTL_SECS: usize = 15 * 60;

/// Password login for the human principals of the university backend. The
/// session JWT it issues is what authenticates the OAuth consent step and the
/// menu endpoint.
#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    jwt: JwtKeys,
}

impl AuthService {
    pub fn new(users: UserService, jwt: JwtKeys) -> Self {
        Self { users, jwt }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionTokens, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        let password_ok = verify_password(password, &user.password_hash)?;
        if !password_ok {
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        let now = chrono::Utc::now().fixed_offset();
        self.users.set_last_login(&user.id, &now).await?;

        self.issue_session(&user).await
    }

    async fn issue_session(&self, user: &user::Model) -> Result<SessionTokens, AppError> {
        let role = self.users.role_of(user).await?;
        let mut roles = Vec::new();
        if let Ok(primary) = Role::try_from(role.name.as_str()) {
            // Admins also carry the staff role so staff-gated routes stay open
            // to them.
            if matches!(primary, Role::Admin) {
                roles.push(Role::Admin);
                roles.push(Role::Staff);
            } else {
                roles.push(primary);
            }
        }

        let claims = make_access_claims(&user.id, roles, SESSION_TTL_SECS);
        let access_token = encode_token(&self.jwt, &claims)?;

        Ok(SessionTokens {
            access_token,
            token_type: "Bearer",
            expires_in: SESSION_TTL_SECS,
        })
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{Algorithm, Validation, decode};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use crate::auth::{Claims, Role, jwt::JwtKeys, password::hash_password};
    use crate::db::entities::user;
    use crate::services::ServiceContext;
    use crate::test_helpers::{role_model, user_model};

    use super::AuthService;

    fn service_with(db: &sea_orm::DatabaseConnection, secret: &[u8]) -> AuthService {
        let services = ServiceContext::new(db);
        AuthService::new(services.user_service(), JwtKeys::from_secret(secret))
    }

    fn user_with_hash(id: Uuid, role_id: Uuid, password: &str) -> user::Model {
        let mut user = user_model(id, "staff@hemis.uz", role_id);
        user.password_hash = hash_password(password).expect("hash should succeed");
        user
    }

    #[tokio::test]
    async fn login_rejects_missing_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let service = service_with(&db, b"test-secret");

        let err = service
            .login("staff@hemis.uz", "password123")
            .await
            .expect_err("login should fail");
        assert_eq!(err.message(), "Invalid credentials");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let user_id = Uuid::new_v4();
        let role_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_with_hash(user_id, role_id, "correct-password")]])
            .into_connection();
        let service = service_with(&db, b"test-secret");

        let err = service
            .login("staff@hemis.uz", "wrong-password")
            .await
            .expect_err("login should fail");
        assert_eq!(err.message(), "Invalid credentials");
    }

    #[tokio::test]
    async fn login_issues_claims_for_role() {
        let user_id = Uuid::new_v4();
        let role_id = Uuid::new_v4();
        let stored = user_with_hash(user_id, role_id, "password123");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored.clone()]])
            .append_query_results([vec![stored.clone()]])
            .append_query_results([vec![stored]])
            .append_query_results([vec![role_model(role_id, "staff", &["student.*"])]])
            .into_connection();
        let service = service_with(&db, b"login-secret");

        let tokens = service
            .login("staff@hemis.uz", "password123")
            .await
            .expect("login should succeed");

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let decoded = decode::<Claims>(
            &tokens.access_token,
            &JwtKeys::from_secret(b"login-secret").dec,
            &validation,
        )
        .expect("token should decode");
        assert_eq!(decoded.claims.sub, user_id.to_string());
        assert_eq!(decoded.claims.roles, vec![Role::Staff]);
        assert_eq!(tokens.token_type, "Bearer");
    }

    #[tokio::test]
    async fn admin_login_carries_staff_role_too() {
        let user_id = Uuid::new_v4();
        let role_id = Uuid::new_v4();
        let stored = user_with_hash(user_id, role_id, "password123");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored.clone()]])
            .append_query_results([vec![stored.clone()]])
            .append_query_results([vec![stored]])
            .append_query_results([vec![role_model(role_id, "admin", &["*"])]])
            .into_connection();
        let service = service_with(&db, b"admin-secret");

        let tokens = service
            .login("staff@hemis.uz", "password123")
            .await
            .expect("login should succeed");

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let decoded = decode::<Claims>(
            &tokens.access_token,
            &JwtKeys::from_secret(b"admin-secret").dec,
            &validation,
        )
        .expect("token should decode");
        assert_eq!(decoded.claims.roles, vec![Role::Admin, Role::Staff]);
    }
}
