use chrono::Duration;
use chrono::Local;
use hmac::{Hmac, Mac};
use jwt::SignWithKey;
use jwt::VerifyWithKey;
use serde::Deserialize;
use serde::Serialize;
use sha2::Sha256;

use crate::database::error::Error;
use crate::database::schema::{User, UserRole};

use super::permissions::ActionType;

const SESSION_LIFETIME_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtSessionData {
    pub user_id: i32,
    pub username: String,
    pub role: UserRole,
    iat: i64,
    exp: i64,
}

impl JwtSessionData {
    pub fn new(id: i32, username: String, role: UserRole) -> Self {
        let now = Local::now();
        let iat = now.timestamp();
        let exp = (now + Duration::hours(SESSION_LIFETIME_HOURS)).timestamp();

        Self {
            user_id: id,
            username,
            role,
            iat,
            exp,
        }
    }

    #[cfg(test)]
    fn expired(id: i32, username: String, role: UserRole) -> Self {
        let now = Local::now();
        Self {
            user_id: id,
            username,
            role,
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionData {
    pub user_id: i32,
    pub username: String,
    pub role: UserRole,
    pub is_admin: bool,
}

impl SessionData {
    pub fn authenticate(&self, action: ActionType) -> Result<(), Error> {
        if !action.authenticate(self) {
            return Err(Error::unauthorized(
                "You don't have permission to perform this action",
            ));
        }
        Ok(())
    }
}

impl From<JwtSessionData> for SessionData {
    fn from(value: JwtSessionData) -> Self {
        SessionData {
            user_id: value.user_id,
            username: value.username,
            is_admin: value.role == UserRole::Admin,
            role: value.role,
        }
    }
}

fn session_key() -> Hmac<Sha256> {
    let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| String::from("secret"));
    Hmac::new_from_slice(secret.as_bytes()).unwrap()
}

pub fn generate_jwt_session(user: &User) -> String {
    let claims = JwtSessionData::new(user.id, user.username.to_owned(), user.role.to_owned());

    claims.sign_with_key(&session_key()).unwrap()
}

pub fn verify_jwt_session(token: String) -> Result<JwtSessionData, Error> {
    token
        .verify_with_key(&session_key())
        .map_err(|_| Error::unauthorized("Invalid session; Invalid token"))
        .map(|session: JwtSessionData| {
            let now = Local::now().timestamp();

            if (session.exp - now).is_negative() {
                return Err(Error::unauthorized("Invalid session; Token expired"));
            }
            Ok(session)
        })?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 7,
            email: String::from("ann@example.com"),
            username: String::from("ann"),
            first_name: String::from("Ann"),
            last_name: String::from("Lee"),
            password: String::from("hash"),
            role: UserRole::User,
        }
    }

    #[test]
    fn session_round_trips() {
        let token = generate_jwt_session(&user());
        let session = verify_jwt_session(token).unwrap();
        assert_eq!(session.user_id, 7);
        assert_eq!(session.username, "ann");
        assert_eq!(session.role, UserRole::User);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let mut token = generate_jwt_session(&user());
        token.push('x');
        assert!(verify_jwt_session(token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = JwtSessionData::expired(7, String::from("ann"), UserRole::User);
        let token = claims.sign_with_key(&session_key()).unwrap();
        assert!(verify_jwt_session(token).is_err());
    }

    #[test]
    fn session_data_carries_admin_flag() {
        let claims = JwtSessionData::new(1, String::from("root"), UserRole::Admin);
        let session = SessionData::from(claims);
        assert!(session.is_admin);
    }
}
