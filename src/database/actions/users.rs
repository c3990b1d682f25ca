use crate::{
    authentication::{
        cryptography::{hash_password, verify_password},
        jwt::generate_jwt_session,
    },
    error::{Error, QueryError},
    schema::{NewUser, Profile, User, Uuid},
    RESERVED_USERNAMES,
};

use sqlx::{Pool, Postgres};

use super::is_subscribed;

pub async fn get_user(pool: &Pool<Postgres>, username: &str) -> Result<Option<User>, Error> {
    let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(|e| QueryError::from(e))?;

    Ok(row)
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Option<User>, Error> {
    let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| QueryError::from(e))?;

    Ok(row)
}

pub async fn get_user_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<User>, Error> {
    let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(|e| QueryError::from(e))?;

    Ok(row)
}

pub fn validate_registration(data: &NewUser) -> Result<(), Error> {
    if data.email.trim().is_empty() {
        return Err(Error::validation("Email must not be empty"));
    }
    if data.username.trim().is_empty() {
        return Err(Error::validation("Username must not be empty"));
    }
    if RESERVED_USERNAMES.contains(&data.username.as_str()) {
        return Err(Error::validation("This username is reserved"));
    }
    if data.password.is_empty() {
        return Err(Error::validation("Password must not be empty"));
    }
    Ok(())
}

/// Creates a user, storing the argon2 hash of their password. Duplicate
/// email or username surfaces as a conflict.
pub async fn register_user(data: &NewUser, pool: &Pool<Postgres>) -> Result<Uuid, Error> {
    validate_registration(data)?;

    let password = hash_password(&data.password)
        .map_err(|_e| Error::Internal(String::from("Failed to hash password")))?;

    let result: Option<(Uuid,)> = sqlx::query_as(
        "
        INSERT INTO users (email, username, first_name, last_name, password, role)
        VALUES ($1, $2, $3, $4, $5, 'user')
        ON CONFLICT DO NOTHING RETURNING id;
    ",
    )
    .bind(&data.email)
    .bind(&data.username)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(password)
    .fetch_optional(pool)
    .await
    .map_err(|e| QueryError::from(e))?;

    match result {
        Some((id,)) => Ok(id),
        None => Err(Error::conflict("A user with this email or username already exists")),
    }
}

/// Resolves credentials by email and returns a signed session token.
pub async fn login_user(email: &str, password: &str, pool: &Pool<Postgres>) -> Result<String, Error> {
    let user = match get_user_by_email(pool, email).await? {
        Some(user) => user,
        None => return Err(Error::validation("Invalid credentials")),
    };

    let authenticated = verify_password(password, &user.password).unwrap_or(false);
    if !authenticated {
        log::warn!("failed login attempt for user {}", user.id);
        return Err(Error::validation("Invalid credentials"));
    }

    Ok(generate_jwt_session(&user))
}

pub async fn set_password(
    user_id: Uuid,
    new_password: &str,
    pool: &Pool<Postgres>,
) -> Result<(), Error> {
    if new_password.is_empty() {
        return Err(Error::validation("Password must not be empty"));
    }

    let password = hash_password(new_password)
        .map_err(|_e| Error::Internal(String::from("Failed to hash password")))?;

    let result = sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
        .bind(password)
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(|e| QueryError::from(e))?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("No user exists with specified id"));
    }

    Ok(())
}

/// Public profile with follow state; anonymous viewers never see a
/// subscription.
pub async fn get_profile(
    viewer: Option<Uuid>,
    user_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<Profile, Error> {
    let user = get_user_by_id(pool, user_id)
        .await?
        .ok_or_else(|| Error::not_found("No user exists with specified id"))?;

    let subscribed = is_subscribed(viewer, user_id, pool).await?;

    Ok(Profile::from_user(&user, subscribed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str, password: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            username: username.to_string(),
            first_name: String::from("Ann"),
            last_name: String::from("Lee"),
            password: password.to_string(),
        }
    }

    #[test]
    fn registration_rejects_reserved_username() {
        let err = validate_registration(&new_user("me", "me@example.com", "pw")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn registration_rejects_blank_fields() {
        assert!(validate_registration(&new_user("ann", " ", "pw")).is_err());
        assert!(validate_registration(&new_user("  ", "a@b.c", "pw")).is_err());
        assert!(validate_registration(&new_user("ann", "a@b.c", "")).is_err());
        assert!(validate_registration(&new_user("ann", "a@b.c", "pw")).is_ok());
    }
}
