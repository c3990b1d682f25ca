use warp::{reject::Rejection, Filter};

use crate::database::error::Error;

use super::jwt::{verify_jwt_session, JwtSessionData};

pub fn with_auth() -> impl Filter<Extract = ((),), Error = Rejection> + Copy {
    warp::cookie::<String>("session").and_then(|session: String| async move {
        match verify_jwt_session(session) {
            Ok(_) => Ok(()),
            Err(e) => Err(warp::reject::custom(e)),
        }
    })
}

pub fn with_session() -> impl Filter<Extract = (JwtSessionData,), Error = Rejection> + Copy {
    warp::cookie::<String>("session").and_then(|session: String| async move {
        verify_jwt_session(session).map_err(|e: Error| warp::reject::custom(e))
    })
}

/// Anonymous access stays allowed: a missing or invalid cookie resolves to
/// no session rather than a rejection.
pub fn with_possible_session(
) -> impl Filter<Extract = (Option<JwtSessionData>,), Error = Rejection> + Copy {
    warp::cookie::optional::<String>("session").and_then(|session: Option<String>| async move {
        Ok::<_, Rejection>(session.and_then(|session| verify_jwt_session(session).ok()))
    })
}
