use std::{future::Future, pin::Pin};

use tide::{Next, Request};

use super::{Caller, ErrorResponse, State};
use crate::users::UserService;

/// Resolves `Authorization: Bearer <token>` against the user store and
/// attaches the caller id to the request. Requests without the header pass
/// through anonymously; a header with an unknown token is rejected here.
pub fn identity_middleware<'a>(
    mut request: Request<State>,
    next: Next<'a, State>,
) -> Pin<Box<dyn Future<Output = tide::Result> + Send + 'a>> {
    Box::pin(async move {
        let header = request
            .header("Authorization")
            .and_then(|values| values.get(0))
            .map(|value| value.as_str().trim().to_string());

        if let Some(raw) = header {
            let token = raw.strip_prefix("Bearer ").unwrap_or(raw.as_str()).trim();
            let users = request.state().users.clone();
            match users.find_by_token(token).await {
                Ok(Some(user)) => {
                    request.set_ext(Caller(user.id));
                }
                Ok(None) => return Ok(super::unauthorized()),
                Err(err) => return Ok(err.response()),
            }
        }

        Ok(next.run(request).await)
    })
}
