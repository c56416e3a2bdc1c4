//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};

use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;

pub(crate) const SIGN_IN_PATH: &str = "/test/sign-in";

/// Session middleware with a fresh key, cookie name `session` and the
/// `Secure` flag off for plain-HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

async fn sign_in(session: SessionContext, id: web::Path<String>) -> Result<HttpResponse, Error> {
    let user_id = UserId::new(id.as_str())
        .map_err(|_| Error::invalid_request("user id must be a UUID"))?;
    session.sign_in(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// App with cookie sessions and a `GET /test/sign-in/{id}` helper route.
pub fn session_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(test_session_middleware())
        .route(&format!("{SIGN_IN_PATH}/{{id}}"), web::get().to(sign_in))
}

/// Sign `user_id` in through the helper route and return the session cookie.
pub async fn session_cookie<S, B>(app: &S, user_id: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("{SIGN_IN_PATH}/{user_id}"))
            .to_request(),
    )
    .await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
