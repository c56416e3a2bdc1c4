//! Gamification HTTP handlers.
//!
//! ```text
//! GET /api/v1/gamification/config
//! GET /api/v1/gamification/stats
//! ```

use actix_web::{HttpResponse, get, web};

use crate::domain::leveling::{GamificationConfig, LevelStats};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Action point table, level curve and titles.
#[utoipa::path(
    get,
    path = "/api/v1/gamification/config",
    responses(
        (
            status = 200,
            description = "Gamification configuration",
            headers(("Cache-Control" = String, description = "Cache control header")),
            body = GamificationConfig
        )
    ),
    tags = ["gamification"],
    security([]),
    operation_id = "getGamificationConfig"
)]
#[get("/gamification/config")]
pub async fn get_config(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(("Cache-Control", "public, max-age=3600"))
        .json(state.gamification.config())
}

/// Level, title and progress for the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/gamification/stats",
    responses(
        (status = 200, description = "Level stats", body = LevelStats),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["gamification"],
    operation_id = "getGamificationStats"
)]
#[get("/gamification/stats")]
pub async fn get_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let stats = state.gamification.stats_for(&user_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "private, no-cache"))
        .json(stats))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::{FixturePurchaseCommand, FixturePurchaseQuery, MockGamificationQuery};
    use crate::domain::{Error, UserId};
    use crate::inbound::http::test_utils::{session_app, session_cookie};

    const USER: &str = "22222222-2222-4222-8222-222222222222";

    async fn call(
        gamification: MockGamificationQuery,
        uri: &str,
        signed_in: bool,
    ) -> (StatusCode, Value) {
        let state = HttpState::new(
            Arc::new(FixturePurchaseCommand),
            Arc::new(FixturePurchaseQuery),
            Arc::new(gamification),
        );
        let app = actix_test::init_service(
            session_app()
                .app_data(web::Data::new(state))
                .service(web::scope("/api/v1").service(get_config).service(get_stats)),
        )
        .await;
        let mut request = actix_test::TestRequest::get().uri(uri);
        if signed_in {
            request = request.cookie(session_cookie(&app, USER).await);
        }
        let res = actix_test::call_service(&app, request.to_request()).await;
        let status = res.status();
        let body = actix_test::read_body_json(res).await;
        (status, body)
    }

    #[rstest]
    #[actix_web::test]
    async fn config_is_public() {
        let mut gamification = MockGamificationQuery::new();
        gamification
            .expect_config()
            .times(1)
            .returning(GamificationConfig::current);

        let (status, body) = call(gamification, "/api/v1/gamification/config", false).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["actionPoints"]["BUY_PROJECT"], 50);
        assert_eq!(body["levelConfig"]["maxLevel"], 100);
        assert_eq!(body["levelTitles"]["100"], "Legend");
    }

    #[rstest]
    #[actix_web::test]
    async fn stats_are_derived_for_the_signed_in_user() {
        let mut gamification = MockGamificationQuery::new();
        gamification
            .expect_stats_for()
            .with(eq(UserId::new(USER).expect("valid user id")))
            .times(1)
            .returning(|_| Ok(LevelStats::from_total_exp(450)));

        let (status, body) = call(gamification, "/api/v1/gamification/stats", true).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalExp"], 450);
        assert_eq!(body["level"], 3);
        assert_eq!(body["levelTitle"], "Pemula");
    }

    #[rstest]
    #[actix_web::test]
    async fn stats_require_a_session() {
        let mut gamification = MockGamificationQuery::new();
        gamification.expect_stats_for().never();

        let (status, body) = call(gamification, "/api/v1/gamification/stats", false).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unauthorized");
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_users_are_not_found() {
        let mut gamification = MockGamificationQuery::new();
        gamification
            .expect_stats_for()
            .returning(|_| Err(Error::not_found("user not found")));

        let (status, _) = call(gamification, "/api/v1/gamification/stats", true).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
