use actix_web::web;

use crate::api::{error, success};
use crate::modules::analytics::{model::AnalyticsSummary, service::AnalyticsService};
use crate::utils::ValidatedJson;

pub async fn get_analytics(
    service: web::Data<AnalyticsService>,
) -> Result<success::Success<AnalyticsSummary>, error::Error> {
    let summary = service.summary().await?;
    Ok(success::Success::ok(Some(summary)))
}

pub async fn track_event(
    service: web::Data<AnalyticsService>,
    event: ValidatedJson<crate::modules::analytics::model::AnalyticsEvent>,
) -> Result<success::Success<()>, error::Error> {
    service.record(event.0).await?;
    Ok(success::Success::ok(None).message("Analytics updated"))
}

#[cfg(test)]
mod tests {
    use crate::state::AppState;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_track_and_read_counters() {
        let state = AppState::in_memory();
        let app =
            test::init_service(App::new().configure(move |cfg| state.configure(cfg, 1024 * 1024)))
                .await;

        for body in [
            json!({ "type": "page_view" }),
            json!({ "type": "page_view" }),
            json!({ "type": "social_click", "platform": "facebook" }),
        ] {
            let req = test::TestRequest::post().uri("/api/analytics").set_json(body).to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["success"], true);
            assert_eq!(body["message"], "Analytics updated");
        }

        let req = test::TestRequest::get().uri("/api/analytics").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["pageViews"][0]["views"], 2);
        assert_eq!(body["data"]["socialAnalytics"][0]["platform"], "facebook");
        assert_eq!(body["data"]["socialAnalytics"][0]["clicks"], 1);
        assert!(body["data"]["applicationStats"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_invalid_event_is_bad_request() {
        let state = AppState::in_memory();
        let app =
            test::init_service(App::new().configure(move |cfg| state.configure(cfg, 1024 * 1024)))
                .await;

        let req = test::TestRequest::post()
            .uri("/api/analytics")
            .set_json(json!({ "kind": "page_view" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);

        let req = test::TestRequest::delete().uri("/api/analytics").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
