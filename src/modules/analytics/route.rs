use actix_web::web;

use crate::modules::analytics::handle::{get_analytics, track_event};
use crate::modules::application::handle::method_not_allowed;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/analytics")
            .route(web::get().to(get_analytics))
            .route(web::post().to(track_event))
            .default_service(web::to(method_not_allowed)),
    );
}
