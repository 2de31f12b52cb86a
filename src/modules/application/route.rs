use actix_web::web;

use crate::modules::application::handle::{
    delete_application, list_applications, method_not_allowed, post_application,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/applications")
            .route(web::get().to(list_applications))
            .route(web::post().to(post_application))
            .route(web::delete().to(delete_application))
            .default_service(web::to(method_not_allowed)),
    );
}
