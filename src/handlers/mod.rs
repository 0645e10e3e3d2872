pub mod orders;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/zones", web::get().to(orders::list_zones))
        .route("/api-docs/openapi.json", web::get().to(orders::openapi_json))
        .service(
            web::scope("/orders")
                .route("", web::post().to(orders::place_order))
                .route("", web::get().to(orders::list_orders))
                .route("/{id}", web::get().to(orders::get_order))
                .route("/{id}/status", web::post().to(orders::update_status))
                .route("/{id}/position", web::get().to(orders::order_position)),
        );
}
