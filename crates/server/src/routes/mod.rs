pub mod blobs;
pub mod items;
pub mod system;

use actix_web::web;

/// Register all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(system::health)
        .service(items::create_item)
        .service(items::list_items)
        .service(items::find_matches)
        .service(items::approve_item)
        .service(items::resolve_item)
        .service(items::get_item)
        .service(blobs::read_blob);
}
