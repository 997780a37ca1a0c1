use actix_web::web;

pub mod auth;
pub mod health;

/// Register every route. `main.rs` adds the middleware stack around this;
/// tests call it directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // GET /health
    cfg.configure(health::configure_routes);

    // POST /auth/{register,login,getUsers,findusers}
    cfg.service(web::scope("/auth").configure(auth::configure_routes));
}
