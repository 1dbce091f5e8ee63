use crate::{
    api::attendance,
    auth::{handlers, middleware::auth_middleware},
    error::AppError,
};
use actix_web::{error::JsonPayloadError, middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str) {
    // Bad or incomplete JSON bodies become validation errors.
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::validation(&rejected_field(&err), err.to_string()).into()
    }));

    cfg.service(
        web::scope(api_prefix)
            // Public routes
            .service(web::resource("/register").route(web::post().to(handlers::register)))
            .service(web::resource("/login").route(web::post().to(handlers::login)))
            // Protected routes
            .service(
                web::resource("/check-in")
                    .wrap(from_fn(auth_middleware))
                    .route(web::post().to(attendance::check_in)),
            )
            .service(
                web::resource("/check-out")
                    .wrap(from_fn(auth_middleware))
                    .route(web::post().to(attendance::check_out)),
            )
            .service(
                web::resource("/today-status")
                    .wrap(from_fn(auth_middleware))
                    .route(web::get().to(attendance::today_status)),
            )
            .service(
                web::resource("/attendances")
                    .wrap(from_fn(auth_middleware))
                    .route(web::get().to(attendance::attendances)),
            ),
    );
}

// REGISTER / LOGIN
//  └─ token (24h, HS256)

// API REQUEST
//  └─ Authorization: Bearer token

/// Names the missing field when serde reports one, otherwise blames the whole body.
fn rejected_field(err: &JsonPayloadError) -> String {
    if let JsonPayloadError::Deserialize(e) = err {
        let message = e.to_string();
        if let Some((name, _)) = message
            .strip_prefix("missing field `")
            .and_then(|rest| rest.split_once('`'))
        {
            return name.to_string();
        }
    }
    "body".to_string()
}
