//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod clients;
pub mod drafts;
pub mod error;
pub mod forms;
pub mod health;
pub mod responses;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod uploads;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api/v1` resource on `cfg`.
///
/// The fixed `/forms/draft` and `/forms/responses` paths go first so
/// `/forms/{id}` does not capture them.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::signup)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::me)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::set_user_status)
        .service(users::delete_user)
        .service(clients::list_clients)
        .service(clients::create_client)
        .service(clients::get_client)
        .service(clients::update_client)
        .service(clients::delete_client)
        .service(clients::client_users)
        .service(drafts::load_draft)
        .service(drafts::replace_draft)
        .service(drafts::apply_commands)
        .service(drafts::save_draft)
        .service(drafts::clear_draft)
        .service(responses::list_responses)
        .service(responses::get_response)
        .service(responses::update_response)
        .service(responses::delete_response)
        .service(responses::response_report)
        .service(responses::email_response)
        .service(responses::submit_response)
        .service(forms::save_form)
        .service(forms::list_forms)
        .service(forms::get_form)
        .service(forms::update_form)
        .service(forms::delete_form)
        .service(forms::render_form)
        .service(uploads::upload);
}
