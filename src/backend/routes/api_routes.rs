/**
 * API Routes
 *
 * # Routes
 *
 * ## Identity
 * - `POST /api/auth/signup`, `POST /api/auth/login`, `POST /api/auth/logout`
 * - `GET /api/auth/me`, `PUT /api/profile`
 * - `POST /api/auth/password/forgot`, `POST /api/auth/password/reset`,
 *   `PUT /api/auth/password`
 * - `DELETE /api/account`
 *
 * ## Directory
 * - `GET /api/addresses/search?q=`
 * - `GET /api/directory?q=`
 * - `GET|POST /api/mailboxes`, `GET|DELETE /api/mailboxes/{id}`
 * - `POST /api/mailboxes/{id}/visibility`, `POST /api/mailboxes/{id}/red-list`,
 *   `PUT /api/mailboxes/{id}/presence`
 *
 * ## Intercom
 * - `POST /api/mailboxes/{id}/rings`, `POST /api/mailboxes/{id}/requests`
 * - `POST /api/requests/{id}/respond`
 * - `GET /api/requests/received`, `GET /api/requests/sent`
 * - `GET /api/rings`, `PATCH /api/rings/{id}/read`, `DELETE /api/rings/{id}`
 * - `GET /api/dashboard/counts`
 *
 * ## Messaging
 * - `GET|POST /api/contacts`, `PATCH|DELETE /api/contacts/{id}`
 * - `GET|POST /api/messages/{contact_user_id}`
 *
 * Authentication is enforced by the handlers' extractors (`AuthUser`,
 * `MaybeAuthUser`).
 */

use axum::routing::{delete, get, patch, post, put};
use axum::Router;

use crate::backend::auth::{
    change_password, delete_account, forgot_password, get_me, login, logout, reset_password, signup,
    update_profile,
};
use crate::backend::directory::{
    create_mailbox, delete_mailbox, get_public_mailbox, list_my_mailboxes, search_directory, set_presence,
    toggle_red_list, toggle_visibility,
};
use crate::backend::geocode::search_addresses;
use crate::backend::intercom::{
    dashboard_counts, delete_ring, list_received_requests, list_rings, list_sent_requests, mark_ring_read,
    request_contact, respond_to_request, ring_mailbox,
};
use crate::backend::messaging::{add_contact, delete_contact, get_messages, list_contacts, send_message, update_contact};
use crate::backend::server::state::AppState;

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Identity
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(get_me))
        .route("/api/auth/password", put(change_password))
        .route("/api/auth/password/forgot", post(forgot_password))
        .route("/api/auth/password/reset", post(reset_password))
        .route("/api/profile", put(update_profile))
        .route("/api/account", delete(delete_account))
        // Directory
        .route("/api/addresses/search", get(search_addresses))
        .route("/api/directory", get(search_directory))
        .route("/api/mailboxes", get(list_my_mailboxes).post(create_mailbox))
        .route("/api/mailboxes/{id}", get(get_public_mailbox).delete(delete_mailbox))
        .route("/api/mailboxes/{id}/visibility", post(toggle_visibility))
        .route("/api/mailboxes/{id}/red-list", post(toggle_red_list))
        .route("/api/mailboxes/{id}/presence", put(set_presence))
        // Intercom
        .route("/api/mailboxes/{id}/rings", post(ring_mailbox))
        .route("/api/mailboxes/{id}/requests", post(request_contact))
        .route("/api/requests/received", get(list_received_requests))
        .route("/api/requests/sent", get(list_sent_requests))
        .route("/api/requests/{id}/respond", post(respond_to_request))
        .route("/api/rings", get(list_rings))
        .route("/api/rings/{id}", delete(delete_ring))
        .route("/api/rings/{id}/read", patch(mark_ring_read))
        .route("/api/dashboard/counts", get(dashboard_counts))
        // Messaging
        .route("/api/contacts", get(list_contacts).post(add_contact))
        .route("/api/contacts/{id}", patch(update_contact).delete(delete_contact))
        .route("/api/messages/{contact_user_id}", get(get_messages).post(send_message))
}
