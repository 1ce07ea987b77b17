//! Builders for the HTTP state from configured adapters.

use std::io;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};
use url::Url;

use safety_backend::AppSettings;
use safety_backend::domain::AccessPolicy;
use safety_backend::domain::ids::RandomIdGenerator;
use safety_backend::domain::ports::{FileStore, MailTransport};
use safety_backend::inbound::http::state::{HttpState, StateAdapters};
use safety_backend::outbound::mail::{HttpMailRelay, LoggingMailTransport, MailRelayIdentity};
use safety_backend::outbound::memory::{
    MemoryClientRepository, MemoryDraftStore, MemoryFormRepository, MemoryResponseRepository,
    MemoryUserRepository,
};
use safety_backend::outbound::password::BcryptPasswordHasher;
use safety_backend::outbound::persistence::{
    DieselClientRepository, DieselDraftStore, DieselFormRepository, DieselResponseRepository,
    DieselUserRepository,
};
use safety_backend::outbound::uploads::CapFileStore;

use super::ServerConfig;

const MAILER_USER_AGENT: &str = concat!("safety-backend/", env!("CARGO_PKG_VERSION"));

/// Mail relay when a URL is configured, otherwise a transport that only logs.
fn build_mail_transport(settings: &AppSettings) -> io::Result<Arc<dyn MailTransport>> {
    let Some(raw) = settings.mail_relay_url() else {
        warn!("no mail relay configured; outgoing email is only logged");
        return Ok(Arc::new(LoggingMailTransport));
    };
    let endpoint = Url::parse(raw).map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid mail relay url {raw}: {err}"),
        )
    })?;
    let relay = HttpMailRelay::new(
        endpoint,
        settings.mail_timeout(),
        MailRelayIdentity {
            from: settings.mail_from().to_owned(),
            user_agent: MAILER_USER_AGENT.to_owned(),
        },
    )
    .map_err(|err| io::Error::other(format!("build mail relay client: {err}")))?;
    info!(relay = %raw, "mail relay configured");
    Ok(Arc::new(relay))
}

/// Build the HTTP state, using the Diesel repositories when a pool is
/// configured and the in-memory ones otherwise.
///
/// # Errors
///
/// Returns an I/O error when the uploads directory cannot be opened or the
/// mail relay configuration is invalid.
pub(super) fn build_http_state(config: &ServerConfig) -> io::Result<HttpState> {
    let settings = &config.settings;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let uploads_dir = settings.uploads_dir();
    let files: Arc<dyn FileStore> =
        Arc::new(CapFileStore::open(&uploads_dir, clock.clone()).map_err(|err| {
            io::Error::new(
                err.kind(),
                format!("open uploads directory {}: {err}", uploads_dir.display()),
            )
        })?);
    let mail = build_mail_transport(settings)?;
    let policy = AccessPolicy::new(settings.operator_org());

    let state = match &config.db_pool {
        Some(pool) => HttpState::from_adapters(StateAdapters {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            clients: Arc::new(DieselClientRepository::new(pool.clone())),
            forms: Arc::new(DieselFormRepository::new(pool.clone())),
            responses: Arc::new(DieselResponseRepository::new(pool.clone())),
            drafts: Arc::new(DieselDraftStore::new(pool.clone())),
            hasher: Arc::new(BcryptPasswordHasher::default()),
            files,
            mail,
            ids: Arc::new(RandomIdGenerator),
            policy,
            clock,
        }),
        None => {
            warn!("no database configured; using in-memory stores");
            HttpState::from_adapters(StateAdapters {
                users: Arc::new(MemoryUserRepository::new()),
                clients: Arc::new(MemoryClientRepository::new()),
                forms: Arc::new(MemoryFormRepository::new()),
                responses: Arc::new(MemoryResponseRepository::new()),
                drafts: Arc::new(MemoryDraftStore::new()),
                hasher: Arc::new(BcryptPasswordHasher::default()),
                files,
                mail,
                ids: Arc::new(RandomIdGenerator),
                policy,
                clock,
            })
        }
    };
    Ok(state)
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use actix_web::cookie::{Key, SameSite};
    use env_lock::lock_env;
    use ortho_config::OrthoConfig;
    use rstest::rstest;
    use safety_backend::domain::{Registration, RegistrationInput, Role};
    use safety_backend::inbound::http::session_config::SessionSettings;
    use tempfile::TempDir;

    use super::*;

    fn settings(uploads: &TempDir, relay: Option<&str>) -> AppSettings {
        let _guard = lock_env([
            (
                "SAFETY_UPLOADS_DIR",
                Some(uploads.path().display().to_string()),
            ),
            ("SAFETY_MAIL_RELAY_URL", relay.map(str::to_owned)),
            ("SAFETY_DATABASE_URL", None),
        ]);
        AppSettings::load_from_iter([OsString::from("safety-backend")]).expect("settings")
    }

    fn config(settings: AppSettings) -> ServerConfig {
        ServerConfig::new(
            SessionSettings {
                key: Key::generate(),
                cookie_secure: false,
                same_site: SameSite::Lax,
            },
            settings,
        )
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_pool_selects_memory_stores() {
        let uploads = TempDir::new().expect("uploads dir");
        let state = build_http_state(&config(settings(&uploads, None))).expect("state");

        let input = RegistrationInput {
            username: "ada",
            first_name: "Ada",
            last_name: "Lovelace",
            email: "ada@example.com",
            job_title: None,
            companyname: Some("Acme"),
            mobile: None,
            password: "secret-pass",
            password_confirm: "secret-pass",
        };
        let user = state
            .login
            .register(Registration::validate(&input).expect("valid registration"))
            .await
            .expect("registered");
        assert_eq!(user.role, Role::User);
    }

    #[rstest]
    fn invalid_relay_urls_are_rejected() {
        let uploads = TempDir::new().expect("uploads dir");
        let result = build_http_state(&config(settings(&uploads, Some("not a url"))));
        assert!(matches!(result, Err(err) if err.kind() == io::ErrorKind::InvalidInput));
    }
}
