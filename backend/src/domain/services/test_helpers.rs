//! Shared fixtures for service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::json;

use crate::domain::forms::{Field, Form, FormDefinition, FormId, TitleAlignment, TitleColor};
use crate::domain::{Caller, ClientId, Role, User, UserId};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn user(company: &str, role: Role, client_id: Option<ClientId>) -> User {
    User {
        id: UserId::random(),
        username: "inspector".into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: "ada@example.com".into(),
        job_title: None,
        companyname: company.into(),
        mobile: None,
        client_id,
        role,
        active: true,
        created_at: fixture_timestamp(),
    }
}

pub(crate) fn caller(company: &str, role: Role, client_id: Option<ClientId>) -> Caller {
    Caller::from(&user(company, role, client_id))
}

pub(crate) fn fields() -> Vec<Field> {
    serde_json::from_value(json!([
        {"id": "f1", "type": "text", "label": "Name", "required": true},
        {"id": "f2", "type": "checkbox", "label": "Hazards", "options": [
            {"id": "o1", "label": "Fire", "value": "a"},
            {"id": "o2", "label": "Flood", "value": "b"}
        ]}
    ]))
    .expect("valid fixture fields")
}

pub(crate) fn form(created_by: &UserId) -> Form {
    Form {
        id: FormId::random(),
        definition: FormDefinition::new(
            Some("Site audit"),
            TitleColor::default(),
            TitleAlignment::Left,
            fields(),
        )
        .expect("valid fixture definition"),
        created_by: created_by.clone(),
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}
