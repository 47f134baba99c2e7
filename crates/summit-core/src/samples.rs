//! Deterministic sample data — the terminal fallback for event resolution.
//!
//! When both the internal proxy and the direct upstream call fail, the
//! resolver serves these records so the portal always has something
//! renderable. Lookup is a linear scan over a small fixed set and always
//! yields the same record for the same id.

use crate::event::{Event, EventId, Organization};

/// The full sample data set, in a fixed order. Index 0 is the degraded
/// default served when no record matches the requested id.
pub fn sample_events() -> Vec<Event> {
    vec![
        Event {
            id: EventId::from(162),
            name: "EAST AFRICA TECH SUMMIT 2025".to_string(),
            description: Some(
                "Three days of keynotes, exhibitions and investor roundtables \
                 connecting the East African technology ecosystem."
                    .to_string(),
            ),
            city: "Nairobi".to_string(),
            venue: "Kenyatta International Convention Centre".to_string(),
            start_date: "2025-09-10T08:00:00Z".to_string(),
            end_date: "2025-09-12T17:00:00Z".to_string(),
            banner_image: Some("east-africa-tech-summit-2025.jpg".to_string()),
            banner_thumbnail: Some("east-africa-tech-summit-2025_thumb.jpg".to_string()),
            theme_color: "#0b5394".to_string(),
            latitude: -1.2895,
            longitude: 36.8219,
            is_private: false,
            signature_required: false,
            access_code: None,
            organization: Organization {
                id: 8,
                name: "East Africa Tech Alliance".to_string(),
                address: Some("Harambee Avenue, Nairobi".to_string()),
                phone: Some("+254 20 555 0134".to_string()),
                logo: None,
            },
        },
        Event {
            id: EventId::from(177),
            name: "INNOVATION WEEK TANZANIA 2025".to_string(),
            description: Some(
                "Tanzania's flagship innovation gathering: startup showcases, \
                 policy forums and hands-on workshops across five days."
                    .to_string(),
            ),
            city: "Dar es Salaam".to_string(),
            venue: "Julius Nyerere International Convention Centre".to_string(),
            start_date: "2025-11-17T08:30:00Z".to_string(),
            end_date: "2025-11-21T18:00:00Z".to_string(),
            banner_image: Some("innovation-week-tz-2025.jpg".to_string()),
            banner_thumbnail: Some("innovation-week-tz-2025_thumb.jpg".to_string()),
            theme_color: "#00a859".to_string(),
            latitude: -6.8122,
            longitude: 39.2882,
            is_private: false,
            signature_required: true,
            access_code: None,
            organization: Organization {
                id: 12,
                name: "Tanzania Innovation Alliance".to_string(),
                address: Some("Samora Avenue, Dar es Salaam".to_string()),
                phone: Some("+255 22 555 0188".to_string()),
                logo: Some("tia-logo.png".to_string()),
            },
        },
        Event {
            id: EventId::from(201),
            name: "KILIMANJARO STARTUP FORUM 2026".to_string(),
            description: None,
            city: "Arusha".to_string(),
            venue: "Arusha International Conference Centre".to_string(),
            start_date: "2026-02-05T09:00:00Z".to_string(),
            end_date: "2026-02-06T16:30:00Z".to_string(),
            banner_image: Some("kilimanjaro-startup-forum.jpg".to_string()),
            banner_thumbnail: None,
            theme_color: "#b45309".to_string(),
            latitude: -3.3689,
            longitude: 36.6972,
            is_private: true,
            signature_required: false,
            access_code: Some("KSF26".to_string()),
            organization: Organization {
                id: 19,
                name: "Northern Circuit Founders Network".to_string(),
                address: None,
                phone: None,
                logo: None,
            },
        },
    ]
}

/// Look up a sample record by normalized id.
pub fn sample_event(id: &EventId) -> Option<Event> {
    sample_events().into_iter().find(|e| e.id.matches(id))
}

/// The record served when nothing matches: first entry of the set.
pub fn default_sample_event() -> Event {
    sample_events()
        .into_iter()
        .next()
        .expect("sample data set is non-empty")
}
