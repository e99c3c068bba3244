//! End-to-end flows against an on-disk store, the way the UI shell uses
//! the data layer: log in, act, re-load, observe.

use chrono::{NaiveDate, NaiveTime, Utc};
use tempfile::tempdir;

use silverhome_shared::types::{
    RequestCategory, RequestStatus, RequestUrgency, ReservationStatus, Role,
};
use silverhome_store::query;
use silverhome_store::{NewRequest, NewReservation, Store};

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn login_request_and_resolve_flow() {
    init_logging();
    let dir = tempdir().unwrap();
    let store = Store::open_at(dir.path()).unwrap();

    // seed login scenario
    let resident = store.login("resident", "1234").unwrap().expect("seed login");
    assert_eq!(resident.role, Role::Resident);
    assert_eq!(store.current_user().unwrap().id, resident.id);

    // raise a request and walk it through its lifecycle
    let request = store
        .create_request(NewRequest {
            requester_id: resident.id.clone(),
            requester_name: resident.name.clone(),
            category: RequestCategory::Repair,
            title: "Leaking faucet".to_string(),
            description: "Bathroom faucet drips overnight".to_string(),
            location: "Room 203".to_string(),
            preferred_date: None,
            urgency: RequestUrgency::Urgent,
        })
        .unwrap();

    let admin = store.login("admin", "1234").unwrap().expect("admin login");
    store.start_request(&request.id, &admin.id).unwrap();
    store.complete_request(&request.id, &admin.id).unwrap();

    let doc = store.load();
    assert_eq!(
        query::count_with_status(&doc.requests, RequestStatus::Completed),
        1
    );
    assert_eq!(query::for_user(&doc.requests, &resident.id).len(), 1);

    // a second store over the same directory sees the same document
    let reopened = Store::open_at(dir.path()).unwrap();
    assert_eq!(reopened.load(), doc);

    store.logout().unwrap();
    assert!(store.current_user().is_none());
}

#[test]
fn reservation_overlap_scenario() {
    init_logging();
    let dir = tempdir().unwrap();
    let store = Store::open_at(dir.path()).unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

    let slot = |start: NaiveTime, end: NaiveTime| NewReservation {
        facility_id: "facility-lounge".to_string(),
        requester_id: "user-resident".to_string(),
        requester_name: "Kim Young-soo".to_string(),
        date,
        start_time: start,
        end_time: end,
        purpose: "Birthday gathering".to_string(),
        attendees: 8,
    };

    let first = store.create_reservation(slot(time(9, 0), time(10, 0))).unwrap();
    assert_eq!(first.status, ReservationStatus::Pending);

    assert!(store.create_reservation(slot(time(9, 30), time(10, 30))).is_err());
    store.create_reservation(slot(time(10, 0), time(11, 0))).unwrap();

    // the invariant holds across the persisted document
    let doc = store.load();
    let blocking: Vec<_> = doc
        .reservations
        .iter()
        .filter(|r| r.status.blocks_slot())
        .collect();
    for (i, a) in blocking.iter().enumerate() {
        for b in &blocking[i + 1..] {
            if a.facility_id == b.facility_id && a.date == b.date {
                assert!(!a.overlaps(b.start_time, b.end_time));
            }
        }
    }
}

#[test]
fn chat_summary_stays_consistent_across_reloads() {
    init_logging();
    let dir = tempdir().unwrap();
    let store = Store::open_at(dir.path()).unwrap();

    let room = store
        .create_chat_room(
            "Family of room 203",
            &["user-resident".to_string(), "user-family".to_string()],
        )
        .unwrap();

    for i in 1..=4 {
        store
            .post_chat_message(&room.id, "user-family", "Kim Min-ji", &format!("note {i}"))
            .unwrap();
    }

    let doc = store.load();
    let room = doc.chat_rooms.iter().find(|r| r.id == room.id).unwrap();
    let messages = query::messages_for_room(&doc.chat_messages, &room.id);
    assert_eq!(messages.len(), 4);
    assert_eq!(room.last_message.as_deref(), Some("note 4"));
    assert_eq!(room.last_message_time, Some(messages.last().unwrap().timestamp));
}

#[test]
fn dashboard_queries_over_a_grown_document() {
    init_logging();
    let dir = tempdir().unwrap();
    let store = Store::open_at(dir.path()).unwrap();

    store
        .raise_emergency_call("user-resident", "Kim Young-soo", Some("Room 203"), None)
        .unwrap();
    let doc = store.load();
    assert_eq!(query::unresolved_calls(&doc.emergency_calls).len(), 1);

    let today = Utc::now().date_naive();
    // the seed plants one schedule tomorrow
    assert!(!query::upcoming_schedules(&doc.schedules, today).is_empty());

    let display = query::notices_for_display(&doc.notices);
    assert!(display.first().unwrap().pinned);
}
