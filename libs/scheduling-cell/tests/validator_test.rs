use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};

use scheduling_cell::models::{AssignmentProposal, EntityKind, SchedulingError};
use scheduling_cell::services::{EntityStore, SchedulingValidator};
use shared_models::entities::{
    Appointment, AppointmentStatus, AppointmentType, Client, StaffAssignment, StaffRole, StaffUser,
};

const CLIENT: i64 = 1;
const STAFF: i64 = 10;
const OTHER_STAFF: i64 = 11;

#[derive(Default)]
struct InMemoryStore {
    clients: HashMap<i64, Client>,
    staff: HashMap<i64, StaffUser>,
    appointments: HashMap<i64, Appointment>,
    assignments: Mutex<Vec<StaffAssignment>>,
}

impl InMemoryStore {
    fn seeded() -> Self {
        let mut store = InMemoryStore::default();
        store.clients.insert(CLIENT, client(CLIENT));
        store.clients.insert(2, client(2));
        store.staff.insert(STAFF, staff(STAFF, StaffRole::Provider));
        store.staff.insert(OTHER_STAFF, staff(OTHER_STAFF, StaffRole::Peer));
        store
    }

    fn save(&self, id: i64, proposal: &AssignmentProposal) {
        let mut rows = self.assignments.lock().unwrap();
        rows.retain(|a| a.id != id);
        rows.push(StaffAssignment {
            id,
            client_id: proposal.client_id,
            staff_user_id: proposal.staff_user_id,
            role: proposal.role,
            is_primary: false,
            start_date: proposal.start_date,
            end_date: proposal.end_date,
            notes: None,
        });
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn get_client(&self, client_id: i64) -> Result<Option<Client>> {
        Ok(self.clients.get(&client_id).cloned())
    }

    async fn get_staff_user(&self, staff_user_id: i64) -> Result<Option<StaffUser>> {
        Ok(self.staff.get(&staff_user_id).cloned())
    }

    async fn list_assignments_for(&self, client_id: i64, staff_user_id: i64) -> Result<Vec<StaffAssignment>> {
        let rows = self.assignments.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|a| a.client_id == client_id && a.staff_user_id == staff_user_id)
            .cloned()
            .collect())
    }

    async fn get_appointment(&self, appointment_id: i64) -> Result<Option<Appointment>> {
        Ok(self.appointments.get(&appointment_id).cloned())
    }
}

/// Store whose every call fails, to check errors come back untouched.
struct BrokenStore;

#[async_trait]
impl EntityStore for BrokenStore {
    async fn get_client(&self, _: i64) -> Result<Option<Client>> {
        Err(anyhow::anyhow!("connection refused"))
    }
    async fn get_staff_user(&self, _: i64) -> Result<Option<StaffUser>> {
        Err(anyhow::anyhow!("connection refused"))
    }
    async fn list_assignments_for(&self, _: i64, _: i64) -> Result<Vec<StaffAssignment>> {
        Err(anyhow::anyhow!("connection refused"))
    }
    async fn get_appointment(&self, _: i64) -> Result<Option<Appointment>> {
        Err(anyhow::anyhow!("connection refused"))
    }
}

fn client(id: i64) -> Client {
    Client {
        id,
        first_name: "Dana".to_string(),
        last_name: format!("Client{}", id),
        date_of_birth: None,
        email: None,
        phone: None,
        address: None,
        emergency_contact_name: None,
        emergency_contact_phone: None,
        created_at: Utc::now(),
    }
}

fn staff(id: i64, role: StaffRole) -> StaffUser {
    StaffUser {
        id,
        email: format!("staff{}@example.com", id),
        full_name: "Staff Member".to_string(),
        role,
        is_active: true,
    }
}

fn appointment(id: i64, client_id: i64, provider_id: i64, status: AppointmentStatus) -> Appointment {
    Appointment {
        id,
        client_id,
        provider_id,
        start_time: Utc.with_ymd_and_hms(2025, 3, 4, 10, 0, 0).unwrap(),
        end_time: Utc.with_ymd_and_hms(2025, 3, 4, 11, 0, 0).unwrap(),
        appointment_type: AppointmentType::Individual,
        status,
        location: None,
    }
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn proposal(start: &str, end: &str) -> AssignmentProposal {
    AssignmentProposal {
        client_id: CLIENT,
        staff_user_id: STAFF,
        role: StaffRole::Provider,
        start_date: date(start),
        end_date: date(end),
    }
}

fn validator(store: Arc<InMemoryStore>) -> SchedulingValidator {
    SchedulingValidator::new(store).with_today(date("2025-02-20"))
}

#[tokio::test]
async fn test_overlapping_assignment_is_rejected() {
    let store = Arc::new(InMemoryStore::seeded());
    let validator = validator(store.clone());

    let first = proposal("2025-03-01", "2025-03-10");
    validator.validate_new_assignment(&first).await.unwrap();
    store.save(100, &first);

    let second = proposal("2025-03-05", "2025-03-15");
    assert_matches!(
        validator.validate_new_assignment(&second).await,
        Err(SchedulingError::Conflict(msg)) if msg.contains("100")
    );
}

#[tokio::test]
async fn test_boundary_day_conflicts_and_adjacent_day_does_not() {
    let store = Arc::new(InMemoryStore::seeded());
    let validator = validator(store.clone());
    store.save(100, &proposal("2025-03-01", "2025-03-10"));

    assert_matches!(
        validator.validate_new_assignment(&proposal("2025-03-10", "2025-03-20")).await,
        Err(SchedulingError::Conflict(_))
    );
    assert!(validator
        .validate_new_assignment(&proposal("2025-03-11", "2025-03-20"))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_other_pairs_do_not_conflict() {
    let store = Arc::new(InMemoryStore::seeded());
    let validator = validator(store.clone());
    store.save(100, &proposal("2025-03-01", "2025-03-10"));

    let other_client = AssignmentProposal { client_id: 2, ..proposal("2025-03-05", "2025-03-15") };
    assert!(validator.validate_new_assignment(&other_client).await.is_ok());
}

#[tokio::test]
async fn test_update_excludes_itself_from_overlap_scan() {
    let store = Arc::new(InMemoryStore::seeded());
    let validator = validator(store.clone());
    store.save(100, &proposal("2025-03-01", "2025-03-10"));

    let extended = proposal("2025-03-01", "2025-03-12");
    assert!(validator.validate_updated_assignment(100, &extended).await.is_ok());
}

#[tokio::test]
async fn test_update_still_conflicts_with_siblings() {
    let store = Arc::new(InMemoryStore::seeded());
    let validator = validator(store.clone());
    store.save(100, &proposal("2025-03-01", "2025-03-10"));
    store.save(101, &proposal("2025-03-20", "2025-03-31"));

    assert_matches!(
        validator.validate_updated_assignment(100, &proposal("2025-03-01", "2025-03-20")).await,
        Err(SchedulingError::Conflict(msg)) if msg.contains("101")
    );
}

#[tokio::test]
async fn test_update_of_started_assignment_keeps_past_start() {
    let store = Arc::new(InMemoryStore::seeded());
    store.save(100, &proposal("2025-01-01", "2025-01-31"));
    let validator = SchedulingValidator::new(store.clone()).with_today(date("2025-01-15"));

    assert!(validator
        .validate_updated_assignment(100, &proposal("2025-01-01", "2025-02-28"))
        .await
        .is_ok());

    assert_matches!(
        validator.validate_updated_assignment(100, &proposal("2025-01-02", "2025-02-28")).await,
        Err(SchedulingError::InvalidRange(_))
    );
}

#[tokio::test]
async fn test_update_of_unknown_assignment() {
    let store = Arc::new(InMemoryStore::seeded());
    let validator = validator(store);

    assert_matches!(
        validator.validate_updated_assignment(404, &proposal("2025-03-01", "2025-03-02")).await,
        Err(SchedulingError::NotFound { entity: EntityKind::Assignment, id: 404 })
    );
}

#[tokio::test]
async fn test_start_in_past_is_rejected() {
    let validator = validator(Arc::new(InMemoryStore::seeded()));

    assert_matches!(
        validator.validate_new_assignment(&proposal("2025-02-19", "2025-03-01")).await,
        Err(SchedulingError::InvalidRange(_))
    );
    assert!(validator
        .validate_new_assignment(&proposal("2025-02-20", "2025-02-20"))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_end_before_start_is_rejected() {
    let validator = validator(Arc::new(InMemoryStore::seeded()));

    assert_matches!(
        validator.validate_new_assignment(&proposal("2025-03-10", "2025-03-09")).await,
        Err(SchedulingError::InvalidRange(_))
    );
}

#[tokio::test]
async fn test_missing_references() {
    let validator = validator(Arc::new(InMemoryStore::seeded()));

    let unknown_client = AssignmentProposal { client_id: 99, ..proposal("2025-03-01", "2025-03-02") };
    assert_matches!(
        validator.validate_new_assignment(&unknown_client).await,
        Err(SchedulingError::NotFound { entity: EntityKind::Client, id: 99 })
    );

    let unknown_staff = AssignmentProposal { staff_user_id: 99, ..proposal("2025-03-01", "2025-03-02") };
    assert_matches!(
        validator.validate_new_assignment(&unknown_staff).await,
        Err(SchedulingError::NotFound { entity: EntityKind::StaffUser, id: 99 })
    );
}

#[tokio::test]
async fn test_declared_role_must_match_stored_role() {
    let validator = validator(Arc::new(InMemoryStore::seeded()));

    let wrong_role = AssignmentProposal { role: StaffRole::Billing, ..proposal("2025-03-01", "2025-03-02") };
    assert_matches!(
        validator.validate_new_assignment(&wrong_role).await,
        Err(SchedulingError::RoleMismatch { staff_user_id: STAFF, expected: StaffRole::Billing, actual: StaffRole::Provider })
    );

    let peer = AssignmentProposal {
        staff_user_id: OTHER_STAFF,
        role: StaffRole::Peer,
        ..proposal("2025-03-01", "2025-03-02")
    };
    assert!(validator.validate_new_assignment(&peer).await.is_ok());
}

#[tokio::test]
async fn test_appointment_window_and_references() {
    let validator = validator(Arc::new(InMemoryStore::seeded()));
    let ten = Utc.with_ymd_and_hms(2025, 3, 4, 10, 0, 0).unwrap();
    let nine = Utc.with_ymd_and_hms(2025, 3, 4, 9, 0, 0).unwrap();

    assert_matches!(
        validator.validate_appointment(CLIENT, STAFF, ten, nine).await,
        Err(SchedulingError::InvalidRange(_))
    );
    assert_matches!(
        validator.validate_appointment(CLIENT, 77, nine, ten).await,
        Err(SchedulingError::NotFound { entity: EntityKind::Provider, id: 77 })
    );
    assert!(validator.validate_appointment(CLIENT, STAFF, nine, ten).await.is_ok());
}

#[tokio::test]
async fn test_note_link_to_other_clients_appointment() {
    let mut store = InMemoryStore::seeded();
    store.appointments.insert(5, appointment(5, 2, STAFF, AppointmentStatus::Scheduled));
    let validator = validator(Arc::new(store));

    assert_matches!(
        validator.validate_appointment_link(5, CLIENT, STAFF).await,
        Err(SchedulingError::InconsistentLink(_))
    );
    assert_eq!(validator.validate_appointment_link(5, 2, STAFF).await.unwrap().id, 5);
    assert_matches!(
        validator.validate_appointment_link(6, CLIENT, STAFF).await,
        Err(SchedulingError::NotFound { entity: EntityKind::Appointment, id: 6 })
    );
}

#[tokio::test]
async fn test_completed_appointment_cannot_be_deleted() {
    let completed = appointment(5, CLIENT, STAFF, AppointmentStatus::Completed);
    let scheduled = appointment(6, CLIENT, STAFF, AppointmentStatus::Scheduled);

    assert_matches!(
        SchedulingValidator::validate_appointment_deletion(&completed),
        Err(SchedulingError::DeletionBlocked { appointment_id: 5, status: AppointmentStatus::Completed })
    );
    assert!(SchedulingValidator::validate_appointment_deletion(&scheduled).is_ok());
}

#[tokio::test]
async fn test_store_failures_propagate() {
    let validator = SchedulingValidator::new(Arc::new(BrokenStore)).with_today(date("2025-02-20"));

    let err = validator
        .validate_new_assignment(&proposal("2025-03-01", "2025-03-02"))
        .await
        .unwrap_err();
    assert_matches!(&err, SchedulingError::Store(_));
    assert_eq!(err.to_string(), "connection refused");
}
