use super::models::{Patient, Session, Template, User};

pub(super) fn users() -> Vec<User> {
    vec![
        User {
            id: "user_123".to_string(),
            email: "john.doe@example.com".to_string(),
            name: "John Doe".to_string(),
        },
        User {
            id: "user_456".to_string(),
            email: "jane.smith@example.com".to_string(),
            name: "Jane Smith".to_string(),
        },
    ]
}

pub(super) fn patients() -> Vec<Patient> {
    vec![
        Patient {
            id: "patient_123".to_string(),
            name: "Alice Johnson".to_string(),
            user_id: "user_123".to_string(),
            pronouns: Some("she/her".to_string()),
            email: Some("alice.johnson@example.com".to_string()),
            background: Some("Regular patient".to_string()),
            medical_history: Some("Type 2 diabetes".to_string()),
            family_history: Some("Diabetes".to_string()),
            social_history: Some("Active".to_string()),
            previous_treatment: Some("Metformin".to_string()),
        },
        Patient {
            id: "patient_456".to_string(),
            name: "Bob Wilson".to_string(),
            user_id: "user_123".to_string(),
            pronouns: Some("he/him".to_string()),
            email: Some("bob.wilson@example.com".to_string()),
            background: Some("New patient".to_string()),
            medical_history: Some("Allergies".to_string()),
            family_history: Some("None".to_string()),
            social_history: Some("Active".to_string()),
            previous_treatment: Some("Antihistamines".to_string()),
        },
    ]
}

pub(super) fn templates() -> Vec<Template> {
    vec![
        Template {
            id: "template_123".to_string(),
            title: "New Patient Visit".to_string(),
            kind: "default".to_string(),
            user_id: "user_123".to_string(),
        },
        Template {
            id: "template_456".to_string(),
            title: "Follow-up Visit".to_string(),
            kind: "predefined".to_string(),
            user_id: "user_123".to_string(),
        },
    ]
}

pub(super) fn sessions() -> Vec<Session> {
    vec![Session {
        id: "session_123".to_string(),
        user_id: "user_123".to_string(),
        patient_id: "patient_123".to_string(),
        patient_name: Some("Alice Johnson".to_string()),
        session_title: Some("Diabetes Follow-up".to_string()),
        session_summary: Some("Discussed medication adjustments".to_string()),
        transcript_status: Some("completed".to_string()),
        transcript: Some("Doctor: ... Patient: ...".to_string()),
        status: "completed".to_string(),
        date: "2024-01-15".to_string(),
        start_time: "2024-01-15T10:00:00Z".to_string(),
        end_time: Some("2024-01-15T10:30:00Z".to_string()),
        duration: Some("30 minutes".to_string()),
        template_id: Some("template_456".to_string()),
        clinical_notes: Vec::new(),
    }]
}
