//! Seeded records for every resource
//!
//! The data is built once and cloned out on each call so callers can mutate
//! their copy freely.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;

use ayur_models::{
    Appointment, AppointmentStatus, AppointmentType, Audience, AuditLog, Content, ContentStatus,
    ContentType, Document, Education, EmergencyContact, MedicalHistory, Notification,
    NotificationType, PartyRef, Patient, PaymentStatus, Practitioner, Review, Role, Severity,
    Transaction, TransactionStatus, TransactionType, User, VerificationStatus,
};

/// Records that have a seeded mock collection
pub trait Fixture: Sized + Clone {
    fn fixtures() -> Vec<Self>;
}

fn ts(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn practitioner(
    id: &str,
    name: &str,
    specialization: &str,
    status: VerificationStatus,
    rating: f32,
    experience_years: u32,
    created: &str,
) -> Practitioner {
    let slug = name
        .trim_start_matches("Dr. ")
        .split_whitespace()
        .next()
        .unwrap_or(id)
        .to_lowercase();
    Practitioner {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{slug}@ayursutra.in"),
        phone: Some(format!("+91 98450 1{id:0>4}")),
        specialization: specialization.to_string(),
        license_number: format!("AYU-KA-{id:0>5}"),
        verification_status: status,
        verification_notes: None,
        rating,
        experience_years,
        consultation_fee: Some(800.0),
        documents: vec![
            Document {
                document_type: "license".into(),
                url: format!("https://files.ayursutra.in/{id}/license.pdf"),
                verified: status == VerificationStatus::Verified,
                uploaded_at: Some(ts(created)),
            },
            Document {
                document_type: "degree".into(),
                url: format!("https://files.ayursutra.in/{id}/bams.pdf"),
                verified: status == VerificationStatus::Verified,
                uploaded_at: Some(ts(created)),
            },
        ],
        education: vec![Education {
            degree: "BAMS".into(),
            institution: "Government Ayurveda College".into(),
            year: Some(2024 - experience_years as u16 - 1),
        }],
        certifications: strings(&["Registered Ayurveda Practitioner"]),
        is_active: status != VerificationStatus::Rejected,
        created_at: Some(ts(created)),
        updated_at: Some(ts(created)),
    }
}

static PRACTITIONERS: Lazy<Vec<Practitioner>> = Lazy::new(|| {
    let mut list = vec![
        practitioner(
            "1",
            "Dr. Meera Nair",
            "Panchakarma",
            VerificationStatus::Verified,
            4.8,
            12,
            "2024-01-05T09:00:00Z",
        ),
        practitioner(
            "2",
            "Dr. Arjun Sharma",
            "Kayachikitsa",
            VerificationStatus::Pending,
            0.0,
            4,
            "2024-02-11T10:30:00Z",
        ),
        practitioner(
            "3",
            "Dr. Lakshmi Iyer",
            "Shalakya Tantra",
            VerificationStatus::Verified,
            4.6,
            9,
            "2024-01-20T08:15:00Z",
        ),
        practitioner(
            "4",
            "Dr. Vikram Patel",
            "Rasayana",
            VerificationStatus::UnderReview,
            0.0,
            6,
            "2024-02-28T14:00:00Z",
        ),
        practitioner(
            "5",
            "Dr. Ananya Desai",
            "Panchakarma",
            VerificationStatus::Rejected,
            0.0,
            2,
            "2024-03-02T11:45:00Z",
        ),
    ];
    list[4].verification_notes = Some("License number could not be matched".into());
    list[3].verification_notes = Some("Awaiting updated degree certificate".into());
    list
});

static USERS: Lazy<Vec<User>> = Lazy::new(|| {
    let user = |id: &str, name: &str, email: &str, role: Role, active: bool, created: &str| User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        role,
        is_active: active,
        last_login: Some(ts("2024-03-14T08:00:00Z")),
        created_at: Some(ts(created)),
        updated_at: Some(ts(created)),
    };
    vec![
        user("u1", "Asha Menon", "asha@ayursutra.in", Role::Admin, true, "2023-12-01T09:00:00Z"),
        user("u2", "Dr. Meera Nair", "meera@ayursutra.in", Role::Practitioner, true, "2024-01-05T09:00:00Z"),
        user("u3", "Dr. Arjun Sharma", "arjun@ayursutra.in", Role::Practitioner, true, "2024-02-11T10:30:00Z"),
        user("u4", "Kiran Rao", "kiran.rao@example.com", Role::Patient, true, "2024-02-01T12:00:00Z"),
        user("u5", "Priya Kulkarni", "priya.k@example.com", Role::Patient, true, "2024-02-15T16:20:00Z"),
        user("u6", "Rahul Verma", "rahul.v@example.com", Role::Patient, false, "2024-03-01T07:45:00Z"),
    ]
});

static PATIENTS: Lazy<Vec<Patient>> = Lazy::new(|| {
    vec![
        Patient {
            id: "pt1".into(),
            name: "Kiran Rao".into(),
            email: "kiran.rao@example.com".into(),
            phone: Some("+91 99000 11111".into()),
            date_of_birth: day(1988, 4, 12),
            gender: Some("male".into()),
            medical_history: MedicalHistory {
                allergies: strings(&["Peanuts"]),
                conditions: strings(&["Lower back pain"]),
                medications: vec![],
            },
            emergency_contact: Some(EmergencyContact {
                name: "Sunita Rao".into(),
                phone: "+91 99000 22222".into(),
                relationship: Some("spouse".into()),
            }),
            is_active: true,
            created_at: Some(ts("2024-02-01T12:00:00Z")),
            updated_at: Some(ts("2024-02-01T12:00:00Z")),
        },
        Patient {
            id: "pt2".into(),
            name: "Priya Kulkarni".into(),
            email: "priya.k@example.com".into(),
            phone: Some("+91 99000 33333".into()),
            date_of_birth: day(1995, 9, 30),
            gender: Some("female".into()),
            medical_history: MedicalHistory {
                allergies: vec![],
                conditions: strings(&["Migraine", "Insomnia"]),
                medications: strings(&["Ashwagandha"]),
            },
            emergency_contact: None,
            is_active: true,
            created_at: Some(ts("2024-02-15T16:20:00Z")),
            updated_at: Some(ts("2024-02-20T10:00:00Z")),
        },
        Patient {
            id: "pt3".into(),
            name: "Rahul Verma".into(),
            email: "rahul.v@example.com".into(),
            phone: None,
            date_of_birth: day(1972, 1, 5),
            gender: Some("male".into()),
            medical_history: MedicalHistory {
                allergies: strings(&["Penicillin"]),
                conditions: strings(&["Type 2 diabetes"]),
                medications: strings(&["Metformin"]),
            },
            emergency_contact: Some(EmergencyContact {
                name: "Anil Verma".into(),
                phone: "+91 99000 44444".into(),
                relationship: Some("brother".into()),
            }),
            is_active: false,
            created_at: Some(ts("2024-03-01T07:45:00Z")),
            updated_at: Some(ts("2024-03-01T07:45:00Z")),
        },
        Patient {
            id: "pt4".into(),
            name: "Fatima Sheikh".into(),
            email: "fatima.s@example.com".into(),
            phone: Some("+91 99000 55555".into()),
            date_of_birth: day(2001, 11, 23),
            gender: Some("female".into()),
            medical_history: MedicalHistory::default(),
            emergency_contact: None,
            is_active: true,
            created_at: Some(ts("2024-03-08T09:10:00Z")),
            updated_at: Some(ts("2024-03-08T09:10:00Z")),
        },
    ]
});

static APPOINTMENTS: Lazy<Vec<Appointment>> = Lazy::new(|| {
    let meera = PartyRef::new("1", "Dr. Meera Nair");
    let lakshmi = PartyRef::new("3", "Dr. Lakshmi Iyer");
    let kiran = PartyRef::new("pt1", "Kiran Rao");
    let priya = PartyRef::new("pt2", "Priya Kulkarni");
    let fatima = PartyRef::new("pt4", "Fatima Sheikh");

    let appt = |id: &str,
                patient: &PartyRef,
                practitioner: &PartyRef,
                start: &str,
                end: &str,
                kind: AppointmentType,
                status: AppointmentStatus,
                fee: f64,
                payment: PaymentStatus| Appointment {
        id: id.to_string(),
        patient: patient.clone(),
        practitioner: practitioner.clone(),
        start_time: ts(start),
        end_time: ts(end),
        appointment_type: kind,
        status,
        fee,
        payment_status: payment,
        notes: None,
        cancellation_reason: None,
        review: None,
        created_at: Some(ts("2024-03-01T10:00:00Z")),
        updated_at: Some(ts("2024-03-01T10:00:00Z")),
    };

    let mut list = vec![
        appt("a1", &kiran, &meera, "2024-03-18T04:30:00Z", "2024-03-18T05:30:00Z",
            AppointmentType::Panchakarma, AppointmentStatus::Scheduled, 2500.0, PaymentStatus::Pending),
        appt("a2", &priya, &meera, "2024-03-18T06:00:00Z", "2024-03-18T06:30:00Z",
            AppointmentType::Consultation, AppointmentStatus::Confirmed, 800.0, PaymentStatus::Paid),
        appt("a3", &fatima, &lakshmi, "2024-03-15T09:00:00Z", "2024-03-15T09:30:00Z",
            AppointmentType::Consultation, AppointmentStatus::Completed, 800.0, PaymentStatus::Paid),
        appt("a4", &kiran, &lakshmi, "2024-03-12T05:00:00Z", "2024-03-12T05:45:00Z",
            AppointmentType::FollowUp, AppointmentStatus::Cancelled, 500.0, PaymentStatus::Refunded),
        appt("a5", &priya, &lakshmi, "2024-03-19T08:00:00Z", "2024-03-19T09:00:00Z",
            AppointmentType::Therapy, AppointmentStatus::Scheduled, 1500.0, PaymentStatus::Pending),
        appt("a6", &fatima, &meera, "2024-03-11T07:00:00Z", "2024-03-11T07:30:00Z",
            AppointmentType::Consultation, AppointmentStatus::NoShow, 800.0, PaymentStatus::Failed),
    ];
    list[2].notes = Some("Prescribed Triphala churna, review in 4 weeks".into());
    list[2].review = Some(Review {
        rating: 5,
        comment: Some("Very thorough consultation".into()),
    });
    list[3].cancellation_reason = Some("Travelling".into());
    list
});

static NOTIFICATIONS: Lazy<Vec<Notification>> = Lazy::new(|| {
    let n = |id: &str, title: &str, message: &str, kind: NotificationType, audience: Audience, read: bool, at: &str| {
        Notification {
            id: id.to_string(),
            title: title.to_string(),
            message: message.to_string(),
            notification_type: kind,
            audience,
            is_read: read,
            created_at: Some(ts(at)),
        }
    };
    vec![
        n("n1", "New practitioner signup", "Dr. Vikram Patel submitted documents for review",
            NotificationType::Verification, Audience::Admins, false, "2024-02-28T14:05:00Z"),
        n("n2", "Payment received", "INR 800.00 received for appointment a2",
            NotificationType::Payment, Audience::Admins, true, "2024-03-10T06:40:00Z"),
        n("n3", "Therapy reminder", "Your Panchakarma session starts tomorrow at 10:00",
            NotificationType::Reminder, Audience::Patients, false, "2024-03-17T04:30:00Z"),
        n("n4", "Scheduled maintenance", "The portal will be unavailable on Sunday 02:00-03:00 IST",
            NotificationType::System, Audience::All, false, "2024-03-14T12:00:00Z"),
    ]
});

static AUDIT_LOGS: Lazy<Vec<AuditLog>> = Lazy::new(|| {
    let admin = PartyRef::new("u1", "Asha Menon");
    let log = |id: &str, actor: Option<&PartyRef>, action: &str, resource_type: &str, resource_id: Option<&str>, severity: Severity, at: &str| {
        AuditLog {
            id: id.to_string(),
            actor: actor.cloned(),
            action: action.to_string(),
            resource_type: resource_type.to_string(),
            resource_id: resource_id.map(str::to_string),
            severity,
            ip_address: actor.map(|_| "10.0.0.12".to_string()),
            details: None,
            timestamp: ts(at),
        }
    };
    let mut list = vec![
        log("l1", Some(&admin), "user.login", "user", Some("u1"), Severity::Info, "2024-03-14T08:00:00Z"),
        log("l2", Some(&admin), "practitioner.verified", "practitioner", Some("3"), Severity::Info, "2024-01-22T09:30:00Z"),
        log("l3", Some(&admin), "practitioner.rejected", "practitioner", Some("5"), Severity::Warning, "2024-03-04T13:10:00Z"),
        log("l4", None, "auth.failed_login", "user", Some("u6"), Severity::Warning, "2024-03-13T22:41:00Z"),
        log("l5", Some(&admin), "user.deleted", "user", Some("u9"), Severity::Critical, "2024-03-09T17:05:00Z"),
    ];
    list[2].details = Some(serde_json::json!({"reason": "License number could not be matched"}));
    list
});

static CONTENT: Lazy<Vec<Content>> = Lazy::new(|| {
    let c = |id: &str, title: &str, body: &str, kind: ContentType, status: ContentStatus, tags: &[&str], at: &str| {
        Content {
            id: id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            content_type: kind,
            status,
            author: Some("Asha Menon".into()),
            tags: strings(tags),
            published_at: (status == ContentStatus::Published).then(|| ts(at)),
            created_at: Some(ts(at)),
            updated_at: Some(ts(at)),
        }
    };
    vec![
        c("c1", "Understanding your dosha", "Vata, Pitta and Kapha govern ...",
            ContentType::Article, ContentStatus::Published, &["dosha", "basics"], "2024-01-10T10:00:00Z"),
        c("c2", "Preparing for Panchakarma", "What to eat in the week before ...",
            ContentType::Article, ContentStatus::Draft, &["panchakarma"], "2024-03-05T10:00:00Z"),
        c("c3", "How do I reschedule?", "Open My Appointments and choose ...",
            ContentType::Faq, ContentStatus::Published, &["appointments"], "2024-02-02T10:00:00Z"),
        c("c4", "Monsoon wellness camp", "Join us for a free consultation camp ...",
            ContentType::Announcement, ContentStatus::Archived, &["events"], "2023-07-01T10:00:00Z"),
    ]
});

static TRANSACTIONS: Lazy<Vec<Transaction>> = Lazy::new(|| {
    let kiran = PartyRef::new("pt1", "Kiran Rao");
    let priya = PartyRef::new("pt2", "Priya Kulkarni");
    let fatima = PartyRef::new("pt4", "Fatima Sheikh");
    let meera = PartyRef::new("1", "Dr. Meera Nair");
    let lakshmi = PartyRef::new("3", "Dr. Lakshmi Iyer");
    let tx = |id: &str, appointment: &str, patient: &PartyRef, practitioner: &PartyRef, amount: f64, kind: TransactionType, status: TransactionStatus, at: &str| {
        Transaction {
            id: id.to_string(),
            appointment_id: Some(appointment.to_string()),
            patient: Some(patient.clone()),
            practitioner: Some(practitioner.clone()),
            amount,
            currency: "INR".into(),
            method: Some("upi".into()),
            transaction_type: kind,
            status,
            created_at: ts(at),
        }
    };
    vec![
        tx("t1", "a2", &priya, &meera, 800.0, TransactionType::Payment, TransactionStatus::Completed, "2024-03-10T06:40:00Z"),
        tx("t2", "a3", &fatima, &lakshmi, 800.0, TransactionType::Payment, TransactionStatus::Completed, "2024-03-15T09:35:00Z"),
        tx("t3", "a4", &kiran, &lakshmi, 500.0, TransactionType::Payment, TransactionStatus::Refunded, "2024-03-08T05:00:00Z"),
        tx("t4", "a4", &kiran, &lakshmi, 500.0, TransactionType::Refund, TransactionStatus::Completed, "2024-03-12T06:00:00Z"),
        tx("t5", "a1", &kiran, &meera, 2500.0, TransactionType::Payment, TransactionStatus::Pending, "2024-03-16T11:00:00Z"),
        tx("t6", "a6", &fatima, &meera, 800.0, TransactionType::Payment, TransactionStatus::Failed, "2024-03-11T06:55:00Z"),
    ]
});

pub fn mock_practitioners() -> Vec<Practitioner> {
    PRACTITIONERS.clone()
}

pub fn mock_users() -> Vec<User> {
    USERS.clone()
}

pub fn mock_patients() -> Vec<Patient> {
    PATIENTS.clone()
}

pub fn mock_appointments() -> Vec<Appointment> {
    APPOINTMENTS.clone()
}

pub fn mock_notifications() -> Vec<Notification> {
    NOTIFICATIONS.clone()
}

pub fn mock_audit_logs() -> Vec<AuditLog> {
    AUDIT_LOGS.clone()
}

pub fn mock_content() -> Vec<Content> {
    CONTENT.clone()
}

pub fn mock_transactions() -> Vec<Transaction> {
    TRANSACTIONS.clone()
}

impl Fixture for Practitioner {
    fn fixtures() -> Vec<Self> {
        mock_practitioners()
    }
}

impl Fixture for User {
    fn fixtures() -> Vec<Self> {
        mock_users()
    }
}

impl Fixture for Patient {
    fn fixtures() -> Vec<Self> {
        mock_patients()
    }
}

impl Fixture for Appointment {
    fn fixtures() -> Vec<Self> {
        mock_appointments()
    }
}

impl Fixture for Notification {
    fn fixtures() -> Vec<Self> {
        mock_notifications()
    }
}

impl Fixture for AuditLog {
    fn fixtures() -> Vec<Self> {
        mock_audit_logs()
    }
}

impl Fixture for Content {
    fn fixtures() -> Vec<Self> {
        mock_content()
    }
}

impl Fixture for Transaction {
    fn fixtures() -> Vec<Self> {
        mock_transactions()
    }
}
