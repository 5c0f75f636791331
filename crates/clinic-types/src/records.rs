//! Backend record shapes.
//!
//! Field names follow the backend's JSON exactly (`doctorID`, `patientName`, `visitTypeID`, ...).
//! Decoding goes through [`Row`]: identities read their own field first and fall back to `id`,
//! then `ID`, and a field of the wrong type is treated as absent rather than rejecting the record.

use crate::row::Row;
use crate::{Entity, Resource};
use serde::{Deserialize, Serialize};

// ============================================================================
// NORMALISED ENTITIES
// ============================================================================

/// A doctor as listed on the doctors dashboard.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Row")]
pub struct Doctor {
    #[serde(rename = "doctorID", skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<i64>,
    #[serde(rename = "doctorName")]
    pub doctor_name: String,
    #[serde(rename = "doctorEmail", skip_serializing_if = "Option::is_none")]
    pub doctor_email: Option<String>,
    #[serde(rename = "doctorPhone", skip_serializing_if = "Option::is_none")]
    pub doctor_phone: Option<String>,
    #[serde(rename = "doctorSpeciality", skip_serializing_if = "Option::is_none")]
    pub doctor_speciality: Option<String>,
}

impl Resource for Doctor {
    const LABEL: &'static str = "Doctor";
    const SINGULAR: &'static str = "doctor";
    const PLURAL: &'static str = "doctors";
    const RESOURCE: &'static str = "doctors";
}

impl Entity for Doctor {
    const ID_FIELD: &'static str = "doctorID";

    fn id(&self) -> Option<i64> {
        self.doctor_id
    }
}

/// A registered patient.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Row")]
pub struct Patient {
    #[serde(rename = "patientID", skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
    #[serde(rename = "patientName")]
    pub patient_name: String,
    #[serde(rename = "patientEmail", skip_serializing_if = "Option::is_none")]
    pub patient_email: Option<String>,
    #[serde(rename = "patientPhone", skip_serializing_if = "Option::is_none")]
    pub patient_phone: Option<String>,
    #[serde(rename = "patientAddress", skip_serializing_if = "Option::is_none")]
    pub patient_address: Option<String>,
}

impl Resource for Patient {
    const LABEL: &'static str = "Patient";
    const SINGULAR: &'static str = "patient";
    const PLURAL: &'static str = "patients";
    const RESOURCE: &'static str = "patients";
}

impl Entity for Patient {
    const ID_FIELD: &'static str = "patientID";

    fn id(&self) -> Option<i64> {
        self.patient_id
    }
}

/// A scheduled or completed visit.
///
/// `visit_date` is kept as the backend's ISO-like string; the client never does date arithmetic
/// on it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Row")]
pub struct Visit {
    #[serde(rename = "visitID", skip_serializing_if = "Option::is_none")]
    pub visit_id: Option<i64>,
    #[serde(rename = "visitTypeID", skip_serializing_if = "Option::is_none")]
    pub visit_type_id: Option<i64>,
    #[serde(rename = "visitType", skip_serializing_if = "Option::is_none")]
    pub visit_type: Option<String>,
    #[serde(rename = "visitDuration", skip_serializing_if = "Option::is_none")]
    pub visit_duration: Option<f64>,
    #[serde(rename = "visitDate", skip_serializing_if = "Option::is_none")]
    pub visit_date: Option<String>,
    #[serde(rename = "visitFee", skip_serializing_if = "Option::is_none")]
    pub visit_fee: Option<f64>,
}

impl Resource for Visit {
    const LABEL: &'static str = "Visit";
    const SINGULAR: &'static str = "visit";
    const PLURAL: &'static str = "visits";
    const RESOURCE: &'static str = "visits";
}

impl Entity for Visit {
    const ID_FIELD: &'static str = "visitID";

    fn id(&self) -> Option<i64> {
        self.visit_id
    }
}

// ============================================================================
// LIST-ONLY RECORDS
// ============================================================================

/// A fee schedule row. Not normalised; the fee list is replaced wholesale on each load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Row")]
pub struct Fee {
    #[serde(rename = "feeID", skip_serializing_if = "Option::is_none")]
    pub fee_id: Option<i64>,
    #[serde(rename = "visitTypeID", skip_serializing_if = "Option::is_none")]
    pub visit_type_id: Option<i64>,
    #[serde(rename = "visitType", skip_serializing_if = "Option::is_none")]
    pub visit_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl Resource for Fee {
    const LABEL: &'static str = "Fee";
    const SINGULAR: &'static str = "fee";
    const PLURAL: &'static str = "fees";
    const RESOURCE: &'static str = "fees";
}

/// An entry in the activity log.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Row")]
pub struct Activity {
    #[serde(rename = "activityID", skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(rename = "userEmail", skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Resource for Activity {
    const LABEL: &'static str = "Activity";
    const SINGULAR: &'static str = "activity entry";
    const PLURAL: &'static str = "activity";
    const RESOURCE: &'static str = "activity";
}

// ============================================================================
// DECODING
// ============================================================================

impl From<Row> for Doctor {
    fn from(row: Row) -> Self {
        Self {
            doctor_id: row.id(&["doctorID", "id", "ID"]),
            doctor_name: row.text("doctorName").unwrap_or_default(),
            doctor_email: row.text("doctorEmail"),
            doctor_phone: row.text("doctorPhone"),
            doctor_speciality: row.text("doctorSpeciality"),
        }
    }
}

impl From<Row> for Patient {
    fn from(row: Row) -> Self {
        Self {
            patient_id: row.id(&["patientID", "id", "ID"]),
            patient_name: row.text("patientName").unwrap_or_default(),
            patient_email: row.text("patientEmail"),
            patient_phone: row.text("patientPhone"),
            patient_address: row.text("patientAddress"),
        }
    }
}

impl From<Row> for Visit {
    fn from(row: Row) -> Self {
        Self {
            visit_id: row.id(&["visitID", "id", "ID"]),
            visit_type_id: row.id(&["visitTypeID"]),
            visit_type: row.text("visitType"),
            visit_duration: row.number("visitDuration"),
            visit_date: row.text("visitDate"),
            visit_fee: row.number("visitFee"),
        }
    }
}

impl From<Row> for Fee {
    fn from(row: Row) -> Self {
        Self {
            fee_id: row.id(&["feeID"]),
            visit_type_id: row.id(&["visitTypeID"]),
            visit_type: row.text("visitType"),
            amount: row.number("amount"),
        }
    }
}

impl From<Row> for Activity {
    fn from(row: Row) -> Self {
        Self {
            activity_id: row.id(&["activityID"]),
            action: row.text("action"),
            entity: row.text("entity"),
            user_email: row.text("userEmail"),
            timestamp: row.text("timestamp"),
        }
    }
}
